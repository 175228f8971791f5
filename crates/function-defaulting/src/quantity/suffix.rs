use std::{fmt::Display, str::FromStr};

use snafu::Snafu;

#[derive(Debug, PartialEq, Eq, Snafu)]
#[snafu(display("failed to parse {input:?} as quantity suffix"))]
pub struct ParseSuffixError {
    input: String,
}

/// The suffix of a [`Quantity`][super::Quantity], which scales its numeric value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Suffix {
    DecimalMultiple(DecimalMultiple),
    BinaryMultiple(BinaryMultiple),
    DecimalExponent(DecimalExponent),
}

impl FromStr for Suffix {
    type Err = ParseSuffixError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if let Ok(binary) = BinaryMultiple::from_str(input) {
            return Ok(Self::BinaryMultiple(binary));
        }

        if let Ok(decimal) = DecimalMultiple::from_str(input) {
            return Ok(Self::DecimalMultiple(decimal));
        }

        if let Some(exponent) = input.strip_prefix(['e', 'E'])
            && let Ok(exponent) = f64::from_str(exponent)
        {
            return Ok(Self::DecimalExponent(DecimalExponent(exponent)));
        }

        ParseSuffixSnafu { input }.fail()
    }
}

impl Display for Suffix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DecimalMultiple(decimal) => write!(f, "{decimal}"),
            Self::BinaryMultiple(binary) => write!(f, "{binary}"),
            Self::DecimalExponent(exponent) => write!(f, "e{exponent}"),
        }
    }
}

impl Suffix {
    /// Scales the numeric `value` of a quantity by this suffix.
    pub fn scale(&self, value: f64) -> f64 {
        match self {
            Self::DecimalMultiple(s) => s.scale(value),
            Self::BinaryMultiple(s) => s.scale(value),
            Self::DecimalExponent(s) => s.scale(value),
        }
    }
}

/// Multiplies `value` by `10^exponent` with a single rounding step.
///
/// Multiplying by the factor would round twice, which makes `1.1k` come out slightly larger than
/// `1100`. Shifting the exponent of the shortest decimal form of `value` and parsing that instead
/// yields the float nearest to the exact product.
fn scale_decimal(value: f64, exponent: i32) -> f64 {
    format!("{value}e{exponent}")
        .parse()
        .unwrap_or_else(|_| value * 10f64.powi(exponent))
}

/// Supported byte-multiples based on powers of 2.
///
/// These units are defined in IEC 80000-13 and are supported by other standards bodies like NIST.
/// Kubernetes adopted them with slight changes (mentioned in parentheses).
///
/// ```plain
/// - 1024^1, KiB (Ki), Kibibyte
/// - 1024^2, MiB (Mi), Mebibyte
/// - 1024^3, GiB (Gi), Gibibyte
/// - 1024^4, TiB (Ti), Tebibyte
/// - 1024^5, PiB (Pi), Pebibyte
/// - 1024^6, EiB (Ei), Exbibyte
/// ```
///
/// All units bigger than Exbibyte are not a valid suffix according to the [Kubernetes serialization
/// format][k8s-serialization-format].
///
/// [k8s-serialization-format]: https://github.com/kubernetes/apimachinery/blob/8c60292e48e46c4faa1e92acb232ce6adb37512c/pkg/api/resource/quantity.go#L37-L59
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
pub enum BinaryMultiple {
    #[strum(serialize = "Ki")]
    Kibi,

    #[strum(serialize = "Mi")]
    Mebi,

    #[strum(serialize = "Gi")]
    Gibi,

    #[strum(serialize = "Ti")]
    Tebi,

    #[strum(serialize = "Pi")]
    Pebi,

    #[strum(serialize = "Ei")]
    Exbi,
}

impl BinaryMultiple {
    pub fn scale(self, value: f64) -> f64 {
        let exponent = match self {
            Self::Kibi => 10,
            Self::Mebi => 20,
            Self::Gibi => 30,
            Self::Tebi => 40,
            Self::Pebi => 50,
            Self::Exbi => 60,
        };

        value * 2f64.powi(exponent)
    }
}

/// Supported multiples based on powers of 10.
///
/// ```plain
/// - 1000^-1, (m): milli (the usual unit for CPU)
/// - 1000^ 1, (k): kilo
/// - 1000^ 2, (M): mega
/// - 1000^ 3, (G): giga
/// - 1000^ 4, (T): tera
/// - 1000^ 5, (P): peta
/// - 1000^ 6, (E): exa
/// ```
///
/// Note that Kubernetes uses a lowercase 'k' for kilo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
pub enum DecimalMultiple {
    #[strum(serialize = "m")]
    Milli,

    #[strum(serialize = "k")]
    Kilo,

    #[strum(serialize = "M")]
    Mega,

    #[strum(serialize = "G")]
    Giga,

    #[strum(serialize = "T")]
    Tera,

    #[strum(serialize = "P")]
    Peta,

    #[strum(serialize = "E")]
    Exa,
}

impl DecimalMultiple {
    pub fn scale(self, value: f64) -> f64 {
        let exponent = match self {
            Self::Milli => -3,
            Self::Kilo => 3,
            Self::Mega => 6,
            Self::Giga => 9,
            Self::Tera => 12,
            Self::Peta => 15,
            Self::Exa => 18,
        };

        scale_decimal(value, exponent)
    }
}

/// Scientific (also known as E) notation of numbers.
///
/// See <https://en.wikipedia.org/wiki/Scientific_notation#E_notation>
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecimalExponent(pub(super) f64);

impl DecimalExponent {
    pub fn scale(self, value: f64) -> f64 {
        let exponent = self.0;

        if exponent.fract() == 0.0 && exponent.abs() <= f64::from(f64::MAX_10_EXP) {
            scale_decimal(value, exponent as i32)
        } else {
            value * 10f64.powf(exponent)
        }
    }
}

impl Display for DecimalExponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
