//! Resource amounts in the Kubernetes quantity serialization format.
//!
//! A [`Quantity`] is a numeric value with an optional [`Suffix`], for example `100m` or `128Mi`.
//! The textual form is preserved as-is, so a quantity that was supplied by a user is written back
//! exactly as it was given. Two quantities are compared by their *amount* (the numeric value
//! multiplied by the factor of the suffix) using [`Quantity::cmp_amount`], which means `1Gi` and
//! `1024Mi` describe the same amount but are not structurally equal.
//!
//! The specialized [`CpuQuantity`] and [`MemoryQuantity`] newtypes make sure an amount can only
//! ever be used for the resource axis it was parsed for.

use std::{cmp::Ordering, fmt::Display, num::ParseFloatError, ops::Deref, str::FromStr};

use k8s_openapi::apimachinery::pkg::api::resource::Quantity as K8sQuantity;
use snafu::{ResultExt as _, Snafu, ensure};

mod cpu;
mod macros;
mod memory;
mod suffix;

pub use cpu::*;
pub use memory::*;
pub use suffix::*;

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum ParseQuantityError {
    #[snafu(display("input is either empty or contains non-ascii characters"))]
    InvalidFormat,

    #[snafu(display("failed to parse floating point number"))]
    InvalidFloat { source: ParseFloatError },

    #[snafu(display("failed to parse suffix"))]
    InvalidSuffix { source: ParseSuffixError },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quantity {
    /// The numeric value of the quantity.
    ///
    /// We don't use arbitrary-precision arithmetic like the apimachinery implementation, as resource
    /// presets never get close to the limits of an [`f64`].
    value: f64,

    /// The optional suffix of the quantity.
    suffix: Option<Suffix>,
}

impl FromStr for Quantity {
    type Err = ParseQuantityError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        ensure!(!input.is_empty() && input.is_ascii(), InvalidFormatSnafu);

        match input.find(|c: char| c != '.' && !c.is_ascii_digit()) {
            Some(suffix_index) => {
                let (value, suffix) = input.split_at(suffix_index);
                let value = f64::from_str(value).context(InvalidFloatSnafu)?;
                let suffix = Suffix::from_str(suffix).context(InvalidSuffixSnafu)?;

                Ok(Self {
                    value,
                    suffix: Some(suffix),
                })
            }
            None => {
                let value = f64::from_str(input).context(InvalidFloatSnafu)?;
                Ok(Self {
                    value,
                    suffix: None,
                })
            }
        }
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.suffix {
            Some(suffix) => write!(f, "{value}{suffix}", value = self.value),
            None => write!(f, "{value}", value = self.value),
        }
    }
}

impl From<Quantity> for K8sQuantity {
    fn from(value: Quantity) -> Self {
        K8sQuantity(value.to_string())
    }
}

impl TryFrom<&K8sQuantity> for Quantity {
    type Error = ParseQuantityError;

    fn try_from(value: &K8sQuantity) -> Result<Self, Self::Error> {
        Quantity::from_str(&value.0)
    }
}

impl Quantity {
    /// The amount this quantity describes, with the suffix applied.
    pub fn amount(&self) -> f64 {
        match &self.suffix {
            Some(suffix) => suffix.scale(self.value),
            None => self.value,
        }
    }

    /// Compares the amounts of two quantities, regardless of their suffixes.
    ///
    /// Amounts are rounded once to the nearest [`f64`], so two spellings of the same decimal amount
    /// such as `1.1k` and `1100` compare as equal.
    pub fn cmp_amount(&self, other: &Self) -> Ordering {
        self.amount().total_cmp(&other.amount())
    }
}

/// Amount based selection between two values of the same quantity kind.
///
/// Ties are resolved in favour of `self`, so the textual form of the receiver is kept when both
/// sides describe the same amount.
pub trait AmountExt: Deref<Target = Quantity> + Sized {
    /// Returns `other` if it describes a strictly larger amount, `self` otherwise.
    fn at_least(self, other: &Self) -> Self
    where
        Self: Clone,
    {
        match self.cmp_amount(other) {
            Ordering::Less => other.clone(),
            Ordering::Equal | Ordering::Greater => self,
        }
    }

    /// Returns `other` if it describes a strictly smaller amount, `self` otherwise.
    fn at_most(self, other: &Self) -> Self
    where
        Self: Clone,
    {
        match self.cmp_amount(other) {
            Ordering::Greater => other.clone(),
            Ordering::Equal | Ordering::Less => self,
        }
    }
}

impl<T> AmountExt for T where T: Deref<Target = Quantity> {}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("49041204Ki", Quantity { value: 49041204.0, suffix: Some(Suffix::BinaryMultiple(BinaryMultiple::Kibi)) })]
    #[case("1.5Gi", Quantity { value: 1.5, suffix: Some(Suffix::BinaryMultiple(BinaryMultiple::Gibi)) })]
    #[case("8Mi", Quantity { value: 8.0, suffix: Some(Suffix::BinaryMultiple(BinaryMultiple::Mebi)) })]
    #[case("256k", Quantity { value: 256.0, suffix: Some(Suffix::DecimalMultiple(DecimalMultiple::Kilo)) })]
    #[case("100m", Quantity { value: 100.0, suffix: Some(Suffix::DecimalMultiple(DecimalMultiple::Milli)) })]
    #[case("1.234e3", Quantity { value: 1.234, suffix: Some(Suffix::DecimalExponent(DecimalExponent(3.0))) })]
    #[case("2", Quantity { value: 2.0, suffix: None })]
    #[case("0", Quantity { value: 0.0, suffix: None })]
    fn quantity_from_str_pass(#[case] input: &str, #[case] expected: Quantity) {
        let parsed = Quantity::from_str(input).expect("valid quantity");
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case("")]
    #[case("Mi")]
    #[case("1.2.3Mi")]
    #[case("12Xi")]
    #[case("-5m")]
    #[case("5 m")]
    #[case("ümlaut")]
    fn quantity_from_str_fail(#[case] input: &str) {
        assert!(Quantity::from_str(input).is_err());
    }

    #[rstest]
    #[case("150m")]
    #[case("12000Mi")]
    #[case("1.5Gi")]
    #[case("0.5")]
    #[case("0Mi")]
    fn quantity_display_keeps_input(#[case] input: &str) {
        let parsed = Quantity::from_str(input).expect("valid quantity");
        assert_eq!(parsed.to_string(), input);
    }

    #[rstest]
    #[case("1Gi", "1024Mi", Ordering::Equal)]
    #[case("1", "1000m", Ordering::Equal)]
    #[case("1100m", "1200m", Ordering::Less)]
    #[case("1.5", "1200m", Ordering::Greater)]
    #[case("128Mi", "100M", Ordering::Greater)]
    #[case("1k", "1Ki", Ordering::Less)]
    #[case("1e3", "1k", Ordering::Equal)]
    #[case("1.1k", "1100", Ordering::Equal)]
    #[case("1.1e3", "1100", Ordering::Equal)]
    #[case("300m", "0.3", Ordering::Equal)]
    #[case("1.1Ki", "1126.4", Ordering::Equal)]
    #[case("1.1k", "1100.001", Ordering::Less)]
    fn quantity_cmp_amount(#[case] lhs: &str, #[case] rhs: &str, #[case] expected: Ordering) {
        let lhs = Quantity::from_str(lhs).expect("valid quantity");
        let rhs = Quantity::from_str(rhs).expect("valid quantity");
        assert_eq!(lhs.cmp_amount(&rhs), expected);
    }
}
