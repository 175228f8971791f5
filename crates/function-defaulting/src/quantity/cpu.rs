use serde::{Deserialize, Serialize};

use crate::quantity::{Quantity, macros::forward_quantity_impls};

/// A [`Quantity`] on the CPU axis, usually expressed in millicores (`100m`) or cores (`0.5`).
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct CpuQuantity(Quantity);

forward_quantity_impls!(CpuQuantity, "CpuQuantity");

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;
    use crate::quantity::AmountExt as _;

    #[rstest]
    #[case("50m", "15m", "50m")]
    #[case("1100m", "1200m", "1200m")]
    #[case("1", "1000m", "1")]
    #[case("0.5", "600m", "600m")]
    fn at_least(#[case] lhs: &str, #[case] rhs: &str, #[case] expected: &str) {
        let lhs = CpuQuantity::from_str(lhs).expect("valid cpu quantity");
        let rhs = CpuQuantity::from_str(rhs).expect("valid cpu quantity");
        assert_eq!(lhs.at_least(&rhs).to_string(), expected);
    }

    #[test]
    fn deserialize_from_string() {
        let cpu: CpuQuantity = serde_json::from_str(r#""250m""#).expect("valid cpu quantity");
        assert!(cpu.cmp_amount(&CpuQuantity::from_str("0.25").expect("valid cpu quantity")).is_eq());
        assert_eq!(
            serde_json::to_string(&cpu).expect("serializable"),
            r#""250m""#
        );
    }

    #[test]
    fn deserialize_invalid_fails() {
        assert!(serde_json::from_str::<CpuQuantity>(r#""lots""#).is_err());
    }
}
