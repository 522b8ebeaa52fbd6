use rust_decimal::Decimal;

use crate::errors::{Result, ValidationError};

/// Turns the `None` of a checked `Decimal` operation into a validation error
/// naming the quantity that overflowed.
pub fn checked(value: Option<Decimal>, what: &str) -> Result<Decimal> {
    value.ok_or_else(|| ValidationError::InvalidInput(format!("{} overflows", what)).into())
}

/// Sum of `values`, failing instead of overflowing.
pub fn checked_sum<I>(values: I, what: &str) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| checked(acc.checked_add(v), what))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use rust_decimal_macros::dec;

    #[test]
    fn test_checked_passes_values_through() {
        assert_eq!(checked(dec!(2).checked_mul(dec!(3)), "x").unwrap(), dec!(6));
    }

    #[test]
    fn test_overflow_is_invalid_input() {
        let err = checked(Decimal::MAX.checked_mul(dec!(2)), "cost").unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::InvalidInput(m)) if m == "cost overflows"));
    }

    #[test]
    fn test_checked_sum() {
        assert_eq!(checked_sum([dec!(1), dec!(2.5)], "x").unwrap(), dec!(3.5));
        assert!(checked_sum([Decimal::MAX, Decimal::MAX], "x").is_err());
    }
}
