//! Amount helpers
//!
//! The gateway takes amounts in minor units (hellers, cents) as JSON numbers.
//! Amounts are kept as [`Decimal`] so totals are compared exactly.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serializer;

/// Precision used when comparing EET totals
pub const EET_PRECISION: u32 = 8;

/// Convert an amount in major units to minor units, rounding half away from zero
///
/// Returns `None` when the result does not fit in a [`Decimal`].
pub fn to_cents(amount: Decimal) -> Option<Decimal> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|cents| cents.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
}

/// Compare two amounts after rounding both to `dp` fractional digits
pub fn eq_at_precision(left: Decimal, right: Decimal, dp: u32) -> bool {
    left.round_dp(dp) == right.round_dp(dp)
}

/// Serialize a whole amount as a JSON integer and anything else as a float
pub(crate) fn serialize_amount<S>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let normalized = amount.normalize();
    if normalized.fract().is_zero() {
        if let Some(whole) = normalized.to_i64() {
            return serializer.serialize_i64(whole);
        }
    }
    match normalized.to_f64() {
        Some(value) => serializer.serialize_f64(value),
        None => serializer.serialize_str(&normalized.to_string()),
    }
}

pub(crate) fn serialize_optional_amount<S>(
    amount: &Option<Decimal>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match amount {
        Some(amount) => serialize_amount(amount, serializer),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[derive(serde::Serialize)]
    struct Wrapper {
        #[serde(serialize_with = "serialize_amount")]
        amount: Decimal,
    }

    #[test]
    fn test_to_cents_rounds_half_away_from_zero() {
        assert_eq!(to_cents(dec!(10.005)), Some(dec!(1001)));
        assert_eq!(to_cents(dec!(99.99)), Some(dec!(9999)));
        assert_eq!(to_cents(dec!(-0.125)), Some(dec!(-13)));
        assert_eq!(to_cents(Decimal::MAX), None);
    }

    #[test]
    fn test_eq_at_precision_ignores_noise_past_eight_digits() {
        assert!(eq_at_precision(dec!(1000), dec!(999.999999999), EET_PRECISION));
        assert!(!eq_at_precision(dec!(1000), dec!(999.9999999), EET_PRECISION));
    }

    #[test]
    fn test_whole_amounts_serialize_as_integers() {
        let json = serde_json::to_string(&Wrapper { amount: dec!(1000.00) }).unwrap();
        assert_eq!(json, r#"{"amount":1000}"#);

        let json = serde_json::to_string(&Wrapper { amount: dec!(12.5) }).unwrap();
        assert_eq!(json, r#"{"amount":12.5}"#);
    }
}
