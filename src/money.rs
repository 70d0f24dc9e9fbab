//! Money and discount arithmetic.
//!
//! All amounts are integer minor currency units. Percentage maths goes
//! through [`rust_decimal`] and rounds half-up on the smallest unit, so a
//! price never picks up fractional drift.

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An amount in minor currency units.
pub type Minor = i64;

/// Errors from discount arithmetic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The calculation overflowed or produced a non-representable amount.
    #[error("discount arithmetic overflowed or was not finite")]
    Conversion,
}

/// Errors decoding a raw discount record into a [`Discount`].
#[derive(Debug, Error, PartialEq)]
pub enum DiscountDecodeError {
    /// The record carried a discount type tag this core does not know.
    #[error("unknown discount type `{0}`")]
    UnknownKind(String),

    /// The discount value was not a usable finite, non-negative number.
    #[error("discount value {0} is not usable")]
    InvalidValue(f64),
}

/// A validated discount, decoded once at the store boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Discount {
    /// Deduct this percentage of the base amount.
    Percent(Decimal),

    /// Deduct this fixed amount of minor units.
    Fixed(Minor),
}

impl Discount {
    /// A whole-number percentage discount.
    #[must_use]
    pub fn percent(value: u32) -> Self {
        Self::Percent(Decimal::from(value))
    }

    /// A fixed-amount discount in minor units.
    #[must_use]
    pub const fn fixed(value: Minor) -> Self {
        Self::Fixed(value)
    }

    /// Decodes the loosely-typed `(type, value)` pair the store holds.
    ///
    /// Recognised type tags are `percent`/`percentage` and `fixed`/`amount`.
    ///
    /// # Errors
    ///
    /// - [`DiscountDecodeError::UnknownKind`] for any other tag.
    /// - [`DiscountDecodeError::InvalidValue`] when the value is not a
    ///   finite, non-negative number.
    pub fn decode(kind: &str, value: f64) -> Result<Self, DiscountDecodeError> {
        if !value.is_finite() || value < 0.0 {
            return Err(DiscountDecodeError::InvalidValue(value));
        }

        let decimal =
            Decimal::from_f64_retain(value).ok_or(DiscountDecodeError::InvalidValue(value))?;

        match kind.trim().to_lowercase().as_str() {
            "percent" | "percentage" => Ok(Self::Percent(decimal)),
            "fixed" | "amount" => {
                let minor = round_minor(decimal)
                    .map_err(|_| DiscountDecodeError::InvalidValue(value))?;

                Ok(Self::Fixed(minor))
            }
            other => Err(DiscountDecodeError::UnknownKind(other.to_owned())),
        }
    }
}

/// Applies a discount to a base price and returns the discounted price.
///
/// Percent discounts compute `round(base * (1 - value/100))`; fixed discounts
/// compute `base - value`. Either way the result is clamped at zero. The
/// result is not guaranteed to be lower than `base` (a zero-valued discount
/// passes the price through); callers deciding whether something is "on sale"
/// must compare against the base price themselves.
///
/// # Errors
///
/// Returns [`PriceError::Conversion`] when the percentage maths cannot be
/// represented in minor units.
pub fn resolve_price(base: Minor, discount: &Discount) -> Result<Minor, PriceError> {
    let resolved = match discount {
        Discount::Percent(value) => {
            let keep = Decimal::ONE
                .checked_sub(
                    value
                        .checked_div(Decimal::ONE_HUNDRED)
                        .ok_or(PriceError::Conversion)?,
                )
                .ok_or(PriceError::Conversion)?;

            let discounted = Decimal::from(base)
                .checked_mul(keep)
                .ok_or(PriceError::Conversion)?;

            round_minor(discounted)?
        }
        Discount::Fixed(value) => base.saturating_sub(*value),
    };

    Ok(resolved.max(0))
}

/// Computes the amount a discount takes off a subtotal, uncapped and
/// clamped at zero.
///
/// # Errors
///
/// Returns [`PriceError::Conversion`] when the percentage maths cannot be
/// represented in minor units.
pub fn discount_amount(subtotal: Minor, discount: &Discount) -> Result<Minor, PriceError> {
    let amount = match discount {
        Discount::Percent(value) => {
            let fraction = value
                .checked_div(Decimal::ONE_HUNDRED)
                .ok_or(PriceError::Conversion)?;

            let taken = Decimal::from(subtotal)
                .checked_mul(fraction)
                .ok_or(PriceError::Conversion)?;

            round_minor(taken)?
        }
        Discount::Fixed(value) => *value,
    };

    Ok(amount.max(0))
}

/// Rounds a decimal amount half-up to whole minor units.
fn round_minor(amount: Decimal) -> Result<Minor, PriceError> {
    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PriceError::Conversion)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn percent_discount_on_round_base() -> TestResult {
        let price = resolve_price(100_000, &Discount::percent(20))?;

        assert_eq!(price, 80_000);

        Ok(())
    }

    #[test]
    fn fixed_discount_subtracts() -> TestResult {
        let price = resolve_price(100_000, &Discount::fixed(30_000))?;

        assert_eq!(price, 70_000);

        Ok(())
    }

    #[test]
    fn fixed_discount_floors_at_zero() -> TestResult {
        let price = resolve_price(100_000, &Discount::fixed(150_000))?;

        assert_eq!(price, 0);

        Ok(())
    }

    #[test]
    fn percent_rounds_half_up() -> TestResult {
        // 150 * 0.85 = 127.5
        let price = resolve_price(150, &Discount::percent(15))?;

        assert_eq!(price, 128);

        Ok(())
    }

    #[test]
    fn zero_valued_discount_passes_price_through() -> TestResult {
        assert_eq!(resolve_price(100_000, &Discount::percent(0))?, 100_000);
        assert_eq!(resolve_price(100_000, &Discount::fixed(0))?, 100_000);

        Ok(())
    }

    #[test]
    fn over_100_percent_clamps_to_zero() -> TestResult {
        let price = resolve_price(100_000, &Discount::percent(120))?;

        assert_eq!(price, 0);

        Ok(())
    }

    #[test]
    fn discount_amount_percent() -> TestResult {
        let amount = discount_amount(400_000, &Discount::percent(10))?;

        assert_eq!(amount, 40_000);

        Ok(())
    }

    #[test]
    fn discount_amount_fixed_is_uncapped() -> TestResult {
        let amount = discount_amount(10_000, &Discount::fixed(25_000))?;

        assert_eq!(amount, 25_000);

        Ok(())
    }

    #[test]
    fn decode_percentage_alias() -> TestResult {
        let discount = Discount::decode("Percentage", 15.0)?;

        assert_eq!(discount, Discount::percent(15));

        Ok(())
    }

    #[test]
    fn decode_fixed_amount() -> TestResult {
        let discount = Discount::decode("fixed", 30_000.0)?;

        assert_eq!(discount, Discount::fixed(30_000));

        Ok(())
    }

    #[test]
    fn decode_unknown_kind_is_an_error() {
        let result = Discount::decode("bogo", 1.0);

        assert!(matches!(result, Err(DiscountDecodeError::UnknownKind(_))));
    }

    #[test]
    fn decode_rejects_nan_and_negative() {
        assert!(matches!(
            Discount::decode("percent", f64::NAN),
            Err(DiscountDecodeError::InvalidValue(_))
        ));
        assert!(matches!(
            Discount::decode("fixed", -5.0),
            Err(DiscountDecodeError::InvalidValue(_))
        ));
    }
}
