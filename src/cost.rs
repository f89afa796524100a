//! Cost

use rust_decimal::Decimal;

use crate::errors::ValidationError;

/// Total payable cost of a quote.
///
/// Applied in a fixed order: the discount comes off the value first, shipping
/// is added to the discounted base, then tax is charged on base plus shipping.
/// Missing shipping and tax count as zero. Never cache the result: discount,
/// shipping and tax change independently of the price history.
///
/// Returns `None` when the result does not fit a [`Decimal`].
pub fn total_cost(
    value: Decimal,
    discount_pct: Decimal,
    shipping: Option<Decimal>,
    tax_pct: Option<Decimal>,
) -> Option<Decimal> {
    let kept = Decimal::ONE.checked_sub(percent(discount_pct)?)?;
    let taxed = Decimal::ONE.checked_add(percent(tax_pct.unwrap_or_default())?)?;

    value
        .checked_mul(kept)?
        .checked_add(shipping.unwrap_or_default())?
        .checked_mul(taxed)
}

fn percent(points: Decimal) -> Option<Decimal> {
    points.checked_div(Decimal::ONE_HUNDRED)
}

/// Check the cost terms of a quote before they are stored.
///
/// # Errors
///
/// - [`ValidationError::DiscountOutOfRange`]: discount outside `[0, 100]`.
/// - [`ValidationError::NegativeShipping`]: shipping below zero.
/// - [`ValidationError::NegativeTaxRate`]: tax below zero.
pub fn validate_terms(
    discount_pct: Decimal,
    shipping: Option<Decimal>,
    tax_pct: Option<Decimal>,
) -> Result<(), ValidationError> {
    if !(Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&discount_pct) {
        return Err(ValidationError::DiscountOutOfRange(discount_pct));
    }

    if let Some(shipping) = shipping.filter(|s| *s < Decimal::ZERO) {
        return Err(ValidationError::NegativeShipping(shipping));
    }

    if let Some(tax) = tax_pct.filter(|t| *t < Decimal::ZERO) {
        return Err(ValidationError::NegativeTaxRate(tax));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn discount_then_shipping_then_tax() {
        assert_eq!(
            total_cost(dec!(1000), dec!(10), Some(dec!(50)), Some(dec!(10))),
            Some(dec!(1045))
        );
    }

    #[test]
    fn missing_terms_leave_value_unchanged() {
        assert_eq!(
            total_cost(dec!(949), Decimal::ZERO, None, None),
            Some(dec!(949))
        );
    }

    #[test]
    fn tax_applies_to_shipping() {
        assert_eq!(
            total_cost(dec!(100), Decimal::ZERO, Some(dec!(20)), Some(dec!(25))),
            Some(dec!(150))
        );
    }

    #[test]
    fn full_discount_leaves_only_shipping() {
        assert_eq!(
            total_cost(dec!(500), dec!(100), Some(dec!(15)), None),
            Some(dec!(15))
        );
    }

    #[test]
    fn negative_terms_are_computed_arithmetically() {
        assert_eq!(
            total_cost(dec!(100), Decimal::ZERO, Some(dec!(-10)), None),
            Some(dec!(90))
        );
    }

    #[test]
    fn overflowing_cost_is_none() {
        assert_eq!(
            total_cost(Decimal::MAX, Decimal::ZERO, Some(Decimal::ONE), Some(dec!(10))),
            None
        );
        assert_eq!(
            total_cost(Decimal::MAX, Decimal::ZERO, None, Some(dec!(10))),
            None
        );
        assert_eq!(
            total_cost(Decimal::MAX, Decimal::ZERO, None, None),
            Some(Decimal::MAX)
        );
    }

    #[test]
    fn validate_terms_accepts_boundaries() -> TestResult {
        validate_terms(Decimal::ZERO, None, None)?;
        validate_terms(dec!(100), Some(Decimal::ZERO), Some(Decimal::ZERO))?;

        Ok(())
    }

    #[test]
    fn validate_terms_rejects_out_of_range_discount() {
        assert_eq!(
            validate_terms(dec!(100.5), None, None),
            Err(ValidationError::DiscountOutOfRange(dec!(100.5)))
        );
        assert_eq!(
            validate_terms(dec!(-1), None, None),
            Err(ValidationError::DiscountOutOfRange(dec!(-1)))
        );
    }

    #[test]
    fn validate_terms_rejects_negative_shipping_and_tax() {
        assert_eq!(
            validate_terms(Decimal::ZERO, Some(dec!(-5)), None),
            Err(ValidationError::NegativeShipping(dec!(-5)))
        );
        assert_eq!(
            validate_terms(Decimal::ZERO, None, Some(dec!(-2))),
            Err(ValidationError::NegativeTaxRate(dec!(-2)))
        );
    }
}
