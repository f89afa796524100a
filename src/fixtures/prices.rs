//! Amount parsing

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::{currency::CurrencyCode, fixtures::FixtureError};

/// Parse an `"AMOUNT CODE"` string such as `"949.00 USD"`.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPrice`] unless the input is a decimal
/// amount followed by a three-letter currency code.
pub fn parse_amount(s: &str) -> Result<(Decimal, CurrencyCode), FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    };

    let amount =
        Decimal::from_str(amount).map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;
    let code =
        CurrencyCode::parse(code).map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((amount, code))
}

/// Parse a plain decimal such as a percentage or a rate.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidNumber`] if the input is not a decimal.
pub fn parse_decimal(s: &str) -> Result<Decimal, FixtureError> {
    Decimal::from_str(s.trim()).map_err(|_err| FixtureError::InvalidNumber(s.to_string()))
}

/// Parse an optional decimal.
///
/// # Errors
///
/// See [`parse_decimal`].
pub fn parse_optional(s: Option<&str>) -> Result<Option<Decimal>, FixtureError> {
    s.map(parse_decimal).transpose()
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_amount_and_code() -> TestResult {
        assert_eq!(
            parse_amount("949.00 USD")?,
            (dec!(949.00), CurrencyCode::USD)
        );
        assert_eq!(
            parse_amount(" 1299 eur ")?,
            (dec!(1299), CurrencyCode::parse("EUR")?)
        );

        Ok(())
    }

    #[test]
    fn rejects_malformed_amounts() {
        for input in ["949.00", "USD 949", "9.99 US", "1 USD extra", ""] {
            assert!(
                matches!(parse_amount(input), Err(FixtureError::InvalidPrice(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn parses_plain_decimals() -> TestResult {
        assert_eq!(parse_decimal(" 8.875 ")?, dec!(8.875));
        assert_eq!(parse_optional(None)?, None);
        assert!(matches!(
            parse_decimal("ten"),
            Err(FixtureError::InvalidNumber(_))
        ));

        Ok(())
    }
}
