//! Currencies

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};

use crate::errors::ValidationError;

/// ISO 4217 currency code: always exactly three uppercase ASCII letters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyCode([u8; 3]);

impl CurrencyCode {
    /// The canonical accounting currency every quote value is stored in.
    pub const USD: Self = Self(*b"USD");

    /// Parse a currency code, trimming whitespace and upper-casing it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCurrencyCode`] unless the trimmed
    /// input is exactly three ASCII letters.
    pub fn parse(code: &str) -> Result<Self, ValidationError> {
        let trimmed = code.trim();

        let bytes: [u8; 3] = trimmed
            .as_bytes()
            .try_into()
            .map_err(|_err| ValidationError::InvalidCurrencyCode(code.to_string()))?;

        if !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(ValidationError::InvalidCurrencyCode(code.to_string()));
        }

        Ok(Self(bytes.map(|b| b.to_ascii_uppercase())))
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ever constructed from ASCII letters.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Whether this is the canonical currency.
    pub fn is_canonical(self) -> bool {
        self == Self::USD
    }

    /// ISO metadata for this code, if `rusty-money` knows it.
    pub fn iso(self) -> Option<&'static Currency> {
        iso::find(self.as_str())
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CurrencyCode").field(&self.as_str()).finish()
    }
}

impl FromStr for CurrencyCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Format an amount for display in the given currency.
///
/// Known ISO currencies are rendered through [`Money`] (symbol, separators and
/// the currency's minor-unit precision). Anything else falls back to
/// `"<amount> <CODE>"` rounded to two places.
pub fn format_amount(amount: Decimal, code: CurrencyCode) -> String {
    code.iso()
        .and_then(|currency| {
            to_minor_units(amount, currency).map(|minor| Money::from_minor(minor, currency))
        })
        .map_or_else(
            || format!("{} {code}", amount.round_dp(2)),
            |money| money.to_string(),
        )
}

/// Convert a decimal amount into minor units of `currency`.
fn to_minor_units(amount: Decimal, currency: &Currency) -> Option<i64> {
    let scale = 10_i64.checked_pow(currency.exponent)?;

    amount
        .checked_mul(Decimal::from(scale))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_normalises_case_and_whitespace() -> TestResult {
        let code = CurrencyCode::parse(" eur ")?;

        assert_eq!(code.as_str(), "EUR");
        assert_eq!(code.to_string(), "EUR");

        Ok(())
    }

    #[test]
    fn parse_rejects_wrong_length() {
        let result = CurrencyCode::parse("EURO");

        assert!(
            matches!(result, Err(ValidationError::InvalidCurrencyCode(ref code)) if code == "EURO"),
            "expected InvalidCurrencyCode, got {result:?}"
        );
    }

    #[test]
    fn parse_rejects_non_letters() {
        assert!(CurrencyCode::parse("US1").is_err());
        assert!(CurrencyCode::parse("").is_err());
        assert!(CurrencyCode::parse("€€").is_err());
    }

    #[test]
    fn unknown_codes_are_still_valid_codes() -> TestResult {
        let code: CurrencyCode = "xyz".parse()?;

        assert_eq!(code.as_str(), "XYZ");
        assert!(code.iso().is_none());

        Ok(())
    }

    #[test]
    fn usd_is_canonical() -> TestResult {
        assert!(CurrencyCode::USD.is_canonical());
        assert!(!CurrencyCode::parse("GBP")?.is_canonical());

        Ok(())
    }

    #[test]
    fn format_amount_uses_money_for_known_currencies() {
        let formatted = format_amount(dec!(1045), CurrencyCode::USD);

        assert!(formatted.contains("1,045"), "got {formatted}");
    }

    #[test]
    fn format_amount_falls_back_for_unknown_currencies() -> TestResult {
        let formatted = format_amount(dec!(12.345), CurrencyCode::parse("XYZ")?);

        assert_eq!(formatted, "12.34 XYZ");

        Ok(())
    }
}
