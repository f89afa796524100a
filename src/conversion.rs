//! Currency conversion into the canonical currency.

use jiff::civil::Date;
use mockall::automock;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::{
    currency::CurrencyCode,
    models::{ExchangeRate, OriginalPrice},
    store::StoreError,
};

/// Source of exchange-rate snapshots.
#[automock]
pub trait RateLookup {
    /// Every snapshot recorded for `code`, newest date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn rates(&self, code: CurrencyCode) -> Result<Vec<ExchangeRate>, StoreError>;
}

/// Conversion failures.
#[derive(Debug, Error, PartialEq)]
pub enum ConversionError {
    /// No snapshot applies to the requested code and date.
    #[error("exchange rate for '{code}' not found")]
    RateNotFound {
        /// Requested currency.
        code: CurrencyCode,

        /// Reference date, if one was given.
        as_of: Option<Date>,
    },

    /// The converted amount does not fit a decimal.
    #[error("{amount} {code} is too large to convert")]
    Overflow {
        /// Amount in the source currency.
        amount: Decimal,

        /// Source currency.
        code: CurrencyCode,
    },

    /// The rate lookup itself failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A price normalised to USD, with the pre-conversion figure when there was one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedPrice {
    /// Price in USD.
    pub value: Decimal,

    /// Input price, kept only for non-USD currencies.
    pub original: Option<OriginalPrice>,
}

/// The snapshot that applies to `code` on `as_of`.
///
/// With a date this is the latest snapshot dated on or before it; without
/// one it is the latest snapshot overall. Equal dates resolve to the most
/// recently recorded snapshot.
///
/// # Errors
///
/// Returns [`ConversionError::RateNotFound`] when no snapshot qualifies and
/// [`ConversionError::Store`] when the lookup fails.
pub fn applicable_rate<L: RateLookup + ?Sized>(
    lookup: &L,
    code: CurrencyCode,
    as_of: Option<Date>,
) -> Result<ExchangeRate, ConversionError> {
    lookup
        .rates(code)?
        .into_iter()
        .filter(|rate| as_of.is_none_or(|date| rate.date <= date))
        .max_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)))
        .ok_or(ConversionError::RateNotFound { code, as_of })
}

/// Convert `amount` of `code` into USD.
///
/// USD amounts come back unchanged without touching `lookup`. No rounding is
/// applied.
///
/// # Errors
///
/// See [`applicable_rate`]; [`ConversionError::Overflow`] when the product
/// does not fit.
pub fn convert_to_usd<L: RateLookup + ?Sized>(
    lookup: &L,
    amount: Decimal,
    code: CurrencyCode,
    as_of: Option<Date>,
) -> Result<Decimal, ConversionError> {
    if code.is_canonical() {
        return Ok(amount);
    }

    let rate = applicable_rate(lookup, code, as_of)?;

    debug!(%code, rate = %rate.usd_per_unit, date = %rate.date, "converting to USD");

    amount
        .checked_mul(rate.usd_per_unit)
        .ok_or(ConversionError::Overflow { amount, code })
}

/// Convert a vendor price for storage on a quote.
///
/// # Errors
///
/// See [`applicable_rate`].
pub fn normalize_price<L: RateLookup + ?Sized>(
    lookup: &L,
    amount: Decimal,
    code: CurrencyCode,
    as_of: Option<Date>,
) -> Result<NormalizedPrice, ConversionError> {
    let value = convert_to_usd(lookup, amount, code, as_of)?;

    let original = (!code.is_canonical()).then_some(OriginalPrice {
        value: amount,
        currency: code,
    });

    Ok(NormalizedPrice { value, original })
}
