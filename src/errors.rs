//! Engine errors.

use jiff::civil::Date;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    alerts::AlertId,
    conversion::ConversionError,
    currency::CurrencyCode,
    models::{ProductId, QuoteId, VendorId},
    store::StoreError,
};

/// Errors surfaced by [`PriceEngine`](crate::engine::PriceEngine) operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No exchange-rate snapshot applies to the requested conversion.
    #[error("exchange rate for '{code}' not found; please add it")]
    RateNotFound {
        /// Currency that could not be converted.
        code: CurrencyCode,

        /// Reference date of the failed lookup, if one was given.
        as_of: Option<Date>,
    },

    /// Input violated a documented invariant; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A referenced entity does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFound),

    /// A uniqueness rule of the store rejected the write.
    #[error("{0} already exists")]
    Duplicate(String),

    /// The backing store failed during a read or a write.
    #[error("storage error")]
    Persistence(#[source] StoreError),
}

impl From<StoreError> for EngineError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Conflict { entity, key } => Self::Duplicate(format!("{entity} '{key}'")),
            other @ (StoreError::Unavailable(_) | StoreError::Missing { .. }) => {
                Self::Persistence(other)
            }
        }
    }
}

impl From<ConversionError> for EngineError {
    fn from(error: ConversionError) -> Self {
        match error {
            ConversionError::RateNotFound { code, as_of } => Self::RateNotFound { code, as_of },
            ConversionError::Overflow { amount, .. } => {
                Self::Validation(ValidationError::AmountTooLarge(amount))
            }
            ConversionError::Store(source) => source.into(),
        }
    }
}

/// Input validation failures.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Prices cannot be negative.
    #[error("price cannot be negative, got {0}")]
    NegativePrice(Decimal),

    /// The amount, or a figure derived from it, exceeds decimal range.
    #[error("amount {0} is too large")]
    AmountTooLarge(Decimal),

    /// Discounts are percentages between 0 and 100.
    #[error("discount must be between 0 and 100, got {0}")]
    DiscountOutOfRange(Decimal),

    /// Shipping cost cannot be negative.
    #[error("shipping cost cannot be negative, got {0}")]
    NegativeShipping(Decimal),

    /// Tax rate cannot be negative.
    #[error("tax rate cannot be negative, got {0}")]
    NegativeTaxRate(Decimal),

    /// Currency codes are three letters (ISO 4217).
    #[error("currency code must be 3 letters (ISO 4217), got '{0}'")]
    InvalidCurrencyCode(String),

    /// Unknown quote status.
    #[error("invalid status '{0}'; must be one of: considering, ordered, received")]
    InvalidStatus(String),

    /// Unknown history change type.
    #[error("invalid change type '{0}'; must be one of: create, update")]
    InvalidChangeType(String),

    /// Alert thresholds must be positive.
    #[error("threshold value must be positive, got {0}")]
    NonPositiveThreshold(Decimal),

    /// Exchange rates must be positive.
    #[error("exchange rate must be positive, got {0}")]
    NonPositiveRate(Decimal),

    /// A rate for the canonical currency would always be 1.
    #[error("cannot add an exchange rate for the canonical currency")]
    CanonicalRate,

    /// Names are trimmed and must not be empty.
    #[error("{0} name cannot be empty")]
    EmptyName(&'static str),
}

/// A referenced entity that does not exist.
#[derive(Debug, Error, PartialEq)]
pub enum NotFound {
    /// Quote id.
    #[error("quote with id {0} not found")]
    Quote(QuoteId),

    /// Product id.
    #[error("product with id {0} not found")]
    Product(ProductId),

    /// Product name.
    #[error("product '{0}' not found")]
    ProductNamed(String),

    /// Vendor id.
    #[error("vendor with id {0} not found")]
    Vendor(VendorId),

    /// Vendor name.
    #[error("vendor '{0}' not found")]
    VendorNamed(String),

    /// Brand name.
    #[error("brand '{0}' not found")]
    Brand(String),

    /// Alert id.
    #[error("alert with id {0} not found")]
    Alert(AlertId),

    /// No product in a category matching the term.
    #[error("no products found in category '{0}'")]
    Category(String),

    /// No product name matching the term.
    #[error("no products found matching '{0}'")]
    Search(String),

    /// Purchase list name.
    #[error("purchase list '{0}' not found")]
    PurchaseList(String),

    /// A quote that is not on the named list.
    #[error("quote {quote} is not in purchase list '{list}'")]
    QuoteNotInList { list: String, quote: QuoteId },
}
