//! Engine input and output data

use rust_decimal::Decimal;

use crate::{
    alerts::PriceAlert,
    currency::CurrencyCode,
    history::HistoryEntry,
    models::{ProductId, Quote, QuoteStatus, VendorId},
};

/// New Vendor Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewVendor {
    pub name: String,
    pub currency: CurrencyCode,
    pub discount_code: Option<String>,

    /// Default discount for this vendor's quotes; zero when unset.
    pub discount: Option<Decimal>,
}

/// New Quote Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuote {
    pub vendor: VendorId,
    pub product: ProductId,

    /// Price in the vendor's currency.
    pub price: Decimal,

    /// Overrides the vendor's default discount.
    pub discount: Option<Decimal>,
    pub shipping_cost: Option<Decimal>,
    pub tax_rate: Option<Decimal>,
    pub status: Option<QuoteStatus>,
}

/// Quote Terms Update Data
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QuoteTerms {
    pub discount: Decimal,
    pub shipping_cost: Option<Decimal>,
    pub tax_rate: Option<Decimal>,
}

/// Outcome of a price-setting operation.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceChange {
    /// The quote as stored after the change.
    pub quote: Quote,

    /// Ledger entry recording the change.
    pub entry: HistoryEntry,

    /// Alerts that fired on the new price.
    pub triggered: Vec<PriceAlert>,
}
