//! Insert records.

use jiff::{Timestamp, civil::Date};
use rust_decimal::Decimal;

use crate::{
    currency::CurrencyCode,
    history::ChangeType,
    models::{BrandId, OriginalPrice, ProductId, QuoteId, QuoteStatus, VendorId},
};

/// New product row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProductRecord {
    pub name: String,
    pub brand: BrandId,
    pub category: Option<String>,
}

/// New vendor row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVendorRecord {
    pub name: String,
    pub currency: CurrencyCode,
    pub discount_code: Option<String>,
    pub discount: Decimal,
}

/// New exchange-rate snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRateRecord {
    pub code: CurrencyCode,
    pub date: Date,
    pub usd_per_unit: Decimal,
}

/// New quote row, value already normalised to USD.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuoteRecord {
    pub vendor: VendorId,
    pub product: ProductId,
    pub value: Decimal,
    pub original: Option<OriginalPrice>,
    pub discount: Decimal,
    pub shipping_cost: Option<Decimal>,
    pub tax_rate: Option<Decimal>,
    pub status: Option<QuoteStatus>,
    pub created_at: Timestamp,
}

/// New history entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHistoryRecord {
    pub quote: QuoteId,
    pub old_value: Option<Decimal>,
    pub new_value: Decimal,
    pub change_type: ChangeType,
    pub changed_at: Timestamp,
}

/// New purchase list row, starting empty.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPurchaseListRecord {
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

/// New alert row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlertRecord {
    pub product: ProductId,
    pub threshold_value: Decimal,
    pub threshold_currency: CurrencyCode,
    pub created_at: Timestamp,
}
