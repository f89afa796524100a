//! Catalog and quote models.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use jiff::{Timestamp, civil::Date};
use rust_decimal::Decimal;

use crate::{cost::total_cost, currency::CurrencyCode, errors::ValidationError, ids::TypedId};

/// Brand id.
pub type BrandId = TypedId<Brand>;

/// Product id.
pub type ProductId = TypedId<Product>;

/// Vendor id.
pub type VendorId = TypedId<Vendor>;

/// Exchange rate id.
pub type RateId = TypedId<ExchangeRate>;

/// Quote id.
pub type QuoteId = TypedId<Quote>;

/// Brand
#[derive(Debug, Clone, PartialEq)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
}

/// A purchasable item, uniquely named, belonging to one brand.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: BrandId,
    pub category: Option<String>,
}

/// A selling entity with its transaction currency.
#[derive(Debug, Clone, PartialEq)]
pub struct Vendor {
    pub id: VendorId,
    pub name: String,
    pub currency: CurrencyCode,
    pub discount_code: Option<String>,

    /// Default discount (percent points) applied to new quotes from this vendor.
    pub discount: Decimal,
}

/// Dated snapshot of the USD value of one unit of a currency.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRate {
    pub id: RateId,
    pub code: CurrencyCode,
    pub date: Date,
    pub usd_per_unit: Decimal,
}

impl ExchangeRate {
    /// Units of this currency one USD buys.
    pub fn units_per_usd(&self) -> Option<Decimal> {
        Decimal::ONE.checked_div(self.usd_per_unit)
    }
}

/// Where a quote is in the purchasing lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteStatus {
    /// Still being evaluated.
    Considering,

    /// Purchase placed.
    Ordered,

    /// Goods delivered.
    Received,
}

impl QuoteStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Considering, Self::Ordered, Self::Received];

    /// Lower-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Considering => "considering",
            Self::Ordered => "ordered",
            Self::Received => "received",
        }
    }
}

impl Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuoteStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();

        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| ValidationError::InvalidStatus(s.to_string()))
    }
}

/// Pre-conversion price kept for quotes from non-USD vendors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OriginalPrice {
    pub value: Decimal,
    pub currency: CurrencyCode,
}

/// A priced offer from one vendor for one product.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub id: QuoteId,
    pub vendor: VendorId,
    pub product: ProductId,

    /// Canonical price in USD; all ranking and history use this field.
    pub value: Decimal,

    /// Set only when the vendor's currency is not USD.
    pub original: Option<OriginalPrice>,

    /// Discount in percent points.
    pub discount: Decimal,
    pub shipping_cost: Option<Decimal>,

    /// Tax rate in percent points.
    pub tax_rate: Option<Decimal>,
    pub status: Option<QuoteStatus>,
    pub created_at: Timestamp,
}

impl Quote {
    /// All-in cost: discount, then shipping, then tax. `None` on overflow.
    pub fn total_cost(&self) -> Option<Decimal> {
        total_cost(self.value, self.discount, self.shipping_cost, self.tax_rate)
    }
}
