//! Catalog Fixtures

use jiff::civil::Date;
use serde::Deserialize;

/// Exchange-rate snapshot from YAML
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateFixture {
    /// ISO 4217 code
    pub code: String,

    /// USD value of one unit, as a decimal string
    pub usd_per_unit: String,

    /// Snapshot date; today when omitted
    #[serde(default)]
    pub date: Option<Date>,
}

/// Product fixture from YAML
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductFixture {
    /// Unique product name
    pub name: String,

    /// Brand name; created on first use
    pub brand: String,

    /// Optional category label
    #[serde(default)]
    pub category: Option<String>,
}

/// Vendor fixture from YAML
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VendorFixture {
    /// Unique vendor name
    pub name: String,

    /// ISO 4217 code the vendor prices in
    pub currency: String,

    /// Optional discount code
    #[serde(default)]
    pub discount_code: Option<String>,

    /// Default discount in percent points
    #[serde(default)]
    pub discount: Option<String>,
}
