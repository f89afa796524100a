//! Quote, Alert and Purchase List Fixtures

use serde::Deserialize;

/// Quote fixture from YAML
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuoteFixture {
    /// Vendor key
    pub vendor: String,

    /// Product key
    pub product: String,

    /// Initial price, `"AMOUNT CODE"` in the vendor's currency
    pub price: String,

    /// Discount in percent points; the vendor default when omitted
    #[serde(default)]
    pub discount: Option<String>,

    /// Shipping cost in USD
    #[serde(default)]
    pub shipping: Option<String>,

    /// Tax rate in percent points
    #[serde(default)]
    pub tax: Option<String>,

    /// Lifecycle status
    #[serde(default)]
    pub status: Option<String>,

    /// Later prices, oldest first, each `"AMOUNT CODE"`
    #[serde(default)]
    pub updates: Vec<String>,

    /// Keys of the purchase lists this quote goes on
    #[serde(default)]
    pub lists: Vec<String>,
}

/// Alert fixture from YAML
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlertFixture {
    /// Product key
    pub product: String,

    /// Threshold, `"AMOUNT CODE"`
    pub threshold: String,
}

/// Purchase list fixture from YAML
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PurchaseListFixture {
    /// List name
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
}
