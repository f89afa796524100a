//! Fixtures
//!
//! YAML datasets describing rates, products, vendors, quotes, alerts and
//! purchase lists.
//! Loading replays a dataset through a [`PriceEngine`], so conversion,
//! history and alert triggering behave exactly as for live input.

use std::{fs, path::Path};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    alerts::AlertId,
    clock::Clock,
    currency::CurrencyCode,
    engine::{NewQuote, NewVendor, PriceEngine},
    errors::{EngineError, ValidationError},
    fixtures::{
        catalog::{ProductFixture, RateFixture, VendorFixture},
        prices::{parse_amount, parse_decimal, parse_optional},
        quotes::{AlertFixture, PurchaseListFixture, QuoteFixture},
    },
    lists::PurchaseListId,
    models::{ProductId, QuoteId, QuoteStatus, VendorId},
    store::Store,
};

pub mod catalog;
pub mod prices;
pub mod quotes;

/// Fixture Loading Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid decimal
    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    /// Invalid field value
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// Product key not defined
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Vendor key not defined
    #[error("Vendor not found: {0}")]
    VendorNotFound(String),

    /// Purchase list key not defined
    #[error("Purchase list not found: {0}")]
    PurchaseListNotFound(String),

    /// Quote priced in a currency other than its vendor's
    #[error("Currency mismatch for vendor {vendor}: expected {expected}, found {found}")]
    CurrencyMismatch {
        /// Vendor key
        vendor: String,

        /// The vendor's currency
        expected: CurrencyCode,

        /// Currency of the price
        found: CurrencyCode,
    },

    /// The engine rejected a replayed operation
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Dataset
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dataset {
    /// Exchange-rate snapshots
    #[serde(default)]
    pub rates: Vec<RateFixture>,

    /// Map of product key -> product fixture
    #[serde(default)]
    pub products: FxHashMap<String, ProductFixture>,

    /// Map of vendor key -> vendor fixture
    #[serde(default)]
    pub vendors: FxHashMap<String, VendorFixture>,

    /// Quotes, in creation order
    #[serde(default)]
    pub quotes: Vec<QuoteFixture>,

    /// Alerts, in creation order
    #[serde(default)]
    pub alerts: Vec<AlertFixture>,

    /// Map of purchase list key -> purchase list fixture
    #[serde(default)]
    pub purchase_lists: FxHashMap<String, PurchaseListFixture>,
}

/// Ids assigned while loading a [`Dataset`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedDataset {
    /// Product key -> id
    pub products: FxHashMap<String, ProductId>,

    /// Vendor key -> id
    pub vendors: FxHashMap<String, VendorId>,

    /// Quote ids, in dataset order
    pub quotes: Vec<QuoteId>,

    /// Alert ids, in dataset order
    pub alerts: Vec<AlertId>,

    /// Purchase list key -> id
    pub purchase_lists: FxHashMap<String, PurchaseListId>,
}

impl LoadedDataset {
    /// Id of the product with this key
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not defined.
    pub fn product(&self, key: &str) -> Result<ProductId, FixtureError> {
        self.products
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Id of the vendor with this key
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not defined.
    pub fn vendor(&self, key: &str) -> Result<VendorId, FixtureError> {
        self.vendors
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::VendorNotFound(key.to_string()))
    }
}

impl Dataset {
    /// Parse a dataset from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML does not describe a dataset.
    pub fn from_yaml(contents: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(contents)?)
    }

    /// Read a dataset from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path.as_ref())?;

        Self::from_yaml(&contents)
    }

    /// Replay this dataset through `engine`.
    ///
    /// Rates go first, then products, vendors, alerts and purchase lists, and
    /// finally quotes with their later prices and list memberships. Keyed
    /// sections load in key order so ids are stable across runs.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed values, unknown keys, currency
    /// mismatches, or anything the engine rejects.
    pub fn load_into<S: Store, C: Clock>(
        &self,
        engine: &mut PriceEngine<S, C>,
    ) -> Result<LoadedDataset, FixtureError> {
        let mut loaded = LoadedDataset::default();

        for rate in &self.rates {
            let code = CurrencyCode::parse(&rate.code)?;
            let usd_per_unit = parse_decimal(&rate.usd_per_unit)?;

            engine.add_rate(code, usd_per_unit, rate.date)?;
        }

        for (key, product) in sorted(&self.products) {
            let created = engine.create_product(
                &product.name,
                &product.brand,
                product.category.as_deref(),
            )?;

            loaded.products.insert(key.clone(), created.id);
        }

        for (key, vendor) in sorted(&self.vendors) {
            let created = engine.create_vendor(NewVendor {
                name: vendor.name.clone(),
                currency: CurrencyCode::parse(&vendor.currency)?,
                discount_code: vendor.discount_code.clone(),
                discount: parse_optional(vendor.discount.as_deref())?,
            })?;

            loaded.vendors.insert(key.clone(), created.id);
        }

        for alert in &self.alerts {
            let product = loaded.product(&alert.product)?;
            let (threshold, currency) = parse_amount(&alert.threshold)?;

            let created = engine.create_alert(product, threshold, currency)?;

            loaded.alerts.push(created.id);
        }

        let mut list_names: FxHashMap<&str, &str> = FxHashMap::default();

        for (key, list) in sorted(&self.purchase_lists) {
            let created =
                engine.create_purchase_list(&list.name, list.description.as_deref())?;

            list_names.insert(key.as_str(), list.name.as_str());
            loaded.purchase_lists.insert(key.clone(), created.id);
        }

        for quote in &self.quotes {
            let id = load_quote(engine, &loaded, quote)?;

            for key in &quote.lists {
                let name = list_names
                    .get(key.as_str())
                    .ok_or_else(|| FixtureError::PurchaseListNotFound(key.clone()))?;

                engine.add_to_purchase_list(name, id)?;
            }

            loaded.quotes.push(id);
        }

        debug!(
            products = loaded.products.len(),
            vendors = loaded.vendors.len(),
            quotes = loaded.quotes.len(),
            alerts = loaded.alerts.len(),
            purchase_lists = loaded.purchase_lists.len(),
            "dataset loaded"
        );

        Ok(loaded)
    }
}

/// Create one quote and replay its later prices.
fn load_quote<S: Store, C: Clock>(
    engine: &mut PriceEngine<S, C>,
    loaded: &LoadedDataset,
    quote: &QuoteFixture,
) -> Result<QuoteId, FixtureError> {
    let vendor_id = loaded.vendor(&quote.vendor)?;
    let product = loaded.product(&quote.product)?;
    let currency = engine.vendor(vendor_id)?.currency;

    let price = vendor_price(&quote.vendor, currency, &quote.price)?;
    let status = quote
        .status
        .as_deref()
        .map(str::parse::<QuoteStatus>)
        .transpose()?;

    let created = engine.create_quote(NewQuote {
        vendor: vendor_id,
        product,
        price,
        discount: parse_optional(quote.discount.as_deref())?,
        shipping_cost: parse_optional(quote.shipping.as_deref())?,
        tax_rate: parse_optional(quote.tax.as_deref())?,
        status,
    })?;

    for update in &quote.updates {
        let price = vendor_price(&quote.vendor, currency, update)?;

        engine.update_price(created.quote.id, price)?;
    }

    Ok(created.quote.id)
}

/// Parse a price that must be in the vendor's currency.
fn vendor_price(
    vendor: &str,
    expected: CurrencyCode,
    price: &str,
) -> Result<Decimal, FixtureError> {
    let (amount, found) = parse_amount(price)?;

    if found != expected {
        return Err(FixtureError::CurrencyMismatch {
            vendor: vendor.to_string(),
            expected,
            found,
        });
    }

    Ok(amount)
}

fn sorted<V>(map: &FxHashMap<String, V>) -> Vec<(&String, &V)> {
    let mut entries: Vec<(&String, &V)> = map.iter().collect();

    entries.sort_by(|a, b| a.0.cmp(b.0));

    entries
}
