//! Entity store seam.
//!
//! The engine never talks to storage directly; it reads through
//! [`Repository`] and writes through a [`Transaction`] opened with
//! [`Store::begin`]. A transaction that is dropped without
//! [`Transaction::commit`] leaves the store untouched.

use thiserror::Error;

use crate::{
    alerts::{AlertId, PriceAlert},
    conversion::RateLookup,
    history::HistoryEntry,
    lists::{PurchaseList, PurchaseListId},
    models::{Brand, BrandId, ExchangeRate, Product, ProductId, Quote, QuoteId, Vendor, VendorId},
};

mod memory;
pub mod records;

pub use memory::{MemoryStore, MemoryTransaction};
pub use records::*;

/// Storage failures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    /// A uniqueness rule was violated.
    #[error("{entity} '{key}' already exists")]
    Conflict {
        /// Kind of entity written.
        entity: &'static str,

        /// The clashing key.
        key: String,
    },

    /// An update targeted a row that does not exist.
    #[error("{entity} {id} does not exist")]
    Missing {
        /// Kind of entity written.
        entity: &'static str,

        /// Raw id of the missing row.
        id: u64,
    },

    /// The store could not serve the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Read access to persisted entities.
///
/// Listings come back in id (insertion) order unless noted otherwise.
pub trait Repository: RateLookup {
    /// Brand by id.
    fn brand(&self, id: BrandId) -> Result<Option<Brand>, StoreError>;

    /// Brand by its unique name.
    fn brand_by_name(&self, name: &str) -> Result<Option<Brand>, StoreError>;

    /// Product by id.
    fn product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Product by its unique name.
    fn product_by_name(&self, name: &str) -> Result<Option<Product>, StoreError>;

    /// Every product.
    fn products(&self) -> Result<Vec<Product>, StoreError>;

    /// Products of one brand.
    fn products_for_brand(&self, brand: BrandId) -> Result<Vec<Product>, StoreError>;

    /// Vendor by id.
    fn vendor(&self, id: VendorId) -> Result<Option<Vendor>, StoreError>;

    /// Vendor by its unique name.
    fn vendor_by_name(&self, name: &str) -> Result<Option<Vendor>, StoreError>;

    /// Every vendor.
    fn vendors(&self) -> Result<Vec<Vendor>, StoreError>;

    /// Quote by id.
    fn quote(&self, id: QuoteId) -> Result<Option<Quote>, StoreError>;

    /// Every quote.
    fn quotes(&self) -> Result<Vec<Quote>, StoreError>;

    /// Quotes for one product.
    fn quotes_for_product(&self, product: ProductId) -> Result<Vec<Quote>, StoreError>;

    /// History entries of one quote.
    fn history_for_quote(&self, quote: QuoteId) -> Result<Vec<HistoryEntry>, StoreError>;

    /// History entries of every quote of one product.
    fn history_for_product(&self, product: ProductId) -> Result<Vec<HistoryEntry>, StoreError>;

    /// Alert by id.
    fn alert(&self, id: AlertId) -> Result<Option<PriceAlert>, StoreError>;

    /// Every alert.
    fn alerts(&self) -> Result<Vec<PriceAlert>, StoreError>;

    /// Alerts watching one product.
    fn alerts_for_product(&self, product: ProductId) -> Result<Vec<PriceAlert>, StoreError>;

    /// Purchase list by id.
    fn purchase_list(&self, id: PurchaseListId) -> Result<Option<PurchaseList>, StoreError>;

    /// Purchase list by its unique name.
    fn purchase_list_by_name(&self, name: &str) -> Result<Option<PurchaseList>, StoreError>;

    /// Every purchase list.
    fn purchase_lists(&self) -> Result<Vec<PurchaseList>, StoreError>;
}

/// Write access to persisted entities.
///
/// Name uniqueness (brands, products, vendors, purchase lists) and one rate per
/// `(code, date)` are enforced here and reported as [`StoreError::Conflict`].
pub trait RepositoryMut: Repository {
    /// Insert a brand.
    fn insert_brand(&mut self, name: &str) -> Result<Brand, StoreError>;

    /// Insert a product.
    fn insert_product(&mut self, record: NewProductRecord) -> Result<Product, StoreError>;

    /// Overwrite a product.
    fn update_product(&mut self, product: &Product) -> Result<(), StoreError>;

    /// Insert a vendor.
    fn insert_vendor(&mut self, record: NewVendorRecord) -> Result<Vendor, StoreError>;

    /// Insert an exchange-rate snapshot. Snapshots are never updated.
    fn insert_rate(&mut self, record: NewRateRecord) -> Result<ExchangeRate, StoreError>;

    /// Insert a quote.
    fn insert_quote(&mut self, record: NewQuoteRecord) -> Result<Quote, StoreError>;

    /// Overwrite a quote.
    fn update_quote(&mut self, quote: &Quote) -> Result<(), StoreError>;

    /// Append a history entry. Entries are never updated or removed.
    fn append_history(&mut self, record: NewHistoryRecord) -> Result<HistoryEntry, StoreError>;

    /// Insert an alert.
    fn insert_alert(&mut self, record: NewAlertRecord) -> Result<PriceAlert, StoreError>;

    /// Overwrite an alert.
    fn update_alert(&mut self, alert: &PriceAlert) -> Result<(), StoreError>;

    /// Insert an empty purchase list.
    fn insert_purchase_list(
        &mut self,
        record: NewPurchaseListRecord,
    ) -> Result<PurchaseList, StoreError>;

    /// Overwrite a purchase list, membership included.
    fn update_purchase_list(&mut self, list: &PurchaseList) -> Result<(), StoreError>;

    /// Remove a purchase list. Its quotes are untouched.
    fn delete_purchase_list(&mut self, id: PurchaseListId) -> Result<(), StoreError>;
}

/// A unit of work whose writes become visible together on commit.
pub trait Transaction: RepositoryMut {
    /// Make every staged write visible.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot accept the writes; nothing is
    /// applied in that case.
    fn commit(self) -> Result<(), StoreError>;
}

/// A store that can open transactions.
pub trait Store: Repository {
    /// Transaction type borrowed from this store.
    type Tx<'s>: Transaction
    where
        Self: 's;

    /// Open a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    fn begin(&mut self) -> Result<Self::Tx<'_>, StoreError>;
}
