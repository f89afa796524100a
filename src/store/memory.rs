//! In-memory store

use std::collections::BTreeMap;

use crate::{
    alerts::{AlertId, PriceAlert},
    conversion::RateLookup,
    currency::CurrencyCode,
    history::{HistoryEntry, HistoryEntryId},
    ids::TypedId,
    lists::{PurchaseList, PurchaseListId},
    models::{
        Brand, BrandId, ExchangeRate, Product, ProductId, Quote, QuoteId, RateId, Vendor, VendorId,
    },
    store::{
        NewAlertRecord, NewHistoryRecord, NewProductRecord, NewPurchaseListRecord,
        NewQuoteRecord, NewRateRecord, NewVendorRecord, Repository, RepositoryMut, Store,
        StoreError, Transaction,
    },
};

/// Every table of the in-memory store.
#[derive(Debug, Clone, Default)]
struct Tables {
    brands: BTreeMap<BrandId, Brand>,
    products: BTreeMap<ProductId, Product>,
    vendors: BTreeMap<VendorId, Vendor>,
    rates: BTreeMap<RateId, ExchangeRate>,
    quotes: BTreeMap<QuoteId, Quote>,
    history: BTreeMap<HistoryEntryId, HistoryEntry>,
    alerts: BTreeMap<AlertId, PriceAlert>,
    lists: BTreeMap<PurchaseListId, PurchaseList>,

    /// Last id handed out; shared by every table.
    last_id: u64,
}

impl Tables {
    fn allocate<T>(&mut self) -> TypedId<T> {
        self.last_id += 1;

        TypedId::from_raw(self.last_id)
    }

    fn rates(&self, code: CurrencyCode) -> Vec<ExchangeRate> {
        let mut rates: Vec<ExchangeRate> = self
            .rates
            .values()
            .filter(|rate| rate.code == code)
            .cloned()
            .collect();

        rates.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

        rates
    }

    fn brand_by_name(&self, name: &str) -> Option<Brand> {
        self.brands.values().find(|brand| brand.name == name).cloned()
    }

    fn product_by_name(&self, name: &str) -> Option<Product> {
        self.products
            .values()
            .find(|product| product.name == name)
            .cloned()
    }

    fn products_for_brand(&self, brand: BrandId) -> Vec<Product> {
        self.products
            .values()
            .filter(|product| product.brand == brand)
            .cloned()
            .collect()
    }

    fn vendor_by_name(&self, name: &str) -> Option<Vendor> {
        self.vendors.values().find(|vendor| vendor.name == name).cloned()
    }

    fn quotes_for_product(&self, product: ProductId) -> Vec<Quote> {
        self.quotes
            .values()
            .filter(|quote| quote.product == product)
            .cloned()
            .collect()
    }

    fn history_for_quote(&self, quote: QuoteId) -> Vec<HistoryEntry> {
        self.history
            .values()
            .filter(|entry| entry.quote == quote)
            .cloned()
            .collect()
    }

    fn history_for_product(&self, product: ProductId) -> Vec<HistoryEntry> {
        self.history
            .values()
            .filter(|entry| {
                self.quotes
                    .get(&entry.quote)
                    .is_some_and(|quote| quote.product == product)
            })
            .cloned()
            .collect()
    }

    fn alerts_for_product(&self, product: ProductId) -> Vec<PriceAlert> {
        self.alerts
            .values()
            .filter(|alert| alert.product == product)
            .cloned()
            .collect()
    }

    fn purchase_list_by_name(&self, name: &str) -> Option<PurchaseList> {
        self.lists.values().find(|list| list.name == name).cloned()
    }

    fn insert_brand(&mut self, name: &str) -> Result<Brand, StoreError> {
        if self.brand_by_name(name).is_some() {
            return Err(conflict("brand", name));
        }

        let brand = Brand {
            id: self.allocate(),
            name: name.to_string(),
        };

        self.brands.insert(brand.id, brand.clone());

        Ok(brand)
    }

    fn insert_product(&mut self, record: NewProductRecord) -> Result<Product, StoreError> {
        if self.product_by_name(&record.name).is_some() {
            return Err(conflict("product", &record.name));
        }

        let product = Product {
            id: self.allocate(),
            name: record.name,
            brand: record.brand,
            category: record.category,
        };

        self.products.insert(product.id, product.clone());

        Ok(product)
    }

    fn update_product(&mut self, product: &Product) -> Result<(), StoreError> {
        if self
            .products
            .values()
            .any(|other| other.id != product.id && other.name == product.name)
        {
            return Err(conflict("product", &product.name));
        }

        let row = self
            .products
            .get_mut(&product.id)
            .ok_or_else(|| missing("product", product.id))?;

        row.clone_from(product);

        Ok(())
    }

    fn insert_vendor(&mut self, record: NewVendorRecord) -> Result<Vendor, StoreError> {
        if self.vendor_by_name(&record.name).is_some() {
            return Err(conflict("vendor", &record.name));
        }

        let vendor = Vendor {
            id: self.allocate(),
            name: record.name,
            currency: record.currency,
            discount_code: record.discount_code,
            discount: record.discount,
        };

        self.vendors.insert(vendor.id, vendor.clone());

        Ok(vendor)
    }

    fn insert_rate(&mut self, record: NewRateRecord) -> Result<ExchangeRate, StoreError> {
        if self
            .rates
            .values()
            .any(|rate| rate.code == record.code && rate.date == record.date)
        {
            return Err(conflict(
                "exchange rate",
                &format!("{} on {}", record.code, record.date),
            ));
        }

        let rate = ExchangeRate {
            id: self.allocate(),
            code: record.code,
            date: record.date,
            usd_per_unit: record.usd_per_unit,
        };

        self.rates.insert(rate.id, rate.clone());

        Ok(rate)
    }

    fn insert_quote(&mut self, record: NewQuoteRecord) -> Result<Quote, StoreError> {
        let quote = Quote {
            id: self.allocate(),
            vendor: record.vendor,
            product: record.product,
            value: record.value,
            original: record.original,
            discount: record.discount,
            shipping_cost: record.shipping_cost,
            tax_rate: record.tax_rate,
            status: record.status,
            created_at: record.created_at,
        };

        self.quotes.insert(quote.id, quote.clone());

        Ok(quote)
    }

    fn update_quote(&mut self, quote: &Quote) -> Result<(), StoreError> {
        let row = self
            .quotes
            .get_mut(&quote.id)
            .ok_or_else(|| missing("quote", quote.id))?;

        row.clone_from(quote);

        Ok(())
    }

    fn append_history(&mut self, record: NewHistoryRecord) -> Result<HistoryEntry, StoreError> {
        if !self.quotes.contains_key(&record.quote) {
            return Err(missing("quote", record.quote));
        }

        let entry = HistoryEntry {
            id: self.allocate(),
            quote: record.quote,
            old_value: record.old_value,
            new_value: record.new_value,
            change_type: record.change_type,
            changed_at: record.changed_at,
        };

        self.history.insert(entry.id, entry.clone());

        Ok(entry)
    }

    fn insert_alert(&mut self, record: NewAlertRecord) -> Result<PriceAlert, StoreError> {
        let alert = PriceAlert {
            id: self.allocate(),
            product: record.product,
            threshold_value: record.threshold_value,
            threshold_currency: record.threshold_currency,
            active: true,
            created_at: record.created_at,
            triggered_at: None,
        };

        self.alerts.insert(alert.id, alert.clone());

        Ok(alert)
    }

    fn update_alert(&mut self, alert: &PriceAlert) -> Result<(), StoreError> {
        let row = self
            .alerts
            .get_mut(&alert.id)
            .ok_or_else(|| missing("alert", alert.id))?;

        row.clone_from(alert);

        Ok(())
    }

    fn insert_purchase_list(
        &mut self,
        record: NewPurchaseListRecord,
    ) -> Result<PurchaseList, StoreError> {
        if self.purchase_list_by_name(&record.name).is_some() {
            return Err(conflict("purchase list", &record.name));
        }

        let list = PurchaseList {
            id: self.allocate(),
            name: record.name,
            description: record.description,
            quotes: Vec::new(),
            created_at: record.created_at,
        };

        self.lists.insert(list.id, list.clone());

        Ok(list)
    }

    fn update_purchase_list(&mut self, list: &PurchaseList) -> Result<(), StoreError> {
        if let Some(quote) = list
            .quotes
            .iter()
            .find(|quote| !self.quotes.contains_key(*quote))
        {
            return Err(missing("quote", *quote));
        }

        let row = self
            .lists
            .get_mut(&list.id)
            .ok_or_else(|| missing("purchase list", list.id))?;

        row.clone_from(list);

        Ok(())
    }

    fn delete_purchase_list(&mut self, id: PurchaseListId) -> Result<(), StoreError> {
        self.lists
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| missing("purchase list", id))
    }
}

fn conflict(entity: &'static str, key: &str) -> StoreError {
    StoreError::Conflict {
        entity,
        key: key.to_string(),
    }
}

fn missing<T>(entity: &'static str, id: TypedId<T>) -> StoreError {
    StoreError::Missing {
        entity,
        id: id.get(),
    }
}

fn unavailable() -> StoreError {
    StoreError::Unavailable("memory store is offline".to_string())
}

/// Process-local store, mainly for tests and the CLI.
///
/// Transactions stage their writes on a copy of the tables and swap it in on
/// commit, so an abandoned transaction leaves no trace.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Tables,
    offline: bool,
    write_budget: Option<usize>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every read, write and commit fail until switched back.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Allow `writes` more writes, then fail every write after that.
    pub fn fail_writes_after(&mut self, writes: usize) {
        self.write_budget = Some(writes);
    }

    /// Remove a limit set with [`MemoryStore::fail_writes_after`].
    pub fn clear_write_failures(&mut self) {
        self.write_budget = None;
    }

    fn tables(&self) -> Result<&Tables, StoreError> {
        if self.offline {
            return Err(unavailable());
        }

        Ok(&self.tables)
    }
}

impl Store for MemoryStore {
    type Tx<'s> = MemoryTransaction<'s>;

    fn begin(&mut self) -> Result<MemoryTransaction<'_>, StoreError> {
        if self.offline {
            return Err(unavailable());
        }

        Ok(MemoryTransaction {
            staged: self.tables.clone(),
            store: self,
        })
    }
}

/// Open transaction on a [`MemoryStore`].
#[derive(Debug)]
pub struct MemoryTransaction<'s> {
    staged: Tables,
    store: &'s mut MemoryStore,
}

impl MemoryTransaction<'_> {
    fn tables(&self) -> Result<&Tables, StoreError> {
        if self.store.offline {
            return Err(unavailable());
        }

        Ok(&self.staged)
    }

    fn writable(&mut self) -> Result<&mut Tables, StoreError> {
        if self.store.offline {
            return Err(unavailable());
        }

        match &mut self.store.write_budget {
            Some(0) => Err(StoreError::Unavailable(
                "write budget exhausted".to_string(),
            )),
            Some(remaining) => {
                *remaining -= 1;
                Ok(&mut self.staged)
            }
            None => Ok(&mut self.staged),
        }
    }
}

impl Transaction for MemoryTransaction<'_> {
    fn commit(self) -> Result<(), StoreError> {
        if self.store.offline {
            return Err(unavailable());
        }

        self.store.tables = self.staged;

        Ok(())
    }
}

impl RepositoryMut for MemoryTransaction<'_> {
    fn insert_brand(&mut self, name: &str) -> Result<Brand, StoreError> {
        self.writable()?.insert_brand(name)
    }

    fn insert_product(&mut self, record: NewProductRecord) -> Result<Product, StoreError> {
        self.writable()?.insert_product(record)
    }

    fn update_product(&mut self, product: &Product) -> Result<(), StoreError> {
        self.writable()?.update_product(product)
    }

    fn insert_vendor(&mut self, record: NewVendorRecord) -> Result<Vendor, StoreError> {
        self.writable()?.insert_vendor(record)
    }

    fn insert_rate(&mut self, record: NewRateRecord) -> Result<ExchangeRate, StoreError> {
        self.writable()?.insert_rate(record)
    }

    fn insert_quote(&mut self, record: NewQuoteRecord) -> Result<Quote, StoreError> {
        self.writable()?.insert_quote(record)
    }

    fn update_quote(&mut self, quote: &Quote) -> Result<(), StoreError> {
        self.writable()?.update_quote(quote)
    }

    fn append_history(&mut self, record: NewHistoryRecord) -> Result<HistoryEntry, StoreError> {
        self.writable()?.append_history(record)
    }

    fn insert_alert(&mut self, record: NewAlertRecord) -> Result<PriceAlert, StoreError> {
        self.writable()?.insert_alert(record)
    }

    fn update_alert(&mut self, alert: &PriceAlert) -> Result<(), StoreError> {
        self.writable()?.update_alert(alert)
    }

    fn insert_purchase_list(
        &mut self,
        record: NewPurchaseListRecord,
    ) -> Result<PurchaseList, StoreError> {
        self.writable()?.insert_purchase_list(record)
    }

    fn update_purchase_list(&mut self, list: &PurchaseList) -> Result<(), StoreError> {
        self.writable()?.update_purchase_list(list)
    }

    fn delete_purchase_list(&mut self, id: PurchaseListId) -> Result<(), StoreError> {
        self.writable()?.delete_purchase_list(id)
    }
}

/// Implement the read traits by delegating to the visible [`Tables`].
macro_rules! read_through_tables {
    ($store:ty) => {
        impl RateLookup for $store {
            fn rates(&self, code: CurrencyCode) -> Result<Vec<ExchangeRate>, StoreError> {
                Ok(self.tables()?.rates(code))
            }
        }

        impl Repository for $store {
            fn brand(&self, id: BrandId) -> Result<Option<Brand>, StoreError> {
                Ok(self.tables()?.brands.get(&id).cloned())
            }

            fn brand_by_name(&self, name: &str) -> Result<Option<Brand>, StoreError> {
                Ok(self.tables()?.brand_by_name(name))
            }

            fn product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
                Ok(self.tables()?.products.get(&id).cloned())
            }

            fn product_by_name(&self, name: &str) -> Result<Option<Product>, StoreError> {
                Ok(self.tables()?.product_by_name(name))
            }

            fn products(&self) -> Result<Vec<Product>, StoreError> {
                Ok(self.tables()?.products.values().cloned().collect())
            }

            fn products_for_brand(&self, brand: BrandId) -> Result<Vec<Product>, StoreError> {
                Ok(self.tables()?.products_for_brand(brand))
            }

            fn vendor(&self, id: VendorId) -> Result<Option<Vendor>, StoreError> {
                Ok(self.tables()?.vendors.get(&id).cloned())
            }

            fn vendor_by_name(&self, name: &str) -> Result<Option<Vendor>, StoreError> {
                Ok(self.tables()?.vendor_by_name(name))
            }

            fn vendors(&self) -> Result<Vec<Vendor>, StoreError> {
                Ok(self.tables()?.vendors.values().cloned().collect())
            }

            fn quote(&self, id: QuoteId) -> Result<Option<Quote>, StoreError> {
                Ok(self.tables()?.quotes.get(&id).cloned())
            }

            fn quotes(&self) -> Result<Vec<Quote>, StoreError> {
                Ok(self.tables()?.quotes.values().cloned().collect())
            }

            fn quotes_for_product(&self, product: ProductId) -> Result<Vec<Quote>, StoreError> {
                Ok(self.tables()?.quotes_for_product(product))
            }

            fn history_for_quote(&self, quote: QuoteId) -> Result<Vec<HistoryEntry>, StoreError> {
                Ok(self.tables()?.history_for_quote(quote))
            }

            fn history_for_product(
                &self,
                product: ProductId,
            ) -> Result<Vec<HistoryEntry>, StoreError> {
                Ok(self.tables()?.history_for_product(product))
            }

            fn alert(&self, id: AlertId) -> Result<Option<PriceAlert>, StoreError> {
                Ok(self.tables()?.alerts.get(&id).cloned())
            }

            fn alerts(&self) -> Result<Vec<PriceAlert>, StoreError> {
                Ok(self.tables()?.alerts.values().cloned().collect())
            }

            fn alerts_for_product(&self, product: ProductId) -> Result<Vec<PriceAlert>, StoreError> {
                Ok(self.tables()?.alerts_for_product(product))
            }

            fn purchase_list(
                &self,
                id: PurchaseListId,
            ) -> Result<Option<PurchaseList>, StoreError> {
                Ok(self.tables()?.lists.get(&id).cloned())
            }

            fn purchase_list_by_name(
                &self,
                name: &str,
            ) -> Result<Option<PurchaseList>, StoreError> {
                Ok(self.tables()?.purchase_list_by_name(name))
            }

            fn purchase_lists(&self) -> Result<Vec<PurchaseList>, StoreError> {
                Ok(self.tables()?.lists.values().cloned().collect())
            }
        }
    };
}

read_through_tables!(MemoryStore);
read_through_tables!(MemoryTransaction<'_>);
