//! Price engine service.

use std::collections::{BTreeMap, BTreeSet};

use jiff::civil::Date;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::{
    alerts::{AlertId, PriceAlert, check_alerts, validate_threshold},
    clock::{Clock, SystemClock},
    comparison::{self, ProductComparison, best_price_per_product, rank_comparisons},
    conversion::{applicable_rate, convert_to_usd, normalize_price},
    cost::{total_cost, validate_terms},
    currency::CurrencyCode,
    engine::data::{NewQuote, NewVendor, PriceChange, QuoteTerms},
    errors::{EngineError, NotFound, ValidationError},
    history::{
        ChangeType, HistoryEntry, Trend, compute_trend, get_history, get_product_history,
        record_change,
    },
    lists::{PurchaseList, total_value},
    models::{
        Brand, ExchangeRate, Product, ProductId, Quote, QuoteId, QuoteStatus, Vendor, VendorId,
    },
    store::{
        NewAlertRecord, NewProductRecord, NewPurchaseListRecord, NewQuoteRecord, NewRateRecord,
        NewVendorRecord, Repository, RepositoryMut, Store, Transaction,
    },
};

/// Orchestrates conversion, history and alerting over a [`Store`].
///
/// Every price-setting operation writes the quote, appends its history entry
/// and evaluates alerts inside one transaction. Input is validated before the
/// transaction opens, so a rejected call leaves the store untouched.
#[derive(Debug)]
pub struct PriceEngine<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: Store> PriceEngine<S> {
    /// Engine on the wall clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: Store, C: Clock> PriceEngine<S, C> {
    /// Engine on a caller-supplied clock.
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// The engine's clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Give the store back.
    pub fn into_store(self) -> S {
        self.store
    }

    // Catalog

    /// Create a brand.
    ///
    /// # Errors
    ///
    /// Fails on an empty name, an existing brand, or a store failure.
    pub fn create_brand(&mut self, name: &str) -> Result<Brand, EngineError> {
        let name = rejected("create_brand", required_name("brand", name))?;

        let mut tx = self.store.begin()?;
        let brand = tx.insert_brand(name)?;
        tx.commit()?;

        info!(brand_id = %brand.id, name = %brand.name, "brand created");

        Ok(brand)
    }

    /// Brand by name.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound::Brand`] if no brand has that name.
    pub fn brand_named(&self, name: &str) -> Result<Brand, EngineError> {
        let name = name.trim();

        self.store
            .brand_by_name(name)?
            .ok_or_else(|| NotFound::Brand(name.to_string()).into())
    }

    /// Create a product, creating its brand on first use.
    ///
    /// # Errors
    ///
    /// Fails on empty names, an existing product, or a store failure.
    pub fn create_product(
        &mut self,
        name: &str,
        brand: &str,
        category: Option<&str>,
    ) -> Result<Product, EngineError> {
        let name = rejected("create_product", required_name("product", name))?;
        let brand_name = rejected("create_product", required_name("brand", brand))?;

        let mut tx = self.store.begin()?;

        let brand = match tx.brand_by_name(brand_name)? {
            Some(brand) => brand,
            None => tx.insert_brand(brand_name)?,
        };

        let product = tx.insert_product(NewProductRecord {
            name: name.to_string(),
            brand: brand.id,
            category: clean_category(category),
        })?;

        tx.commit()?;

        info!(
            product_id = %product.id,
            name = %product.name,
            brand = %brand.name,
            "product created"
        );

        Ok(product)
    }

    /// Product by id.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound::Product`] if it does not exist.
    pub fn product(&self, id: ProductId) -> Result<Product, EngineError> {
        self.store
            .product(id)?
            .ok_or_else(|| NotFound::Product(id).into())
    }

    /// Product by name.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound::ProductNamed`] if no product has that name.
    pub fn product_named(&self, name: &str) -> Result<Product, EngineError> {
        let name = name.trim();

        self.store
            .product_by_name(name)?
            .ok_or_else(|| NotFound::ProductNamed(name.to_string()).into())
    }

    /// Every product, in creation order.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be read.
    pub fn products(&self) -> Result<Vec<Product>, EngineError> {
        Ok(self.store.products()?)
    }

    /// Set or clear a product's category.
    ///
    /// # Errors
    ///
    /// Fails if the product does not exist or the store fails.
    pub fn set_product_category(
        &mut self,
        product: ProductId,
        category: Option<&str>,
    ) -> Result<Product, EngineError> {
        let mut product = self.product(product)?;
        product.category = clean_category(category);

        let mut tx = self.store.begin()?;
        tx.update_product(&product)?;
        tx.commit()?;

        info!(product_id = %product.id, category = ?product.category, "product category set");

        Ok(product)
    }

    /// Distinct categories in use, sorted.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be read.
    pub fn categories(&self) -> Result<Vec<String>, EngineError> {
        let categories: BTreeSet<String> = self
            .store
            .products()?
            .into_iter()
            .filter_map(|product| product.category)
            .collect();

        Ok(categories.into_iter().collect())
    }

    /// Create a vendor.
    ///
    /// # Errors
    ///
    /// Fails on an empty name, a discount outside `[0, 100]`, an existing
    /// vendor, or a store failure.
    pub fn create_vendor(&mut self, vendor: NewVendor) -> Result<Vendor, EngineError> {
        let name = rejected("create_vendor", required_name("vendor", &vendor.name))?;
        let discount = vendor.discount.unwrap_or_default();

        rejected("create_vendor", validate_terms(discount, None, None))?;

        let discount_code = vendor
            .discount_code
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty());

        let mut tx = self.store.begin()?;
        let vendor = tx.insert_vendor(NewVendorRecord {
            name: name.to_string(),
            currency: vendor.currency,
            discount_code,
            discount,
        })?;
        tx.commit()?;

        info!(
            vendor_id = %vendor.id,
            name = %vendor.name,
            currency = %vendor.currency,
            "vendor created"
        );

        Ok(vendor)
    }

    /// Vendor by id.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound::Vendor`] if it does not exist.
    pub fn vendor(&self, id: VendorId) -> Result<Vendor, EngineError> {
        self.store
            .vendor(id)?
            .ok_or_else(|| NotFound::Vendor(id).into())
    }

    /// Vendor by name.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound::VendorNamed`] if no vendor has that name.
    pub fn vendor_named(&self, name: &str) -> Result<Vendor, EngineError> {
        let name = name.trim();

        self.store
            .vendor_by_name(name)?
            .ok_or_else(|| NotFound::VendorNamed(name.to_string()).into())
    }

    /// Every vendor, in creation order.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be read.
    pub fn vendors(&self) -> Result<Vec<Vendor>, EngineError> {
        Ok(self.store.vendors()?)
    }

    // Rates

    /// Record an exchange-rate snapshot, dated today (UTC) unless given.
    ///
    /// # Errors
    ///
    /// Fails for USD itself, for a rate that is not positive, when a snapshot
    /// already exists for that code and date, or on a store failure.
    pub fn add_rate(
        &mut self,
        code: CurrencyCode,
        usd_per_unit: Decimal,
        date: Option<Date>,
    ) -> Result<ExchangeRate, EngineError> {
        if code.is_canonical() {
            return rejected("add_rate", Err(ValidationError::CanonicalRate));
        }

        if usd_per_unit <= Decimal::ZERO {
            return rejected("add_rate", Err(ValidationError::NonPositiveRate(usd_per_unit)));
        }

        let date = date.unwrap_or_else(|| self.clock.today());

        let mut tx = self.store.begin()?;
        let rate = tx.insert_rate(NewRateRecord {
            code,
            date,
            usd_per_unit,
        })?;
        tx.commit()?;

        info!(%code, %date, rate = %usd_per_unit, "exchange rate added");

        Ok(rate)
    }

    /// Most recent snapshot for `code`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RateNotFound`] if there is none.
    pub fn latest_rate(&self, code: CurrencyCode) -> Result<ExchangeRate, EngineError> {
        Ok(applicable_rate(&self.store, code, None)?)
    }

    /// Convert an amount into USD with the snapshot applying on `as_of`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RateNotFound`] if no snapshot applies.
    pub fn convert(
        &self,
        amount: Decimal,
        code: CurrencyCode,
        as_of: Option<Date>,
    ) -> Result<Decimal, EngineError> {
        Ok(convert_to_usd(&self.store, amount, code, as_of)?)
    }

    // Quotes

    /// Record a vendor's price for a product.
    ///
    /// The price is in the vendor's currency and is converted with the latest
    /// snapshot. Without an explicit discount the vendor's default applies.
    ///
    /// # Errors
    ///
    /// Fails on invalid terms, an unknown vendor or product, a missing rate,
    /// or a store failure; nothing is written in any of these cases.
    pub fn create_quote(&mut self, quote: NewQuote) -> Result<PriceChange, EngineError> {
        rejected("create_quote", validate_price(quote.price))?;

        let vendor = self.vendor(quote.vendor)?;
        let product = self.product(quote.product)?;
        let discount = quote.discount.unwrap_or(vendor.discount);

        rejected(
            "create_quote",
            validate_terms(discount, quote.shipping_cost, quote.tax_rate),
        )?;

        let price = normalize_price(&self.store, quote.price, vendor.currency, None)?;

        rejected(
            "create_quote",
            ensure_total_cost(
                price.value,
                discount,
                quote.shipping_cost,
                quote.tax_rate,
            ),
        )?;

        let now = self.clock.now();

        let mut tx = self.store.begin()?;

        let stored = tx.insert_quote(NewQuoteRecord {
            vendor: vendor.id,
            product: product.id,
            value: price.value,
            original: price.original,
            discount,
            shipping_cost: quote.shipping_cost,
            tax_rate: quote.tax_rate,
            status: quote.status,
            created_at: now,
        })?;

        let entry = record_change(
            &mut tx,
            stored.id,
            None,
            stored.value,
            ChangeType::Create,
            now,
        )?;
        let triggered = check_alerts(&mut tx, product.id, stored.value, now)?;

        tx.commit()?;

        info!(
            quote_id = %stored.id,
            product_id = %product.id,
            vendor_id = %vendor.id,
            value = %stored.value,
            triggered = triggered.len(),
            "quote created"
        );

        Ok(PriceChange {
            quote: stored,
            entry,
            triggered,
        })
    }

    /// Change a quote's price.
    ///
    /// `price` is in the vendor's currency and is converted with the latest
    /// snapshot, refreshing the stored original price.
    ///
    /// # Errors
    ///
    /// Fails on a negative price, an unknown quote, a missing rate, or a store
    /// failure; nothing is written in any of these cases.
    pub fn update_price(
        &mut self,
        quote: QuoteId,
        price: Decimal,
    ) -> Result<PriceChange, EngineError> {
        rejected("update_price", validate_price(price))?;

        let mut quote = self.quote(quote)?;
        let vendor = self.vendor(quote.vendor)?;
        let normalized = normalize_price(&self.store, price, vendor.currency, None)?;
        let now = self.clock.now();

        let old_value = quote.value;
        quote.value = normalized.value;
        quote.original = normalized.original;

        rejected(
            "update_price",
            ensure_total_cost(
                quote.value,
                quote.discount,
                quote.shipping_cost,
                quote.tax_rate,
            ),
        )?;

        let mut tx = self.store.begin()?;

        tx.update_quote(&quote)?;
        let entry = record_change(
            &mut tx,
            quote.id,
            Some(old_value),
            quote.value,
            ChangeType::Update,
            now,
        )?;
        let triggered = check_alerts(&mut tx, quote.product, quote.value, now)?;

        tx.commit()?;

        info!(
            quote_id = %quote.id,
            old_value = %old_value,
            new_value = %quote.value,
            triggered = triggered.len(),
            "quote price updated"
        );

        Ok(PriceChange {
            quote,
            entry,
            triggered,
        })
    }

    /// Change a quote's discount, shipping and tax. No history is written.
    ///
    /// # Errors
    ///
    /// Fails on invalid terms, an unknown quote, or a store failure.
    pub fn update_terms(
        &mut self,
        quote: QuoteId,
        terms: QuoteTerms,
    ) -> Result<Quote, EngineError> {
        rejected(
            "update_terms",
            validate_terms(terms.discount, terms.shipping_cost, terms.tax_rate),
        )?;

        let mut quote = self.quote(quote)?;
        quote.discount = terms.discount;
        quote.shipping_cost = terms.shipping_cost;
        quote.tax_rate = terms.tax_rate;

        let total = rejected(
            "update_terms",
            ensure_total_cost(
                quote.value,
                quote.discount,
                quote.shipping_cost,
                quote.tax_rate,
            ),
        )?;

        let mut tx = self.store.begin()?;
        tx.update_quote(&quote)?;
        tx.commit()?;

        info!(quote_id = %quote.id, %total, "quote terms updated");

        Ok(quote)
    }

    /// Set or clear a quote's lifecycle status.
    ///
    /// # Errors
    ///
    /// Fails on an unknown quote or a store failure.
    pub fn set_status(
        &mut self,
        quote: QuoteId,
        status: Option<QuoteStatus>,
    ) -> Result<Quote, EngineError> {
        let mut quote = self.quote(quote)?;
        quote.status = status;

        let mut tx = self.store.begin()?;
        tx.update_quote(&quote)?;
        tx.commit()?;

        info!(quote_id = %quote.id, status = ?quote.status, "quote status set");

        Ok(quote)
    }

    /// Quote by id.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound::Quote`] if it does not exist.
    pub fn quote(&self, id: QuoteId) -> Result<Quote, EngineError> {
        self.store
            .quote(id)?
            .ok_or_else(|| NotFound::Quote(id).into())
    }

    /// Quotes of one product, in creation order.
    ///
    /// # Errors
    ///
    /// Fails if the product does not exist or the store fails.
    pub fn quotes_for_product(&self, product: ProductId) -> Result<Vec<Quote>, EngineError> {
        self.product(product)?;

        Ok(self.store.quotes_for_product(product)?)
    }

    /// Quotes with the given status, newest first.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be read.
    pub fn quotes_by_status(&self, status: QuoteStatus) -> Result<Vec<Quote>, EngineError> {
        let mut quotes: Vec<Quote> = self
            .store
            .quotes()?
            .into_iter()
            .filter(|quote| quote.status == Some(status))
            .collect();

        quotes.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(quotes)
    }

    // History

    /// Price history of a quote, newest first.
    ///
    /// # Errors
    ///
    /// Fails if the quote does not exist or the store fails.
    pub fn history(&self, quote: QuoteId) -> Result<Vec<HistoryEntry>, EngineError> {
        self.quote(quote)?;

        Ok(get_history(&self.store, quote)?)
    }

    /// Price history of every quote of a product, newest first.
    ///
    /// # Errors
    ///
    /// Fails if the product does not exist or the store fails.
    pub fn product_history(&self, product: ProductId) -> Result<Vec<HistoryEntry>, EngineError> {
        self.product(product)?;

        Ok(get_product_history(&self.store, product)?)
    }

    /// Latest price movement of a quote.
    ///
    /// # Errors
    ///
    /// See [`PriceEngine::history`].
    pub fn trend(&self, quote: QuoteId) -> Result<Trend, EngineError> {
        Ok(compute_trend(&self.history(quote)?))
    }

    // Comparison

    /// Cheapest quote per product, optionally restricted to `products`.
    ///
    /// Quotes are considered in creation order, so equal prices resolve to the
    /// earliest quote.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be read.
    pub fn best_prices(
        &self,
        products: Option<&BTreeSet<ProductId>>,
    ) -> Result<BTreeMap<ProductId, Quote>, EngineError> {
        let quotes = self.store.quotes()?;

        Ok(best_price_per_product(&quotes, products)
            .into_iter()
            .map(|(product, quote)| (product, quote.clone()))
            .collect())
    }

    /// Every quote of one product side by side.
    ///
    /// # Errors
    ///
    /// Fails if the product does not exist or the store fails.
    pub fn compare_product(&self, product: ProductId) -> Result<ProductComparison, EngineError> {
        let product = self.product(product)?;
        let quotes = self.store.quotes_for_product(product.id)?;

        Ok(comparison::compare_product(product, quotes))
    }

    /// Compare every quoted product whose category contains `term`.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound::Category`] when no product matches.
    pub fn compare_by_category(&self, term: &str) -> Result<Vec<ProductComparison>, EngineError> {
        let term = term.trim();
        let needle = term.to_lowercase();

        let products: Vec<Product> = self
            .store
            .products()?
            .into_iter()
            .filter(|product| {
                product
                    .category
                    .as_ref()
                    .is_some_and(|category| category.to_lowercase().contains(&needle))
            })
            .collect();

        if products.is_empty() {
            return Err(NotFound::Category(term.to_string()).into());
        }

        self.compare_all(products)
    }

    /// Compare every quoted product of a brand.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound::Brand`] for an unknown brand.
    pub fn compare_by_brand(&self, name: &str) -> Result<Vec<ProductComparison>, EngineError> {
        let brand = self.brand_named(name)?;
        let products = self.store.products_for_brand(brand.id)?;

        self.compare_all(products)
    }

    /// Compare every quoted product whose name contains `term`.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound::Search`] when no product matches.
    pub fn compare_by_search(&self, term: &str) -> Result<Vec<ProductComparison>, EngineError> {
        let term = term.trim();
        let needle = term.to_lowercase();

        let products: Vec<Product> = self
            .store
            .products()?
            .into_iter()
            .filter(|product| product.name.to_lowercase().contains(&needle))
            .collect();

        if products.is_empty() {
            return Err(NotFound::Search(term.to_string()).into());
        }

        self.compare_all(products)
    }

    fn compare_all(
        &self,
        mut products: Vec<Product>,
    ) -> Result<Vec<ProductComparison>, EngineError> {
        products.sort_by(|a, b| a.name.cmp(&b.name));

        let comparisons = products
            .into_iter()
            .map(|product| -> Result<ProductComparison, EngineError> {
                let quotes = self.store.quotes_for_product(product.id)?;

                Ok(comparison::compare_product(product, quotes))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rank_comparisons(comparisons))
    }

    // Alerts

    /// Watch a product for its price to fall to `threshold`.
    ///
    /// The threshold is compared against USD quote values; `currency` is only
    /// recorded.
    ///
    /// # Errors
    ///
    /// Fails on a threshold that is not positive, an unknown product, or a
    /// store failure.
    pub fn create_alert(
        &mut self,
        product: ProductId,
        threshold: Decimal,
        currency: CurrencyCode,
    ) -> Result<PriceAlert, EngineError> {
        rejected("create_alert", validate_threshold(threshold))?;

        let product = self.product(product)?;
        let now = self.clock.now();

        let mut tx = self.store.begin()?;
        let alert = tx.insert_alert(NewAlertRecord {
            product: product.id,
            threshold_value: threshold,
            threshold_currency: currency,
            created_at: now,
        })?;
        tx.commit()?;

        info!(
            alert_id = %alert.id,
            product_id = %product.id,
            threshold = %threshold,
            %currency,
            "price alert created"
        );

        Ok(alert)
    }

    /// Switch an alert off.
    ///
    /// # Errors
    ///
    /// Fails on an unknown alert or a store failure.
    pub fn deactivate_alert(&mut self, alert: AlertId) -> Result<PriceAlert, EngineError> {
        let mut alert = self
            .store
            .alert(alert)?
            .ok_or(NotFound::Alert(alert))?;

        alert.active = false;

        let mut tx = self.store.begin()?;
        tx.update_alert(&alert)?;
        tx.commit()?;

        info!(alert_id = %alert.id, "price alert deactivated");

        Ok(alert)
    }

    /// Alerts that are switched on, newest first.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be read.
    pub fn active_alerts(&self) -> Result<Vec<PriceAlert>, EngineError> {
        let mut alerts = self.alerts()?;

        alerts.retain(|alert| alert.active);

        Ok(alerts)
    }

    /// Alerts that have fired, most recently fired first.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be read.
    pub fn triggered_alerts(&self) -> Result<Vec<PriceAlert>, EngineError> {
        let mut alerts: Vec<PriceAlert> = self
            .store
            .alerts()?
            .into_iter()
            .filter(|alert| alert.triggered_at.is_some())
            .collect();

        alerts.sort_by(|a, b| {
            b.triggered_at
                .cmp(&a.triggered_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(alerts)
    }

    /// Every alert, newest first.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be read.
    pub fn alerts(&self) -> Result<Vec<PriceAlert>, EngineError> {
        let mut alerts = self.store.alerts()?;

        alerts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(alerts)
    }

    // Purchase lists

    /// Create an empty purchase list.
    ///
    /// # Errors
    ///
    /// Fails on an empty name, an existing list, or a store failure.
    pub fn create_purchase_list(
        &mut self,
        name: &str,
        description: Option<&str>,
    ) -> Result<PurchaseList, EngineError> {
        let name = rejected("create_purchase_list", required_name("purchase list", name))?;
        let now = self.clock.now();

        let mut tx = self.store.begin()?;
        let list = tx.insert_purchase_list(NewPurchaseListRecord {
            name: name.to_string(),
            description: description.map(str::to_string),
            created_at: now,
        })?;
        tx.commit()?;

        info!(list_id = %list.id, name = %list.name, "purchase list created");

        Ok(list)
    }

    /// Purchase list by name.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound::PurchaseList`] if no list has that name.
    pub fn purchase_list(&self, name: &str) -> Result<PurchaseList, EngineError> {
        let name = name.trim();

        self.store
            .purchase_list_by_name(name)?
            .ok_or_else(|| NotFound::PurchaseList(name.to_string()).into())
    }

    /// Every purchase list, newest first.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be read.
    pub fn purchase_lists(&self) -> Result<Vec<PurchaseList>, EngineError> {
        let mut lists = self.store.purchase_lists()?;

        lists.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(lists)
    }

    /// Put a quote on a purchase list.
    ///
    /// # Errors
    ///
    /// Fails on an unknown list or quote, a quote already on the list, or a
    /// store failure.
    pub fn add_to_purchase_list(
        &mut self,
        name: &str,
        quote: QuoteId,
    ) -> Result<PurchaseList, EngineError> {
        let mut list = self.purchase_list(name)?;
        let quote = self.quote(quote)?;

        if list.contains(quote.id) {
            return Err(EngineError::Duplicate(format!(
                "quote {} in purchase list '{}'",
                quote.id, list.name
            )));
        }

        list.quotes.push(quote.id);

        let mut tx = self.store.begin()?;
        tx.update_purchase_list(&list)?;
        tx.commit()?;

        info!(list_id = %list.id, quote_id = %quote.id, "quote added to purchase list");

        Ok(list)
    }

    /// Take a quote off a purchase list. The quote itself is kept.
    ///
    /// # Errors
    ///
    /// Fails on an unknown list, a quote that is not on it, or a store
    /// failure.
    pub fn remove_from_purchase_list(
        &mut self,
        name: &str,
        quote: QuoteId,
    ) -> Result<PurchaseList, EngineError> {
        let mut list = self.purchase_list(name)?;

        if !list.contains(quote) {
            return Err(NotFound::QuoteNotInList {
                list: list.name,
                quote,
            }
            .into());
        }

        list.quotes.retain(|member| *member != quote);

        let mut tx = self.store.begin()?;
        tx.update_purchase_list(&list)?;
        tx.commit()?;

        info!(list_id = %list.id, quote_id = %quote, "quote removed from purchase list");

        Ok(list)
    }

    /// Delete a purchase list. Its quotes are kept.
    ///
    /// # Errors
    ///
    /// Fails on an unknown list or a store failure.
    pub fn delete_purchase_list(&mut self, name: &str) -> Result<(), EngineError> {
        let list = self.purchase_list(name)?;

        let mut tx = self.store.begin()?;
        tx.delete_purchase_list(list.id)?;
        tx.commit()?;

        info!(list_id = %list.id, name = %list.name, "purchase list deleted");

        Ok(())
    }

    /// Quotes on a purchase list, in the order they were added.
    ///
    /// # Errors
    ///
    /// Fails on an unknown list or a store failure.
    pub fn purchase_list_quotes(&self, name: &str) -> Result<Vec<Quote>, EngineError> {
        let list = self.purchase_list(name)?;

        list.quotes.iter().map(|quote| self.quote(*quote)).collect()
    }

    /// Sum of the all-in cost of every quote on a list, in USD.
    ///
    /// `None` when the sum leaves decimal range.
    ///
    /// # Errors
    ///
    /// Fails on an unknown list or a store failure.
    pub fn purchase_list_total(&self, name: &str) -> Result<Option<Decimal>, EngineError> {
        let quotes = self.purchase_list_quotes(name)?;

        Ok(total_value(&quotes))
    }
}

/// Log and convert rejected input.
fn rejected<T>(
    operation: &'static str,
    result: Result<T, ValidationError>,
) -> Result<T, EngineError> {
    result.map_err(|error| {
        warn!(operation, %error, "input rejected");

        EngineError::Validation(error)
    })
}

fn required_name<'n>(kind: &'static str, name: &'n str) -> Result<&'n str, ValidationError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::EmptyName(kind));
    }

    Ok(name)
}

/// A quote's all-in cost must stay representable.
fn ensure_total_cost(
    value: Decimal,
    discount: Decimal,
    shipping: Option<Decimal>,
    tax: Option<Decimal>,
) -> Result<Decimal, ValidationError> {
    total_cost(value, discount, shipping, tax).ok_or(ValidationError::AmountTooLarge(value))
}

fn validate_price(price: Decimal) -> Result<(), ValidationError> {
    if price < Decimal::ZERO {
        return Err(ValidationError::NegativePrice(price));
    }

    Ok(())
}

fn clean_category(category: Option<&str>) -> Option<String> {
    category
        .map(str::trim)
        .filter(|category| !category.is_empty())
        .map(str::to_string)
}
