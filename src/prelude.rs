//! Procura prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    alerts::{AlertId, PriceAlert, check_alerts},
    clock::{Clock, ManualClock, SystemClock},
    comparison::{ProductComparison, best_price_per_product, compare_product},
    conversion::{ConversionError, RateLookup, convert_to_usd},
    cost::total_cost,
    currency::{CurrencyCode, format_amount},
    engine::{NewQuote, NewVendor, PriceChange, PriceEngine, QuoteTerms},
    errors::{EngineError, NotFound, ValidationError},
    fixtures::{Dataset, FixtureError, LoadedDataset},
    history::{ChangeType, HistoryEntry, Trend, compute_trend, get_history, get_product_history},
    ids::TypedId,
    lists::{PurchaseList, PurchaseListId},
    models::{
        Brand, BrandId, ExchangeRate, OriginalPrice, Product, ProductId, Quote, QuoteId,
        QuoteStatus, Vendor, VendorId,
    },
    report::ReportError,
    store::{MemoryStore, Repository, RepositoryMut, Store, StoreError, Transaction},
};
