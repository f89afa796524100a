//! Purchase lists

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    ids::TypedId,
    models::{Quote, QuoteId},
};

/// Purchase list id.
pub type PurchaseListId = TypedId<PurchaseList>;

/// A named group of quotes being bought together.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseList {
    pub id: PurchaseListId,

    /// Unique, trimmed name.
    pub name: String,
    pub description: Option<String>,

    /// Member quotes in the order they were added; no duplicates.
    pub quotes: Vec<QuoteId>,
    pub created_at: Timestamp,
}

impl PurchaseList {
    /// Whether `quote` is on this list.
    pub fn contains(&self, quote: QuoteId) -> bool {
        self.quotes.contains(&quote)
    }
}

/// Sum of the all-in cost of every quote.
///
/// `None` if any quote's cost, or the running sum, leaves decimal range.
pub fn total_value<'q>(quotes: impl IntoIterator<Item = &'q Quote>) -> Option<Decimal> {
    quotes
        .into_iter()
        .try_fold(Decimal::ZERO, |total, quote| {
            total.checked_add(quote.total_cost()?)
        })
}
