//! Price history ledger.

use std::{
    cmp::Ordering,
    fmt::{self, Display},
    str::FromStr,
};

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    errors::ValidationError,
    ids::TypedId,
    models::{ProductId, QuoteId},
    store::{NewHistoryRecord, Repository, RepositoryMut, StoreError},
};

/// History entry id.
pub type HistoryEntryId = TypedId<HistoryEntry>;

/// What kind of price-setting operation produced a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    /// First price of a quote.
    Create,

    /// Any later price.
    Update,
}

impl ChangeType {
    /// Lower-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
        }
    }
}

impl Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            _ => Err(ValidationError::InvalidChangeType(s.to_string())),
        }
    }
}

/// One immutable price transition of a quote.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: HistoryEntryId,
    pub quote: QuoteId,

    /// `None` only on the entry recording creation.
    pub old_value: Option<Decimal>,
    pub new_value: Decimal,
    pub change_type: ChangeType,
    pub changed_at: Timestamp,
}

/// Direction of the most recent price movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trend {
    /// Latest change raised the price.
    Up,

    /// Latest change lowered the price.
    Down,

    /// Latest change kept the price.
    Stable,

    /// Only the initial price is known.
    New,
}

impl Trend {
    /// Lower-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Stable => "stable",
            Self::New => "new",
        }
    }
}

impl Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append one entry to a quote's ledger.
///
/// Creation entries never carry an old value.
///
/// # Errors
///
/// Returns an error if the store rejects the write.
pub fn record_change<R: RepositoryMut + ?Sized>(
    repo: &mut R,
    quote: QuoteId,
    old_value: Option<Decimal>,
    new_value: Decimal,
    change_type: ChangeType,
    changed_at: Timestamp,
) -> Result<HistoryEntry, StoreError> {
    let old_value = match change_type {
        ChangeType::Create => None,
        ChangeType::Update => old_value,
    };

    repo.append_history(NewHistoryRecord {
        quote,
        old_value,
        new_value,
        change_type,
        changed_at,
    })
}

/// Ledger of one quote, newest first.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn get_history<R: Repository + ?Sized>(
    repo: &R,
    quote: QuoteId,
) -> Result<Vec<HistoryEntry>, StoreError> {
    let mut entries = repo.history_for_quote(quote)?;

    entries.sort_by(newest_first);

    Ok(entries)
}

/// Merged ledgers of every quote of a product, newest first.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn get_product_history<R: Repository + ?Sized>(
    repo: &R,
    product: ProductId,
) -> Result<Vec<HistoryEntry>, StoreError> {
    let mut entries = repo.history_for_product(product)?;

    entries.sort_by(newest_first);

    Ok(entries)
}

/// Classify the latest movement of a newest-first ledger.
pub fn compute_trend(history: &[HistoryEntry]) -> Trend {
    match history {
        [] => Trend::New,
        [only] => match only.change_type {
            ChangeType::Create => Trend::New,
            ChangeType::Update => Trend::Stable,
        },
        [newest, previous, ..] => match newest.new_value.cmp(&previous.new_value) {
            Ordering::Greater => Trend::Up,
            Ordering::Less => Trend::Down,
            Ordering::Equal => Trend::Stable,
        },
    }
}

/// Time descending, then id descending.
fn newest_first(a: &HistoryEntry, b: &HistoryEntry) -> Ordering {
    b.changed_at
        .cmp(&a.changed_at)
        .then_with(|| b.id.cmp(&a.id))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;
    use crate::store::{MemoryStore, NewProductRecord, NewQuoteRecord, Store, Transaction};

    fn entry(id: u64, new_value: Decimal, change_type: ChangeType) -> HistoryEntry {
        HistoryEntry {
            id: HistoryEntryId::from_raw(id),
            quote: QuoteId::from_raw(1),
            old_value: None,
            new_value,
            change_type,
            changed_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn change_type_parses_and_displays() -> TestResult {
        assert_eq!("UPDATE".parse::<ChangeType>()?, ChangeType::Update);
        assert_eq!(ChangeType::Create.to_string(), "create");
        assert_eq!(
            "delete".parse::<ChangeType>(),
            Err(ValidationError::InvalidChangeType("delete".to_string()))
        );

        Ok(())
    }

    #[test]
    fn trend_of_empty_history_is_new() {
        assert_eq!(compute_trend(&[]), Trend::New);
    }

    #[test]
    fn trend_of_single_entry_depends_on_change_type() {
        assert_eq!(
            compute_trend(&[entry(1, dec!(10), ChangeType::Create)]),
            Trend::New
        );
        assert_eq!(
            compute_trend(&[entry(1, dec!(10), ChangeType::Update)]),
            Trend::Stable
        );
    }

    #[test]
    fn trend_compares_two_newest_entries() {
        let create = entry(1, dec!(999), ChangeType::Create);

        assert_eq!(
            compute_trend(&[entry(2, dec!(1099), ChangeType::Update), create.clone()]),
            Trend::Up
        );
        assert_eq!(
            compute_trend(&[entry(2, dec!(899), ChangeType::Update), create.clone()]),
            Trend::Down
        );
        assert_eq!(
            compute_trend(&[entry(2, dec!(999.00), ChangeType::Update), create]),
            Trend::Stable
        );
    }

    #[test]
    fn trend_ignores_older_entries() {
        let history = [
            entry(3, dec!(5), ChangeType::Update),
            entry(2, dec!(5), ChangeType::Update),
            entry(1, dec!(100), ChangeType::Create),
        ];

        assert_eq!(compute_trend(&history), Trend::Stable);
    }

    #[test]
    fn history_is_newest_first_with_id_tie_break() -> TestResult {
        let mut store = MemoryStore::new();
        let mut tx = store.begin()?;

        let brand = tx.insert_brand("Apple")?;
        let product = tx.insert_product(NewProductRecord {
            name: "iPad".to_string(),
            brand: brand.id,
            category: None,
        })?;
        let quote = tx.insert_quote(NewQuoteRecord {
            vendor: crate::models::VendorId::from_raw(100),
            product: product.id,
            value: dec!(999),
            original: None,
            discount: Decimal::ZERO,
            shipping_cost: None,
            tax_rate: None,
            status: None,
            created_at: Timestamp::UNIX_EPOCH,
        })?;

        let same_time: Timestamp = "2025-01-15T10:00:00Z".parse()?;

        let created = record_change(
            &mut tx,
            quote.id,
            Some(dec!(1)),
            dec!(999),
            ChangeType::Create,
            same_time,
        )?;
        let first = record_change(
            &mut tx,
            quote.id,
            Some(dec!(999)),
            dec!(899),
            ChangeType::Update,
            same_time,
        )?;
        let second = record_change(
            &mut tx,
            quote.id,
            Some(dec!(899)),
            dec!(849),
            ChangeType::Update,
            same_time,
        )?;
        tx.commit()?;

        assert_eq!(created.old_value, None, "creation never has an old value");

        let ids: Vec<HistoryEntryId> = get_history(&store, quote.id)?
            .iter()
            .map(|e| e.id)
            .collect();

        assert_eq!(ids, [second.id, first.id, created.id]);
        assert_eq!(get_product_history(&store, product.id)?.len(), 3);

        Ok(())
    }

    fn quote_record(product: ProductId, vendor: u64, value: Decimal) -> NewQuoteRecord {
        NewQuoteRecord {
            vendor: crate::models::VendorId::from_raw(vendor),
            product,
            value,
            original: None,
            discount: Decimal::ZERO,
            shipping_cost: None,
            tax_rate: None,
            status: None,
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn product_history_interleaves_quotes_and_excludes_other_products() -> TestResult {
        let mut store = MemoryStore::new();
        let mut tx = store.begin()?;

        let brand = tx.insert_brand("Apple")?;
        let ipad = tx.insert_product(NewProductRecord {
            name: "iPad".to_string(),
            brand: brand.id,
            category: None,
        })?;
        let iphone = tx.insert_product(NewProductRecord {
            name: "iPhone".to_string(),
            brand: brand.id,
            category: None,
        })?;

        let amazon = tx.insert_quote(quote_record(ipad.id, 1, dec!(999)))?;
        let fnac = tx.insert_quote(quote_record(ipad.id, 2, dec!(1049)))?;
        let other = tx.insert_quote(quote_record(iphone.id, 1, dec!(799)))?;

        let at = |time: &str| time.parse::<Timestamp>();

        let amazon_created = record_change(
            &mut tx,
            amazon.id,
            None,
            dec!(999),
            ChangeType::Create,
            at("2025-01-10T09:00:00Z")?,
        )?;
        let fnac_created = record_change(
            &mut tx,
            fnac.id,
            None,
            dec!(1049),
            ChangeType::Create,
            at("2025-01-11T09:00:00Z")?,
        )?;
        let other_created = record_change(
            &mut tx,
            other.id,
            None,
            dec!(799),
            ChangeType::Create,
            at("2025-01-12T09:00:00Z")?,
        )?;
        let amazon_cut = record_change(
            &mut tx,
            amazon.id,
            Some(dec!(999)),
            dec!(949),
            ChangeType::Update,
            at("2025-01-13T09:00:00Z")?,
        )?;
        // recorded later but dated earlier than the amazon cut
        let fnac_cut = record_change(
            &mut tx,
            fnac.id,
            Some(dec!(1049)),
            dec!(999),
            ChangeType::Update,
            at("2025-01-12T18:00:00Z")?,
        )?;
        let other_cut = record_change(
            &mut tx,
            other.id,
            Some(dec!(799)),
            dec!(749),
            ChangeType::Update,
            at("2025-01-14T09:00:00Z")?,
        )?;
        tx.commit()?;

        let ids: Vec<HistoryEntryId> = get_product_history(&store, ipad.id)?
            .iter()
            .map(|e| e.id)
            .collect();

        assert_eq!(
            ids,
            [amazon_cut.id, fnac_cut.id, fnac_created.id, amazon_created.id]
        );

        let others: Vec<HistoryEntryId> = get_product_history(&store, iphone.id)?
            .iter()
            .map(|e| e.id)
            .collect();

        assert_eq!(others, [other_cut.id, other_created.id]);

        Ok(())
    }
}
