//! Subcommands

use std::path::Path;

use clap::Subcommand;
use procura::{engine::PriceEngine, fixtures::Dataset, store::MemoryStore};
use tracing::info;

pub mod alerts;
pub mod compare;
pub mod convert;
pub mod history;
pub mod lists;
pub mod quotes;

pub use alerts::AlertsArgs;
pub use compare::{CompareArgs, SearchArgs};
pub use convert::ConvertArgs;
pub use history::{HistoryArgs, ProductHistoryArgs};
pub use lists::ListArgs;
pub use quotes::{RepriceArgs, StatusArgs};

/// Engine backed by the in-memory store and the system clock.
pub type Engine = PriceEngine<MemoryStore>;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Cheapest quote of every product
    Best,

    /// Every quote of one product side by side
    Compare(CompareArgs),

    /// Compare products whose category contains a term
    Category(SearchArgs),

    /// Compare products of one brand
    Brand(SearchArgs),

    /// Compare products whose name contains a term
    Search(SearchArgs),

    /// Price history of one quote
    History(HistoryArgs),

    /// Price history across every quote of a product
    ProductHistory(ProductHistoryArgs),

    /// List price alerts
    Alerts(AlertsArgs),

    /// Convert an amount to USD
    Convert(ConvertArgs),

    /// Record a new price for a quote
    Reprice(RepriceArgs),

    /// Quotes in a lifecycle status
    Status(StatusArgs),

    /// Purchase lists with their total value
    List(ListArgs),
}

impl Commands {
    /// Run the command against the dataset at `data`.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first failure.
    pub fn run(self, data: &Path) -> Result<(), String> {
        let mut engine = load_engine(data)?;

        match self {
            Self::Best => compare::best(&engine),
            Self::Compare(args) => compare::product(&engine, &args),
            Self::Category(args) => compare::category(&engine, &args),
            Self::Brand(args) => compare::brand(&engine, &args),
            Self::Search(args) => compare::search(&engine, &args),
            Self::History(args) => history::quote(&engine, &args),
            Self::ProductHistory(args) => history::product(&engine, &args),
            Self::Alerts(args) => alerts::run(&engine, &args),
            Self::Convert(args) => convert::run(&engine, &args),
            Self::Reprice(args) => quotes::reprice(&mut engine, &args),
            Self::Status(args) => quotes::status(&engine, &args),
            Self::List(args) => lists::run(&engine, &args),
        }
    }
}

fn load_engine(data: &Path) -> Result<Engine, String> {
    let dataset = Dataset::from_file(data)
        .map_err(|error| format!("failed to read {}: {error}", data.display()))?;

    let mut engine = Engine::new(MemoryStore::new());

    let loaded = dataset
        .load_into(&mut engine)
        .map_err(|error| format!("failed to load {}: {error}", data.display()))?;

    info!(
        path = %data.display(),
        quotes = loaded.quotes.len(),
        "engine ready"
    );

    Ok(engine)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn demo() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/demo.yml")
    }

    #[test]
    fn demo_dataset_loads() {
        let engine = load_engine(&demo());

        assert!(engine.is_ok(), "demo dataset should load: {engine:?}");
    }

    #[test]
    fn missing_dataset_is_reported() {
        let result = load_engine(Path::new("does/not/exist.yml"));

        assert!(
            matches!(&result, Err(message) if message.contains("failed to read")),
            "unexpected result: {result:?}"
        );
    }
}
