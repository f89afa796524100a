//! Price history commands

use std::io;

use clap::Args;
use procura::{models::QuoteId, report};

use super::Engine;

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Quote id
    pub quote: u64,
}

#[derive(Debug, Args)]
pub struct ProductHistoryArgs {
    /// Product name
    pub product: String,
}

pub fn quote(engine: &Engine, args: &HistoryArgs) -> Result<(), String> {
    let id = QuoteId::from_raw(args.quote);

    let quote = engine
        .quote(id)
        .map_err(|error| format!("failed to find quote: {error}"))?;
    let history = engine
        .history(id)
        .map_err(|error| format!("failed to read history: {error}"))?;
    let trend = engine
        .trend(id)
        .map_err(|error| format!("failed to compute trend: {error}"))?;

    report::write_history(io::stdout().lock(), &quote, &history, trend)
        .map_err(|error| format!("failed to write report: {error}"))
}

pub fn product(engine: &Engine, args: &ProductHistoryArgs) -> Result<(), String> {
    let product = engine
        .product_named(&args.product)
        .map_err(|error| format!("failed to find product: {error}"))?;
    let history = engine
        .product_history(product.id)
        .map_err(|error| format!("failed to read history: {error}"))?;

    report::write_product_history(io::stdout().lock(), &product, &history)
        .map_err(|error| format!("failed to write report: {error}"))
}
