//! Quote commands

use std::io::{self, Write};

use clap::Args;
use procura::{
    currency::{CurrencyCode, format_amount},
    models::{QuoteId, QuoteStatus},
    report,
};
use rust_decimal::Decimal;

use super::Engine;

#[derive(Debug, Args)]
pub struct RepriceArgs {
    /// Quote id
    pub quote: u64,

    /// New price in the vendor's currency
    pub price: Decimal,
}

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// considering, ordered or received
    pub status: QuoteStatus,
}

pub fn reprice(engine: &mut Engine, args: &RepriceArgs) -> Result<(), String> {
    let change = engine
        .update_price(QuoteId::from_raw(args.quote), args.price)
        .map_err(|error| format!("failed to update price: {error}"))?;

    let history = engine
        .history(change.quote.id)
        .map_err(|error| format!("failed to read history: {error}"))?;
    let trend = engine
        .trend(change.quote.id)
        .map_err(|error| format!("failed to compute trend: {error}"))?;

    let mut out = io::stdout().lock();

    report::write_history(&mut out, &change.quote, &history, trend)
        .map_err(|error| format!("failed to write report: {error}"))?;

    if !change.triggered.is_empty() {
        let products = engine
            .products()
            .map_err(|error| format!("failed to list products: {error}"))?;

        writeln!(out, "Triggered alerts:")
            .map_err(|error| format!("failed to write report: {error}"))?;

        report::write_alerts(&mut out, &change.triggered, &products)
            .map_err(|error| format!("failed to write report: {error}"))?;
    }

    Ok(())
}

pub fn status(engine: &Engine, args: &StatusArgs) -> Result<(), String> {
    let quotes = engine
        .quotes_by_status(args.status)
        .map_err(|error| format!("failed to list quotes: {error}"))?;

    let mut out = io::stdout().lock();

    for quote in &quotes {
        let vendor = engine
            .vendor(quote.vendor)
            .map_err(|error| format!("failed to find vendor: {error}"))?;
        let product = engine
            .product(quote.product)
            .map_err(|error| format!("failed to find product: {error}"))?;

        writeln!(
            out,
            "#{} {} from {} at {}",
            quote.id,
            product.name,
            vendor.name,
            format_amount(quote.value, CurrencyCode::USD)
        )
        .map_err(|error| format!("failed to write report: {error}"))?;
    }

    writeln!(out, "{} quote(s) {}", quotes.len(), args.status)
        .map_err(|error| format!("failed to write report: {error}"))
}
