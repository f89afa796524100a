//! Price comparison commands

use std::io;

use clap::Args;
use procura::{comparison::ProductComparison, report};

use super::Engine;

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Product name
    pub product: String,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Term to match
    pub term: String,
}

pub fn best(engine: &Engine) -> Result<(), String> {
    let best = engine
        .best_prices(None)
        .map_err(|error| format!("failed to rank quotes: {error}"))?;
    let products = engine
        .products()
        .map_err(|error| format!("failed to list products: {error}"))?;
    let vendors = engine
        .vendors()
        .map_err(|error| format!("failed to list vendors: {error}"))?;

    report::write_best_prices(io::stdout().lock(), &best, &products, &vendors)
        .map_err(|error| format!("failed to write report: {error}"))
}

pub fn product(engine: &Engine, args: &CompareArgs) -> Result<(), String> {
    let product = engine
        .product_named(&args.product)
        .map_err(|error| format!("failed to find product: {error}"))?;
    let comparison = engine
        .compare_product(product.id)
        .map_err(|error| format!("failed to compare quotes: {error}"))?;
    let vendors = engine
        .vendors()
        .map_err(|error| format!("failed to list vendors: {error}"))?;

    report::write_comparison(io::stdout().lock(), &comparison, &vendors)
        .map_err(|error| format!("failed to write report: {error}"))
}

pub fn category(engine: &Engine, args: &SearchArgs) -> Result<(), String> {
    let comparisons = engine
        .compare_by_category(&args.term)
        .map_err(|error| format!("failed to compare category: {error}"))?;

    write_all(engine, &comparisons)
}

pub fn brand(engine: &Engine, args: &SearchArgs) -> Result<(), String> {
    let comparisons = engine
        .compare_by_brand(&args.term)
        .map_err(|error| format!("failed to compare brand: {error}"))?;

    write_all(engine, &comparisons)
}

pub fn search(engine: &Engine, args: &SearchArgs) -> Result<(), String> {
    let comparisons = engine
        .compare_by_search(&args.term)
        .map_err(|error| format!("failed to search products: {error}"))?;

    write_all(engine, &comparisons)
}

fn write_all(engine: &Engine, comparisons: &[ProductComparison]) -> Result<(), String> {
    let vendors = engine
        .vendors()
        .map_err(|error| format!("failed to list vendors: {error}"))?;

    report::write_comparisons(io::stdout().lock(), comparisons, &vendors)
        .map_err(|error| format!("failed to write report: {error}"))
}
