//! Purchase list commands

use std::io;

use clap::Args;
use procura::report;

use super::Engine;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// List name; every list when omitted
    pub name: Option<String>,
}

pub fn run(engine: &Engine, args: &ListArgs) -> Result<(), String> {
    let lists = match &args.name {
        Some(name) => vec![
            engine
                .purchase_list(name)
                .map_err(|error| format!("failed to find purchase list: {error}"))?,
        ],
        None => engine
            .purchase_lists()
            .map_err(|error| format!("failed to list purchase lists: {error}"))?,
    };

    let products = engine
        .products()
        .map_err(|error| format!("failed to list products: {error}"))?;
    let vendors = engine
        .vendors()
        .map_err(|error| format!("failed to list vendors: {error}"))?;

    let mut out = io::stdout().lock();

    for list in &lists {
        let quotes = engine
            .purchase_list_quotes(&list.name)
            .map_err(|error| format!("failed to read purchase list: {error}"))?;

        report::write_purchase_list(&mut out, list, &quotes, &products, &vendors)
            .map_err(|error| format!("failed to write report: {error}"))?;
    }

    Ok(())
}
