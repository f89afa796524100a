//! Currency conversion

use std::io::{self, Write};

use clap::Args;
use jiff::civil::Date;
use procura::currency::{CurrencyCode, format_amount};
use rust_decimal::Decimal;

use super::Engine;

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Amount in the source currency
    pub amount: Decimal,

    /// ISO 4217 source currency
    pub code: String,

    /// Use the snapshot applying on this date
    #[arg(long)]
    pub as_of: Option<Date>,
}

pub fn run(engine: &Engine, args: &ConvertArgs) -> Result<(), String> {
    let code = CurrencyCode::parse(&args.code)
        .map_err(|error| format!("failed to parse currency: {error}"))?;

    let usd = engine
        .convert(args.amount, code, args.as_of)
        .map_err(|error| format!("failed to convert: {error}"))?;

    writeln!(
        io::stdout().lock(),
        "{} = {}",
        format_amount(args.amount, code),
        format_amount(usd, CurrencyCode::USD)
    )
    .map_err(|error| format!("failed to write result: {error}"))
}
