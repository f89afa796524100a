//! Alert listing

use std::io;

use clap::Args;
use procura::report;

use super::Engine;

#[derive(Debug, Args)]
pub struct AlertsArgs {
    /// Only alerts that have fired
    #[arg(long)]
    pub triggered: bool,
}

pub fn run(engine: &Engine, args: &AlertsArgs) -> Result<(), String> {
    let alerts = if args.triggered {
        engine.triggered_alerts()
    } else {
        engine.alerts()
    }
    .map_err(|error| format!("failed to list alerts: {error}"))?;

    let products = engine
        .products()
        .map_err(|error| format!("failed to list products: {error}"))?;

    report::write_alerts(io::stdout().lock(), &alerts, &products)
        .map_err(|error| format!("failed to write report: {error}"))
}
