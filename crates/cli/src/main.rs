//! Procura command line

use std::process::ExitCode;

use tracing::error;

mod commands;
mod config;
mod logging;

use config::Cli;

fn main() -> ExitCode {
    let cli = match Cli::load() {
        Ok(cli) => cli,
        Err(error) => {
            // clap renders help and version through the same path
            _ = error.print();

            return if error.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(error) = logging::init_subscriber(&cli.logging) {
        eprintln!("failed to initialise logging: {error}");

        return ExitCode::FAILURE;
    }

    match cli.command.run(&cli.data) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!(%message, "command failed");
            eprintln!("error: {message}");

            ExitCode::FAILURE
        }
    }
}
