//! CLI configuration

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::commands::Commands;

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

/// Procura command line
#[derive(Debug, Parser)]
#[command(name = "procura", about = "Compare vendor quotes and track prices", long_about = None)]
pub struct Cli {
    /// YAML dataset to load
    #[arg(short, long, env = "PROCURA_DATA", default_value = "fixtures/demo.yml")]
    pub data: PathBuf,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use testresult::TestResult;

    use super::*;
    use crate::commands::{AlertsArgs, ConvertArgs, ListArgs};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_data_path_and_command() -> TestResult {
        let cli = Cli::try_parse_from([
            "procura",
            "--data",
            "quotes.yml",
            "alerts",
            "--triggered",
        ])?;

        assert_eq!(cli.data, PathBuf::from("quotes.yml"));
        assert!(
            matches!(cli.command, Commands::Alerts(AlertsArgs { triggered: true })),
            "expected alerts --triggered, got {:?}",
            cli.command
        );

        Ok(())
    }

    #[test]
    fn parses_convert_with_date() -> TestResult {
        let cli = Cli::try_parse_from([
            "procura",
            "convert",
            "100",
            "eur",
            "--as-of",
            "2025-01-15",
            "--log-format",
            "json",
        ])?;

        let Commands::Convert(ConvertArgs {
            amount,
            code,
            as_of,
        }) = cli.command
        else {
            return Err("expected convert".into());
        };

        assert_eq!(amount.to_string(), "100");
        assert_eq!(code, "eur");
        assert_eq!(as_of, Some(jiff::civil::Date::constant(2025, 1, 15)));
        assert_eq!(cli.logging.log_format, LogFormat::Json);

        Ok(())
    }

    #[test]
    fn parses_list_with_and_without_name() -> TestResult {
        let named = Cli::try_parse_from(["procura", "list", "Office refresh"])?;
        let all = Cli::try_parse_from(["procura", "list"])?;

        assert!(
            matches!(&named.command, Commands::List(ListArgs { name: Some(name) }) if name == "Office refresh"),
            "expected named list, got {:?}",
            named.command
        );
        assert!(
            matches!(all.command, Commands::List(ListArgs { name: None })),
            "expected every list, got {:?}",
            all.command
        );

        Ok(())
    }
}
