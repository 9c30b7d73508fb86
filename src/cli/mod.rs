//! CLI module
//!
//! This module defines the command-line interface using clap and implements
//! the command execution logic.

use crate::gateway::{GatewayType, Network};
use crate::{Config, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

pub mod commands;
pub mod output;

/// Nimiq Payment Validator CLI
#[derive(Parser, Debug)]
#[command(name = "nimiq-payment-validator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (overrides config)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a transaction once
    Validate(ValidateArgs),

    /// Re-check a transaction until it settles
    Watch {
        #[command(flatten)]
        target: ValidateArgs,

        /// Polling interval in seconds
        #[arg(long, default_value = "30")]
        interval: u64,

        /// Give up after this many checks
        #[arg(long, default_value = "20")]
        max_attempts: u32,
    },

    /// Validate the configuration file
    CheckConfig {
        /// Configuration file to check (overrides --config)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },
}

impl Cli {
    /// Configuration file to load; a `check-config` path wins over `--config`
    pub fn config_path(&self) -> Option<&Path> {
        match &self.command {
            Commands::CheckConfig { path: Some(path) } => Some(path.as_path()),
            _ => self.config.as_deref(),
        }
    }
}

/// Transaction to check and where to look it up
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Transaction hash (hex)
    #[arg(long)]
    pub hash: String,

    /// Expected amount in NIM
    #[arg(short, long)]
    pub amount: Decimal,

    /// Receiver address (overrides config)
    #[arg(short, long)]
    pub receiver: Option<String>,

    /// Gateway type
    #[arg(short, long, value_enum, default_value = "nimiq-watch")]
    pub source: GatewayType,

    /// JSON fixtures file for the mock gateway
    #[arg(long)]
    pub fixtures: Option<PathBuf>,

    /// Network (overrides config)
    #[arg(short, long, value_enum)]
    pub network: Option<Network>,

    /// Explorer API base URL (overrides config)
    #[arg(long)]
    pub api_domain: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text table
    Table,
}

/// Execute the CLI command
pub async fn execute(args: Cli, config: Config) -> Result<()> {
    match args.command {
        Commands::Validate(target) => commands::validate::execute(target, config).await,
        Commands::Watch {
            target,
            interval,
            max_attempts,
        } => commands::watch::execute(target, config, interval, max_attempts).await,
        Commands::CheckConfig { path } => {
            commands::check_config::execute(path.or(args.config), &config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "nimiq-payment-validator",
            "validate",
            "--hash",
            "abcdef",
            "--amount",
            "5.5",
            "--source",
            "mock",
        ])
        .unwrap();

        match cli.command {
            Commands::Validate(target) => {
                assert_eq!(target.hash, "abcdef");
                assert_eq!(target.amount, dec!(5.5));
                assert_eq!(target.source, GatewayType::Mock);
                assert_eq!(target.output, OutputFormat::Table);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_watch_parsing() {
        let cli = Cli::try_parse_from([
            "nimiq-payment-validator",
            "watch",
            "--hash",
            "abcdef",
            "--amount",
            "1",
            "--network",
            "test",
            "--interval",
            "5",
        ])
        .unwrap();

        match cli.command {
            Commands::Watch {
                target,
                interval,
                max_attempts,
            } => {
                assert_eq!(target.network, Some(Network::Test));
                assert_eq!(target.source, GatewayType::NimiqWatch);
                assert_eq!(interval, 5);
                assert_eq!(max_attempts, 20);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_check_config_parsing() {
        let cli = Cli::try_parse_from(["nimiq-payment-validator", "check-config"]).unwrap();
        assert!(matches!(cli.command, Commands::CheckConfig { path: None }));
        assert_eq!(cli.config_path(), None);

        let cli = Cli::try_parse_from([
            "nimiq-payment-validator",
            "--config",
            "global.toml",
            "check-config",
            "./local.toml",
        ])
        .unwrap();
        assert_eq!(cli.config_path(), Some(Path::new("./local.toml")));

        let cli = Cli::try_parse_from([
            "nimiq-payment-validator",
            "check-config",
            "--config",
            "global.toml",
        ])
        .unwrap();
        assert_eq!(cli.config_path(), Some(Path::new("global.toml")));
    }

    #[test]
    fn test_rejects_non_decimal_amount() {
        let cli = Cli::try_parse_from([
            "nimiq-payment-validator",
            "validate",
            "--hash",
            "abcdef",
            "--amount",
            "five",
        ]);
        assert!(cli.is_err());
    }
}
