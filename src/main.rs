//! Nimiq Payment Validator

use clap::Parser;
use nimiq_payment_validator::{Config, Result, VERSION, cli, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let config = if let Some(config_path) = args.config_path() {
        Config::from_file(config_path)?
    } else {
        Config::load()?
    };

    init_logging(args.log_level.as_deref().unwrap_or(&config.logging.level));

    tracing::info!("Nimiq Payment Validator v{}", VERSION);
    tracing::debug!("Parsed arguments: {:?}", args);
    tracing::debug!("Loaded configuration: {:?}", config);

    cli::execute(args, config).await?;

    Ok(())
}
