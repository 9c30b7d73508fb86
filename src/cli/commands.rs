//! CLI command implementations
//!
//! This module contains the implementation for each CLI command.

use crate::cli::output::{ValidationReport, output_json, output_table};
use crate::cli::{OutputFormat, ValidateArgs};
use crate::gateway::create_gateway;
use crate::payment::to_units;
use crate::{Config, Error, Result, TransactionValidator};
use rust_decimal::Decimal;

/// Apply command-line overrides on top of the loaded configuration
fn apply_overrides(target: &ValidateArgs, mut config: Config) -> Config {
    if let Some(receiver) = &target.receiver {
        config.payment.receiver_address = Some(receiver.clone());
    }
    if let Some(network) = target.network {
        config.gateway.network = network;
    }
    if let Some(api_domain) = &target.api_domain {
        config.gateway.api_domain = Some(api_domain.clone());
    }
    config
}

/// Reject expected amounts no transaction could ever settle
fn check_amount(amount: Decimal) -> Result<Decimal> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::InvalidAmount(format!(
            "{} (expected amount must not be negative)",
            amount
        )));
    }
    if to_units(amount).is_none() {
        return Err(Error::InvalidAmount(format!("{} (out of range)", amount)));
    }
    Ok(amount)
}

/// Build a validator for the requested gateway
fn build_validator(target: &ValidateArgs, config: Config) -> Result<TransactionValidator> {
    let config = apply_overrides(target, config);
    let gateway = create_gateway(target.source, &config, target.fixtures.as_deref())?;
    let validator = TransactionValidator::from_config(gateway, &config)?;

    tracing::debug!(
        "Validating against {} with {} rule(s)",
        validator.receiver_address(),
        validator.rules().len()
    );
    Ok(validator)
}

fn print_report(format: OutputFormat, report: &ValidationReport) -> Result<()> {
    let mut stdout = std::io::stdout();
    match format {
        OutputFormat::Json => output_json(&mut stdout, report),
        OutputFormat::Table => output_table(&mut stdout, report),
    }
}

/// Validate command implementation
pub mod validate {
    use super::*;

    /// Execute the validate command
    pub async fn execute(target: ValidateArgs, config: Config) -> Result<()> {
        check_amount(target.amount)?;
        let validator = build_validator(&target, config)?;

        tracing::info!("Validating transaction {}", target.hash);
        let result = validator
            .validate_transaction(&target.hash, target.amount)
            .await?;

        let report = ValidationReport::new(&target.hash, target.amount, result);
        print_report(target.output, &report)
    }
}

/// Watch command implementation
pub mod watch {
    use super::*;
    use crate::payment::PaymentResult;
    use std::time::Duration;

    /// Whether polling again could change the result
    fn is_final(result: &PaymentResult) -> bool {
        result.state.is_settled() || *result == PaymentResult::recipient_mismatch()
    }

    /// Polling period and attempt count, each at least one
    fn schedule(interval_secs: u64, max_attempts: u32) -> (Duration, u32) {
        (Duration::from_secs(interval_secs.max(1)), max_attempts.max(1))
    }

    /// Execute the watch command
    pub async fn execute(
        target: ValidateArgs,
        config: Config,
        interval_secs: u64,
        max_attempts: u32,
    ) -> Result<()> {
        check_amount(target.amount)?;
        let validator = build_validator(&target, config)?;

        let (period, max_attempts) = schedule(interval_secs, max_attempts);
        let mut interval = tokio::time::interval(period);
        for attempt in 1..=max_attempts {
            interval.tick().await;

            tracing::info!(
                "Checking transaction {} (attempt {}/{})",
                target.hash,
                attempt,
                max_attempts
            );
            let result = validator
                .validate_transaction(&target.hash, target.amount)
                .await?;
            let done = is_final(&result);

            let report = ValidationReport::new(&target.hash, target.amount, result);
            print_report(target.output, &report)?;

            if done {
                return Ok(());
            }
        }

        tracing::warn!(
            "Transaction {} did not settle after {} attempt(s)",
            target.hash,
            max_attempts
        );
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::payment::PaymentState;

        #[test]
        fn test_is_final() {
            assert!(is_final(&PaymentResult::new(PaymentState::Paid)));
            assert!(is_final(&PaymentResult::recipient_mismatch()));
            assert!(!is_final(&PaymentResult::failed()));
            assert!(!is_final(&PaymentResult::not_found()));
        }

        #[test]
        fn test_schedule_clamps_to_one() {
            assert_eq!(schedule(0, 0), (Duration::from_secs(1), 1));
            assert_eq!(schedule(30, 20), (Duration::from_secs(30), 20));
        }
    }
}

/// Check config command implementation
pub mod check_config {
    use super::*;
    use std::path::PathBuf;

    /// Execute the check-config command
    pub fn execute(path: Option<PathBuf>, config: &Config) -> Result<()> {
        let problems = config.validate();

        println!("Configuration Report");
        println!("{:=<60}", "");
        match &path {
            Some(path) => println!("File: {:?}", path),
            None => println!("File: (default search path)"),
        }
        println!();
        println!("Gateway:");
        println!("  Network:      {:?}", config.gateway.network);
        println!(
            "  API domain:   {}",
            config.gateway.api_domain.as_deref().unwrap_or("(network default)")
        );
        println!("  Timeout:      {}s", config.gateway.timeout_secs);
        println!("  Rate limit:   {}ms", config.gateway.rate_limit_ms);
        println!();
        println!("Payment:");
        match config.receiver_address() {
            Ok(address) => println!("  Receiver:     {}", address),
            Err(_) => println!("  Receiver:     (not set)"),
        }

        if problems.is_empty() {
            let rules = config.build_rules()?;
            println!("  Rules ({}):", rules.len());
            for rule in &rules {
                println!("    - {}", rule);
            }
            println!();
            println!("Configuration is valid");
            Ok(())
        } else {
            println!();
            println!("Errors:");
            for problem in &problems {
                println!("   {}", problem);
            }
            println!();
            Err(crate::Error::config(format!(
                "configuration has {} error(s)",
                problems.len()
            )))
        }
    }
}
