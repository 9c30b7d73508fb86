//! Configuration management
//!
//! This module handles loading and managing configuration from:
//! - Command-line arguments
//! - Environment variables
//! - Configuration files (TOML)
//! - Defaults

use crate::error::{Error, Result};
use crate::gateway::Network;
use crate::payment::{DEFAULT_MIN_CONFIRMATIONS, PaymentRule};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Environment variable consulted when no receiver address is configured
pub const RECEIVER_ADDRESS_ENV: &str = "NIMIQ_RECEIVER_ADDRESS";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub payment: PaymentConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Block-explorer gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Network (main, test)
    #[serde(default)]
    pub network: Network,

    /// Explorer base URL, overrides the network default
    pub api_domain: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Minimum spacing between requests in milliseconds
    #[serde(default = "default_rate_limit_ms")]
    pub rate_limit_ms: u64,
}

/// Payment classification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Address payments must be sent to
    pub receiver_address: Option<String>,

    /// Confirmation floor shared by all rules
    #[serde(default = "default_min_confirmations")]
    pub min_confirmations: u64,

    /// Accepted excess in whole coins, enables the overpaid rule
    pub overpaid_threshold: Option<Decimal>,

    /// Accepted shortfall in whole coins, enables the underpaid rule
    pub underpaid_threshold: Option<Decimal>,

    /// Rule evaluation order
    #[serde(default = "default_rules")]
    pub rules: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions

fn default_timeout_secs() -> u64 {
    5
}

fn default_rate_limit_ms() -> u64 {
    1000
}

fn default_min_confirmations() -> u64 {
    DEFAULT_MIN_CONFIRMATIONS
}

fn default_rules() -> Vec<String> {
    vec![
        "underpaid".to_string(),
        "overpaid".to_string(),
        "paid".to_string(),
    ]
}

fn default_log_level() -> String {
    "info".to_string()
}

// Default implementations

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            api_domain: None,
            timeout_secs: default_timeout_secs(),
            rate_limit_ms: default_rate_limit_ms(),
        }
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            receiver_address: None,
            min_confirmations: default_min_confirmations(),
            overpaid_threshold: None,
            underpaid_threshold: None,
            rules: default_rules(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl PaymentConfig {
    /// Configured threshold for a rule name
    pub fn threshold_for(&self, rule: &str) -> Option<Decimal> {
        match rule {
            "overpaid" => self.overpaid_threshold,
            "underpaid" => self.underpaid_threshold,
            _ => None,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file {:?}: {}", path, e)))?;

        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Searches in order:
    /// 1. ./config.toml
    /// 2. ~/.nimiq-payment-validator/config.toml
    /// 3. /etc/nimiq-payment-validator/config.toml
    pub fn load() -> Result<Self> {
        let mut paths = vec![PathBuf::from("config.toml")];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".nimiq-payment-validator").join("config.toml"));
        }
        paths.push(PathBuf::from("/etc/nimiq-payment-validator/config.toml"));

        for path in paths {
            if path.exists() {
                tracing::info!("Loading config from {:?}", path);
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Get receiver address from config or environment
    pub fn receiver_address(&self) -> Result<String> {
        if let Some(address) = &self.payment.receiver_address {
            return Ok(address.clone());
        }

        std::env::var(RECEIVER_ADDRESS_ENV).map_err(|_| {
            Error::MissingConfig(format!(
                "Receiver address not found. Set {} environment variable or configure payment.receiver_address",
                RECEIVER_ADDRESS_ENV
            ))
        })
    }

    /// Check the payment section, returning every problem found
    pub fn validate(&self) -> Vec<String> {
        let payment = &self.payment;
        let mut problems = Vec::new();

        for (name, threshold) in [
            ("overpaid_threshold", payment.overpaid_threshold),
            ("underpaid_threshold", payment.underpaid_threshold),
        ] {
            if let Some(t) = threshold
                && t.is_sign_negative()
                && !t.is_zero()
            {
                problems.push(format!("{} must not be negative (got {})", name, t));
            }
        }

        // The default order silently skips rules without a threshold; an
        // explicit list must be fully satisfiable
        let explicit = payment.rules != default_rules();
        let mut seen = HashSet::new();
        for name in &payment.rules {
            if !seen.insert(name.as_str()) {
                problems.push(format!("rule '{}' is listed more than once", name));
            }
            match PaymentRule::from_name(name, payment.threshold_for(name)) {
                Err(_) => problems.push(format!("unknown rule '{}'", name)),
                Ok(None) if explicit => problems.push(format!(
                    "rule '{}' is listed but payment.{}_threshold is not set",
                    name, name
                )),
                Ok(_) => {}
            }
        }

        if self.gateway.timeout_secs == 0 {
            problems.push("gateway.timeout_secs must be greater than zero".to_string());
        }

        problems
    }

    /// Build the ordered rule list
    ///
    /// Threshold rules are skipped when their threshold is not configured, so
    /// the default rule order degrades to exact-payment only.
    pub fn build_rules(&self) -> Result<Vec<PaymentRule>> {
        let problems = self.validate();
        if !problems.is_empty() {
            return Err(Error::Config(problems.join("; ")));
        }

        let payment = &self.payment;
        let mut rules = Vec::with_capacity(payment.rules.len());
        for name in &payment.rules {
            match PaymentRule::from_name(name, payment.threshold_for(name))? {
                Some(rule) => rules.push(rule.with_min_confirmations(payment.min_confirmations)),
                None => tracing::debug!("Rule '{}' has no threshold configured, skipping", name),
            }
        }

        Ok(rules)
    }
}
