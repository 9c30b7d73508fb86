//! Nimiq Payment Validator
//!
//! Determines whether an on-chain Nimiq transaction settles an expected
//! payment.
//!
//! This library provides functionality for:
//! - Fetching transaction records from a block explorer (NimiqWatch, mock data)
//! - Classifying a transaction as paid, overpaid, underpaid or failed through
//!   an ordered, configurable rule set
//! - Validating hash format and recipient before classification

pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod payment;
pub mod validator;

pub use config::Config;
pub use error::{Error, Result};
pub use gateway::{Transaction, TransactionGateway};
pub use payment::{PaymentResult, PaymentRule, PaymentState, PaymentStateComputer};
pub use validator::TransactionValidator;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging with the given log level
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
