//! This module defines all error types used throughout the application.
//!
//! Only caller misuse and infrastructure problems are errors. Payment outcomes
//! such as "not found" or "recipient mismatch" are encoded in
//! [`PaymentResult`](crate::payment::PaymentResult) instead.

use std::io;
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Transaction hash is not a hexadecimal string
    #[error("Invalid hash (expected hexadecimal): {0}")]
    InvalidTransactionHash(String),

    /// Expected amount could not be interpreted
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// HTTP client construction and transport errors. Lookup failures are
    /// absorbed into "not found" by the gateway, so only construction
    /// errors reach callers.
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// JSON / TOML decoding errors
    #[error("Parser error: {0}")]
    Parser(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing configuration
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// Wrapped anyhow errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Check if error signals a malformed transaction hash
    pub fn is_invalid_hash(&self) -> bool {
        matches!(self, Error::InvalidTransactionHash(_))
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Parser(format!("TOML error: {}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parser(format!("JSON error: {}", err))
    }
}
