//! Payment module - Classify a transaction against an expected amount
//!
//! Expected amounts and thresholds are whole coins expressed as [`Decimal`];
//! transaction values are integers in the smallest unit. Both sides are
//! compared as exact decimals scaled to smallest units, never as floats.

use crate::Error;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod computer;
pub mod rule;

pub use computer::PaymentStateComputer;
pub use rule::{DEFAULT_MIN_CONFIRMATIONS, PaymentRule};

/// Number of smallest units (luna) in one coin (NIM)
pub const UNITS_PER_COIN: u64 = 100_000;

pub const NOT_FOUND_MESSAGE: &str = "Transaction not found.";
pub const RECIPIENT_MISMATCH_MESSAGE: &str = "Transaction recipient address does not match.";
pub const OVERPAID_MESSAGE: &str = "Payment amount exceeds the required amount.";
pub const UNDERPAID_MESSAGE: &str = "Payment amount is less than the required amount.";

/// Convert a whole-coin amount into smallest units.
///
/// Returns `None` on overflow. The result keeps any fractional part, so an
/// amount finer than one unit can never equal an on-chain value.
pub fn to_units(amount: Decimal) -> Option<Decimal> {
    amount.checked_mul(Decimal::from(UNITS_PER_COIN))
}

/// Settlement state of a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentState {
    Paid,
    Overpaid,
    Underpaid,
    Failed,
    NotFound,
}

impl PaymentState {
    /// Wire-stable string constant
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentState::Paid => "PAID",
            PaymentState::Overpaid => "OVERPAID",
            PaymentState::Underpaid => "UNDERPAID",
            PaymentState::Failed => "FAILED",
            PaymentState::NotFound => "NOT_FOUND",
        }
    }

    /// Whether the transaction settled the payment, exactly or within a threshold
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            PaymentState::Paid | PaymentState::Overpaid | PaymentState::Underpaid
        )
    }
}

impl fmt::Display for PaymentState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PaymentState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PAID" => Ok(PaymentState::Paid),
            "OVERPAID" => Ok(PaymentState::Overpaid),
            "UNDERPAID" => Ok(PaymentState::Underpaid),
            "FAILED" => Ok(PaymentState::Failed),
            "NOT_FOUND" => Ok(PaymentState::NotFound),
            other => Err(Error::Parser(format!("unknown payment state: {}", other))),
        }
    }
}

/// Outcome of a payment classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResult {
    pub state: PaymentState,
    pub message: Option<String>,
}

impl PaymentResult {
    pub fn new(state: PaymentState) -> Self {
        Self {
            state,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Generic failure, no message
    pub fn failed() -> Self {
        Self::new(PaymentState::Failed)
    }

    pub fn not_found() -> Self {
        Self::new(PaymentState::NotFound).with_message(NOT_FOUND_MESSAGE)
    }

    pub fn recipient_mismatch() -> Self {
        Self::new(PaymentState::Failed).with_message(RECIPIENT_MISMATCH_MESSAGE)
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
