//! Payment rules
//!
//! Each rule is a predicate over the expected amount and a transaction, paired
//! with the state and message it produces. Rules are plain values; their
//! thresholds and confirmation floor are fixed at construction.

use super::{OVERPAID_MESSAGE, PaymentState, UNDERPAID_MESSAGE, to_units};
use crate::gateway::Transaction;
use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Confirmations a transaction needs before any rule accepts it
pub const DEFAULT_MIN_CONFIRMATIONS: u64 = 120;

/// A named, orderable predicate mapping a transaction to a candidate state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaymentRule {
    /// Value equals the expected amount exactly
    Paid { min_confirmations: u64 },

    /// `expected < value <= expected + threshold`
    Overpaid {
        threshold: Decimal,
        min_confirmations: u64,
    },

    /// `expected - threshold <= value < expected`
    Underpaid {
        threshold: Decimal,
        min_confirmations: u64,
    },
}

impl PaymentRule {
    pub fn paid() -> Self {
        PaymentRule::Paid {
            min_confirmations: DEFAULT_MIN_CONFIRMATIONS,
        }
    }

    pub fn overpaid(threshold: Decimal) -> Self {
        PaymentRule::Overpaid {
            threshold,
            min_confirmations: DEFAULT_MIN_CONFIRMATIONS,
        }
    }

    pub fn underpaid(threshold: Decimal) -> Self {
        PaymentRule::Underpaid {
            threshold,
            min_confirmations: DEFAULT_MIN_CONFIRMATIONS,
        }
    }

    /// Replace the confirmation floor; `0` disables gating
    pub fn with_min_confirmations(self, confirmations: u64) -> Self {
        match self {
            PaymentRule::Paid { .. } => PaymentRule::Paid {
                min_confirmations: confirmations,
            },
            PaymentRule::Overpaid { threshold, .. } => PaymentRule::Overpaid {
                threshold,
                min_confirmations: confirmations,
            },
            PaymentRule::Underpaid { threshold, .. } => PaymentRule::Underpaid {
                threshold,
                min_confirmations: confirmations,
            },
        }
    }

    pub fn min_confirmations(&self) -> u64 {
        match self {
            PaymentRule::Paid { min_confirmations }
            | PaymentRule::Overpaid {
                min_confirmations, ..
            }
            | PaymentRule::Underpaid {
                min_confirmations, ..
            } => *min_confirmations,
        }
    }

    /// Whether this rule classifies `tx` for the given expected amount (whole coins)
    pub fn matches(&self, expected_amount: Decimal, tx: &Transaction) -> bool {
        if tx.confirmations < self.min_confirmations() {
            return false;
        }

        let (Some(expected), Some(actual)) = (to_units(expected_amount), tx.value_in_units())
        else {
            return false;
        };

        match self {
            PaymentRule::Paid { .. } => actual == expected,
            PaymentRule::Overpaid { threshold, .. } => {
                actual > expected
                    && to_units(*threshold)
                        .and_then(|t| expected.checked_add(t))
                        .is_some_and(|upper| actual <= upper)
            }
            PaymentRule::Underpaid { threshold, .. } => {
                actual < expected
                    && to_units(*threshold)
                        .and_then(|t| expected.checked_sub(t))
                        .is_some_and(|lower| actual >= lower)
            }
        }
    }

    pub fn state(&self) -> PaymentState {
        match self {
            PaymentRule::Paid { .. } => PaymentState::Paid,
            PaymentRule::Overpaid { .. } => PaymentState::Overpaid,
            PaymentRule::Underpaid { .. } => PaymentState::Underpaid,
        }
    }

    pub fn message(&self) -> Option<&'static str> {
        match self {
            PaymentRule::Paid { .. } => None,
            PaymentRule::Overpaid { .. } => Some(OVERPAID_MESSAGE),
            PaymentRule::Underpaid { .. } => Some(UNDERPAID_MESSAGE),
        }
    }

    /// Name used in configuration files
    pub fn name(&self) -> &'static str {
        match self {
            PaymentRule::Paid { .. } => "paid",
            PaymentRule::Overpaid { .. } => "overpaid",
            PaymentRule::Underpaid { .. } => "underpaid",
        }
    }

    /// Threshold in whole coins, `None` for the exact-payment rule
    pub fn threshold(&self) -> Option<Decimal> {
        match self {
            PaymentRule::Paid { .. } => None,
            PaymentRule::Overpaid { threshold, .. } | PaymentRule::Underpaid { threshold, .. } => {
                Some(*threshold)
            }
        }
    }

    /// Inverse of [`name`](Self::name)
    ///
    /// Threshold rules yield `Ok(None)` when no threshold is given; `paid`
    /// ignores it. Unknown names are an error.
    pub fn from_name(name: &str, threshold: Option<Decimal>) -> Result<Option<Self>> {
        match name {
            "paid" => Ok(Some(PaymentRule::paid())),
            "overpaid" => Ok(threshold.map(PaymentRule::overpaid)),
            "underpaid" => Ok(threshold.map(PaymentRule::underpaid)),
            other => Err(Error::Parser(format!("unknown rule '{}'", other))),
        }
    }
}

impl fmt::Display for PaymentRule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PaymentRule::Paid { min_confirmations } => {
                write!(f, "paid (min {} confirmations)", min_confirmations)
            }
            PaymentRule::Overpaid {
                threshold,
                min_confirmations,
            }
            | PaymentRule::Underpaid {
                threshold,
                min_confirmations,
            } => write!(
                f,
                "{} (threshold {}, min {} confirmations)",
                self.name(),
                threshold,
                min_confirmations
            ),
        }
    }
}
