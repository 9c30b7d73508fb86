//! Payment state computer
//!
//! Evaluates rules in order and returns the result of the first match.

use super::{PaymentResult, PaymentRule};
use crate::gateway::Transaction;
use rust_decimal::Decimal;

/// Ordered rule evaluator
///
/// Rule order is the tie-break: when two rules could both accept a
/// transaction, the one listed first decides the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentStateComputer {
    rules: Vec<PaymentRule>,
}

impl Default for PaymentStateComputer {
    fn default() -> Self {
        Self::new(vec![PaymentRule::paid()])
    }
}

impl PaymentStateComputer {
    pub fn new(rules: Vec<PaymentRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[PaymentRule] {
        &self.rules
    }

    /// Classify `transaction` against `expected_amount` (whole coins).
    ///
    /// Falls back to a message-less `FAILED` when no rule matches.
    pub fn determine_payment_state(
        &self,
        expected_amount: Decimal,
        transaction: &Transaction,
    ) -> PaymentResult {
        self.rules
            .iter()
            .find(|rule| rule.matches(expected_amount, transaction))
            .map(|rule| {
                let result = PaymentResult::new(rule.state());
                match rule.message() {
                    Some(message) => result.with_message(message),
                    None => result,
                }
            })
            .unwrap_or_else(PaymentResult::failed)
    }
}
