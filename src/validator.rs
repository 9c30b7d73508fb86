//! Transaction validator
//!
//! Orchestrates a single payment check: hash format, gateway lookup,
//! recipient check, then delegation to the [`PaymentStateComputer`].

use crate::gateway::TransactionGateway;
use crate::payment::{PaymentResult, PaymentRule, PaymentStateComputer};
use crate::{Config, Error, Result};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Whether `hash` is a non-empty string of ASCII hex digits
pub fn is_valid_hash(hash: &str) -> bool {
    !hash.is_empty() && hash.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Checks transactions sent to one receiver address
///
/// Immutable after construction; clones share the gateway and can validate
/// different hashes concurrently.
#[derive(Clone)]
pub struct TransactionValidator {
    gateway: Arc<dyn TransactionGateway>,
    receiver_address: String,
    computer: PaymentStateComputer,
}

impl TransactionValidator {
    /// Create a validator; an empty rule list installs the default `[Paid]`
    pub fn new(
        gateway: Arc<dyn TransactionGateway>,
        receiver_address: impl Into<String>,
        rules: Vec<PaymentRule>,
    ) -> Self {
        let computer = if rules.is_empty() {
            PaymentStateComputer::default()
        } else {
            PaymentStateComputer::new(rules)
        };

        Self {
            gateway,
            receiver_address: receiver_address.into(),
            computer,
        }
    }

    /// Create a validator from the receiver and rules in `config`
    pub fn from_config(gateway: Arc<dyn TransactionGateway>, config: &Config) -> Result<Self> {
        let receiver_address = config.receiver_address()?;
        let rules = config.build_rules()?;
        Ok(Self::new(gateway, receiver_address, rules))
    }

    pub fn receiver_address(&self) -> &str {
        &self.receiver_address
    }

    pub fn rules(&self) -> &[PaymentRule] {
        self.computer.rules()
    }

    /// Validate a transaction against the expected amount in whole coins.
    ///
    /// Only a malformed hash is an error; every other outcome, including a
    /// missing transaction, is reported through the returned [`PaymentResult`].
    pub async fn validate_transaction(
        &self,
        transaction_hash: &str,
        expected_amount: Decimal,
    ) -> Result<PaymentResult> {
        if !is_valid_hash(transaction_hash) {
            tracing::error!(
                transaction_hash = %transaction_hash,
                "Invalid transaction hash provided."
            );
            return Err(Error::InvalidTransactionHash(transaction_hash.to_string()));
        }

        let Some(transaction) = self.gateway.get_transaction_by_hash(transaction_hash).await
        else {
            tracing::warn!(transaction_hash = %transaction_hash, "Transaction not found.");
            return Ok(PaymentResult::not_found());
        };

        if !transaction.is_to(&self.receiver_address) {
            tracing::warn!(
                transaction_hash = %transaction_hash,
                expected_address = %self.receiver_address,
                actual_address = %transaction.recipient_address,
                "Recipient address mismatch."
            );
            return Ok(PaymentResult::recipient_mismatch());
        }

        let result = self
            .computer
            .determine_payment_state(expected_amount, &transaction);
        tracing::debug!(
            transaction_hash = %transaction_hash,
            state = %result.state,
            confirmations = transaction.confirmations,
            "Payment state determined"
        );
        Ok(result)
    }
}
