//! Core data models for Nimiq transactions
//!
//! [`Transaction`] is the record the payment engine works on; [`ApiTransaction`]
//! mirrors the block-explorer JSON payload it is built from.

use crate::payment::UNITS_PER_COIN;
use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Snapshot of one on-chain transfer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction hash (hex)
    pub hash: String,

    pub sender_address: String,

    pub recipient_address: String,

    /// Transferred value in smallest units (luna), as an integer string
    pub value: String,

    /// Attached message, empty when none
    #[serde(default)]
    pub message: String,

    pub block_height: u64,

    /// Unix epoch seconds
    pub timestamp: i64,

    /// Blocks mined on top of the including block
    #[serde(default)]
    pub confirmations: u64,

    #[serde(default)]
    pub extra: Option<Map<String, Value>>,
}

impl Transaction {
    /// Value in smallest units, or `None` if `value` is not a non-negative integer
    pub fn value_in_units(&self) -> Option<Decimal> {
        if !is_unsigned_integer(&self.value) {
            return None;
        }
        Decimal::from_str_exact(&self.value).ok()
    }

    /// Value in whole coins, derived on every call
    pub fn decimal_value(&self) -> Option<Decimal> {
        self.value_in_units()?
            .checked_div(Decimal::from(UNITS_PER_COIN))
    }

    /// Whether the transfer was sent to exactly this address
    pub fn is_to(&self, address: &str) -> bool {
        self.recipient_address == address
    }
}

fn is_unsigned_integer(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Value as sent by the explorer. It is documented as a string but some
/// deployments emit a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiValue {
    Text(String),
    Number(u64),
}

/// Block-explorer transaction payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiTransaction {
    pub hash: String,
    pub sender_address: String,
    pub receiver_address: String,
    pub value: ApiValue,
    #[serde(default)]
    pub message: Option<String>,
    pub block_height: u64,
    pub timestamp: i64,
    #[serde(default)]
    pub confirmations: u64,
    #[serde(default)]
    pub extra: Option<Value>,
}

impl TryFrom<ApiTransaction> for Transaction {
    type Error = Error;

    fn try_from(api: ApiTransaction) -> Result<Self> {
        let value = match api.value {
            ApiValue::Text(text) => text,
            ApiValue::Number(n) => n.to_string(),
        };

        if !is_unsigned_integer(&value) {
            return Err(Error::Parser(format!(
                "transaction {} has a non-integer value: {:?}",
                api.hash, value
            )));
        }

        // PHP-style backends encode an empty map as `[]`
        let extra = match api.extra {
            Some(Value::Object(map)) => Some(map),
            _ => None,
        };

        Ok(Transaction {
            hash: api.hash,
            sender_address: api.sender_address,
            recipient_address: api.receiver_address,
            value,
            message: api.message.unwrap_or_default(),
            block_height: api.block_height,
            timestamp: api.timestamp,
            confirmations: api.confirmations,
            extra,
        })
    }
}
