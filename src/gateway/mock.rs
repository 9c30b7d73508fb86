//! Mock gateway for testing and offline use
//!
//! Serves transactions from memory. Fixtures files use the same JSON shape as
//! the block explorer (`receiver_address`, string `value`, ...), one array of
//! transactions per file.

use super::{ApiTransaction, Transaction, TransactionGateway};
use crate::Result;
use anyhow::Context;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// In-memory gateway that records every lookup
#[derive(Debug, Default)]
pub struct MockGateway {
    transactions: HashMap<String, Transaction>,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transaction(mut self, transaction: Transaction) -> Self {
        self.transactions
            .insert(transaction.hash.clone(), transaction);
        self
    }

    /// Load transactions from a JSON array in explorer format
    pub fn from_fixtures_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixtures file {:?}", path))?;
        let records: Vec<ApiTransaction> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse fixtures file {:?}", path))?;

        let mut gateway = Self::new();
        for record in records {
            gateway = gateway.with_transaction(Transaction::try_from(record)?);
        }

        tracing::info!(
            "Loaded {} fixture transactions from {:?}",
            gateway.transactions.len(),
            path
        );
        Ok(gateway)
    }

    /// Number of lookups served so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Hashes looked up so far, in call order
    pub async fn requested_hashes(&self) -> Vec<String> {
        self.requested.lock().await.clone()
    }
}

#[async_trait]
impl TransactionGateway for MockGateway {
    async fn get_transaction_by_hash(&self, transaction_hash: &str) -> Option<Transaction> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested
            .lock()
            .await
            .push(transaction_hash.to_string());
        self.transactions.get(transaction_hash).cloned()
    }
}
