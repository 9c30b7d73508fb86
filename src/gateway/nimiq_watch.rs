//! NimiqWatch API gateway implementation
//!
//! Looks transactions up through the NimiqWatch block-explorer REST API
//! (`GET {api_domain}/transaction/{hash}`).

use super::{ApiTransaction, Network, Transaction, TransactionGateway};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};

pub const MAIN_API_DOMAIN: &str = "https://v2.nimiqwatch.com/api/v1/";
pub const TEST_API_DOMAIN: &str = "https://v2.test.nimiqwatch.com/api/v1/";

/// NimiqWatch client with request spacing
#[derive(Debug, Clone)]
pub struct NimiqWatchGateway {
    client: Client,
    network: Network,
    api_domain: String,
    rate_limit: Duration,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl NimiqWatchGateway {
    /// Create a new gateway
    ///
    /// `api_domain` overrides the default explorer for `network`. Successive
    /// lookups are spaced at least `rate_limit` apart.
    pub fn new(
        network: Network,
        api_domain: Option<String>,
        timeout: Duration,
        rate_limit: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Gateway(format!("failed to build HTTP client: {}", e)))?;

        let api_domain = api_domain.unwrap_or_else(|| {
            match network {
                Network::Main => MAIN_API_DOMAIN,
                Network::Test => TEST_API_DOMAIN,
            }
            .to_string()
        });

        Ok(Self {
            client,
            network,
            api_domain,
            rate_limit,
            last_request: Arc::new(Mutex::new(None)),
        })
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn api_domain(&self) -> &str {
        &self.api_domain
    }

    pub fn transaction_url(&self, transaction_hash: &str) -> String {
        format!(
            "{}/transaction/{}",
            self.api_domain.trim_end_matches('/'),
            transaction_hash
        )
    }

    /// Wait until `rate_limit` has passed since the previous request
    async fn throttle(&self) {
        if self.rate_limit.is_zero() {
            return;
        }

        let mut last_request = self.last_request.lock().await;
        if let Some(at) = *last_request {
            let elapsed = at.elapsed();
            if elapsed < self.rate_limit {
                let delay = self.rate_limit - elapsed;
                tracing::debug!("Rate limiting NimiqWatch request for {:?}", delay);
                sleep(delay).await;
            }
        }
        *last_request = Some(Instant::now());
    }

    async fn fetch(&self, transaction_hash: &str) -> Result<Option<Transaction>> {
        self.throttle().await;

        let url = self.transaction_url(transaction_hash);
        tracing::debug!("Fetching transaction {} from {}", transaction_hash, url);

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| Error::Gateway(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!("NimiqWatch answered {} for {}", status, transaction_hash);
            return Ok(None);
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Gateway(format!("failed to read response body: {}", e)))?;

        parse_transaction(&body)
    }
}

/// Decode a response body; empty bodies and empty JSON documents mean "not found"
pub fn parse_transaction(body: &str) -> Result<Option<Transaction>> {
    if body.trim().is_empty() {
        return Ok(None);
    }

    let value: serde_json::Value = serde_json::from_str(body)?;
    let is_empty = match &value {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        serde_json::Value::Array(items) => items.is_empty(),
        _ => false,
    };
    if is_empty {
        return Ok(None);
    }

    let api: ApiTransaction = serde_json::from_value(value)?;
    Transaction::try_from(api).map(Some)
}

#[async_trait]
impl TransactionGateway for NimiqWatchGateway {
    async fn get_transaction_by_hash(&self, transaction_hash: &str) -> Option<Transaction> {
        match self.fetch(transaction_hash).await {
            Ok(transaction) => transaction,
            Err(e) => {
                tracing::warn!(
                    transaction_hash = %transaction_hash,
                    "NimiqWatch lookup failed: {}",
                    e
                );
                None
            }
        }
    }
}
