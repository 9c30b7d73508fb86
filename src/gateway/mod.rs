//! Gateway module - Abstraction for fetching Nimiq transaction records
//!
//! This module provides a trait-based abstraction over the block explorer so
//! the payment engine never depends on a concrete HTTP API.

use crate::{Config, Result};
use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub mod mock;
pub mod models;
pub mod nimiq_watch;

pub use mock::MockGateway;
pub use models::{ApiTransaction, ApiValue, Transaction};
pub use nimiq_watch::NimiqWatchGateway;

/// Gateway trait for looking up transactions
///
/// Implementations absorb every transport, status and payload failure and
/// report it as `None`; callers only ever see "found" or "not found".
/// - `NimiqWatchGateway`: queries the NimiqWatch REST API
/// - `MockGateway`: serves transactions from memory
#[async_trait]
pub trait TransactionGateway: Send + Sync {
    /// Fetch a single transaction by hash
    async fn get_transaction_by_hash(&self, transaction_hash: &str) -> Option<Transaction>;
}

/// Nimiq network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Main,
    Test,
}

/// Gateway types
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GatewayType {
    /// NimiqWatch block explorer
    NimiqWatch,
    /// Transactions loaded from a JSON fixtures file
    Mock,
}

/// Create a gateway instance based on type and configuration
pub fn create_gateway(
    gateway_type: GatewayType,
    config: &Config,
    fixtures: Option<&Path>,
) -> Result<Arc<dyn TransactionGateway>> {
    match gateway_type {
        GatewayType::NimiqWatch => {
            let gateway = NimiqWatchGateway::new(
                config.gateway.network,
                config.gateway.api_domain.clone(),
                Duration::from_secs(config.gateway.timeout_secs),
                Duration::from_millis(config.gateway.rate_limit_ms),
            )?;
            Ok(Arc::new(gateway))
        }
        GatewayType::Mock => {
            let gateway = match fixtures {
                Some(path) => MockGateway::from_fixtures_file(path)?,
                None => {
                    tracing::warn!("Mock gateway without fixtures, every lookup will miss");
                    MockGateway::new()
                }
            };
            Ok(Arc::new(gateway))
        }
    }
}
