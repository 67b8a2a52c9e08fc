//! bankdash core - account aggregation for a personal finance dashboard
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities (BankLink, AccountSnapshot, TransactionRecord, etc.)
//! - **ports**: Trait definitions for external dependencies (BankLinkStore, BankDataProvider)
//! - **services**: Aggregation and merge logic
//! - **adapters**: Concrete implementations (Plaid, Appwrite, in-memory)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

mod serde_util;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use adapters::appwrite::AppwriteClient;
use adapters::demo::demo_adapters;
use adapters::plaid::PlaidClient;
use config::Config;
use ports::{BankDataProvider, BankLinkStore};
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{
    AccountDetail, AccountSnapshot, AggregateSummary, BankLink, Direction, Page,
    TransactionRecord,
};
pub use services::Dashboard;

/// Main context for bankdash operations
///
/// This is the primary entry point for all business logic. It holds the
/// configuration and the services wired to either the live adapters or the
/// demo data.
pub struct BankdashContext {
    pub config: Config,
    pub account_service: AccountService,
    pub transaction_service: TransactionService,
    pub dashboard_service: DashboardService,
}

impl BankdashContext {
    /// Load configuration from `config_dir` and build the context
    pub fn new(config_dir: &Path) -> Result<Self> {
        let config = Config::load(config_dir)?;
        Self::from_config(config)
    }

    /// Build the context for an already loaded configuration.
    ///
    /// Demo mode uses the built-in demo data; otherwise Plaid and Appwrite
    /// credentials must be configured.
    pub fn from_config(config: Config) -> Result<Self> {
        if config.demo_mode {
            info!("using demo data");
            let (store, provider) = demo_adapters();
            return Ok(Self::with_adapters(config, store, provider));
        }

        let provider = PlaidClient::from_settings(&config.plaid, config.request_timeout)?;
        let store = AppwriteClient::from_settings(&config.appwrite, config.request_timeout)?;
        info!(plaid = provider.base_url(), "using live adapters");
        Ok(Self::with_adapters(config, Arc::new(store), Arc::new(provider)))
    }

    /// Build the context around explicit adapters
    pub fn with_adapters(
        config: Config,
        store: Arc<dyn BankLinkStore>,
        provider: Arc<dyn BankDataProvider>,
    ) -> Self {
        let timeout = config.request_timeout;
        let account_service = AccountService::new(store.clone(), provider.clone(), timeout);
        let transaction_service = TransactionService::new(store, provider, timeout);
        let dashboard_service =
            DashboardService::new(account_service.clone(), transaction_service.clone());

        Self {
            config,
            account_service,
            transaction_service,
            dashboard_service,
        }
    }
}
