//! Bank-data provider port
//!
//! Defines the interface for fetching account, institution and transaction
//! data from the external banking-data aggregation provider (Plaid, or the
//! static provider used in demo mode and tests).

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::result::Result;
use crate::domain::Institution;

/// Balances as reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderBalances {
    pub available: Option<Decimal>,
    pub current: Option<Decimal>,
    pub iso_currency_code: Option<String>,
}

/// One account behind a credential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderAccount {
    pub account_id: String,
    pub balances: ProviderBalances,
    pub name: String,
    pub official_name: Option<String>,
    pub mask: Option<String>,
    pub account_type: String,
    pub subtype: Option<String>,
}

/// Result of fetching the accounts for one credential
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderAccounts {
    /// Accounts in provider order
    pub accounts: Vec<ProviderAccount>,
    /// Institution that owns the connection, if the provider reported one
    pub institution_id: Option<String>,
}

/// One transaction from the provider's delta feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderTransaction {
    pub transaction_id: String,
    pub account_id: String,
    pub name: String,
    /// Positive amounts are money leaving the account
    pub amount: Decimal,
    /// Posting date as `YYYY-MM-DD`
    pub date: String,
    pub payment_channel: String,
    /// Category hierarchy, most general first
    pub category: Vec<String>,
    pub pending: bool,
    pub logo_url: Option<String>,
}

/// One page of the provider's transaction delta feed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPage {
    pub added: Vec<ProviderTransaction>,
    pub has_more: bool,
    /// Cursor to pass when requesting the next page
    pub next_cursor: Option<String>,
}

/// Bank-data provider trait
///
/// Implementations talk to an external aggregator. Services depend only on
/// this trait so the provider can be swapped for a fake.
#[async_trait]
pub trait BankDataProvider: Send + Sync {
    /// Provider name (e.g., "plaid", "static")
    fn name(&self) -> &str;

    /// Fetch every account reachable with `access_token`
    async fn fetch_accounts(&self, access_token: &str) -> Result<ProviderAccounts>;

    /// Fetch institution metadata by provider institution id
    async fn fetch_institution(&self, institution_id: &str) -> Result<Institution>;

    /// Fetch one page of transaction deltas.
    ///
    /// # Arguments
    /// * `access_token` - credential of the bank link
    /// * `cursor` - cursor returned by the previous page, `None` for the first
    async fn fetch_transaction_page(
        &self,
        access_token: &str,
        cursor: Option<&str>,
    ) -> Result<TransactionPage>;
}
