//! In-memory adapters
//!
//! `InMemoryBankLinkStore` and `StaticBankDataProvider` implement the ports
//! from fixed data. They back demo mode and let tests substitute the external
//! collaborators. The provider counts every call it receives.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

use crate::domain::result::{Error, Result};
use crate::domain::{BankLink, Institution};
use crate::ports::{
    BankDataProvider, BankLinkStore, ProviderAccount, ProviderAccounts, ProviderBalances,
    ProviderTransaction, TransactionPage, TransferDocuments,
};

// =============================================================================
// Bank link store
// =============================================================================

/// Document store backed by vectors
#[derive(Debug, Default)]
pub struct InMemoryBankLinkStore {
    links: Vec<BankLink>,
    /// Transfer documents in stored form (`senderBankId`, `receiverBankId`, ...)
    transfers: Vec<JsonValue>,
    /// Lookups that return these documents verbatim instead of filtering
    raw_transfers: HashMap<String, TransferDocuments>,
}

impl InMemoryBankLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_link(mut self, link: BankLink) -> Self {
        self.links.push(link);
        self
    }

    /// Add a transfer document as the store would hold it
    pub fn with_transfer(mut self, document: JsonValue) -> Self {
        self.transfers.push(document);
        self
    }

    /// Make the transfer lookup for `bank_link_id` return `documents` as is
    pub fn with_raw_transfers(
        mut self,
        bank_link_id: impl Into<String>,
        documents: TransferDocuments,
    ) -> Self {
        self.raw_transfers.insert(bank_link_id.into(), documents);
        self
    }

    fn transfers_where(&self, attribute: &str, bank_link_id: &str) -> JsonValue {
        JsonValue::Array(
            self.transfers
                .iter()
                .filter(|doc| doc.get(attribute).and_then(|v| v.as_str()) == Some(bank_link_id))
                .cloned()
                .collect(),
        )
    }
}

#[async_trait]
impl BankLinkStore for InMemoryBankLinkStore {
    async fn list_bank_links(&self, user_id: &str) -> Result<Vec<BankLink>> {
        Ok(self
            .links
            .iter()
            .filter(|link| link.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_bank_link(&self, id: &str) -> Result<Option<BankLink>> {
        Ok(self.links.iter().find(|link| link.id == id).cloned())
    }

    async fn list_transfers(&self, bank_link_id: &str) -> Result<TransferDocuments> {
        if let Some(raw) = self.raw_transfers.get(bank_link_id) {
            return Ok(raw.clone());
        }
        Ok(TransferDocuments {
            sent: self.transfers_where("senderBankId", bank_link_id),
            received: self.transfers_where("receiverBankId", bank_link_id),
        })
    }
}

// =============================================================================
// Bank-data provider
// =============================================================================

/// Cursor handed out for page `n` (1-based continuation pages)
fn cursor_for(page: usize) -> String {
    format!("cursor-{}", page)
}

const STALLED_CURSOR: &str = "cursor-stalled";
const CYCLE_CURSORS: [&str; 2] = ["cursor-a", "cursor-b"];

#[derive(Debug, Clone)]
enum Feed {
    Pages(Vec<Vec<ProviderTransaction>>),
    /// Always claims more data without moving the cursor
    Stalled,
    /// Claims more data while alternating between two cursors
    Cycling,
}

/// Provider serving fixed accounts, institutions and transaction pages
#[derive(Debug, Default)]
pub struct StaticBankDataProvider {
    accounts: HashMap<String, ProviderAccounts>,
    institutions: HashMap<String, Institution>,
    feeds: HashMap<String, Feed>,
    delay: Option<Duration>,
    account_calls: AtomicUsize,
    institution_calls: AtomicUsize,
    page_calls: AtomicUsize,
    cursors: Mutex<Vec<(String, Option<String>)>>,
}

impl StaticBankDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_institution(mut self, institution: Institution) -> Self {
        self.institutions
            .insert(institution.institution_id.clone(), institution);
        self
    }

    /// Accounts reachable with `access_token`, owned by `institution_id`
    pub fn with_accounts(
        mut self,
        access_token: impl Into<String>,
        institution_id: impl Into<String>,
        accounts: Vec<ProviderAccount>,
    ) -> Self {
        self.accounts.insert(
            access_token.into(),
            ProviderAccounts {
                accounts,
                institution_id: Some(institution_id.into()),
            },
        );
        self
    }

    /// Transaction feed for `access_token`, one inner vector per page
    pub fn with_transaction_pages(
        mut self,
        access_token: impl Into<String>,
        pages: Vec<Vec<ProviderTransaction>>,
    ) -> Self {
        self.feeds.insert(access_token.into(), Feed::Pages(pages));
        self
    }

    /// Transaction feed that never finishes
    pub fn with_stalled_feed(mut self, access_token: impl Into<String>) -> Self {
        self.feeds.insert(access_token.into(), Feed::Stalled);
        self
    }

    /// Transaction feed that hands out `cursor-a`, `cursor-b`, `cursor-a`, ...
    pub fn with_cycling_feed(mut self, access_token: impl Into<String>) -> Self {
        self.feeds.insert(access_token.into(), Feed::Cycling);
        self
    }

    /// Delay every response, to exercise timeouts
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn account_calls(&self) -> usize {
        self.account_calls.load(Ordering::SeqCst)
    }

    pub fn institution_calls(&self) -> usize {
        self.institution_calls.load(Ordering::SeqCst)
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.account_calls() + self.institution_calls() + self.page_calls()
    }

    /// Cursors requested for `access_token`, in request order
    pub fn requested_cursors(&self, access_token: &str) -> Vec<Option<String>> {
        self.cursors
            .lock()
            .map(|log| {
                log.iter()
                    .filter(|(token, _)| token == access_token)
                    .map(|(_, cursor)| cursor.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    async fn simulate_latency(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl BankDataProvider for StaticBankDataProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_accounts(&self, access_token: &str) -> Result<ProviderAccounts> {
        self.account_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        self.accounts
            .get(access_token)
            .cloned()
            .ok_or_else(|| Error::upstream("INVALID_ACCESS_TOKEN: unknown access token"))
    }

    async fn fetch_institution(&self, institution_id: &str) -> Result<Institution> {
        self.institution_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        self.institutions.get(institution_id).cloned().ok_or_else(|| {
            Error::upstream(format!("INVALID_INSTITUTION: unknown institution {}", institution_id))
        })
    }

    async fn fetch_transaction_page(
        &self,
        access_token: &str,
        cursor: Option<&str>,
    ) -> Result<TransactionPage> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut log) = self.cursors.lock() {
            log.push((access_token.to_string(), cursor.map(str::to_string)));
        }
        self.simulate_latency().await;

        if !self.accounts.contains_key(access_token) {
            return Err(Error::upstream("INVALID_ACCESS_TOKEN: unknown access token"));
        }

        let pages = match self.feeds.get(access_token) {
            None => return Ok(TransactionPage::default()),
            Some(Feed::Stalled) => {
                return Ok(TransactionPage {
                    added: Vec::new(),
                    has_more: true,
                    next_cursor: Some(STALLED_CURSOR.to_string()),
                })
            }
            Some(Feed::Cycling) => {
                let next = if cursor == Some(CYCLE_CURSORS[0]) {
                    CYCLE_CURSORS[1]
                } else {
                    CYCLE_CURSORS[0]
                };
                return Ok(TransactionPage {
                    added: Vec::new(),
                    has_more: true,
                    next_cursor: Some(next.to_string()),
                });
            }
            Some(Feed::Pages(pages)) => pages,
        };

        let index = match cursor {
            None => 0,
            Some(c) => c
                .strip_prefix("cursor-")
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|n| *n < pages.len())
                .ok_or_else(|| Error::upstream(format!("INVALID_CURSOR: {}", c)))?,
        };

        let has_more = index + 1 < pages.len();
        Ok(TransactionPage {
            added: pages.get(index).cloned().unwrap_or_default(),
            has_more,
            next_cursor: Some(cursor_for(index + 1)),
        })
    }
}

// =============================================================================
// Sample data builders
// =============================================================================

/// A checking account with the given current balance
pub fn sample_account(account_id: &str, current: Decimal) -> ProviderAccount {
    ProviderAccount {
        account_id: account_id.to_string(),
        balances: ProviderBalances {
            available: Some(current),
            current: Some(current),
            iso_currency_code: Some("USD".to_string()),
        },
        name: "Plaid Checking".to_string(),
        official_name: Some("Plaid Gold Standard 0% Interest Checking".to_string()),
        mask: Some("0000".to_string()),
        account_type: "depository".to_string(),
        subtype: Some("checking".to_string()),
    }
}

/// A card purchase posted on `date` (`YYYY-MM-DD`)
pub fn sample_transaction(
    transaction_id: &str,
    date: &str,
    amount: Decimal,
) -> ProviderTransaction {
    ProviderTransaction {
        transaction_id: transaction_id.to_string(),
        account_id: "acc-1".to_string(),
        name: "Starbucks".to_string(),
        amount,
        date: date.to_string(),
        payment_channel: "in store".to_string(),
        category: vec!["Food and Drink".to_string(), "Coffee Shop".to_string()],
        pending: false,
        logo_url: None,
    }
}
