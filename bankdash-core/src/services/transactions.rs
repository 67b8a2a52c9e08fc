//! Transaction service - merged transaction history for one bank link
//!
//! Two sources feed the history of a bank link:
//! - the provider's paginated transaction delta feed
//! - transfers recorded in the document store, where the link is either the
//!   sender or the receiver
//!
//! Both are normalized into `TransactionRecord` and returned newest first.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, warn};

use crate::domain::result::{Error, Result};
use crate::domain::transfer::{coerce_transfer_list, parse_timestamp, FALLBACK_CATEGORY};
use crate::domain::{
    sort_newest_first, AccountDetail, BankLink, Direction, TransactionRecord, TransactionSource,
};
use crate::ports::{BankDataProvider, BankLinkStore, ProviderTransaction};
use crate::services::accounts::fetch_account_snapshot;
use crate::services::with_timeout;

/// Transaction service for the account detail view
#[derive(Clone)]
pub struct TransactionService {
    store: Arc<dyn BankLinkStore>,
    provider: Arc<dyn BankDataProvider>,
    request_timeout: Duration,
}

impl TransactionService {
    pub fn new(
        store: Arc<dyn BankLinkStore>,
        provider: Arc<dyn BankDataProvider>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            store,
            provider,
            request_timeout,
        }
    }

    /// Load one account and its merged transaction history.
    ///
    /// An unknown bank link fails with `NotFound` before anything is requested
    /// from the provider. Every other failure is `AggregationFailed`.
    pub async fn get_account_detail(&self, bank_link_id: &str) -> Result<AccountDetail> {
        let link = self.resolve_link(bank_link_id).await?;

        self.load_detail(&link).await.map_err(|e| {
            error!(bank_link_id, error = %e, "failed to load account detail");
            Error::aggregation(e)
        })
    }

    async fn resolve_link(&self, bank_link_id: &str) -> Result<BankLink> {
        if bank_link_id.trim().is_empty() {
            return Err(Error::not_found("No bank link was selected"));
        }

        let link = with_timeout(
            self.request_timeout,
            "bank link lookup",
            self.store.get_bank_link(bank_link_id),
        )
        .await
        .map_err(|e| {
            error!(bank_link_id, error = %e, "failed to look up bank link");
            Error::aggregation(e)
        })?;

        link.ok_or_else(|| {
            warn!(bank_link_id, "bank link not found");
            Error::not_found(format!(
                "Could not find bank information for bank link {}",
                bank_link_id
            ))
        })
    }

    async fn load_detail(&self, link: &BankLink) -> Result<AccountDetail> {
        let (account, provider_transactions, transfers) = tokio::try_join!(
            fetch_account_snapshot(self.provider.as_ref(), link, self.request_timeout),
            self.fetch_provider_transactions(link),
            self.fetch_transfers(link),
        )?;

        let mut transactions = provider_transactions;
        transactions.extend(transfers);
        sort_newest_first(&mut transactions);

        debug!(
            bank_link_id = %link.id,
            transactions = transactions.len(),
            "merged transaction history"
        );
        Ok(AccountDetail {
            account,
            transactions,
        })
    }

    /// Walk the provider's delta feed to the end, accumulating the added
    /// transactions of every page.
    ///
    /// Pages are requested strictly one after another since each request
    /// carries the cursor of the previous page. A cursor is never requested
    /// twice, so a feed that repeats or cycles its cursors fails instead of
    /// looping.
    async fn fetch_provider_transactions(&self, link: &BankLink) -> Result<Vec<TransactionRecord>> {
        let mut transactions = Vec::new();
        let mut cursor: Option<String> = None;
        let mut seen_cursors = HashSet::new();
        let mut pages = 0usize;

        loop {
            let page = with_timeout(
                self.request_timeout,
                "transaction page fetch",
                self.provider
                    .fetch_transaction_page(&link.access_token, cursor.as_deref()),
            )
            .await?;
            pages += 1;

            for tx in page.added {
                transactions.push(map_provider_transaction(tx)?);
            }

            if !page.has_more {
                break;
            }

            match page.next_cursor {
                Some(next) if !next.is_empty() && seen_cursors.insert(next.clone()) => {
                    cursor = Some(next);
                }
                _ => {
                    return Err(Error::upstream(format!(
                        "{} reported more transaction pages for bank link {} \
                         without a new cursor",
                        self.provider.name(),
                        link.id
                    )));
                }
            }
        }

        debug!(
            bank_link_id = %link.id,
            pages,
            transactions = transactions.len(),
            "fetched provider transactions"
        );
        Ok(transactions)
    }

    /// Load the internal transfers of a bank link from the document store
    async fn fetch_transfers(&self, link: &BankLink) -> Result<Vec<TransactionRecord>> {
        let documents = with_timeout(
            self.request_timeout,
            "transfer lookup",
            self.store.list_transfers(&link.id),
        )
        .await?;

        if !documents.sent.is_array() || !documents.received.is_array() {
            debug!(
                bank_link_id = %link.id,
                "transfer lookup returned a non-list side, treating it as empty"
            );
        }

        let sent = coerce_transfer_list(&documents.sent)?;
        let received = coerce_transfer_list(&documents.received)?;

        let now = Utc::now();
        Ok(sent
            .into_iter()
            .chain(received)
            .map(|transfer| transfer.into_record(&link.id, now))
            .collect())
    }
}

/// Map a provider transaction onto the dashboard's transaction shape
fn map_provider_transaction(tx: ProviderTransaction) -> Result<TransactionRecord> {
    let date = parse_timestamp(&tx.date).ok_or_else(|| {
        Error::upstream(format!(
            "transaction {} has an invalid date '{}'",
            tx.transaction_id, tx.date
        ))
    })?;

    let category = tx
        .category
        .into_iter()
        .find(|c| !c.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_CATEGORY.to_string());

    Ok(TransactionRecord {
        id: tx.transaction_id,
        name: tx.name,
        direction: Direction::for_provider_amount(tx.amount),
        amount: tx.amount,
        date,
        payment_channel: tx.payment_channel,
        category,
        account_id: tx.account_id,
        source: TransactionSource::Provider,
        pending: tx.pending,
        image: tx.logo_url,
    })
}
