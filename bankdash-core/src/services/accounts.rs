//! Account service - aggregate account snapshots across a user's bank links

use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;
use tracing::{debug, error, info};

use crate::domain::result::{Error, Result};
use crate::domain::{AccountSnapshot, AggregateSummary, BankLink, Institution};
use crate::ports::{BankDataProvider, BankLinkStore, ProviderAccount};
use crate::services::with_timeout;

/// Account service for the summary view
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn BankLinkStore>,
    provider: Arc<dyn BankDataProvider>,
    request_timeout: Duration,
}

impl AccountService {
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

    /// Aggregate one snapshot per bank link owned by `user_id`.
    ///
    /// Per-link fetches run concurrently and are joined all-or-nothing: if any
    /// of them fails the whole call fails with `AggregationFailed` and no
    /// partial summary is returned. Accounts keep the bank-link order.
    pub async fn aggregate_accounts(&self, user_id: &str) -> Result<AggregateSummary> {
        if user_id.trim().is_empty() {
            return Err(Error::validation("user id cannot be empty"));
        }

        self.try_aggregate(user_id).await.map_err(|e| {
            error!(user_id, error = %e, "failed to aggregate accounts");
            Error::aggregation(e)
        })
    }

    async fn try_aggregate(&self, user_id: &str) -> Result<AggregateSummary> {
        let links = with_timeout(
            self.request_timeout,
            "bank link listing",
            self.store.list_bank_links(user_id),
        )
        .await?;
        debug!(user_id, links = links.len(), "loaded bank links");

        let snapshots = try_join_all(
            links.iter().map(|link| {
                fetch_account_snapshot(self.provider.as_ref(), link, self.request_timeout)
            }),
        )
        .await?;

        let summary = AggregateSummary::from_accounts(snapshots);
        info!(
            user_id,
            total_banks = summary.total_banks,
            "aggregated accounts"
        );
        Ok(summary)
    }
}

/// Fetch the current snapshot of the account behind one bank link.
///
/// Only the first account the provider lists for the credential is used;
/// any further accounts behind the same connection are ignored.
pub(crate) async fn fetch_account_snapshot(
    provider: &dyn BankDataProvider,
    link: &BankLink,
    request_timeout: Duration,
) -> Result<AccountSnapshot> {
    let accounts = with_timeout(
        request_timeout,
        "account fetch",
        provider.fetch_accounts(&link.access_token),
    )
    .await?;

    let account = accounts.accounts.into_iter().next().ok_or_else(|| {
        Error::upstream(format!(
            "{} returned no accounts for bank link {}",
            provider.name(),
            link.id
        ))
    })?;

    let institution_id = accounts
        .institution_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| {
            Error::upstream(format!(
                "{} returned no institution for bank link {}",
                provider.name(),
                link.id
            ))
        })?;

    let institution = with_timeout(
        request_timeout,
        "institution fetch",
        provider.fetch_institution(&institution_id),
    )
    .await?;

    assemble_snapshot(link, account, &institution)
}

/// Map a provider account onto the dashboard's account shape
fn assemble_snapshot(
    link: &BankLink,
    account: ProviderAccount,
    institution: &Institution,
) -> Result<AccountSnapshot> {
    let current_balance = account.balances.current.ok_or_else(|| {
        Error::upstream(format!(
            "account {} of bank link {} has no current balance",
            account.account_id, link.id
        ))
    })?;

    Ok(AccountSnapshot {
        id: account.account_id,
        available_balance: account.balances.available,
        current_balance,
        institution_id: institution.institution_id.clone(),
        institution_name: institution.name.clone(),
        name: account.name,
        official_name: account.official_name,
        mask: account.mask.unwrap_or_default(),
        account_type: account.account_type,
        subtype: account.subtype.unwrap_or_default(),
        bank_link_id: link.id.clone(),
        sharable_id: link.sharable_id.clone(),
    })
}
