//! Dashboard service - summary, selected account and one page of its history

use serde::Serialize;
use tracing::debug;

use crate::domain::page::DEFAULT_PER_PAGE;
use crate::domain::result::Result;
use crate::domain::{paginate, AccountDetail, AggregateSummary, Page, TransactionRecord};
use crate::services::{AccountService, TransactionService};

/// Everything the home view needs
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub summary: AggregateSummary,
    /// Bank link shown in the detail section
    pub selected_bank_link_id: Option<String>,
    pub detail: Option<AccountDetail>,
    /// Requested page of the selected account's transactions
    pub transactions: Page<TransactionRecord>,
}

/// Composes the account summary with the detail of one selected account
#[derive(Clone)]
pub struct DashboardService {
    account_service: AccountService,
    transaction_service: TransactionService,
}

impl DashboardService {
    pub fn new(account_service: AccountService, transaction_service: TransactionService) -> Self {
        Self {
            account_service,
            transaction_service,
        }
    }

    /// Load the dashboard for `user_id` in one call.
    ///
    /// `selected` picks the bank link for the detail section; without it the
    /// first aggregated account is used. A user without bank links gets an
    /// empty dashboard with no detail.
    ///
    /// Failures of the summary and of the selected account's detail both
    /// surface as `AggregationFailed` here. Callers that handle them
    /// differently aggregate themselves and call [`compose`](Self::compose).
    pub async fn load(
        &self,
        user_id: &str,
        selected: Option<&str>,
        page: usize,
    ) -> Result<Dashboard> {
        let summary = self.account_service.aggregate_accounts(user_id).await?;
        self.compose(summary, selected, page).await
    }

    /// Build the dashboard around an already aggregated summary.
    ///
    /// Entry point for callers that report a failed aggregation on their own,
    /// e.g. with a "no data" view, but still want detail failures as errors.
    pub async fn compose(
        &self,
        summary: AggregateSummary,
        selected: Option<&str>,
        page: usize,
    ) -> Result<Dashboard> {
        let selected_bank_link_id = selected
            .filter(|id| !id.trim().is_empty())
            .map(str::to_string)
            .or_else(|| summary.default_bank_link_id().map(str::to_string));

        let detail = match selected_bank_link_id.as_deref() {
            Some(id) => Some(self.transaction_service.get_account_detail(id).await?),
            None => None,
        };

        let history: &[TransactionRecord] = detail
            .as_ref()
            .map(|d| d.transactions.as_slice())
            .unwrap_or(&[]);
        let transactions = paginate(history, page, DEFAULT_PER_PAGE);

        debug!(
            selected = selected_bank_link_id.as_deref().unwrap_or("none"),
            page = transactions.page,
            "composed dashboard"
        );
        Ok(Dashboard {
            summary,
            selected_bank_link_id,
            detail,
            transactions,
        })
    }
}
