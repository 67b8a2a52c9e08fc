//! Derived roll-ups returned to the presentation layer

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{AccountSnapshot, TransactionRecord};

/// Roll-up across all of a user's bank links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSummary {
    #[serde(rename = "data")]
    pub accounts: Vec<AccountSnapshot>,
    pub total_banks: usize,
    pub total_current_balance: Decimal,
}

impl AggregateSummary {
    /// Build the summary; totals are always derived from `accounts`
    pub fn from_accounts(accounts: Vec<AccountSnapshot>) -> Self {
        let total_current_balance = accounts.iter().map(|a| a.current_balance).sum();
        Self {
            total_banks: accounts.len(),
            total_current_balance,
            accounts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Bank link of the first account, the default selection for detail views
    pub fn default_bank_link_id(&self) -> Option<&str> {
        self.accounts.first().map(|a| a.bank_link_id.as_str())
    }
}

/// One account with its merged, newest-first transaction history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetail {
    #[serde(rename = "data")]
    pub account: AccountSnapshot,
    pub transactions: Vec<TransactionRecord>,
}
