//! Transaction domain model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Money direction of a transaction from the point of view of the viewed link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Debit,
    Credit,
}

impl Direction {
    /// Direction of an internal transfer as seen from `viewed_bank_link_id`.
    ///
    /// The same transfer is a debit for its sender and a credit for everyone
    /// else, so this is always computed against the requesting link.
    pub fn for_transfer(sender_bank_id: Option<&str>, viewed_bank_link_id: &str) -> Self {
        if sender_bank_id == Some(viewed_bank_link_id) {
            Direction::Debit
        } else {
            Direction::Credit
        }
    }

    /// Direction of a provider transaction. Providers report money leaving the
    /// account as a positive amount.
    pub fn for_provider_amount(amount: Decimal) -> Self {
        if amount > Decimal::ZERO {
            Direction::Debit
        } else {
            Direction::Credit
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Debit => "debit",
            Direction::Credit => "credit",
        }
    }
}

/// Where a transaction came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionSource {
    /// Reported by the bank-data provider
    Provider,
    /// Recorded by this system's own document store
    Transfer,
}

/// One normalized transaction, from either source.
///
/// Constructed fresh per request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub name: String,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub payment_channel: String,
    pub category: String,
    #[serde(rename = "type")]
    pub direction: Direction,
    /// Provider account id for provider transactions, bank link id for transfers
    pub account_id: String,
    pub source: TransactionSource,
    #[serde(default)]
    pub pending: bool,
    #[serde(default)]
    pub image: Option<String>,
}

/// Sort transactions newest first.
///
/// The sort is stable: entries sharing a timestamp keep their input order.
pub fn sort_newest_first(transactions: &mut [TransactionRecord]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
}
