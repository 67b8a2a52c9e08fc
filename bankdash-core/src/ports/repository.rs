//! Bank link store port - document store abstraction

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::domain::result::Result;
use crate::domain::BankLink;

/// Raw result of looking up internal transfers for one bank link.
///
/// The sides are left as JSON because the store does not guarantee a list
/// when nothing matched; the merger validates their shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferDocuments {
    /// Transfers where the bank link is the sender
    pub sent: JsonValue,
    /// Transfers where the bank link is the receiver
    pub received: JsonValue,
}

/// Document store abstraction for bank links and internal transfers
///
/// Pure passthrough: implementations do no transformation beyond mapping
/// stored documents onto domain types.
#[async_trait]
pub trait BankLinkStore: Send + Sync {
    /// List every bank link owned by `user_id`
    async fn list_bank_links(&self, user_id: &str) -> Result<Vec<BankLink>>;

    /// Get a bank link by its record id
    async fn get_bank_link(&self, id: &str) -> Result<Option<BankLink>>;

    /// Internal transfers where `bank_link_id` is the sender or the receiver
    async fn list_transfers(&self, bank_link_id: &str) -> Result<TransferDocuments>;
}
