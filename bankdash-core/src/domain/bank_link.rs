//! Bank link domain model

use serde::{Deserialize, Serialize};

/// A stored association between a user and one external bank connection.
///
/// The access token is an opaque credential for the bank-data provider. It is
/// never serialized back out so it cannot leak into JSON output.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankLink {
    /// Internal record id in the document store
    pub id: String,
    pub user_id: String,
    #[serde(skip_serializing)]
    pub access_token: String,
    /// User-facing id that can be shared to receive transfers
    #[serde(default)]
    pub sharable_id: Option<String>,
    /// Provider account id recorded when the link was created
    #[serde(default)]
    pub account_id: Option<String>,
    /// Provider item/bank id
    #[serde(default)]
    pub bank_id: Option<String>,
    #[serde(default)]
    pub funding_source_url: Option<String>,
}

impl BankLink {
    /// Create a bank link with the required fields
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            access_token: access_token.into(),
            sharable_id: None,
            account_id: None,
            bank_id: None,
            funding_source_url: None,
        }
    }

    pub fn with_sharable_id(mut self, sharable_id: impl Into<String>) -> Self {
        self.sharable_id = Some(sharable_id.into());
        self
    }
}

impl std::fmt::Debug for BankLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BankLink")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("access_token", &"<redacted>")
            .field("sharable_id", &self.sharable_id)
            .field("account_id", &self.account_id)
            .field("bank_id", &self.bank_id)
            .finish()
    }
}
