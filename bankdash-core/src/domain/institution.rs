//! Institution domain model

use serde::{Deserialize, Serialize};

/// Metadata about the financial institution behind a bank connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    pub institution_id: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    /// Base64 encoded logo, as some providers return it inline
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
}

impl Institution {
    pub fn new(institution_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            institution_id: institution_id.into(),
            name: name.into(),
            url: None,
            logo: None,
            primary_color: None,
        }
    }
}
