//! Account snapshot domain model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Point-in-time view of one bank account behind a bank link.
///
/// Recomputed on every request and never persisted.
/// Note: account_type and subtype are freeform strings using Plaid nomenclature
/// ("depository"/"checking", "credit"/"credit card", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    /// Provider account id
    pub id: String,
    pub available_balance: Option<Decimal>,
    pub current_balance: Decimal,
    pub institution_id: String,
    pub institution_name: String,
    pub name: String,
    pub official_name: Option<String>,
    /// Last digits of the account number
    pub mask: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub subtype: String,
    /// Owning bank link record id
    pub bank_link_id: String,
    pub sharable_id: Option<String>,
}

impl AccountSnapshot {
    /// Name to show in listings: the official name when the provider has one
    pub fn display_name(&self) -> &str {
        self.official_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.name)
    }

    /// Masked account number as usually rendered, e.g. `●●●● ●●●● ●●●● 1234`
    pub fn masked_number(&self) -> String {
        format!("●●●● ●●●● ●●●● {}", self.mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> AccountSnapshot {
        AccountSnapshot {
            id: "acc-1".to_string(),
            available_balance: Some(Decimal::new(10000, 2)),
            current_balance: Decimal::new(11000, 2),
            institution_id: "ins_1".to_string(),
            institution_name: "First Platypus Bank".to_string(),
            name: "Plaid Checking".to_string(),
            official_name: None,
            mask: "0000".to_string(),
            account_type: "depository".to_string(),
            subtype: "checking".to_string(),
            bank_link_id: "bank-1".to_string(),
            sharable_id: None,
        }
    }

    #[test]
    fn test_display_name_prefers_official_name() {
        let mut account = snapshot();
        assert_eq!(account.display_name(), "Plaid Checking");

        account.official_name = Some("Plaid Gold Standard 0% Interest Checking".to_string());
        assert_eq!(account.display_name(), "Plaid Gold Standard 0% Interest Checking");

        account.official_name = Some("  ".to_string());
        assert_eq!(account.display_name(), "Plaid Checking");
    }

    #[test]
    fn test_serializes_type_field() {
        let json = serde_json::to_value(snapshot()).unwrap();
        assert_eq!(json["type"], "depository");
        assert_eq!(json["bankLinkId"], "bank-1");
    }
}
