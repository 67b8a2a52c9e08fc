//! Internal transfer records from the document store

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::result::{Error, Result};
use crate::domain::transaction::{Direction, TransactionRecord, TransactionSource};
use crate::serde_util::{deserialize_optional_amount, deserialize_optional_id};

pub const FALLBACK_ID: &str = "N/A";
pub const FALLBACK_NAME: &str = "Unnamed";
pub const FALLBACK_CHANNEL: &str = "Unknown";
pub const FALLBACK_CATEGORY: &str = "Uncategorized";

/// A money movement recorded by this system's own store.
///
/// Every field is optional: documents written by older versions of the app
/// are missing some of them, and the merger substitutes fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    #[serde(rename = "$id", default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub amount: Option<Decimal>,
    /// Raw creation timestamp as stored (RFC 3339 or `YYYY-MM-DD`)
    #[serde(rename = "$createdAt", default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(rename = "senderBankId", default)]
    pub sender_bank_id: Option<String>,
    #[serde(rename = "receiverBankId", default)]
    pub receiver_bank_id: Option<String>,
}

impl TransferRecord {
    /// Normalize into a transaction as seen from `viewed_bank_link_id`.
    ///
    /// Missing or blank fields fall back to fixed literals; a missing or
    /// unparseable date falls back to `now`.
    pub fn into_record(self, viewed_bank_link_id: &str, now: DateTime<Utc>) -> TransactionRecord {
        let direction =
            Direction::for_transfer(self.sender_bank_id.as_deref(), viewed_bank_link_id);
        let date = self
            .created_at
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or(now);

        TransactionRecord {
            id: non_blank(self.id).unwrap_or_else(|| FALLBACK_ID.to_string()),
            name: non_blank(self.name).unwrap_or_else(|| FALLBACK_NAME.to_string()),
            amount: self.amount.unwrap_or(Decimal::ZERO),
            date,
            payment_channel: non_blank(self.channel)
                .unwrap_or_else(|| FALLBACK_CHANNEL.to_string()),
            category: non_blank(self.category).unwrap_or_else(|| FALLBACK_CATEGORY.to_string()),
            direction,
            account_id: viewed_bank_link_id.to_string(),
            source: TransactionSource::Transfer,
            pending: false,
            image: None,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC)
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Coerce one side of a transfer lookup into a list of records.
///
/// Anything that is not a JSON array (null, an object, a count) means "no
/// matches" and yields an empty list. Array entries must be objects; anything
/// else is a malformed response.
pub fn coerce_transfer_list(value: &JsonValue) -> Result<Vec<TransferRecord>> {
    let JsonValue::Array(items) = value else {
        return Ok(Vec::new());
    };

    items
        .iter()
        .map(|item| {
            if !item.is_object() {
                return Err(Error::upstream(format!(
                    "malformed transfer document: expected object, got {}",
                    json_kind(item)
                )));
            }
            serde_json::from_value::<TransferRecord>(item.clone())
                .map_err(|e| Error::upstream(format!("malformed transfer document: {}", e)))
        })
        .collect()
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
