//! Lenient deserializers for external JSON payloads
//!
//! Providers and the document store are not consistent about numeric types:
//! amounts arrive as JSON numbers or as strings, and list fields may be
//! `null` or missing when nothing matched.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

/// Parse a JSON number or numeric string into a Decimal
pub fn amount_from_value(value: &JsonValue) -> Result<Decimal, String> {
    match value {
        JsonValue::Number(n) => n
            .to_string()
            .parse::<Decimal>()
            .or_else(|_| {
                n.as_f64()
                    .and_then(|f| Decimal::try_from(f).ok())
                    .ok_or_else(|| format!("invalid decimal: {}", n))
            }),
        JsonValue::String(s) => s
            .trim()
            .parse::<Decimal>()
            .map_err(|e| format!("invalid decimal '{}': {}", s, e)),
        _ => Err("expected number or string for amount".to_string()),
    }
}

/// Deserialize amount that can be number or string
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: JsonValue = Deserialize::deserialize(deserializer)?;
    amount_from_value(&value).map_err(D::Error::custom)
}

/// Deserialize optional amount that can be number, string or null
pub fn deserialize_optional_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<JsonValue> = Option::deserialize(deserializer)?;
    match value {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) if s.trim().is_empty() => Ok(None),
        Some(v) => amount_from_value(&v).map(Some).map_err(D::Error::custom),
    }
}

/// Deserialize ID that can be number or string
pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<JsonValue> = Option::deserialize(deserializer)?;
    match value {
        Some(JsonValue::Number(n)) => Ok(Some(n.to_string())),
        Some(JsonValue::String(s)) => Ok(Some(s)),
        Some(JsonValue::Null) | None => Ok(None),
        _ => Err(D::Error::custom("expected number or string for id")),
    }
}
