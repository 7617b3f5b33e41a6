//! Lenient field decoders for external payloads.
//!
//! Sites are inconsistent about quoting numbers, so ratings and ranks accept
//! either a JSON string or a JSON number. Anything else is rejected.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode a string or number into its textual form.
pub fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text.trim().to_string()),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(D::Error::custom(format!(
            "expected string or number, found {other}"
        ))),
    }
}

/// Decode an unsigned integer given as a string or number.
pub fn unsigned_from_text_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => text
            .trim()
            .parse::<u64>()
            .map_err(|error| D::Error::custom(format!("invalid integer {text:?}: {error}"))),
        Value::Number(number) => number
            .as_u64()
            .ok_or_else(|| D::Error::custom(format!("expected unsigned integer, found {number}"))),
        other => Err(D::Error::custom(format!(
            "expected string or number, found {other}"
        ))),
    }
}
