//! String attribute conversion.

use crate::number::{NumberAdapter, NumericValue};

/// Parse attribute text as JSON, keeping the raw text when it is not JSON.
#[must_use]
pub fn parse_json_string(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

/// A missing attribute is zero; anything else goes through the adapter,
/// which itself falls back to zero.
#[must_use]
pub fn from_attribute(na: &dyn NumberAdapter, raw: Option<&str>) -> NumericValue {
    match raw {
        Some(raw) => na.create(raw),
        None => na.from_f64(0.0),
    }
}

#[must_use]
pub fn to_attribute(na: &dyn NumberAdapter, value: &NumericValue) -> String {
    na.to_string(value)
}
