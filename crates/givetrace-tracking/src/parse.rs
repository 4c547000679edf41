//! QR payload parsing
//!
//! Scanned codes on the platform are either JSON objects (package labels,
//! donation receipts) or bare text codes. Parsing is deliberately lenient:
//! anything that is not a JSON object is kept verbatim as text.

use givetrace_core::{Error, Result};
use serde_json::{Map, Value};

/// A decoded QR payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedScan {
    /// JSON object payload, e.g. a package label
    Structured(Map<String, Value>),
    /// Bare text code
    Text(String),
}

impl ParsedScan {
    /// The scan's primary reference, when one can be identified: the `id`,
    /// `code`, or `reference` field of a structured payload, or the text
    /// itself for a bare code.
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::Structured(map) => ["id", "code", "reference"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str)),
            Self::Text(text) => Some(text),
        }
    }
}

/// Decode a raw scanned payload.
pub fn parse_scan_data(raw: &str) -> Result<ParsedScan> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidScan("empty payload".to_string()));
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => Ok(ParsedScan::Structured(map)),
        _ => Ok(ParsedScan::Text(trimmed.to_string())),
    }
}
