//! JSON codec for the persisted configuration document.
//!
//! Document shape:
//! ```json
//! {
//!     "client.game_version": "4.35",
//!     "server.port": 16999
//! }
//! ```
//!
//! Load-time mapping, one JSON member at a time:
//!
//! | JSON value                 | [`ConfigValue`] |
//! |----------------------------|-----------------|
//! | non-negative integer       | `Unsigned(u64)` |
//! | negative integer           | `Integer(i64)`  |
//! | string                     | `String`        |
//! | `true` / `false`           | `Bool`          |
//! | float, null, array, object | skipped         |
//!
//! JSON has a single number type, so a signed value that happens to be
//! non-negative is written as a plain number and reads back as `Unsigned`.
//!
//! Output is pretty-printed with a 4-space indent and a trailing newline.
//! Keys come out sorted because [`ConfigMap`] is ordered.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::domain::value::{ConfigKey, ConfigMap, ConfigValue};

const INDENT: &[u8] = b"    ";

/// Byte order mark some Windows editors put at the start of UTF-8 files.
const BOM: char = '\u{feff}';

/// Error type for document parsing and serialization.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The text is not valid JSON.
    #[error("failed to parse config JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// The text is valid JSON but the top-level value is not an object.
    #[error("config document must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    /// The map could not be written as JSON.
    #[error("failed to serialize config JSON: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Result of parsing a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    /// Members whose values were one of the four supported kinds.
    pub values: ConfigMap,
    /// Keys whose values were of an unsupported kind and were dropped.
    pub skipped: Vec<ConfigKey>,
}

/// Parses `text` as a flat JSON object.
///
/// A leading UTF-8 byte order mark is ignored.
///
/// Members of an unsupported kind are skipped and listed in
/// [`ParsedDocument::skipped`]; they never cause an error.
///
/// # Errors
///
/// Returns [`DocumentError::Parse`] for invalid JSON and
/// [`DocumentError::NotAnObject`] when the top-level value is not an object.
pub fn parse_document(text: &str) -> Result<ParsedDocument, DocumentError> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let root: Value = serde_json::from_str(text).map_err(DocumentError::Parse)?;

    let members = match root {
        Value::Object(members) => members,
        other => {
            return Err(DocumentError::NotAnObject {
                found: json_type_name(&other),
            })
        }
    };

    let mut parsed = ParsedDocument::default();
    for (key, value) in members {
        let found = json_type_name(&value);
        match value_from_json(value) {
            Some(value) => {
                parsed.values.insert(key, value);
            }
            None => {
                debug!("skipping config key {key}: unsupported value kind {found}");
                parsed.skipped.push(key);
            }
        }
    }

    Ok(parsed)
}

/// Serializes `map` into document bytes, replacing the whole file content.
///
/// # Errors
///
/// Returns [`DocumentError::Serialize`] if the JSON writer fails.
pub fn write_document(map: &ConfigMap) -> Result<Vec<u8>, DocumentError> {
    let members: Map<String, Value> = map
        .iter()
        .map(|(key, value)| (key.clone(), value_to_json(value)))
        .collect();

    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    Value::Object(members)
        .serialize(&mut serializer)
        .map_err(DocumentError::Serialize)?;
    buf.push(b'\n');

    Ok(buf)
}

// ── Value mapping ─────────────────────────────────────────────────────────────

/// Converts one JSON member value.  `None` means "unsupported kind".
fn value_from_json(value: Value) -> Option<ConfigValue> {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                Some(ConfigValue::Unsigned(v))
            } else {
                n.as_i64().map(ConfigValue::Integer)
            }
        }
        Value::String(v) => Some(ConfigValue::String(v)),
        Value::Bool(v) => Some(ConfigValue::Bool(v)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn value_to_json(value: &ConfigValue) -> Value {
    match value {
        ConfigValue::Integer(v) => Value::from(*v),
        ConfigValue::Unsigned(v) => Value::from(*v),
        ConfigValue::String(v) => Value::from(v.as_str()),
        ConfigValue::Bool(v) => Value::from(*v),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
