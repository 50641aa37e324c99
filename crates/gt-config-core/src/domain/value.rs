//! Typed configuration values.
//!
//! A configuration value is one of exactly four primitive kinds.  There is
//! no nesting, no array, and no null: anything else found in a document is
//! dropped at load time (see [`crate::document::codec`]).
//!
//! Keys are plain strings.  By convention they are dot-namespaced
//! (`server.port`, `client.protocol`) but the store never interprets the
//! dots; `server.port` and `server` are unrelated keys.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Identifier of a single configuration setting, e.g. `"server.port"`.
pub type ConfigKey = String;

/// The full set of key→value pairs held by a store.
///
/// A `BTreeMap` keeps iteration (and therefore the written file) in a stable,
/// sorted key order.
pub type ConfigMap = BTreeMap<ConfigKey, ConfigValue>;

/// A single configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConfigValue {
    /// Signed integer.
    Integer(i64),
    /// Unsigned integer.
    Unsigned(u64),
    /// UTF-8 string.
    String(String),
    /// Boolean flag.
    Bool(bool),
}

/// The kind (variant tag) of a [`ConfigValue`], without its payload.
///
/// Callers name the kind they expect when reading a value so the store can
/// tell "not configured" apart from "configured with the wrong type".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKind {
    Integer,
    Unsigned,
    String,
    Bool,
}

impl ConfigValue {
    /// Returns the kind of this value.
    pub fn kind(&self) -> ConfigKind {
        match self {
            ConfigValue::Integer(_) => ConfigKind::Integer,
            ConfigValue::Unsigned(_) => ConfigKind::Unsigned,
            ConfigValue::String(_) => ConfigKind::String,
            ConfigValue::Bool(_) => ConfigKind::Bool,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Integer(v) => write!(f, "{v}"),
            ConfigValue::Unsigned(v) => write!(f, "{v}"),
            ConfigValue::String(v) => write!(f, "\"{v}\""),
            ConfigValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigKind::Integer => "signed integer",
            ConfigKind::Unsigned => "unsigned integer",
            ConfigKind::String => "string",
            ConfigKind::Bool => "boolean",
        };
        f.write_str(name)
    }
}

impl From<i64> for ConfigValue {
    fn from(v: i64) -> Self {
        ConfigValue::Integer(v)
    }
}

impl From<u64> for ConfigValue {
    fn from(v: u64) -> Self {
        ConfigValue::Unsigned(v)
    }
}

impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        ConfigValue::String(v)
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        ConfigValue::String(v.to_string())
    }
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        ConfigValue::Bool(v)
    }
}

// ── Typed extraction ──────────────────────────────────────────────────────────

/// Error returned by a typed lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    /// The key is not present in the map.
    #[error("configuration key not found: {key}")]
    Missing { key: ConfigKey },

    /// The key is present but holds a different kind than requested.
    #[error("configuration key {key} has type {found}, expected {expected}")]
    TypeMismatch {
        key: ConfigKey,
        expected: ConfigKind,
        found: ConfigKind,
    },
}

/// Rust types that can be read out of a [`ConfigValue`] of one fixed kind.
///
/// The lifetime lets `&str` borrow directly from the stored string.
pub trait FromConfigValue<'a>: Sized {
    /// The only kind this type can be extracted from.
    const KIND: ConfigKind;

    /// Extracts `Self` if `value` is of kind [`Self::KIND`].
    fn from_config_value(value: &'a ConfigValue) -> Option<Self>;
}

impl<'a> FromConfigValue<'a> for i64 {
    const KIND: ConfigKind = ConfigKind::Integer;

    fn from_config_value(value: &'a ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

impl<'a> FromConfigValue<'a> for u64 {
    const KIND: ConfigKind = ConfigKind::Unsigned;

    fn from_config_value(value: &'a ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Unsigned(v) => Some(*v),
            _ => None,
        }
    }
}

impl<'a> FromConfigValue<'a> for bool {
    const KIND: ConfigKind = ConfigKind::Bool;

    fn from_config_value(value: &'a ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl<'a> FromConfigValue<'a> for &'a str {
    const KIND: ConfigKind = ConfigKind::String;

    fn from_config_value(value: &'a ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::String(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl<'a> FromConfigValue<'a> for String {
    const KIND: ConfigKind = ConfigKind::String;

    fn from_config_value(value: &'a ConfigValue) -> Option<Self> {
        <&'a str as FromConfigValue<'a>>::from_config_value(value).map(str::to_string)
    }
}

/// Looks up `key` in `map` and checks that it holds a value of `expected` kind.
///
/// # Errors
///
/// Returns [`LookupError::Missing`] if the key is absent and
/// [`LookupError::TypeMismatch`] if it holds a different kind.
pub fn lookup_kind<'a>(
    map: &'a ConfigMap,
    key: &str,
    expected: ConfigKind,
) -> Result<&'a ConfigValue, LookupError> {
    let value = map.get(key).ok_or_else(|| LookupError::Missing {
        key: key.to_string(),
    })?;

    if value.kind() != expected {
        return Err(LookupError::TypeMismatch {
            key: key.to_string(),
            expected,
            found: value.kind(),
        });
    }
    Ok(value)
}

/// Looks up `key` in `map` and extracts it as `T`.
///
/// # Errors
///
/// Same as [`lookup_kind`] with `expected = T::KIND`.
pub fn lookup<'a, T: FromConfigValue<'a>>(
    map: &'a ConfigMap,
    key: &str,
) -> Result<T, LookupError> {
    let value = lookup_kind(map, key, T::KIND)?;
    T::from_config_value(value).ok_or_else(|| LookupError::TypeMismatch {
        key: key.to_string(),
        expected: T::KIND,
        found: value.kind(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
