//! Built-in defaults table.
//!
//! [`DEFAULTS`] lists every key the host application expects together with
//! its fallback value.  The table is a `static` built from `const` data: it is
//! never mutated and never written to disk on its own.
//!
//! | Key                   | Kind             | Default              |
//! |-----------------------|------------------|----------------------|
//! | `server.port`         | unsigned integer | `16999`              |
//! | `server.address`      | string           | `www.growtopia1.com` |
//! | `client.game_version` | string           | `4.35`               |
//! | `client.protocol`     | unsigned integer | `192`                |

use crate::domain::value::{ConfigKind, ConfigMap, ConfigValue};

/// A default value.
///
/// Mirrors [`ConfigValue`] but borrows its string from static data so the
/// whole table can be built at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Integer(i64),
    Unsigned(u64),
    String(&'static str),
    Bool(bool),
}

impl DefaultValue {
    /// Returns the kind of the value this default produces.
    pub fn kind(&self) -> ConfigKind {
        match self {
            DefaultValue::Integer(_) => ConfigKind::Integer,
            DefaultValue::Unsigned(_) => ConfigKind::Unsigned,
            DefaultValue::String(_) => ConfigKind::String,
            DefaultValue::Bool(_) => ConfigKind::Bool,
        }
    }

    /// Builds the owned [`ConfigValue`] for this default.
    pub fn to_value(&self) -> ConfigValue {
        match *self {
            DefaultValue::Integer(v) => ConfigValue::Integer(v),
            DefaultValue::Unsigned(v) => ConfigValue::Unsigned(v),
            DefaultValue::String(v) => ConfigValue::String(v.to_string()),
            DefaultValue::Bool(v) => ConfigValue::Bool(v),
        }
    }
}

/// One row of a [`DefaultsTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultEntry {
    pub key: &'static str,
    pub value: DefaultValue,
}

/// An immutable list of default entries.
///
/// Keys are expected to be unique; [`DefaultsTable::get`] returns the first
/// match.
#[derive(Debug, Clone, Copy)]
pub struct DefaultsTable {
    entries: &'static [DefaultEntry],
}

impl DefaultsTable {
    /// Wraps a static slice of entries.
    pub const fn new(entries: &'static [DefaultEntry]) -> Self {
        Self { entries }
    }

    /// Iterates over the entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &'static DefaultEntry> {
        self.entries.iter()
    }

    /// Returns the entry for `key`, if the table has one.
    pub fn get(&self, key: &str) -> Option<&'static DefaultEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    /// Returns `true` if the table has an entry for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Materialises the table as an owned [`ConfigMap`].
    pub fn to_map(&self) -> ConfigMap {
        self.iter()
            .map(|entry| (entry.key.to_string(), entry.value.to_value()))
            .collect()
    }
}

/// Every key the host application reads, with its default value.
pub static DEFAULTS: DefaultsTable = DefaultsTable::new(&[
    DefaultEntry {
        key: "server.port",
        value: DefaultValue::Unsigned(16999),
    },
    DefaultEntry {
        key: "server.address",
        value: DefaultValue::String("www.growtopia1.com"),
    },
    DefaultEntry {
        key: "client.game_version",
        value: DefaultValue::String("4.35"),
    },
    DefaultEntry {
        key: "client.protocol",
        value: DefaultValue::Unsigned(192),
    },
]);

// ── Tests ─────────────────────────────────────────────────────────────────────
