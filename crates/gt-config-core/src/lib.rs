//! # gt-config-core
//!
//! Shared library for GT-Config containing the typed configuration value
//! model, the built-in defaults table, the reconciliation pass, and the JSON
//! document codec.
//!
//! This crate performs no I/O.  Reading and writing the persisted file is the
//! job of the `gt-config` crate, which owns the `ConfigStore`.
//!
//! # Architecture overview
//!
//! A host application (a game server) reads a handful of typed settings at
//! startup: the port it listens on, the address it advertises, the client
//! version and protocol it accepts.  Those settings live in a flat JSON file
//! next to the server binary.
//!
//! - **`domain`** – The value model.  A [`ConfigValue`] is one of exactly four
//!   primitive kinds; a [`ConfigMap`] maps opaque string keys to values; the
//!   [`DEFAULTS`] table lists every key the host expects.  The
//!   [`reconcile`] pass merges a loaded map against that table.
//!
//! - **`document`** – How a [`ConfigMap`] travels to and from disk.  Text is
//!   parsed into a map (values of unknown kinds are skipped) and a map is
//!   serialized back into pretty-printed JSON.

pub mod document;
pub mod domain;

pub use document::codec::{parse_document, write_document, DocumentError, ParsedDocument};
pub use domain::defaults::{DefaultEntry, DefaultValue, DefaultsTable, DEFAULTS};
pub use domain::reconcile::reconcile;
pub use domain::value::{
    lookup, lookup_kind, ConfigKey, ConfigKind, ConfigMap, ConfigValue, FromConfigValue,
    LookupError,
};
