//! Domain entities for GT-Config.
//!
//! This module contains the configuration value model and the merge rules
//! with no file-system or format dependencies.  Everything here can be
//! unit-tested without touching disk.

/// Typed configuration values and the key→value map.
pub mod value;

/// The built-in, compile-time defaults table.
pub mod defaults;

/// Reconciliation of a loaded map against the defaults table.
pub mod reconcile;
