//! Application layer: the configuration store.
//!
//! Orchestrates the pure pieces from `gt_config_core` (document codec,
//! reconciliation) around a [`crate::infrastructure::storage::ConfigFile`]
//! supplied by the caller.

pub mod store;
