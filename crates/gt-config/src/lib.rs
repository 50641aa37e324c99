//! gt-config library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.

pub mod application;
pub mod infrastructure;

pub use application::store::{ConfigStore, LoadReport, PersistStatus, SourceStatus};
pub use gt_config_core::{
    ConfigKey, ConfigKind, ConfigMap, ConfigValue, DefaultsTable, FromConfigValue, LookupError,
    DEFAULTS,
};
pub use infrastructure::storage::{ConfigFile, FsConfigFile, StorageError, CONFIG_FILE_NAME};
