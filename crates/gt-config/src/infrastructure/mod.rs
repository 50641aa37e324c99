//! Infrastructure layer for gt-config.
//!
//! Contains the file-system adapter the store reads from and writes to.
//!
//! **Dependency rule**: this layer may depend on `gt_config_core`, but MUST
//! NOT import from `application`.

pub mod storage;
