//! Document format for the persisted configuration file.
//!
//! The file is a single flat JSON object.  See [`codec`] for the exact
//! mapping between JSON values and [`crate::ConfigValue`] variants.

pub mod codec;
