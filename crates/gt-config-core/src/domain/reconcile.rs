//! Reconciliation of a loaded map against the defaults table.
//!
//! For each entry of the table:
//!
//! - key absent from the map: left absent, nothing recorded;
//! - key present in the map: the stored value is replaced by the default and
//!   the key is recorded as overwritten.
//!
//! This is the reverse of a "fill in missing keys" merge.  Only keys the file
//! already defines are touched, and those always end up holding the built-in
//! default, whatever the file said.  A non-empty result means the in-memory
//! map no longer matches the file and the file must be rewritten.

use tracing::debug;

use crate::domain::defaults::DefaultsTable;
use crate::domain::value::{ConfigKey, ConfigMap};

/// Applies `defaults` to `map` and returns the keys that were overwritten,
/// in table order.
///
/// Keys in `map` that the table does not know about are never touched.
pub fn reconcile(map: &mut ConfigMap, defaults: &DefaultsTable) -> Vec<ConfigKey> {
    let mut overwritten = Vec::new();

    for entry in defaults.iter() {
        let Some(slot) = map.get_mut(entry.key) else {
            continue;
        };

        let value = entry.value.to_value();
        if *slot != value {
            debug!("overwriting {} = {slot} with default {value}", entry.key);
        }
        *slot = value;
        overwritten.push(entry.key.to_string());
    }

    overwritten
}

// ── Tests ─────────────────────────────────────────────────────────────────────
