//! The configuration store.
//!
//! [`ConfigStore`] owns the merged key→value map for the lifetime of the
//! process.  Construction runs three steps, once:
//!
//! ```text
//! ConfigStore::load(file)
//!  ├─ read + parse the document     (missing / unreadable / malformed → empty map)
//!  ├─ reconcile against DEFAULTS    (keys present in the file are overwritten)
//!  └─ if anything was overwritten → rewrite the whole file
//! ```
//!
//! After that the store is read-only.  There is no setter and no reload, so
//! it can be shared behind an `Arc` without a lock.  Adding mutation later
//! requires wrapping the map in an `RwLock`.
//!
//! Construction never fails.  Every load problem degrades to an empty map and
//! a failed rewrite is logged at error level; the outcome of each step is
//! kept in a [`LoadReport`].

use std::path::PathBuf;

use gt_config_core::{
    lookup, lookup_kind, parse_document, reconcile, write_document, ConfigKey, ConfigKind,
    ConfigMap, ConfigValue, DefaultsTable, FromConfigValue, LookupError, DEFAULTS,
};
use tracing::{error, info, warn};

use crate::infrastructure::storage::{ConfigFile, FsConfigFile};

/// What happened when the persisted document was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    /// The document was read and parsed.
    Loaded,
    /// No document exists yet.
    Missing,
    /// The document exists but could not be read.
    Unreadable,
    /// The document was read but is not a JSON object.
    Malformed,
}

/// Whether the merged map was written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistStatus {
    /// Reconciliation changed nothing; the file was left alone.
    NotNeeded,
    /// The file was replaced with the merged map.
    Written,
    /// A rewrite was needed but failed.  The in-memory map is still used.
    Failed,
}

/// Outcome of [`ConfigStore`] construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub source: SourceStatus,
    /// Keys dropped because their value kind is not supported.
    pub skipped: Vec<ConfigKey>,
    /// Keys whose loaded value was replaced by the built-in default.
    pub overwritten: Vec<ConfigKey>,
    pub persist: PersistStatus,
}

impl LoadReport {
    /// `true` if reconciliation overwrote at least one key.
    pub fn is_dirty(&self) -> bool {
        !self.overwritten.is_empty()
    }
}

/// Typed, read-only configuration for the host process.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    values: ConfigMap,
    report: LoadReport,
}

impl ConfigStore {
    /// Loads the document at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::load(&FsConfigFile::new(path))
    }

    /// Loads from `file` and reconciles against [`DEFAULTS`].
    pub fn load(file: &impl ConfigFile) -> Self {
        Self::load_with_defaults(file, &DEFAULTS)
    }

    /// Loads from `file` and reconciles against `defaults`.
    ///
    /// Writes to `file` if, and only if, reconciliation overwrote a key.
    pub fn load_with_defaults(file: &impl ConfigFile, defaults: &DefaultsTable) -> Self {
        let location = file.location();
        let (mut values, source, skipped) = read_values(file);

        let overwritten = reconcile(&mut values, defaults);
        let persist = if overwritten.is_empty() {
            PersistStatus::NotNeeded
        } else {
            persist_values(file, &values, overwritten.len())
        };

        info!(
            "config file \"{location}\" loaded and ready ({} entries)",
            values.len()
        );

        Self {
            values,
            report: LoadReport {
                source,
                skipped,
                overwritten,
                persist,
            },
        }
    }

    /// Returns the value of `key` as `T`.
    ///
    /// # Errors
    ///
    /// [`LookupError::Missing`] if the key is not configured,
    /// [`LookupError::TypeMismatch`] if it holds a kind other than `T::KIND`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use gt_config::infrastructure::storage::mock::MemoryConfigFile;
    /// use gt_config::ConfigStore;
    ///
    /// let file = MemoryConfigFile::with_contents(r#"{"server.port": 9999, "server.motd": "hi"}"#);
    /// let store = ConfigStore::load(&file);
    ///
    /// assert_eq!(store.get::<u64>("server.port"), Ok(16999));
    /// assert_eq!(store.get::<&str>("server.motd"), Ok("hi"));
    /// assert!(store.get::<u64>("client.protocol").is_err());
    /// ```
    pub fn get<'a, T: FromConfigValue<'a>>(&'a self, key: &str) -> Result<T, LookupError> {
        lookup(&self.values, key)
    }

    /// Returns the stored value of `key` if it is of kind `expected`.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigStore::get`].
    pub fn get_value(&self, key: &str, expected: ConfigKind) -> Result<&ConfigValue, LookupError> {
        lookup_kind(&self.values, key, expected)
    }

    /// Returns the stored value of `key` regardless of kind.
    pub fn value(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }
}

// ── Construction steps ────────────────────────────────────────────────────────

fn read_values(file: &impl ConfigFile) -> (ConfigMap, SourceStatus, Vec<ConfigKey>) {
    let text = match file.read() {
        Ok(text) => text,
        Err(e) if e.is_not_found() => {
            info!("{e}; starting from an empty configuration");
            return (ConfigMap::new(), SourceStatus::Missing, Vec::new());
        }
        Err(e) => {
            warn!("{e}; starting from an empty configuration");
            return (ConfigMap::new(), SourceStatus::Unreadable, Vec::new());
        }
    };

    match parse_document(&text) {
        Ok(parsed) => (parsed.values, SourceStatus::Loaded, parsed.skipped),
        Err(e) => {
            warn!(
                "ignoring config file \"{}\": {e}; starting from an empty configuration",
                file.location()
            );
            (ConfigMap::new(), SourceStatus::Malformed, Vec::new())
        }
    }
}

fn persist_values(file: &impl ConfigFile, values: &ConfigMap, overwritten: usize) -> PersistStatus {
    let bytes = match write_document(values) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("failed to serialize config for \"{}\": {e}", file.location());
            return PersistStatus::Failed;
        }
    };

    match file.write(&bytes) {
        Ok(()) => {
            info!(
                "applied {overwritten} default value(s) and rewrote \"{}\"",
                file.location()
            );
            PersistStatus::Written
        }
        Err(e) => {
            error!("failed to persist config defaults, file and memory now differ: {e}");
            PersistStatus::Failed
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::mock::MemoryConfigFile;
    use gt_config_core::{parse_document, DefaultEntry, DefaultValue};
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Log sink shared between a test and its `fmt` subscriber.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().expect("lock poisoned")).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("lock poisoned").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn load_capturing_logs(file: &MemoryConfigFile) -> (ConfigStore, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let store = tracing::subscriber::with_default(subscriber, || ConfigStore::load(file));
        (store, logs.text())
    }

    fn written_values(file: &MemoryConfigFile) -> ConfigMap {
        let text = file.contents().expect("document present");
        parse_document(&text).expect("written document parses").values
    }

    // ── Load ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_missing_file_yields_empty_store_and_no_write() {
        // Arrange
        let file = MemoryConfigFile::new();

        // Act
        let store = ConfigStore::load(&file);

        // Assert
        assert!(store.is_empty());
        assert_eq!(store.report().source, SourceStatus::Missing);
        assert_eq!(store.report().persist, PersistStatus::NotNeeded);
        assert_eq!(file.write_count(), 0);
        assert!(file.contents().is_none(), "no file must be created");
    }

    #[test]
    fn test_missing_file_leaves_every_default_key_absent() {
        let store = ConfigStore::load(&MemoryConfigFile::new());

        for entry in DEFAULTS.iter() {
            assert_eq!(
                store.get_value(entry.key, entry.value.kind()),
                Err(LookupError::Missing {
                    key: entry.key.to_string()
                })
            );
        }
    }

    #[test]
    fn test_unreadable_file_yields_empty_store() {
        let file = MemoryConfigFile::with_contents(r#"{"server.port": 1}"#).failing_reads();

        let store = ConfigStore::load(&file);

        assert!(store.is_empty());
        assert_eq!(store.report().source, SourceStatus::Unreadable);
        assert_eq!(file.write_count(), 0);
    }

    #[test]
    fn test_malformed_document_yields_empty_store_and_is_not_overwritten() {
        // Arrange
        let file = MemoryConfigFile::with_contents("{ \"server.port\": 99");

        // Act
        let store = ConfigStore::load(&file);

        // Assert
        assert!(store.is_empty());
        assert_eq!(store.report().source, SourceStatus::Malformed);
        assert_eq!(file.write_count(), 0);
        assert_eq!(file.contents().as_deref(), Some("{ \"server.port\": 99"));
    }

    #[test]
    fn test_unsupported_values_are_skipped_without_aborting_load() {
        // Arrange
        let file = MemoryConfigFile::with_contents(
            r#"{"a.rate": 0.5, "b.list": [1], "c.flag": true, "d.name": "x", "e.none": null}"#,
        );

        // Act
        let store = ConfigStore::load(&file);

        // Assert
        assert_eq!(store.len(), 2);
        assert_eq!(store.get::<bool>("c.flag"), Ok(true));
        assert_eq!(store.get::<&str>("d.name"), Ok("x"));
        assert!(!store.contains("a.rate"));
        assert_eq!(store.report().skipped, vec!["a.rate", "b.list", "e.none"]);
        assert_eq!(file.write_count(), 0);
    }

    // ── Reconciliation + persistence ──────────────────────────────────────────

    #[test]
    fn test_present_default_key_is_clobbered_and_persisted() {
        // Arrange
        let file = MemoryConfigFile::with_contents(r#"{"server.port": 9999}"#);

        // Act
        let store = ConfigStore::load(&file);

        // Assert
        assert_eq!(store.get::<u64>("server.port"), Ok(16999));
        assert_eq!(store.report().overwritten, vec!["server.port"]);
        assert!(store.report().is_dirty());
        assert_eq!(store.report().persist, PersistStatus::Written);
        assert_eq!(file.write_count(), 1);
        assert_eq!(
            written_values(&file).get("server.port"),
            Some(&ConfigValue::Unsigned(16999))
        );
    }

    #[test]
    fn test_missing_default_keys_stay_missing_after_clobber() {
        let file = MemoryConfigFile::with_contents(r#"{"server.port": 9999}"#);

        let store = ConfigStore::load(&file);

        assert!(matches!(
            store.get::<&str>("server.address"),
            Err(LookupError::Missing { .. })
        ));
        assert_eq!(written_values(&file).len(), 1);
    }

    #[test]
    fn test_foreign_keys_only_cause_no_rewrite() {
        // Arrange
        let original = r#"{"server.motd": "welcome", "world.gravity": -10}"#;
        let file = MemoryConfigFile::with_contents(original);

        // Act
        let store = ConfigStore::load(&file);

        // Assert
        assert_eq!(store.get::<&str>("server.motd"), Ok("welcome"));
        assert_eq!(store.get::<i64>("world.gravity"), Ok(-10));
        assert_eq!(store.report().persist, PersistStatus::NotNeeded);
        assert_eq!(file.write_count(), 0);
        assert_eq!(file.contents().as_deref(), Some(original));
    }

    #[test]
    fn test_foreign_keys_are_reemitted_on_rewrite() {
        // Arrange
        let file = MemoryConfigFile::with_contents(
            r#"{"client.protocol": 1, "server.motd": "welcome", "world.pvp": false}"#,
        );

        // Act
        ConfigStore::load(&file);

        // Assert
        let written = written_values(&file);
        assert_eq!(written.get("client.protocol"), Some(&ConfigValue::Unsigned(192)));
        assert_eq!(written.get("server.motd"), Some(&ConfigValue::from("welcome")));
        assert_eq!(written.get("world.pvp"), Some(&ConfigValue::Bool(false)));
        assert_eq!(written.len(), 3);
    }

    #[test]
    fn test_skipped_values_are_not_reemitted_on_rewrite() {
        let file = MemoryConfigFile::with_contents(r#"{"server.port": 1, "world.rate": 1.5}"#);

        ConfigStore::load(&file);

        assert!(!written_values(&file).contains_key("world.rate"));
    }

    #[test]
    fn test_write_failure_keeps_in_memory_values() {
        // Arrange
        let file = MemoryConfigFile::with_contents(r#"{"server.address": "localhost"}"#)
            .failing_writes();

        // Act
        let store = ConfigStore::load(&file);

        // Assert
        assert_eq!(store.report().persist, PersistStatus::Failed);
        assert_eq!(store.get::<&str>("server.address"), Ok("www.growtopia1.com"));
        assert_eq!(
            file.contents().as_deref(),
            Some(r#"{"server.address": "localhost"}"#)
        );
    }

    #[test]
    fn test_write_failure_is_logged_at_error_level() {
        // Arrange
        let file = MemoryConfigFile::with_contents(r#"{"server.port": 9999}"#).failing_writes();

        // Act
        let (store, logs) = load_capturing_logs(&file);

        // Assert
        assert_eq!(store.report().persist, PersistStatus::Failed);
        let line = logs
            .lines()
            .find(|line| line.contains("failed to persist config defaults"))
            .unwrap_or_else(|| panic!("no write-failure line in logs:\n{logs}"));
        assert!(line.contains("ERROR"), "got {line}");
        assert!(line.contains("write denied"), "got {line}");
    }

    #[test]
    fn test_successful_load_logs_no_errors() {
        let file = MemoryConfigFile::with_contents(r#"{"server.port": 9999}"#);

        let (_, logs) = load_capturing_logs(&file);

        assert!(!logs.contains("ERROR"), "got {logs}");
        assert!(logs.contains("loaded and ready"), "got {logs}");
    }

    #[test]
    fn test_document_with_byte_order_mark_is_loaded_and_reconciled() {
        // Arrange
        let file = MemoryConfigFile::with_contents(
            "\u{feff}{\"server.port\": 9999, \"server.motd\": \"hi\"}",
        );

        // Act
        let store = ConfigStore::load(&file);

        // Assert
        assert_eq!(store.report().source, SourceStatus::Loaded);
        assert_eq!(store.get::<u64>("server.port"), Ok(16999));
        assert_eq!(store.get::<&str>("server.motd"), Ok("hi"));
        assert_eq!(file.write_count(), 1);
        assert!(!file.contents().expect("rewritten").starts_with('\u{feff}'));
    }

    #[test]
    fn test_second_load_keeps_clobbered_values() {
        // Arrange
        let file = MemoryConfigFile::with_contents(r#"{"client.game_version": "9.99"}"#);
        ConfigStore::load(&file);
        let after_first = file.contents();

        // Act
        let second = ConfigStore::load(&file);

        // Assert
        assert_eq!(second.get::<&str>("client.game_version"), Ok("4.35"));
        assert_eq!(file.contents(), after_first, "document must not change");
    }

    #[test]
    fn test_custom_defaults_table() {
        // Arrange
        static TABLE: DefaultsTable = DefaultsTable::new(&[DefaultEntry {
            key: "world.pvp",
            value: DefaultValue::Bool(false),
        }]);
        let file = MemoryConfigFile::with_contents(r#"{"world.pvp": true, "server.port": 1}"#);

        // Act
        let store = ConfigStore::load_with_defaults(&file, &TABLE);

        // Assert
        assert_eq!(store.get::<bool>("world.pvp"), Ok(false));
        assert_eq!(store.get::<u64>("server.port"), Ok(1), "not in this table");
    }

    // ── Typed access ──────────────────────────────────────────────────────────

    #[test]
    fn test_type_mismatch_is_distinct_from_missing() {
        let file = MemoryConfigFile::with_contents(r#"{"server.port": 1}"#);
        let store = ConfigStore::load(&file);

        assert_eq!(
            store.get::<String>("server.port"),
            Err(LookupError::TypeMismatch {
                key: "server.port".to_string(),
                expected: ConfigKind::String,
                found: ConfigKind::Unsigned,
            })
        );
        assert_eq!(
            store.get::<String>("server.motd"),
            Err(LookupError::Missing {
                key: "server.motd".to_string()
            })
        );
    }

    #[test]
    fn test_get_value_checks_kind() {
        let file = MemoryConfigFile::with_contents(r#"{"world.gravity": -3}"#);
        let store = ConfigStore::load(&file);

        assert_eq!(
            store.get_value("world.gravity", ConfigKind::Integer),
            Ok(&ConfigValue::Integer(-3))
        );
        assert!(store.get_value("world.gravity", ConfigKind::Unsigned).is_err());
        assert_eq!(store.value("world.gravity"), Some(&ConfigValue::Integer(-3)));
    }

    #[test]
    fn test_iter_is_sorted_by_key() {
        let file = MemoryConfigFile::with_contents(r#"{"z": 1, "a": 2, "m": 3}"#);
        let store = ConfigStore::load(&file);

        let keys: Vec<&str> = store.iter().map(|(key, _)| key).collect();

        assert_eq!(keys, vec!["a", "m", "z"]);
    }

    #[test]
    fn test_store_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConfigStore>();
    }
}
