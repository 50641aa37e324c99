//! Storage infrastructure: configuration file persistence.
//!
//! The store never touches `std::fs` directly.  It talks to a [`ConfigFile`],
//! which reads or replaces the whole document in one call:
//!
//! - [`FsConfigFile`] is the production adapter over a path on disk.
//! - [`mock::MemoryConfigFile`] keeps the document in memory for tests and
//!   can be told to fail reads or writes.
//!
//! # Testability
//!
//! Keeping file access behind a trait lets unit tests assert how many times
//! the store wrote, and what it wrote, without a temporary directory.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod mock;

/// Well-known name of the persisted configuration file, resolved against the
/// process working directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Error type for configuration file access.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The file does not exist.
    #[error("config file not found at {location}")]
    NotFound { location: String },

    /// Any other I/O failure (permissions, disk full, ...).
    #[error("I/O error accessing config at {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    /// Returns `true` for [`StorageError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

/// Whole-document access to a persisted configuration file.
pub trait ConfigFile {
    /// Human-readable location used in log lines and errors.
    fn location(&self) -> String;

    /// Reads the entire document as UTF-8 text.
    fn read(&self) -> Result<String, StorageError>;

    /// Replaces the entire document with `contents`.
    fn write(&self, contents: &[u8]) -> Result<(), StorageError>;
}

/// [`ConfigFile`] backed by a path on the local file system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsConfigFile {
    path: PathBuf,
}

impl FsConfigFile {
    /// Creates an adapter for `path`.  Nothing is opened until the first read.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Adapter for [`CONFIG_FILE_NAME`] in the current working directory.
    pub fn in_working_dir() -> Self {
        Self::new(CONFIG_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file the new document is written to before it replaces
    /// the real one, e.g. `config.json.tmp`.
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from(CONFIG_FILE_NAME));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ConfigFile for FsConfigFile {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> Result<String, StorageError> {
        std::fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                StorageError::NotFound {
                    location: self.location(),
                }
            } else {
                StorageError::Io {
                    location: self.location(),
                    source,
                }
            }
        })
    }

    fn write(&self, contents: &[u8]) -> Result<(), StorageError> {
        // Ensure directory exists before writing.
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| StorageError::Io {
                location: dir.display().to_string(),
                source,
            })?;
        }

        // Write a sibling temp file and rename it over the target, so a failed
        // write never leaves a truncated document behind.
        let tmp_path = self.temp_path();
        if let Err(source) = std::fs::write(&tmp_path, contents) {
            std::fs::remove_file(&tmp_path).ok();
            return Err(StorageError::Io {
                location: tmp_path.display().to_string(),
                source,
            });
        }

        std::fs::rename(&tmp_path, &self.path).map_err(|source| {
            std::fs::remove_file(&tmp_path).ok();
            StorageError::Io {
                location: self.location(),
                source,
            }
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
