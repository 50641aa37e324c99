//! In-memory config file for unit testing.
//!
//! Allows tests to seed a document, count writes, and inject read or write
//! failures without touching the file system.

use std::io::{Error, ErrorKind};
use std::sync::Mutex;

use super::{ConfigFile, StorageError};

const LOCATION: &str = "memory://config.json";

/// A mock implementation of [`ConfigFile`] that keeps the document in memory.
#[derive(Debug, Default)]
pub struct MemoryConfigFile {
    contents: Mutex<Option<String>>,
    write_count: Mutex<u32>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryConfigFile {
    /// Creates a mock with no document; reads report "not found".
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock holding `text`.
    pub fn with_contents(text: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(text.into())),
            ..Self::default()
        }
    }

    /// Makes every read fail with a permission error.
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Makes every write fail with a permission error.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Returns the current document, if any.
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().expect("lock poisoned").clone()
    }

    /// Returns the number of successful writes.
    pub fn write_count(&self) -> u32 {
        *self.write_count.lock().expect("lock poisoned")
    }
}

impl ConfigFile for MemoryConfigFile {
    fn location(&self) -> String {
        LOCATION.to_string()
    }

    fn read(&self) -> Result<String, StorageError> {
        if self.fail_reads {
            return Err(StorageError::Io {
                location: self.location(),
                source: Error::new(ErrorKind::PermissionDenied, "read denied"),
            });
        }

        self.contents
            .lock()
            .expect("lock poisoned")
            .clone()
            .ok_or_else(|| StorageError::NotFound {
                location: self.location(),
            })
    }

    fn write(&self, contents: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Io {
                location: self.location(),
                source: Error::new(ErrorKind::PermissionDenied, "write denied"),
            });
        }

        let text = String::from_utf8(contents.to_vec()).map_err(|e| StorageError::Io {
            location: self.location(),
            source: Error::new(ErrorKind::InvalidData, e),
        })?;
        *self.contents.lock().expect("lock poisoned") = Some(text);
        *self.write_count.lock().expect("lock poisoned") += 1;
        Ok(())
    }
}
