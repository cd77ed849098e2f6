//! Runtime configuration for the core.
//!
//! # Responsibility
//! - Hold the data directory and logging settings resolved by the front end.
//! - Build the storage backend and registry described by the settings.
//!
//! # Invariants
//! - `data_dir = None` means books are never read from or written to disk.

use crate::logging::{default_log_level, init_logging};
use crate::registry::AddressBookRegistry;
use crate::storage::{BookStorage, JsonFileStorage};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Book file directory, or `None` for in-memory books.
    pub data_dir: Option<PathBuf>,
    pub log_level: String,
    /// Log directory, or `None` to leave logging uninitialized.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            data_dir: Some(PathBuf::from(".")),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Storage backend for the configured data directory.
    pub fn storage(&self) -> Option<Arc<dyn BookStorage>> {
        self.data_dir
            .as_ref()
            .map(|dir| Arc::new(JsonFileStorage::new(dir.clone())) as Arc<dyn BookStorage>)
    }

    /// Creates an empty registry wired to the configured storage.
    pub fn open_registry(&self) -> AddressBookRegistry {
        match self.storage() {
            Some(storage) => AddressBookRegistry::with_storage(storage),
            None => AddressBookRegistry::new(),
        }
    }

    /// Starts file logging when a log directory is configured.
    ///
    /// Returns `Ok(false)` when logging is not configured.
    ///
    /// # Errors
    /// - Propagates `init_logging` errors (bad level, relative or unusable
    ///   directory, conflicting re-initialization).
    pub fn init_logging(&self) -> Result<bool, String> {
        let Some(dir) = self.log_dir.as_ref() else {
            return Ok(false);
        };
        let dir = dir
            .to_str()
            .ok_or_else(|| format!("log_dir is not valid UTF-8: `{}`", dir.display()))?;
        init_logging(&self.log_level, dir)?;
        Ok(true)
    }
}
