//! Core domain logic for the address book manager.
//! This crate is the single source of truth for contact and book invariants.

pub mod book;
pub mod config;
pub mod logging;
pub mod model;
pub mod registry;
pub mod storage;

pub use book::{AddressBook, EditOutcome, LoadStatus, StoreError, StoreResult, UpsertOutcome};
pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contact::{Contact, ContactRecord, ContactValueError};
pub use model::field::{ContactField, FieldParseError, SearchField};
pub use registry::{AddressBookRegistry, RegistryError, RegistryResult, SearchHit};
pub use storage::{
    BookStorage, JsonFileStorage, MemoryStorage, StorageError, StorageResult, StoredBook,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
