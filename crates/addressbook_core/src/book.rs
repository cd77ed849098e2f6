//! Address book: one named, first-name-keyed collection of contacts.
//!
//! # Responsibility
//! - Provide upsert/edit/delete/list/sort over one book.
//! - Load from and save to the configured `BookStorage` after every mutation.
//!
//! # Invariants
//! - At most one contact per `first_name`; upsert on an existing key replaces
//!   every field of the stored contact (last write wins).
//! - Listing order is insertion order; overwrites and renames keep position.
//! - A failed load leaves the book empty and never blocks later mutations;
//!   the first successful save replaces the unreadable data.
//! - Persistence failures are reported after the in-memory change is applied.

use crate::model::contact::{Contact, ContactValueError};
use crate::model::field::{ContactField, FieldParseError};
use crate::storage::{BookStorage, StorageError, StoredBook};
use indexmap::IndexMap;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type StoreResult<T> = Result<T, StoreError>;

/// Address book operation error.
#[derive(Debug)]
pub enum StoreError {
    /// No contact is stored under `key`.
    NotFound { book: String, key: String },
    /// Field name does not name a contact field.
    InvalidField(FieldParseError),
    /// Field value failed integer parsing.
    InvalidValue(ContactValueError),
    /// Renaming a contact onto a key that is already taken.
    KeyConflict { book: String, key: String },
    /// Listing requested on a book without contacts.
    NoContacts(String),
    /// Backing data could not be decoded; the book was reset to empty.
    MalformedPersistedData(StorageError),
    /// Any other persistence failure.
    Storage(StorageError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { book, key } => {
                write!(f, "contact `{key}` not found in address book `{book}`")
            }
            Self::InvalidField(err) => write!(f, "invalid choice: {err}"),
            Self::InvalidValue(err) => write!(f, "{err}"),
            Self::KeyConflict { book, key } => {
                write!(f, "contact `{key}` already exists in address book `{book}`")
            }
            Self::NoContacts(book) => write!(f, "no contacts in address book `{book}`"),
            Self::MalformedPersistedData(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidField(err) => Some(err),
            Self::InvalidValue(err) => Some(err),
            Self::MalformedPersistedData(err) | Self::Storage(err) => Some(err),
            Self::NotFound { .. } | Self::KeyConflict { .. } | Self::NoContacts(_) => None,
        }
    }
}

impl From<FieldParseError> for StoreError {
    fn from(value: FieldParseError) -> Self {
        Self::InvalidField(value)
    }
}

impl From<ContactValueError> for StoreError {
    fn from(value: ContactValueError) -> Self {
        Self::InvalidValue(value)
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::MalformedData { .. } => Self::MalformedPersistedData(value),
            other => Self::Storage(other),
        }
    }
}

/// Whether an upsert inserted a new key or replaced an existing contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Added,
    Updated,
}

/// Whether an edit changed the stored contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Updated,
    /// Blank input; the previous value was kept.
    Unchanged,
}

/// Result of the most recent load attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Book has no storage attached.
    Detached,
    /// No persisted data existed.
    Missing,
    /// Persisted data existed but was empty.
    Empty,
    /// Contacts were restored.
    Loaded(usize),
    /// Persisted data could not be read; the book started empty.
    Failed(String),
    /// Unreadable persisted data was replaced by a later save.
    Overwritten,
}

/// Named collection of contacts keyed by first name.
pub struct AddressBook {
    name: String,
    contacts: IndexMap<String, Contact>,
    storage: Option<Arc<dyn BookStorage>>,
    load_status: LoadStatus,
}

impl std::fmt::Debug for AddressBook {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressBook")
            .field("name", &self.name)
            .field("contacts", &self.contacts.len())
            .field("persistent", &self.storage.is_some())
            .field("load_status", &self.load_status)
            .finish()
    }
}

impl AddressBook {
    /// Creates an in-memory book with no storage attached.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contacts: IndexMap::new(),
            storage: None,
            load_status: LoadStatus::Detached,
        }
    }

    /// Creates a storage-backed book and eagerly loads its persisted contents.
    ///
    /// Never fails: load errors are logged and exposed through
    /// [`AddressBook::load_status`], and the book starts empty.
    pub fn open(name: impl Into<String>, storage: Arc<dyn BookStorage>) -> Self {
        let mut book = Self {
            name: name.into(),
            contacts: IndexMap::new(),
            storage: Some(storage),
            load_status: LoadStatus::Missing,
        };
        if let Err(err) = book.load() {
            warn!(
                "event=book_open module=book status=degraded book={} error={err}",
                book.name
            );
        }
        book
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Whether mutations are written through to storage.
    pub fn is_persistent(&self) -> bool {
        self.storage.is_some()
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    /// Gets one contact by first name.
    pub fn get(&self, key: &str) -> Option<&Contact> {
        self.contacts.get(key)
    }

    /// Iterates contacts in insertion order.
    pub fn contacts(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.values()
    }

    /// Inserts `contact`, or replaces the contact stored under the same key.
    pub fn upsert(&mut self, contact: Contact) -> StoreResult<UpsertOutcome> {
        let outcome = match self.contacts.insert(contact.first_name.clone(), contact) {
            Some(_) => UpsertOutcome::Updated,
            None => UpsertOutcome::Added,
        };
        info!(
            "event=contact_upsert module=book status=ok book={} outcome={} contacts={}",
            self.name,
            match outcome {
                UpsertOutcome::Added => "added",
                UpsertOutcome::Updated => "updated",
            },
            self.contacts.len()
        );
        self.write_through()?;
        Ok(outcome)
    }

    /// Replaces one field of the contact stored under `key`.
    ///
    /// # Contract
    /// - Blank (whitespace-only) `value` keeps the current value.
    /// - `zip_code` values must parse as integers; failures leave the contact
    ///   unchanged.
    /// - Editing `first_name` re-keys the contact in place.
    ///
    /// # Errors
    /// - `NotFound` when `key` is absent.
    /// - `InvalidValue` on integer parse failure.
    /// - `KeyConflict` when a rename targets another stored contact.
    pub fn edit(
        &mut self,
        key: &str,
        field: ContactField,
        value: &str,
    ) -> StoreResult<EditOutcome> {
        let Some((index, _, current)) = self.contacts.get_full(key) else {
            return Err(self.not_found(key));
        };

        if value.trim().is_empty() {
            info!(
                "event=contact_edit module=book status=ok book={} field={field} outcome=unchanged",
                self.name
            );
            return Ok(EditOutcome::Unchanged);
        }

        let mut updated = current.clone();
        updated.set(field, value)?;

        if updated.first_name == key {
            if let Some(slot) = self.contacts.get_index_mut(index) {
                *slot.1 = updated;
            }
        } else {
            if self.contacts.contains_key(updated.key()) {
                return Err(StoreError::KeyConflict {
                    book: self.name.clone(),
                    key: updated.first_name,
                });
            }
            self.contacts.shift_remove_index(index);
            self.contacts
                .shift_insert(index, updated.first_name.clone(), updated);
        }

        info!(
            "event=contact_edit module=book status=ok book={} field={field} outcome=updated",
            self.name
        );
        self.write_through()?;
        Ok(EditOutcome::Updated)
    }

    /// Edits a field selected by name.
    ///
    /// The key is checked before the field name, so an absent contact reports
    /// `NotFound` even when the field name is also invalid.
    pub fn edit_by_name(
        &mut self,
        key: &str,
        field_name: &str,
        value: &str,
    ) -> StoreResult<EditOutcome> {
        if !self.contacts.contains_key(key) {
            return Err(self.not_found(key));
        }
        let field = field_name.parse::<ContactField>()?;
        self.edit(key, field, value)
    }

    /// Removes and returns the contact stored under `key`.
    pub fn delete(&mut self, key: &str) -> StoreResult<Contact> {
        let Some(removed) = self.contacts.shift_remove(key) else {
            return Err(self.not_found(key));
        };
        info!(
            "event=contact_delete module=book status=ok book={} contacts={}",
            self.name,
            self.contacts.len()
        );
        self.write_through()?;
        Ok(removed)
    }

    /// Lists every contact in insertion order.
    ///
    /// # Errors
    /// - `NoContacts` when the book is empty.
    pub fn list_all(&self) -> StoreResult<Vec<&Contact>> {
        if self.contacts.is_empty() {
            return Err(StoreError::NoContacts(self.name.clone()));
        }
        Ok(self.contacts.values().collect())
    }

    /// Lists contacts ordered by `field`.
    ///
    /// Text fields sort case-insensitively and `zip_code` numerically. The
    /// sort is stable, so ties keep insertion order.
    pub fn sorted_by(&self, field: ContactField) -> StoreResult<Vec<&Contact>> {
        let mut contacts = self.list_all()?;
        contacts.sort_by(|left, right| left.compare_by(right, field));
        Ok(contacts)
    }

    /// Lists contacts ordered by a field selected by name.
    pub fn sort(&self, by: &str) -> StoreResult<Vec<&Contact>> {
        let field = by.parse::<ContactField>()?;
        self.sorted_by(field)
    }

    /// Replaces in-memory contents with the persisted contents.
    ///
    /// Returns the number of contacts restored. Books without storage keep
    /// their contents. On failure the book is left empty.
    pub fn load(&mut self) -> StoreResult<usize> {
        let Some(storage) = self.storage.clone() else {
            self.load_status = LoadStatus::Detached;
            return Ok(self.contacts.len());
        };

        self.contacts.clear();
        match storage.load_book(&self.name) {
            Ok(StoredBook::Missing) => {
                self.load_status = LoadStatus::Missing;
                Ok(0)
            }
            Ok(StoredBook::Empty) => {
                self.load_status = LoadStatus::Empty;
                Ok(0)
            }
            Ok(StoredBook::Contacts(contacts)) => {
                for contact in contacts {
                    self.contacts.insert(contact.first_name.clone(), contact);
                }
                self.load_status = LoadStatus::Loaded(self.contacts.len());
                Ok(self.contacts.len())
            }
            Err(err) => {
                self.load_status = LoadStatus::Failed(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Writes the full contents of this book to storage.
    ///
    /// No-op for books without storage.
    pub fn save(&self) -> StoreResult<()> {
        self.persist()
    }

    /// Persists after a mutation, retiring a `Failed` load status once the
    /// unreadable data has been replaced.
    fn write_through(&mut self) -> StoreResult<()> {
        self.persist()?;
        if matches!(self.load_status, LoadStatus::Failed(_)) {
            self.load_status = LoadStatus::Overwritten;
        }
        Ok(())
    }

    fn persist(&self) -> StoreResult<()> {
        let Some(storage) = self.storage.as_ref() else {
            return Ok(());
        };
        let contacts: Vec<&Contact> = self.contacts.values().collect();
        storage.save_book(&self.name, &contacts)?;
        Ok(())
    }

    fn not_found(&self, key: &str) -> StoreError {
        StoreError::NotFound {
            book: self.name.clone(),
            key: key.to_string(),
        }
    }
}
