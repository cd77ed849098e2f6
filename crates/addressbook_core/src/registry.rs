//! Registry of named address books.
//!
//! # Responsibility
//! - Create, look up and enumerate address books by name.
//! - Search and count contacts across every book by city or state.
//!
//! # Invariants
//! - Book names are unique and kept in creation order.
//! - A book is loaded from storage exactly when it is first created here.
//! - Search and count share one matching rule: case-insensitive equality.

use crate::book::{AddressBook, LoadStatus};
use crate::model::contact::Contact;
use crate::model::field::{FieldParseError, SearchField};
use crate::storage::{validate_book_name, BookStorage, StorageError};
use indexmap::IndexMap;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registry-level error for book management and cross-book queries.
#[derive(Debug)]
pub enum RegistryError {
    DuplicateName(String),
    InvalidName(String),
    NotFound(String),
    InvalidField(FieldParseError),
    /// Cross-book search found nothing.
    NoMatches { field: SearchField, term: String },
    Storage(StorageError),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateName(name) => write!(f, "address book `{name}` already exists"),
            Self::InvalidName(name) => write!(f, "invalid address book name: `{name}`"),
            Self::NotFound(name) => write!(f, "address book `{name}` not found"),
            Self::InvalidField(err) => write!(f, "{err}"),
            Self::NoMatches { field, term } => write!(
                f,
                "no contacts found with {field} `{term}` across all address books"
            ),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidField(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FieldParseError> for RegistryError {
    fn from(value: FieldParseError) -> Self {
        Self::InvalidField(value)
    }
}

impl From<StorageError> for RegistryError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// One contact matched by a cross-book search, with its owning book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit<'a> {
    pub book: &'a str,
    pub contact: &'a Contact,
}

/// Process-lifetime collection of address books.
#[derive(Default)]
pub struct AddressBookRegistry {
    books: IndexMap<String, AddressBook>,
    storage: Option<Arc<dyn BookStorage>>,
}

impl AddressBookRegistry {
    /// Creates a registry whose books live only in memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry whose books load from and save to `storage`.
    pub fn with_storage(storage: Arc<dyn BookStorage>) -> Self {
        Self {
            books: IndexMap::new(),
            storage: Some(storage),
        }
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Creates a new book named `name` and loads its persisted contents.
    ///
    /// Leading/trailing whitespace in `name` is ignored.
    ///
    /// # Errors
    /// - `InvalidName` for blank names or names unusable as a storage unit.
    /// - `DuplicateName` when the name is already registered.
    pub fn create(&mut self, name: &str) -> RegistryResult<&mut AddressBook> {
        let name = name.trim();
        if validate_book_name(name).is_err() {
            return Err(RegistryError::InvalidName(name.to_string()));
        }
        if self.books.contains_key(name) {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }

        let book = match &self.storage {
            Some(storage) => AddressBook::open(name, Arc::clone(storage)),
            None => AddressBook::new(name),
        };
        info!(
            "event=book_create module=registry status=ok book={name} contacts={} books={}",
            book.len(),
            self.books.len() + 1
        );

        let entry = self.books.entry(name.to_string()).or_insert(book);
        Ok(entry)
    }

    /// Gets one book by name.
    pub fn get(&self, name: &str) -> Option<&AddressBook> {
        self.books.get(name.trim())
    }

    /// Gets one book by name for mutation.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut AddressBook> {
        self.books.get_mut(name.trim())
    }

    /// Selects one book by name, reporting `NotFound` when absent.
    pub fn select(&mut self, name: &str) -> RegistryResult<&mut AddressBook> {
        let name = name.trim();
        self.books
            .get_mut(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Returns book names in creation order.
    pub fn list_names(&self) -> Vec<&str> {
        self.books.keys().map(String::as_str).collect()
    }

    /// Iterates books in creation order.
    pub fn books(&self) -> impl Iterator<Item = &AddressBook> {
        self.books.values()
    }

    /// Opens every persisted book not yet registered.
    ///
    /// Returns the names opened, in storage order. Registries without storage
    /// open nothing. Books whose data could not be read are still opened
    /// empty; see [`AddressBookRegistry::unreadable`].
    pub fn discover(&mut self) -> RegistryResult<Vec<String>> {
        let Some(storage) = self.storage.clone() else {
            return Ok(Vec::new());
        };

        let mut opened = Vec::new();
        for name in storage.list_books()? {
            if self.books.contains_key(&name) {
                continue;
            }
            self.create(&name)?;
            opened.push(name);
        }
        info!(
            "event=book_discover module=registry status=ok opened={} unreadable={}",
            opened.len(),
            self.unreadable().len()
        );
        Ok(opened)
    }

    /// Lists `(book, reason)` for every book whose persisted data failed to
    /// load and has not been overwritten since.
    pub fn unreadable(&self) -> Vec<(&str, &str)> {
        self.books()
            .filter_map(|book| match book.load_status() {
                LoadStatus::Failed(reason) => Some((book.name(), reason.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Finds every contact in every book whose `field` equals `term`,
    /// ignoring case.
    ///
    /// # Errors
    /// - `NoMatches` when nothing matches.
    pub fn search(&self, term: &str, field: SearchField) -> RegistryResult<Vec<SearchHit<'_>>> {
        let hits: Vec<_> = self.matches(term, field).collect();
        info!(
            "event=contact_search module=registry status=ok field={field} hits={}",
            hits.len()
        );
        if hits.is_empty() {
            return Err(RegistryError::NoMatches {
                field,
                term: term.to_string(),
            });
        }
        Ok(hits)
    }

    /// Same as [`AddressBookRegistry::search`] with the field given by name.
    pub fn search_by_name(
        &self,
        term: &str,
        field_name: &str,
    ) -> RegistryResult<Vec<SearchHit<'_>>> {
        let field = field_name.parse::<SearchField>()?;
        self.search(term, field)
    }

    /// Counts contacts matching `term` on `field` across every book.
    pub fn count(&self, term: &str, field: SearchField) -> usize {
        self.matches(term, field).count()
    }

    /// Same as [`AddressBookRegistry::count`] with the field given by name.
    pub fn count_by_name(&self, term: &str, field_name: &str) -> RegistryResult<usize> {
        let field = field_name.parse::<SearchField>()?;
        Ok(self.count(term, field))
    }

    fn matches<'a>(
        &'a self,
        term: &str,
        field: SearchField,
    ) -> impl Iterator<Item = SearchHit<'a>> + 'a {
        let needle = term.to_lowercase();
        let field = field.contact_field();
        self.books.iter().flat_map(move |(name, book)| {
            let needle = needle.clone();
            book.contacts()
                .filter(move |contact| contact.get(field).to_lowercase() == needle)
                .map(move |contact| SearchHit {
                    book: name.as_str(),
                    contact,
                })
        })
    }
}
