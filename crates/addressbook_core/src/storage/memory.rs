//! In-process storage backend.
//!
//! Keeps the encoded text of each book so that reads go through the same
//! decode path as file storage. Useful for tests and ephemeral sessions.

use super::{
    decode_book, encode_book, validate_book_name, BookStorage, StorageResult, StoredBook,
};
use crate::model::contact::Contact;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
pub struct MemoryStorage {
    books: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores raw text for `book`, bypassing encoding.
    pub fn put_raw(&self, book: impl Into<String>, text: impl Into<String>) {
        self.lock().insert(book.into(), text.into());
    }

    /// Returns the raw text currently stored for `book`.
    pub fn raw(&self, book: &str) -> Option<String> {
        self.lock().get(book).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.books.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BookStorage for MemoryStorage {
    fn load_book(&self, book: &str) -> StorageResult<StoredBook> {
        validate_book_name(book)?;
        match self.lock().get(book) {
            Some(text) => decode_book(book, text.as_bytes()),
            None => Ok(StoredBook::Missing),
        }
    }

    fn save_book(&self, book: &str, contacts: &[&Contact]) -> StorageResult<()> {
        validate_book_name(book)?;
        let text = encode_book(contacts)?;
        self.lock().insert(book.to_string(), text);
        Ok(())
    }

    fn list_books(&self) -> StorageResult<Vec<String>> {
        Ok(self.lock().keys().cloned().collect())
    }
}
