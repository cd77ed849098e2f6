//! One-JSON-file-per-book storage.
//!
//! # Responsibility
//! - Map each book to `<dir>/<book>.json`.
//! - Emit `book_load`/`book_save` logging events with duration and status.
//!
//! # Invariants
//! - Saves rewrite the whole file in place; a crash mid-write can leave a
//!   truncated file that later loads as malformed.
//! - A missing directory reads as "no books" and is created on first save.

use super::{
    decode_book, encode_book, validate_book_name, BookStorage, StorageError, StorageResult,
    StoredBook,
};
use crate::model::contact::Contact;
use log::{error, info, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

const BOOK_FILE_EXTENSION: &str = "json";

/// File-system storage writing one pretty-printed JSON array per book.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the book files.
    pub fn dir(&self) -> &Path {
        self.dir.as_path()
    }

    /// Returns the backing file path for `book`.
    pub fn book_path(&self, book: &str) -> StorageResult<PathBuf> {
        validate_book_name(book)?;
        Ok(self.dir.join(format!("{book}.{BOOK_FILE_EXTENSION}")))
    }
}

impl BookStorage for JsonFileStorage {
    fn load_book(&self, book: &str) -> StorageResult<StoredBook> {
        let started_at = Instant::now();
        let path = self.book_path(book)?;

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("event=book_load module=storage status=ok result=missing book={book}");
                return Ok(StoredBook::Missing);
            }
            Err(source) => {
                error!(
                    "event=book_load module=storage status=error book={book} duration_ms={} error_code=read_failed error={source}",
                    started_at.elapsed().as_millis()
                );
                return Err(StorageError::Io { path, source });
            }
        };

        match decode_book(book, &bytes) {
            Ok(stored) => {
                info!(
                    "event=book_load module=storage status=ok book={book} duration_ms={} contacts={}",
                    started_at.elapsed().as_millis(),
                    match &stored {
                        StoredBook::Contacts(contacts) => contacts.len(),
                        StoredBook::Missing | StoredBook::Empty => 0,
                    }
                );
                Ok(stored)
            }
            Err(err) => {
                warn!(
                    "event=book_load module=storage status=error book={book} duration_ms={} error_code=malformed_data error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    fn save_book(&self, book: &str, contacts: &[&Contact]) -> StorageResult<()> {
        let started_at = Instant::now();
        let path = self.book_path(book)?;
        let text = encode_book(contacts)?;

        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;

        if let Err(source) = fs::write(&path, text) {
            error!(
                "event=book_save module=storage status=error book={book} duration_ms={} error_code=write_failed error={source}",
                started_at.elapsed().as_millis()
            );
            return Err(StorageError::Io { path, source });
        }

        info!(
            "event=book_save module=storage status=ok book={book} duration_ms={} contacts={}",
            started_at.elapsed().as_millis(),
            contacts.len()
        );
        Ok(())
    }

    fn list_books(&self) -> StorageResult<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut books = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|source| StorageError::Io {
                    path: self.dir.clone(),
                    source,
                })?
                .path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(BOOK_FILE_EXTENSION)
            {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if validate_book_name(stem).is_ok() {
                books.push(stem.to_string());
            }
        }
        books.sort();
        Ok(books)
    }
}
