//! Persistence contracts for address books.
//!
//! # Responsibility
//! - Define the `BookStorage` seam between books and their backing store.
//! - Parse and render the persisted book format (JSON array of contacts).
//!
//! # Invariants
//! - One persisted unit per book, rewritten whole on every save.
//! - A zero-byte (or whitespace-only) unit reads as an empty book.
//! - Bytes that are not valid UTF-8 JSON are malformed data, never an io error.
//! - Partially valid content is rejected as a whole; no contact is recovered.

use crate::model::contact::Contact;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod json_file;
mod memory;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage-layer error for book persistence.
#[derive(Debug)]
pub enum StorageError {
    /// File system failure on a concrete path.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Persisted content could not be decoded into contacts.
    MalformedData {
        book: String,
        source: serde_json::Error,
    },
    /// Contacts could not be encoded.
    Encode(serde_json::Error),
    /// Book name cannot be mapped to a storage unit.
    InvalidBookName(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error on `{}`: {source}", path.display()),
            Self::MalformedData { book, source } => {
                write!(f, "malformed data for address book `{book}`: {source}")
            }
            Self::Encode(err) => write!(f, "failed to encode contacts: {err}"),
            Self::InvalidBookName(name) => write!(f, "invalid address book name: `{name}`"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::MalformedData { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
            Self::InvalidBookName(_) => None,
        }
    }
}

/// Result of reading one book from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredBook {
    /// No persisted unit exists yet.
    Missing,
    /// A persisted unit exists but holds no content.
    Empty,
    /// Decoded contacts in persisted order.
    Contacts(Vec<Contact>),
}

/// Backing store for address book contents.
pub trait BookStorage: Send + Sync {
    /// Reads the persisted contents of `book`.
    fn load_book(&self, book: &str) -> StorageResult<StoredBook>;
    /// Replaces the persisted contents of `book` with `contacts`.
    fn save_book(&self, book: &str, contacts: &[&Contact]) -> StorageResult<()>;
    /// Lists names of every persisted book, sorted.
    fn list_books(&self) -> StorageResult<Vec<String>>;
}

/// Validates that a book name maps to exactly one storage unit.
///
/// Rejects blank names and names that could escape the storage directory.
pub fn validate_book_name(book: &str) -> StorageResult<()> {
    let invalid = book.trim().is_empty()
        || book != book.trim()
        || book == "."
        || book == ".."
        || book.contains(['/', '\\', '\0']);
    if invalid {
        return Err(StorageError::InvalidBookName(book.to_string()));
    }
    Ok(())
}

pub(crate) fn decode_book(book: &str, bytes: &[u8]) -> StorageResult<StoredBook> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(StoredBook::Empty);
    }
    serde_json::from_slice::<Vec<Contact>>(bytes)
        .map(StoredBook::Contacts)
        .map_err(|source| StorageError::MalformedData {
            book: book.to_string(),
            source,
        })
}

pub(crate) fn encode_book(contacts: &[&Contact]) -> StorageResult<String> {
    serde_json::to_string_pretty(contacts).map_err(StorageError::Encode)
}

#[cfg(test)]
mod tests {
    use super::{decode_book, encode_book, validate_book_name, StorageError, StoredBook};
    use crate::model::contact::Contact;

    #[test]
    fn decode_treats_blank_text_as_empty_book() {
        assert_eq!(decode_book("home", b"").unwrap(), StoredBook::Empty);
        assert_eq!(decode_book("home", b"  \n").unwrap(), StoredBook::Empty);
    }

    #[test]
    fn decode_reports_invalid_utf8_as_malformed() {
        let err = decode_book("bin", &[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, StorageError::MalformedData { ref book, .. } if book == "bin"));
    }

    #[test]
    fn decode_rejects_partially_valid_content() {
        let text = r#"[{"first_name":"Ada","last_name":"L","address":"a","city":"c",
            "state":"s","zip_code":1,"phone_number":"1","email":"e"}, {"first_name":"#;
        let err = decode_book("home", text.as_bytes()).unwrap_err();
        assert!(matches!(err, StorageError::MalformedData { ref book, .. } if book == "home"));
    }

    #[test]
    fn encode_writes_indented_array_with_wire_names() {
        let contact = Contact::new("Ada", "L", "a", "c", "s", 1, "555", "e");
        let text = encode_book(&[&contact]).unwrap();
        assert!(text.starts_with("[\n"));
        assert!(text.contains("\"zip_code\": 1"));
        assert!(text.contains("\"phone_number\": \"555\""));
    }

    #[test]
    fn book_name_validation_blocks_path_escape() {
        assert!(validate_book_name("family").is_ok());
        assert!(validate_book_name("work contacts").is_ok());
        assert!(validate_book_name("my.book").is_ok());
        assert!(validate_book_name("").is_err());
        assert!(validate_book_name("..").is_err());
        assert!(validate_book_name("a/b").is_err());
        assert!(validate_book_name(" padded ").is_err());
    }
}
