//! Typed field selectors for contact edit, sort and search.
//!
//! # Responsibility
//! - Replace "select a field by string" with finite enums.
//! - Parse user-supplied field names into selectors.
//!
//! # Invariants
//! - Parsing is case-insensitive and treats space, `-` and `_` runs as one
//!   separator, so `phone number`, `Phone-Number` and `phone_number` agree.
//! - `as_str()` always returns the persisted wire name of the field.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static FIELD_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s_\-]+").expect("valid field separator regex"));

/// Error returned when a field name does not match any known selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldParseError {
    /// Raw input as supplied by the caller.
    pub input: String,
    /// Accepted wire names for the selector being parsed.
    pub expected: &'static [&'static str],
}

impl Display for FieldParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown field `{}`; expected {}",
            self.input,
            self.expected.join("|")
        )
    }
}

impl Error for FieldParseError {}

/// One editable/sortable field of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    FirstName,
    LastName,
    Address,
    City,
    State,
    ZipCode,
    PhoneNumber,
    Email,
}

const CONTACT_FIELD_NAMES: &[&str] = &[
    "first_name",
    "last_name",
    "address",
    "city",
    "state",
    "zip_code",
    "phone_number",
    "email",
];

impl ContactField {
    /// Every field in persisted order.
    pub const ALL: [ContactField; 8] = [
        Self::FirstName,
        Self::LastName,
        Self::Address,
        Self::City,
        Self::State,
        Self::ZipCode,
        Self::PhoneNumber,
        Self::Email,
    ];

    /// Persisted wire name, e.g. `zip_code`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Address => "address",
            Self::City => "city",
            Self::State => "state",
            Self::ZipCode => "zip_code",
            Self::PhoneNumber => "phone_number",
            Self::Email => "email",
        }
    }

    /// Human label used by prompts and the contact card.
    pub fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Address => "Address",
            Self::City => "City",
            Self::State => "State",
            Self::ZipCode => "ZIP Code",
            Self::PhoneNumber => "Phone Number",
            Self::Email => "Email",
        }
    }

    /// Whether values of this field are parsed and compared as integers.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::ZipCode)
    }

    /// Accepted wire names, for menus and error messages.
    pub fn names() -> &'static [&'static str] {
        CONTACT_FIELD_NAMES
    }
}

impl Display for ContactField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactField {
    type Err = FieldParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_field_name(value);
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| FieldParseError {
                input: value.to_string(),
                expected: CONTACT_FIELD_NAMES,
            })
    }
}

/// Field usable for cross-book search and count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    City,
    State,
}

const SEARCH_FIELD_NAMES: &[&str] = &["city", "state"];

impl SearchField {
    pub fn as_str(self) -> &'static str {
        self.contact_field().as_str()
    }

    /// Contact field this selector reads.
    pub fn contact_field(self) -> ContactField {
        match self {
            Self::City => ContactField::City,
            Self::State => ContactField::State,
        }
    }
}

impl Display for SearchField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchField {
    type Err = FieldParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_field_name(value).as_str() {
            "city" => Ok(Self::City),
            "state" => Ok(Self::State),
            _ => Err(FieldParseError {
                input: value.to_string(),
                expected: SEARCH_FIELD_NAMES,
            }),
        }
    }
}

fn normalize_field_name(value: &str) -> String {
    FIELD_SEPARATOR_RE
        .replace_all(value.trim(), "_")
        .to_ascii_lowercase()
}
