//! Contact domain record.
//!
//! # Responsibility
//! - Define the eight-field contact record persisted inside address books.
//! - Convert contacts to and from plain key-value records.
//!
//! # Invariants
//! - `first_name` is the lookup key inside one address book.
//! - `to_record` followed by `from_record` is lossless for every field.
//! - `phone_number` is text; integer phone numbers written by older files are
//!   accepted on read and normalized to their decimal string.

use crate::model::field::ContactField;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Key-value record shape used for serialization.
pub type ContactRecord = Map<String, Value>;

/// Field value rejected by integer parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactValueError {
    pub field: ContactField,
    pub value: String,
}

impl Display for ContactValueError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid value `{}` for {}: expected a non-negative integer",
            self.value, self.field
        )
    }
}

impl Error for ContactValueError {}

/// One person stored in an address book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Unique key inside the owning address book.
    pub first_name: String,
    pub last_name: String,
    /// Free-text street address.
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: u32,
    #[serde(deserialize_with = "deserialize_phone_number")]
    pub phone_number: String,
    pub email: String,
}

impl Contact {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip_code: u32,
        phone_number: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: address.into(),
            city: city.into(),
            state: state.into(),
            zip_code,
            phone_number: phone_number.into(),
            email: email.into(),
        }
    }

    /// Lookup key of this contact.
    pub fn key(&self) -> &str {
        self.first_name.as_str()
    }

    /// Renders one field as display text.
    pub fn get(&self, field: ContactField) -> String {
        match field {
            ContactField::ZipCode => self.zip_code.to_string(),
            other => self.text_field(other).to_string(),
        }
    }

    /// Replaces one field from text input.
    ///
    /// `zip_code` input must parse as an unsigned integer; on failure the
    /// contact is left unchanged.
    pub fn set(&mut self, field: ContactField, value: &str) -> Result<(), ContactValueError> {
        match field {
            ContactField::FirstName => self.first_name = value.to_string(),
            ContactField::LastName => self.last_name = value.to_string(),
            ContactField::Address => self.address = value.to_string(),
            ContactField::City => self.city = value.to_string(),
            ContactField::State => self.state = value.to_string(),
            ContactField::ZipCode => {
                self.zip_code = value.trim().parse().map_err(|_| ContactValueError {
                    field,
                    value: value.to_string(),
                })?;
            }
            ContactField::PhoneNumber => self.phone_number = value.to_string(),
            ContactField::Email => self.email = value.to_string(),
        }
        Ok(())
    }

    /// Orders two contacts by one field.
    ///
    /// Text fields compare case-insensitively; `zip_code` compares numerically.
    pub fn compare_by(&self, other: &Self, field: ContactField) -> Ordering {
        match field {
            ContactField::ZipCode => self.zip_code.cmp(&other.zip_code),
            text => self
                .text_field(text)
                .to_lowercase()
                .cmp(&other.text_field(text).to_lowercase()),
        }
    }

    /// Produces the plain key-value record used for persistence.
    pub fn to_record(&self) -> ContactRecord {
        let mut record = ContactRecord::new();
        for field in ContactField::ALL {
            let value = match field {
                ContactField::ZipCode => Value::from(self.zip_code),
                text => Value::from(self.text_field(text)),
            };
            record.insert(field.as_str().to_string(), value);
        }
        record
    }

    /// Builds a contact from a key-value record.
    ///
    /// # Errors
    /// - Returns an error when a field is missing or has the wrong JSON type.
    pub fn from_record(record: ContactRecord) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(record))
    }

    fn text_field(&self, field: ContactField) -> &str {
        match field {
            ContactField::FirstName => &self.first_name,
            ContactField::LastName => &self.last_name,
            ContactField::Address => &self.address,
            ContactField::City => &self.city,
            ContactField::State => &self.state,
            ContactField::PhoneNumber => &self.phone_number,
            ContactField::Email => &self.email,
            ContactField::ZipCode => "",
        }
    }
}

impl Display for Contact {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Name: {} {}", self.first_name, self.last_name)?;
        writeln!(f, "Address: {}", self.address)?;
        writeln!(f, "City: {}", self.city)?;
        writeln!(f, "State: {}", self.state)?;
        writeln!(f, "Zip Code: {}", self.zip_code)?;
        writeln!(f, "Phone Number: {}", self.phone_number)?;
        write!(f, "Email: {}", self.email)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PhoneNumberRepr {
    Text(String),
    Number(u64),
}

fn deserialize_phone_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match PhoneNumberRepr::deserialize(deserializer)? {
        PhoneNumberRepr::Text(value) => value,
        PhoneNumberRepr::Number(value) => value.to_string(),
    })
}
