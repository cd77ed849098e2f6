//! Contact domain model.
//!
//! # Responsibility
//! - Define the contact record shared by books, registry and persistence.
//! - Define typed field selectors used by edit, sort and search.
//!
//! # Invariants
//! - Every contact is keyed by `first_name` inside its address book.

pub mod contact;
pub mod field;
