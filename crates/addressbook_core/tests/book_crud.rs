use addressbook_core::{
    AddressBook, BookStorage, Contact, ContactField, EditOutcome, MemoryStorage, StoreError,
    StoredBook, UpsertOutcome,
};
use std::sync::Arc;

fn contact(first_name: &str, city: &str, zip_code: u32) -> Contact {
    Contact::new(
        first_name,
        "Smith",
        "10 Elm St",
        city,
        "IL",
        zip_code,
        "5550100",
        format!("{}@example.com", first_name.to_lowercase()),
    )
}

fn first_names(contacts: &[&Contact]) -> Vec<String> {
    contacts.iter().map(|c| c.first_name.clone()).collect()
}

#[test]
fn upsert_adds_then_overwrites_every_field() {
    let mut book = AddressBook::new("family");

    let original = contact("Jane", "Chicago", 60601);
    assert_eq!(book.upsert(original).unwrap(), UpsertOutcome::Added);

    let replacement = Contact::new(
        "Jane", "Doe", "22 Oak Ave", "Boston", "MA", 2108, "5550199", "jd@example.com",
    );
    assert_eq!(
        book.upsert(replacement.clone()).unwrap(),
        UpsertOutcome::Updated
    );

    assert_eq!(book.len(), 1);
    assert_eq!(book.get("Jane"), Some(&replacement));
}

#[test]
fn upsert_overwrite_keeps_listing_position() {
    let mut book = AddressBook::new("family");
    book.upsert(contact("Ann", "Chicago", 1)).unwrap();
    book.upsert(contact("Bob", "Chicago", 2)).unwrap();
    book.upsert(contact("Ann", "Denver", 3)).unwrap();

    let listed = book.list_all().unwrap();
    assert_eq!(first_names(&listed), vec!["Ann", "Bob"]);
    assert_eq!(listed[0].city, "Denver");
}

#[test]
fn delete_removes_present_contact() {
    let mut book = AddressBook::new("family");
    book.upsert(contact("Ann", "Chicago", 1)).unwrap();
    book.upsert(contact("Bob", "Chicago", 2)).unwrap();

    let removed = book.delete("Ann").unwrap();
    assert_eq!(removed.first_name, "Ann");
    assert!(book.get("Ann").is_none());
    assert_eq!(book.len(), 1);
}

#[test]
fn delete_absent_key_reports_not_found_and_keeps_contents() {
    let mut book = AddressBook::new("family");
    book.upsert(contact("Ann", "Chicago", 1)).unwrap();
    let before: Vec<Contact> = book.contacts().cloned().collect();

    let err = book.delete("Zed").unwrap_err();
    assert!(matches!(err, StoreError::NotFound { ref key, .. } if key == "Zed"));

    let after: Vec<Contact> = book.contacts().cloned().collect();
    assert_eq!(before, after);
}

#[test]
fn list_all_on_empty_book_reports_no_contacts() {
    let book = AddressBook::new("empty");
    let err = book.list_all().unwrap_err();
    assert!(matches!(err, StoreError::NoContacts(ref name) if name == "empty"));
}

#[test]
fn edit_replaces_one_field() {
    let mut book = AddressBook::new("family");
    book.upsert(contact("Ann", "Chicago", 60601)).unwrap();

    let outcome = book.edit("Ann", ContactField::City, "Peoria").unwrap();
    assert_eq!(outcome, EditOutcome::Updated);

    let stored = book.get("Ann").unwrap();
    assert_eq!(stored.city, "Peoria");
    assert_eq!(stored.zip_code, 60601);
}

#[test]
fn edit_with_blank_input_keeps_old_value() {
    let mut book = AddressBook::new("family");
    book.upsert(contact("Ann", "Chicago", 60601)).unwrap();

    let outcome = book.edit("Ann", ContactField::City, "   ").unwrap();
    assert_eq!(outcome, EditOutcome::Unchanged);
    assert_eq!(book.get("Ann").unwrap().city, "Chicago");
}

#[test]
fn edit_by_name_with_unknown_field_leaves_contact_unchanged() {
    let mut book = AddressBook::new("family");
    let original = contact("Ann", "Chicago", 60601);
    book.upsert(original.clone()).unwrap();

    let err = book.edit_by_name("Ann", "nickname", "Annie").unwrap_err();
    assert!(matches!(err, StoreError::InvalidField(_)));
    assert!(err.to_string().starts_with("invalid choice"));
    assert_eq!(book.get("Ann"), Some(&original));
}

#[test]
fn edit_by_name_checks_key_before_field() {
    let mut book = AddressBook::new("family");
    let err = book.edit_by_name("Ghost", "nickname", "x").unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn edit_by_name_accepts_spaced_field_names() {
    let mut book = AddressBook::new("family");
    book.upsert(contact("Ann", "Chicago", 60601)).unwrap();

    book.edit_by_name("Ann", "phone number", "+44 20 7946 0000")
        .unwrap();
    assert_eq!(book.get("Ann").unwrap().phone_number, "+44 20 7946 0000");
}

#[test]
fn edit_zip_code_rejects_non_integer_input() {
    let mut book = AddressBook::new("family");
    book.upsert(contact("Ann", "Chicago", 60601)).unwrap();

    let err = book
        .edit("Ann", ContactField::ZipCode, "sixty")
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidValue(_)));
    assert_eq!(book.get("Ann").unwrap().zip_code, 60601);

    book.edit("Ann", ContactField::ZipCode, "60602").unwrap();
    assert_eq!(book.get("Ann").unwrap().zip_code, 60602);
}

#[test]
fn sort_by_zip_code_is_numeric_ascending() {
    let mut book = AddressBook::new("family");
    book.upsert(contact("Ann", "Los Angeles", 90001)).unwrap();
    book.upsert(contact("Bob", "New York", 10001)).unwrap();
    book.upsert(contact("Cid", "Atlanta", 30301)).unwrap();

    let sorted = book.sort("zip_code").unwrap();
    let zips: Vec<u32> = sorted.iter().map(|c| c.zip_code).collect();
    assert_eq!(zips, vec![10001, 30301, 90001]);
}

#[test]
fn sort_by_text_field_ignores_case() {
    let mut book = AddressBook::new("family");
    book.upsert(contact("Ann", "boston", 1)).unwrap();
    book.upsert(contact("Bob", "Albany", 2)).unwrap();
    book.upsert(contact("Cid", "chicago", 3)).unwrap();

    let sorted = book.sorted_by(ContactField::City).unwrap();
    assert_eq!(first_names(&sorted), vec!["Bob", "Ann", "Cid"]);
}

#[test]
fn sort_with_unknown_field_is_an_error_and_no_op() {
    let mut book = AddressBook::new("family");
    book.upsert(contact("Bob", "Chicago", 2)).unwrap();
    book.upsert(contact("Ann", "Chicago", 1)).unwrap();

    let err = book.sort("favourite_colour").unwrap_err();
    assert!(matches!(err, StoreError::InvalidField(_)));
    assert_eq!(first_names(&book.list_all().unwrap()), vec!["Bob", "Ann"]);
}

#[test]
fn every_mutation_is_written_through_to_storage() {
    let storage = Arc::new(MemoryStorage::new());
    let mut book = AddressBook::open("family", storage.clone());

    book.upsert(contact("Ann", "Chicago", 1)).unwrap();
    book.upsert(contact("Bob", "Chicago", 2)).unwrap();
    assert_stored_names(&storage, &["Ann", "Bob"]);

    book.edit("Bob", ContactField::FirstName, "Rob").unwrap();
    assert_stored_names(&storage, &["Ann", "Rob"]);

    book.delete("Ann").unwrap();
    assert_stored_names(&storage, &["Rob"]);
}

fn assert_stored_names(storage: &MemoryStorage, expected: &[&str]) {
    let StoredBook::Contacts(stored) = storage.load_book("family").unwrap() else {
        panic!("book should be persisted");
    };
    let names: Vec<_> = stored.iter().map(|c| c.first_name.as_str()).collect();
    assert_eq!(names, expected);
}
