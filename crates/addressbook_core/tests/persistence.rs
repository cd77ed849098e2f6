use addressbook_core::{
    AddressBookRegistry, BookStorage, Contact, CoreConfig, JsonFileStorage, LoadStatus,
    MemoryStorage, SearchField, StoreError, UpsertOutcome,
};
use std::fs;
use std::sync::Arc;

fn contact(first_name: &str, zip_code: u32) -> Contact {
    Contact::new(
        first_name,
        "Nakamura",
        "3 Harbor Way",
        "Seattle",
        "WA",
        zip_code,
        "0206555010",
        "n@example.com",
    )
}

fn file_registry(dir: &std::path::Path) -> AddressBookRegistry {
    AddressBookRegistry::with_storage(Arc::new(JsonFileStorage::new(dir)))
}

#[test]
fn save_then_load_in_new_registry_reproduces_contacts() {
    let dir = tempfile::tempdir().unwrap();
    let written: Vec<Contact> = vec![contact("Kai", 98101), contact("Mia", 98102)];

    {
        let mut registry = file_registry(dir.path());
        let book = registry.create("friends").unwrap();
        for item in &written {
            book.upsert(item.clone()).unwrap();
        }
    }

    let mut registry = file_registry(dir.path());
    let book = registry.create("friends").unwrap();
    assert_eq!(book.load_status(), &LoadStatus::Loaded(2));
    let loaded: Vec<Contact> = book.contacts().cloned().collect();
    assert_eq!(loaded, written);
}

#[test]
fn backing_file_is_named_after_book_and_indented() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = file_registry(dir.path());
    registry
        .create("friends")
        .unwrap()
        .upsert(contact("Kai", 98101))
        .unwrap();

    let text = fs::read_to_string(dir.path().join("friends.json")).unwrap();
    assert!(text.starts_with("[\n  {"));
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value[0]["first_name"], "Kai");
    assert_eq!(value[0]["zip_code"], 98101);
}

#[test]
fn missing_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = file_registry(dir.path());

    let book = registry.create("fresh").unwrap();
    assert!(book.is_empty());
    assert_eq!(book.load_status(), &LoadStatus::Missing);
}

#[test]
fn zero_byte_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("blank.json"), "").unwrap();
    let mut registry = file_registry(dir.path());

    let book = registry.create("blank").unwrap();
    assert!(book.is_empty());
    assert_eq!(book.load_status(), &LoadStatus::Empty);
}

#[test]
fn malformed_file_starts_empty_and_does_not_block_mutations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "[{\"first_name\": \"Kai\",").unwrap();
    let mut registry = file_registry(dir.path());

    let book = registry.create("broken").unwrap();
    assert!(book.is_empty());
    assert!(matches!(book.load_status(), LoadStatus::Failed(_)));

    assert_eq!(
        book.upsert(contact("Kai", 98101)).unwrap(),
        UpsertOutcome::Added
    );
    let text = fs::read_to_string(&path).unwrap();
    assert!(serde_json::from_str::<serde_json::Value>(&text).is_ok());
}

#[test]
fn explicit_reload_of_malformed_data_reports_error() {
    let storage = Arc::new(MemoryStorage::new());
    let mut registry = AddressBookRegistry::with_storage(storage.clone());
    registry
        .create("club")
        .unwrap()
        .upsert(contact("Kai", 1))
        .unwrap();

    storage.put_raw("club", "{ not json");
    let book = registry.select("club").unwrap();
    let err = book.load().unwrap_err();

    assert!(matches!(err, StoreError::MalformedPersistedData(_)));
    assert!(book.is_empty());
}

#[test]
fn non_utf8_file_is_reported_as_malformed() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bin.json"), [0xffu8, 0xfe, 0x00]).unwrap();
    let mut registry = file_registry(dir.path());

    let book = registry.create("bin").unwrap();
    assert!(book.is_empty());
    assert!(matches!(book.load_status(), LoadStatus::Failed(_)));

    let err = book.load().unwrap_err();
    assert!(matches!(err, StoreError::MalformedPersistedData(_)));
}

#[test]
fn integer_phone_numbers_from_older_files_load_as_text() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("legacy.json"),
        r#"[{"first_name": "Kai", "last_name": "N", "address": "a", "city": "Seattle",
             "state": "WA", "zip_code": 98101, "phone_number": 2065550100,
             "email": "k@example.com"}]"#,
    )
    .unwrap();
    let mut registry = file_registry(dir.path());

    let book = registry.create("legacy").unwrap();
    assert_eq!(book.get("Kai").unwrap().phone_number, "2065550100");
}

#[test]
fn discover_reopens_every_persisted_book() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut registry = file_registry(dir.path());
        registry.create("work").unwrap().upsert(contact("Kai", 1)).unwrap();
        registry.create("home").unwrap().upsert(contact("Mia", 2)).unwrap();
        registry.create("unsaved").unwrap();
    }

    let mut registry = file_registry(dir.path());
    registry.create("home").unwrap();
    assert_eq!(registry.discover().unwrap(), vec!["work"]);
    assert_eq!(registry.list_names(), vec!["home", "work"]);
    assert_eq!(registry.count("seattle", SearchField::City), 2);
}

#[test]
fn config_registry_uses_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig {
        data_dir: Some(dir.path().to_path_buf()),
        ..CoreConfig::default()
    };

    config
        .open_registry()
        .create("cfg")
        .unwrap()
        .upsert(contact("Kai", 1))
        .unwrap();

    let storage = JsonFileStorage::new(dir.path());
    assert_eq!(storage.list_books().unwrap(), vec!["cfg"]);
}
