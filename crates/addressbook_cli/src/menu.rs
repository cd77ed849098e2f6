//! Menu-driven front end over the address book registry.
//!
//! # Responsibility
//! - Map menu choices to registry and book operations.
//! - Render results and errors as text; never abort on domain errors.
//!
//! # Invariants
//! - Closing input ends the session cleanly.
//! - Only I/O failures on the terminal itself propagate to the caller.

use crate::prompt::Prompter;
use addressbook_core::{
    AddressBook, AddressBookRegistry, Contact, ContactField, EditOutcome, LoadStatus, SearchField,
    StoreError, UpsertOutcome,
};
use log::info;
use std::io::{self, BufRead, ErrorKind, Write};

const SEPARATOR_WIDTH: usize = 30;

/// Runs the main menu until the user exits or input closes.
pub fn run<R: BufRead, W: Write>(
    registry: &mut AddressBookRegistry,
    prompter: &mut Prompter<R, W>,
) -> io::Result<()> {
    info!(
        "event=session_start module=cli status=ok books={}",
        registry.len()
    );
    let result = match session(registry, prompter) {
        Err(err) if err.kind() == ErrorKind::UnexpectedEof => Ok(()),
        other => other,
    };
    info!("event=session_end module=cli status=ok books={}", registry.len());
    result
}

fn session<R: BufRead, W: Write>(
    registry: &mut AddressBookRegistry,
    prompter: &mut Prompter<R, W>,
) -> io::Result<()> {
    report_unreadable(registry, prompter)?;
    main_menu(registry, prompter)
}

fn main_menu<R: BufRead, W: Write>(
    registry: &mut AddressBookRegistry,
    prompter: &mut Prompter<R, W>,
) -> io::Result<()> {
    loop {
        prompter.say("\nAddress Book System Menu:")?;
        prompter.say("1. Create a new Address Book")?;
        prompter.say("2. Select an Address Book")?;
        prompter.say("3. Display all Address Books")?;
        prompter.say("4. Search Contact by City")?;
        prompter.say("5. Search Contact by State")?;
        prompter.say("6. Count Contacts by City or State")?;
        prompter.say("7. Exit")?;

        match prompter.ask("Enter your choice: ")?.trim() {
            "1" => create_book(registry, prompter)?,
            "2" => {
                let name = prompter.ask("Enter the name of the Address Book to select: ")?;
                match registry.select(&name) {
                    Ok(book) => {
                        if let LoadStatus::Failed(reason) = book.load_status() {
                            warn_unreadable(prompter, book.name(), reason)?;
                        }
                        book_menu(book, prompter)?
                    }
                    Err(err) => prompter.say(err)?,
                }
            }
            "3" => list_books(registry, prompter)?,
            "4" => search(registry, prompter, SearchField::City)?,
            "5" => search(registry, prompter, SearchField::State)?,
            "6" => count(registry, prompter)?,
            "7" => {
                prompter.say("Exiting the program.")?;
                return Ok(());
            }
            _ => prompter.say("Invalid choice. Please try again.")?,
        }
    }
}

fn create_book<R: BufRead, W: Write>(
    registry: &mut AddressBookRegistry,
    prompter: &mut Prompter<R, W>,
) -> io::Result<()> {
    let name = prompter.ask("Enter the name for the new Address Book: ")?;
    let book = match registry.create(&name) {
        Ok(book) => book,
        Err(err) => return prompter.say(err),
    };

    prompter.say(format!(
        "Address book '{}' created successfully.",
        book.name()
    ))?;
    match book.load_status() {
        LoadStatus::Loaded(restored) => {
            prompter.say(format!("Loaded {restored} saved contact(s)."))?
        }
        LoadStatus::Failed(reason) => warn_unreadable(prompter, book.name(), reason)?,
        LoadStatus::Detached
        | LoadStatus::Missing
        | LoadStatus::Empty
        | LoadStatus::Overwritten => {}
    }
    Ok(())
}

/// Warns about every registered book whose saved data could not be read.
fn report_unreadable<R: BufRead, W: Write>(
    registry: &AddressBookRegistry,
    prompter: &mut Prompter<R, W>,
) -> io::Result<()> {
    for (name, reason) in registry.unreadable() {
        warn_unreadable(prompter, name, reason)?;
    }
    Ok(())
}

fn warn_unreadable<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    book: &str,
    reason: &str,
) -> io::Result<()> {
    prompter.say(format!(
        "Could not read saved contacts for '{book}' ({reason}); it starts empty and \
         the next change will replace the saved file."
    ))
}

fn list_books<R: BufRead, W: Write>(
    registry: &AddressBookRegistry,
    prompter: &mut Prompter<R, W>,
) -> io::Result<()> {
    if registry.is_empty() {
        return prompter.say("No address books available.");
    }
    prompter.say("Available Address Books:")?;
    for name in registry.list_names() {
        prompter.say(format!("- {name}"))?;
    }
    Ok(())
}

fn search<R: BufRead, W: Write>(
    registry: &AddressBookRegistry,
    prompter: &mut Prompter<R, W>,
    field: SearchField,
) -> io::Result<()> {
    let term = prompter.ask(&format!(
        "Enter the {} to search for: ",
        field.as_str()
    ))?;
    match registry.search(&term, field) {
        Ok(hits) => {
            for hit in hits {
                prompter.say(format!("\nFound in Address Book: {}", hit.book))?;
                prompter.say(hit.contact)?;
            }
            Ok(())
        }
        Err(err) => prompter.say(err),
    }
}

fn count<R: BufRead, W: Write>(
    registry: &AddressBookRegistry,
    prompter: &mut Prompter<R, W>,
) -> io::Result<()> {
    let term = prompter.ask("Enter the city or state to get the count for: ")?;
    let field_name = prompter.ask("Is this 'city' or 'state'? ")?;
    match field_name.parse::<SearchField>() {
        Ok(field) => prompter.say(format!(
            "Number of contacts in {} '{term}': {}",
            field.contact_field().label(),
            registry.count(&term, field)
        )),
        Err(err) => prompter.say(err),
    }
}

fn book_menu<R: BufRead, W: Write>(
    book: &mut AddressBook,
    prompter: &mut Prompter<R, W>,
) -> io::Result<()> {
    loop {
        prompter.say(format!("\nAddress Book: {} - Menu:", book.name()))?;
        prompter.say("1. Add or Update Contact")?;
        prompter.say("2. Display All Contacts")?;
        prompter.say("3. Edit Contact")?;
        prompter.say("4. Delete Contact")?;
        prompter.say("5. Sort Contacts")?;
        prompter.say("6. Return to Main Menu")?;

        match prompter.ask("Enter your choice: ")?.trim() {
            "1" => add_contact(book, prompter)?,
            "2" => match book.list_all() {
                Ok(contacts) => show_contacts(prompter, &contacts)?,
                Err(err) => prompter.say(err)?,
            },
            "3" => edit_contact(book, prompter)?,
            "4" => {
                let key = prompter.ask("Enter the first name of the contact to delete: ")?;
                match book.delete(&key) {
                    Ok(_) => prompter.say(format!("Contact '{key}' deleted successfully."))?,
                    Err(err) => report_store_error(prompter, &err)?,
                }
            }
            "5" => {
                let by = prompter.ask(&format!(
                    "Sort by ({}): ",
                    ContactField::names().join(", ")
                ))?;
                match book.sort(&by) {
                    Ok(contacts) => show_contacts(prompter, &contacts)?,
                    Err(err) => prompter.say(err)?,
                }
            }
            "6" => return Ok(()),
            _ => prompter.say("Invalid choice. Please try again.")?,
        }
    }
}

fn add_contact<R: BufRead, W: Write>(
    book: &mut AddressBook,
    prompter: &mut Prompter<R, W>,
) -> io::Result<()> {
    prompter.say(format!(
        "{0} Enter contact details: {0}",
        "-".repeat(12)
    ))?;
    let first_name = prompter.ask("First Name: ")?;
    let last_name = prompter.ask("Last Name: ")?;
    let address = prompter.ask("Address: ")?;
    let city = prompter.ask("City: ")?;
    let state = prompter.ask("State: ")?;
    let zip_code = prompter.ask_required_integer("ZIP Code: ")?;
    let phone_number = prompter.ask("Phone Number: ")?;
    let email = prompter.ask("Email: ")?;

    let contact = Contact::new(
        first_name.clone(),
        last_name,
        address,
        city,
        state,
        zip_code,
        phone_number,
        email,
    );
    match book.upsert(contact) {
        Ok(UpsertOutcome::Added) => {
            prompter.say(format!("Contact '{first_name}' added successfully."))
        }
        Ok(UpsertOutcome::Updated) => prompter.say(format!(
            "Contact with first name '{first_name}' already existed and was updated."
        )),
        Err(err) => report_store_error(prompter, &err),
    }
}

fn edit_contact<R: BufRead, W: Write>(
    book: &mut AddressBook,
    prompter: &mut Prompter<R, W>,
) -> io::Result<()> {
    let key = prompter.ask("Enter the first name of the contact to edit: ")?;
    let Some(current) = book.get(&key).cloned() else {
        return prompter.say("Contact not found.");
    };

    prompter.say(format!(
        "Which detail do you want to update ({})? Leave the new value blank to keep it.",
        ContactField::names().join(", ")
    ))?;
    let field = match prompter.ask("Field: ")?.parse::<ContactField>() {
        Ok(field) => field,
        Err(err) => return prompter.say(StoreError::from(err)),
    };

    let prompt = format!("{} [{}]: ", field.label(), current.get(field));
    let value = if field.is_numeric() {
        prompter
            .ask_integer(&prompt)?
            .map(|value| value.to_string())
            .unwrap_or_default()
    } else {
        prompter.ask(&prompt)?
    };

    match book.edit(&key, field, &value) {
        Ok(EditOutcome::Updated) => prompter.say("Contact updated successfully."),
        Ok(EditOutcome::Unchanged) => prompter.say("No changes made."),
        Err(err) => report_store_error(prompter, &err),
    }
}

fn show_contacts<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    contacts: &[&Contact],
) -> io::Result<()> {
    for contact in contacts {
        prompter.say("-".repeat(SEPARATOR_WIDTH))?;
        prompter.say(contact)?;
    }
    Ok(())
}

fn report_store_error<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    err: &StoreError,
) -> io::Result<()> {
    match err {
        StoreError::NotFound { .. } => prompter.say("Contact not found."),
        StoreError::Storage(_) => prompter.say(format!(
            "Change kept for this session but could not be saved: {err}"
        )),
        other => prompter.say(other),
    }
}
