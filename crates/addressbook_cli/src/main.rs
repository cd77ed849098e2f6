//! Terminal front end for the address book manager.
//!
//! # Responsibility
//! - Resolve configuration from flags and `ADDRESSBOOK_*` environment.
//! - Own the registry for the lifetime of the process and drive the menu.

mod cli;
mod menu;
mod prompt;

use clap::Parser;
use cli::Cli;
use log::warn;
use prompt::Prompter;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = Cli::parse().into_config();

    if let Err(err) = config.init_logging() {
        eprintln!("warning: logging disabled: {err}");
    }

    let mut registry = config.open_registry();
    if let Err(err) = registry.discover() {
        warn!("event=book_discover module=cli status=error error={err}");
        eprintln!("warning: could not scan saved address books: {err}");
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut prompter = Prompter::new(stdin.lock(), stdout.lock());
    match menu::run(&mut registry, &mut prompter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: terminal i/o failed: {err}");
            ExitCode::FAILURE
        }
    }
}
