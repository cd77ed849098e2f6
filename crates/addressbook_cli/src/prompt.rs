//! Line-oriented prompt helpers over any reader/writer pair.
//!
//! # Invariants
//! - End of input surfaces as `ErrorKind::UnexpectedEof`.
//! - Integer prompts re-ask in place until the input parses or is blank.

use std::fmt::Display;
use std::io::{self, BufRead, ErrorKind, Write};

const INVALID_INTEGER_MESSAGE: &str = "Invalid input. Please enter a valid integer.";

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writes one line.
    pub fn say(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    /// Shows `prompt` and reads one line without its line terminator.
    pub fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Reads an unsigned integer, re-prompting on parse failure.
    ///
    /// Blank input returns `None` so callers can keep a previous value.
    pub fn ask_integer(&mut self, prompt: &str) -> io::Result<Option<u32>> {
        loop {
            let line = self.ask(prompt)?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            match trimmed.parse::<u32>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => self.say(INVALID_INTEGER_MESSAGE)?,
            }
        }
    }

    /// Reads an unsigned integer, re-prompting until one is entered.
    pub fn ask_required_integer(&mut self, prompt: &str) -> io::Result<u32> {
        loop {
            match self.ask_integer(prompt)? {
                Some(value) => return Ok(value),
                None => self.say(INVALID_INTEGER_MESSAGE)?,
            }
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
