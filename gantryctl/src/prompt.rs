//! Interactive terminal input
//!
//! Confirmation questions and password entry go through the
//! [`Prompter`] trait so command handlers stay testable; the test
//! suite swaps in a scripted implementation instead of a terminal.

use gantry_core::{GantryError, Result};
use std::io::{self, BufRead, IsTerminal, Write};

/// Source of interactive answers for command handlers
pub trait Prompter {
    /// Ask a yes/no question; only "y" and "yes" count as yes
    fn confirm(&mut self, question: &str) -> Result<bool>;

    /// Read a password, hiding the input when attached to a terminal
    fn password(&mut self, prompt: &str) -> Result<String>;
}

/// Prompter backed by the controlling terminal
///
/// When stdin is not a terminal (input piped in), passwords are read
/// as plain lines so scripted use keeps working.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        print!("{} (y/n) ", question);
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        let answer = answer.trim().to_lowercase();

        Ok(answer == "y" || answer == "yes")
    }

    fn password(&mut self, prompt: &str) -> Result<String> {
        let raw = if io::stdin().is_terminal() {
            rpassword::prompt_password(prompt)?
        } else {
            print!("{}", prompt);
            io::stdout().flush()?;

            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line
        };

        let password = raw.trim_end_matches(['\r', '\n']).to_string();
        if password.is_empty() {
            return Err(GantryError::InvalidInput(
                "no password provided".to_string(),
            ));
        }

        Ok(password)
    }
}
