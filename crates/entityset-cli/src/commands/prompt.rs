//! Interactive confirmation of an inferred role mapping.

use std::io::{self, BufRead, Write};

use colored::Colorize;
use entityset::{ConfirmMapping, RoleAssignment};

/// Prints the mapping to stderr and reads a yes/no answer from stdin.
pub struct ConsoleConfirm;

impl ConfirmMapping for ConsoleConfirm {
    fn confirm(&self, assignment: &RoleAssignment) -> bool {
        eprintln!("{}", "Inferred mapping:".yellow().bold());
        match serde_json::to_string_pretty(assignment) {
            Ok(json) => eprintln!("{}", json),
            Err(e) => eprintln!("(could not display mapping: {})", e),
        }

        eprint!("Continue with this mapping? [y/N]: ");
        if io::stderr().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            // A closed stdin declines
            Ok(0) | Err(_) => false,
            Ok(_) => accepts(&answer),
        }
    }
}

/// Only an answer starting with `y` accepts; an empty line declines.
fn accepts(answer: &str) -> bool {
    answer.trim_start().to_lowercase().starts_with('y')
}
