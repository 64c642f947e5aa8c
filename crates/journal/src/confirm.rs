//! Confirmation before destructive work

use std::io::{self, BufRead, Write};

/// Asks whether a deletion should go ahead
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;
}

/// Interactive yes/no prompt on stdin
///
/// Accepts `yes` or `y` in any case. Anything else, including end of
/// input, declines.
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;

        Ok(is_affirmative(&answer))
    }
}

/// Fixed answer, for `--no_confirm` and tests
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> io::Result<bool> {
        Ok(self.0)
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "yes" | "y")
}
