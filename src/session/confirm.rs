use console::{style, Term};
use log::warn;

/// Asks the user to confirm a destructive action such as logout or delete.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Prompt on the controlling terminal. Anything but an explicit yes declines.
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        let term = Term::stderr();
        if !term.is_term() {
            warn!("Not a terminal, cannot confirm '{prompt}', use `--yes` to skip");
            return false;
        }
        if term
            .write_str(&format!("{} {} ", style(prompt).bold(), style("[y/N]").dim()))
            .is_err()
        {
            return false;
        }
        match term.read_line() {
            Ok(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

/// Fixed answer, used for `--yes` and in tests.
pub struct AssumeConfirm(pub bool);

impl Confirm for AssumeConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}
