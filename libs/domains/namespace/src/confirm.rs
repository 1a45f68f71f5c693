use std::io::{self, BufRead, Write};

use tracing::warn;

/// Operator confirmation capability
///
/// Asked before writing into a namespace that already holds vectors.
#[cfg_attr(test, mockall::automock)]
pub trait Confirmation: Send + Sync {
    /// Returns true only on an explicit affirmative answer
    fn confirm(&self, prompt: &str) -> bool;
}

/// `y` or `yes`, any case, surrounding whitespace ignored
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

/// Prompts on stdout and blocks on one line of stdin. No timeout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirmation;

impl Confirmation for StdinConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        let mut stdout = io::stdout().lock();
        if write!(stdout, "{} ", prompt).and_then(|_| stdout.flush()).is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) => false,
            Ok(_) => is_affirmative(&answer),
            Err(e) => {
                warn!(error = %e, "Failed to read confirmation from stdin");
                false
            }
        }
    }
}

/// Answers yes to everything, for non-interactive runs
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoConfirm;

impl Confirmation for AutoConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_answers() {
        for answer in ["y", "Y", "yes", "YES", "Yes", " y\n", "yes\r\n"] {
            assert!(is_affirmative(answer), "{answer:?} should confirm");
        }
    }

    #[test]
    fn test_everything_else_declines() {
        for answer in ["", "\n", "n", "no", "N", "yep", "sure", "y y", "1", "true"] {
            assert!(!is_affirmative(answer), "{answer:?} should decline");
        }
    }

    #[test]
    fn test_auto_confirm() {
        assert!(AutoConfirm.confirm("Continue anyway? (y/N):"));
    }
}
