//! Accept/reject step before committing.

use dialoguer::Confirm;
use tracing::warn;

use crate::commit::CommitMessage;

/// Pressing Enter alone must not commit.
const COMMIT_BY_DEFAULT: bool = false;

/// Asks whether a generated message should be committed.
pub trait Confirmer {
    fn confirm(&self, message: &CommitMessage) -> bool;
}

/// Terminal yes/no prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct DialoguerConfirmer;

impl Confirmer for DialoguerConfirmer {
    /// A prompt that cannot be shown (no TTY, Ctrl-C) counts as a decline.
    fn confirm(&self, _message: &CommitMessage) -> bool {
        println!();
        match Confirm::new()
            .with_prompt("👉 Do you want to commit with this message?")
            .default(COMMIT_BY_DEFAULT)
            .interact()
        {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "confirmation prompt failed, treating as decline");
                false
            }
        }
    }
}
