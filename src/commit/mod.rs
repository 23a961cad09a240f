//! Prompt assembly and the generated commit message.

pub mod message;
pub mod prompt;

pub use message::{CommitMessage, CommitType, ConventionalSubject, parse_conventional_subject};
pub use prompt::{Prompt, assemble, build_instructions};
