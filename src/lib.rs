//! diny - commit messages for staged changes, generated by a local model.
//!
//! # Overview
//!
//! diny collects the staged diff, strips it down to the lines that carry
//! signal (`slimdiff`), builds a prompt from the user's style preferences,
//! streams a message from a local Ollama server while printing it, and commits
//! it once the user accepts.

pub mod commit;
pub mod config;
pub mod error;
pub mod flow;
pub mod git;
pub mod inference;
pub mod slimdiff;

// Re-export commonly used types
pub use commit::{CommitMessage, Prompt};
pub use config::{InferenceSettings, Length, StyleConfig, Tone};
pub use error::{AbortCause, CommitFlowError, ConfigError, GitError, InferenceError};
pub use flow::{AbortReason, CommitFlow, FlowState, Outcome};
pub use git::RawDiff;
pub use inference::{Generator, InferenceClient};
pub use slimdiff::NormalizedDiff;
