//! User-facing progress lines and final outcome messages.

use crate::config::StyleConfig;
use crate::error::AbortCause;

use super::controller::Outcome;
use super::state::{AbortReason, FlowState};

/// Non-blocking diagnostics emitted while the flow runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    DiffSizes { raw: usize, cleaned: usize },
    LargeChangeset { cleaned: usize, threshold: usize },
    InstructionSize(usize),
    Configuration(StyleConfig),
    Generating,
    StreamFinished,
    NonConventionalSubject(String),
}

/// Sink for [`Notice`]s.
pub trait Reporter {
    fn notice(&mut self, notice: Notice);
}

/// Collects notices in order.
impl Reporter for Vec<Notice> {
    fn notice(&mut self, notice: Notice) {
        self.push(notice);
    }
}

/// Text of a notice as printed to the terminal.
pub fn render_notice(notice: &Notice) -> String {
    match notice {
        Notice::DiffSizes { raw, cleaned } => {
            format!("📏 Diff size → Raw: {raw} chars | Cleaned: {cleaned} chars")
        }
        Notice::LargeChangeset { .. } => {
            "⚠️ Large changeset detected, this may take longer to process ⏳".to_string()
        }
        Notice::InstructionSize(len) => format!("📏 Inst size → {len} chars"),
        Notice::Configuration(style) => format!(
            "⚙️  Configuration:\n   • Emoji: {}\n   • Conventional: {}\n   • Tone: {}\n   • Length: {}\n",
            style.use_emoji, style.use_conventional, style.tone, style.length
        ),
        Notice::Generating => "🐢 My tiny server is thinking hard, hold tight!\n".to_string(),
        Notice::StreamFinished => String::new(),
        Notice::NonConventionalSubject(subject) => {
            format!("⚠️ Subject does not follow the conventional format: {subject}")
        }
    }
}

/// Prints notices to stdout, or to stderr when stdout carries the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter {
    to_stderr: bool,
}

impl ConsoleReporter {
    pub fn stdout() -> Self {
        Self { to_stderr: false }
    }

    pub fn stderr() -> Self {
        Self { to_stderr: true }
    }
}

impl Reporter for ConsoleReporter {
    fn notice(&mut self, notice: Notice) {
        let text = render_notice(&notice);
        if self.to_stderr {
            eprintln!("{text}");
        } else {
            println!("{text}");
        }
    }
}

/// Final message for a finished flow, `None` while it is still waiting for
/// confirmation.
pub fn describe_outcome(outcome: &Outcome) -> Option<String> {
    let cause = || {
        outcome
            .cause
            .as_ref()
            .map(AbortCause::to_string)
            .unwrap_or_else(|| "unknown error".to_string())
    };

    let text = match outcome.state {
        FlowState::Committed => "✅ Commit successfully added to history!".to_string(),
        FlowState::Cancelled => "🚫 Commit cancelled.".to_string(),
        FlowState::Aborted(AbortReason::NoStagedChanges) => {
            "🦴 No staged changes found. Stage files first with `git add`.".to_string()
        }
        FlowState::Aborted(AbortReason::NoMeaningfulContent) => {
            "🌱 No meaningful content detected in the diff.".to_string()
        }
        FlowState::Aborted(AbortReason::GitUnavailable) => {
            format!("❌ Failed to get git diff: {}", cause())
        }
        FlowState::Aborted(AbortReason::InferenceFailure) => {
            format!("💥 Error generating commit message: {}", cause())
        }
        FlowState::Aborted(AbortReason::CommitFailure) => {
            format!("❌ Commit failed: {}", cause())
        }
        _ => return None,
    };
    Some(text)
}
