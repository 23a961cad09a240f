//! Commit flow states and the pure transition function.

use std::fmt;

use crate::error::CommitFlowError;

/// Why a flow ended in [`FlowState::Aborted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbortReason {
    GitUnavailable,
    NoStagedChanges,
    NoMeaningfulContent,
    InferenceFailure,
    CommitFailure,
}

impl AbortReason {
    /// Benign terminal conditions end the process successfully.
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            AbortReason::NoStagedChanges | AbortReason::NoMeaningfulContent
        )
    }
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AbortReason::GitUnavailable => "git unavailable",
            AbortReason::NoStagedChanges => "no staged changes",
            AbortReason::NoMeaningfulContent => "no meaningful content",
            AbortReason::InferenceFailure => "inference failure",
            AbortReason::CommitFailure => "commit failure",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowState {
    Collecting,
    Normalizing,
    Assembling,
    Streaming,
    AwaitingConfirmation,
    Committing,
    Committed,
    Cancelled,
    Aborted(AbortReason),
}

impl FlowState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FlowState::Committed | FlowState::Cancelled | FlowState::Aborted(_)
        )
    }
}

/// Inputs that move the flow forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    DiffCollected,
    CollectFailed,
    DiffEmpty,
    DiffNormalized,
    NormalizedEmpty,
    PromptAssembled,
    StreamCompleted,
    StreamFailed,
    Confirmed,
    Declined,
    CommitSucceeded,
    CommitFailed,
}

/// Next state for `event` in `state`.
///
/// Any pair not listed is a controller bug and is rejected; terminal states
/// accept no events.
pub fn transition(state: FlowState, event: Event) -> Result<FlowState, CommitFlowError> {
    use AbortReason::*;
    use Event::*;
    use FlowState::*;

    let next = match (state, event) {
        (Collecting, DiffCollected) => Normalizing,
        (Collecting, DiffEmpty) => Aborted(NoStagedChanges),
        (Collecting, CollectFailed) => Aborted(GitUnavailable),
        (Normalizing, DiffNormalized) => Assembling,
        (Normalizing, NormalizedEmpty) => Aborted(NoMeaningfulContent),
        (Assembling, PromptAssembled) => Streaming,
        (Streaming, StreamCompleted) => AwaitingConfirmation,
        (Streaming, StreamFailed) => Aborted(InferenceFailure),
        (AwaitingConfirmation, Confirmed) => Committing,
        (AwaitingConfirmation, Declined) => Cancelled,
        (Committing, CommitSucceeded) => Committed,
        (Committing, CommitFailed) => Aborted(CommitFailure),
        (state, event) => return Err(CommitFlowError::InvalidTransition { state, event }),
    };
    Ok(next)
}
