//! Drives one commit-message generation from staged diff to commit.

use std::future::Future;

use tokio::io::AsyncWrite;
use tracing::{debug, info};

use crate::commit::{CommitMessage, assemble};
use crate::config::StyleConfig;
use crate::error::{AbortCause, CommitFlowError, InferenceError};
use crate::git::{CommitInvoker, DiffSource};
use crate::inference::Generator;
use crate::slimdiff::{self, SOFT_BUDGET_BYTES};

use super::confirm::Confirmer;
use super::report::{Notice, Reporter};
use super::state::{Event, FlowState, transition};

/// Exit status for a stream cut short by an interrupt signal.
pub const INTERRUPTED_EXIT_CODE: u8 = 130;

/// Where a flow stopped, and why.
#[derive(Debug)]
pub struct Outcome {
    pub state: FlowState,
    pub message: Option<CommitMessage>,
    pub cause: Option<AbortCause>,
}

impl Outcome {
    /// Process exit status: 0 for success and benign stops, 130 for an
    /// interrupted stream, 1 for every other failure.
    pub fn exit_code(&self) -> u8 {
        match self.state {
            FlowState::Aborted(reason) if reason.is_benign() => 0,
            FlowState::Aborted(_) => match self.cause {
                Some(AbortCause::Inference(InferenceError::Interrupted)) => INTERRUPTED_EXIT_CODE,
                _ => 1,
            },
            _ => 0,
        }
    }
}

/// The commit flow state machine bound to its collaborators.
pub struct CommitFlow<'a> {
    source: &'a dyn DiffSource,
    generator: &'a dyn Generator,
    reporter: &'a mut dyn Reporter,
    state: FlowState,
}

impl<'a> CommitFlow<'a> {
    pub fn new(
        source: &'a dyn DiffSource,
        generator: &'a dyn Generator,
        reporter: &'a mut dyn Reporter,
    ) -> Self {
        Self {
            source,
            generator,
            reporter,
            state: FlowState::Collecting,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    fn advance(&mut self, event: Event) -> Result<(), CommitFlowError> {
        let next = transition(self.state, event)?;
        debug!(from = ?self.state, ?event, to = ?next, "commit flow transition");
        self.state = next;
        Ok(())
    }

    fn stop(&mut self, event: Event, cause: Option<AbortCause>) -> Result<Outcome, CommitFlowError> {
        self.advance(event)?;
        Ok(Outcome {
            state: self.state,
            message: None,
            cause,
        })
    }

    /// Run from collection through streaming.
    ///
    /// Ends in `AwaitingConfirmation` with a message, or in `Aborted`. If
    /// `interrupt` resolves while streaming, the stream is dropped and the
    /// flow aborts.
    pub async fn generate(
        &mut self,
        style: &StyleConfig,
        output: &mut (dyn AsyncWrite + Unpin + Send),
        interrupt: impl Future<Output = ()>,
    ) -> Result<Outcome, CommitFlowError> {
        let raw = match self.source.collect() {
            Ok(raw) => raw,
            Err(e) => return self.stop(Event::CollectFailed, Some(e.into())),
        };
        if raw.is_empty() {
            return self.stop(Event::DiffEmpty, None);
        }
        self.advance(Event::DiffCollected)?;

        let cleaned = slimdiff::normalize(&raw);
        self.reporter.notice(Notice::DiffSizes {
            raw: raw.len(),
            cleaned: cleaned.len(),
        });
        if cleaned.is_empty() {
            return self.stop(Event::NormalizedEmpty, None);
        }
        if cleaned.exceeds_soft_budget() {
            self.reporter.notice(Notice::LargeChangeset {
                cleaned: cleaned.len(),
                threshold: SOFT_BUDGET_BYTES,
            });
        }
        self.advance(Event::DiffNormalized)?;

        let prompt = assemble(style, &cleaned);
        self.reporter
            .notice(Notice::InstructionSize(prompt.instruction_len()));
        self.reporter.notice(Notice::Configuration(*style));
        self.advance(Event::PromptAssembled)?;

        self.reporter.notice(Notice::Generating);
        let generator = self.generator;
        let result = tokio::select! {
            result = generator.generate(&prompt, output) => result,
            () = interrupt => {
                info!("interrupted while streaming");
                Err(InferenceError::Interrupted)
            }
        };
        self.reporter.notice(Notice::StreamFinished);

        match result {
            Ok(message) => {
                if style.use_conventional && !message.is_conventional() {
                    self.reporter
                        .notice(Notice::NonConventionalSubject(message.subject().to_string()));
                }
                self.advance(Event::StreamCompleted)?;
                Ok(Outcome {
                    state: self.state,
                    message: Some(message),
                    cause: None,
                })
            }
            Err(e) => self.stop(Event::StreamFailed, Some(e.into())),
        }
    }

    /// Run the whole flow: generate, confirm, commit.
    pub async fn run(
        &mut self,
        style: &StyleConfig,
        output: &mut (dyn AsyncWrite + Unpin + Send),
        interrupt: impl Future<Output = ()>,
        confirmer: &dyn Confirmer,
        committer: &dyn CommitInvoker,
    ) -> Result<Outcome, CommitFlowError> {
        let outcome = self.generate(style, output, interrupt).await?;
        if self.state != FlowState::AwaitingConfirmation {
            return Ok(outcome);
        }
        let message = outcome.message.ok_or(CommitFlowError::MissingMessage)?;

        if !confirmer.confirm(&message) {
            self.advance(Event::Declined)?;
            return Ok(Outcome {
                state: self.state,
                message: Some(message),
                cause: None,
            });
        }

        self.advance(Event::Confirmed)?;
        match committer.commit(message.as_str()) {
            Ok(()) => {
                self.advance(Event::CommitSucceeded)?;
                Ok(Outcome {
                    state: self.state,
                    message: Some(message),
                    cause: None,
                })
            }
            Err(e) => {
                self.advance(Event::CommitFailed)?;
                Ok(Outcome {
                    state: self.state,
                    message: Some(message),
                    cause: Some(e.into()),
                })
            }
        }
    }
}
