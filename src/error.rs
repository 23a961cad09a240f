//! Error types for diny modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from invoking the git backend.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("git was not found in PATH. Install git and try again.")]
    NotInstalled,

    #[error("Failed to run git {operation}: {source}")]
    SpawnFailed {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {operation} exited with code {code}: {stderr}")]
    NonZeroExit {
        operation: String,
        code: i32,
        stderr: String,
    },

    #[error("Not a git repository: {0}")]
    NotARepository(#[source] git2::Error),

    #[error("Could not locate the diny executable: {0}")]
    ExecutableNotFound(String),

    #[error("A {} hook not written by diny already exists. Remove it or add `diny message` to it yourself.", path.display())]
    ForeignHook { path: PathBuf },

    #[error("Failed to write git hook at {}: {source}", path.display())]
    HookWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the style configuration store.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration at {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration at {}: {source}", path.display())]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write configuration at {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    SerializeFailed(#[source] serde_json::Error),

    #[error("Configuration prompt failed: {0}")]
    Interaction(#[source] dialoguer::Error),

    #[error(transparent)]
    Repository(#[from] GitError),
}

/// Errors from the streaming inference client.
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Could not reach the inference server at {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Inference server responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Inference stream failed mid-read: {0}")]
    Read(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Inference server reported an error: {0}")]
    Backend(String),

    #[error("Inference server sent a malformed chunk: {0}")]
    Malformed(String),

    #[error("Inference stream closed before the completion marker")]
    Truncated,

    #[error("Inference server returned an empty message")]
    EmptyResponse,

    #[error("Inference server did not respond within {0} seconds")]
    Timeout(u64),

    #[error("Generation interrupted")]
    Interrupted,

    #[error("Failed to render streamed output: {0}")]
    Render(#[source] std::io::Error),
}

/// Underlying cause attached to an aborted commit flow.
#[derive(Error, Debug)]
pub enum AbortCause {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// Errors from the commit flow controller itself.
///
/// These indicate a controller bug, not a failed collaborator; collaborator
/// failures end the flow in an `Aborted` state instead.
#[derive(Error, Debug)]
pub enum CommitFlowError {
    #[error("Invalid commit flow transition: {event:?} in state {state:?}")]
    InvalidTransition {
        state: crate::flow::FlowState,
        event: crate::flow::Event,
    },

    #[error("Commit flow reached confirmation without a message")]
    MissingMessage,
}
