//! Streaming commit message generation.

pub mod client;
pub mod decoder;
pub mod render;

use async_trait::async_trait;
use tokio::io::AsyncWrite;

use crate::commit::{CommitMessage, Prompt};
use crate::error::InferenceError;

pub use client::InferenceClient;
pub use decoder::{Frame, LineDecoder, pump};
pub use render::render_chunks;

/// Turns a prompt into a commit message, rendering partial output to `output`
/// while it is generated.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(
        &self,
        prompt: &Prompt,
        output: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<CommitMessage, InferenceError>;
}
