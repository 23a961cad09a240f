//! Streaming client for a local Ollama-compatible generation server.

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::AsyncWrite;
use tokio::sync::mpsc;
use tracing::debug;

use crate::commit::{CommitMessage, Prompt};
use crate::config::InferenceSettings;
use crate::error::InferenceError;

use super::Generator;
use super::decoder::pump;
use super::render::render_chunks;

/// Chunks buffered between the network reader and the renderer.
const CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// HTTP client for `POST /api/generate`.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    http: reqwest::Client,
    settings: InferenceSettings,
}

impl InferenceClient {
    pub fn new(settings: InferenceSettings) -> Result<Self, InferenceError> {
        let http = reqwest::Client::builder()
            .connect_timeout(settings.timeout)
            .build()
            .map_err(InferenceError::ClientBuild)?;
        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &InferenceSettings {
        &self.settings
    }

    /// Send `prompt` in a single request and stream the reply into `output`.
    ///
    /// The timeout bounds the wait for response headers; a slow but live
    /// stream is not cut off. One attempt only.
    pub async fn stream_message(
        &self,
        prompt: &Prompt,
        output: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<CommitMessage, InferenceError> {
        let url = self.settings.generate_url();
        let request = GenerateRequest {
            model: &self.settings.model,
            prompt: prompt.as_str(),
            stream: true,
        };
        debug!(%url, model = %self.settings.model, prompt_bytes = prompt.len(), "opening inference stream");

        let response = tokio::time::timeout(
            self.settings.timeout,
            self.http.post(&url).json(&request).send(),
        )
        .await
        .map_err(|_| InferenceError::Timeout(self.settings.timeout.as_secs()))?
        .map_err(|source| InferenceError::Connect {
            endpoint: self.settings.endpoint.clone(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                debug!(error = %e, "failed to read error response body");
                String::new()
            });
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let (text, rendered) = tokio::join!(
            pump(response.bytes_stream(), sender),
            render_chunks(output, receiver)
        );
        let text = text?;
        rendered.map_err(InferenceError::Render)?;

        CommitMessage::from_generated(&text).ok_or(InferenceError::EmptyResponse)
    }
}

#[async_trait]
impl Generator for InferenceClient {
    async fn generate(
        &self,
        prompt: &Prompt,
        output: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<CommitMessage, InferenceError> {
        self.stream_message(prompt, output).await
    }
}
