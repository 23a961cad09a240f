//! Decoding of the newline-delimited JSON generation stream.

use bytes::{BufMut, Bytes, BytesMut};
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc::Sender;
use tracing::{debug, trace};

use crate::error::InferenceError;

/// One object of the Ollama `/api/generate` stream.
#[derive(Debug, Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    error: Option<String>,
}

/// A decoded stream event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Done,
}

/// Buffer-driven line decoder.
///
/// Bytes are buffered until a full line is available, so a UTF-8 sequence
/// split across network reads is decoded only once it is complete.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: BytesMut,
    done: bool,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(8192),
            done: false,
        }
    }

    /// Whether the completion marker has been seen.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed bytes and return the frames of every complete line.
    ///
    /// Nothing after the completion marker is decoded.
    pub fn push(&mut self, bytes: &[u8]) -> Result<Vec<Frame>, InferenceError> {
        let mut frames = Vec::new();
        if self.done {
            return Ok(frames);
        }
        self.buffer.put_slice(bytes);

        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let line = self.buffer.split_to(newline + 1);
            decode_line(&line[..newline], &mut frames)?;
            if frames.last() == Some(&Frame::Done) {
                self.done = true;
                self.buffer.clear();
                break;
            }
        }

        Ok(frames)
    }

    /// Decode a final line left without a trailing newline.
    pub fn finish(&mut self) -> Result<Vec<Frame>, InferenceError> {
        let mut frames = Vec::new();
        if self.done || self.buffer.is_empty() {
            return Ok(frames);
        }

        let rest = self.buffer.split();
        decode_line(&rest, &mut frames)?;
        if frames.last() == Some(&Frame::Done) {
            self.done = true;
        }
        Ok(frames)
    }
}

fn decode_line(line: &[u8], frames: &mut Vec<Frame>) -> Result<(), InferenceError> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return Ok(());
    }
    trace!(bytes = line.len(), "decoding stream line");

    let chunk: GenerateChunk = serde_json::from_slice(line).map_err(|e| {
        InferenceError::Malformed(format!("{e}: {}", String::from_utf8_lossy(line)))
    })?;

    if let Some(message) = chunk.error {
        return Err(InferenceError::Backend(message));
    }
    if !chunk.response.is_empty() {
        frames.push(Frame::Text(chunk.response));
    }
    if chunk.done {
        frames.push(Frame::Done);
    }
    Ok(())
}

/// Read the response body to completion, forwarding each text fragment to
/// `sender` in arrival order. Returns the accumulated text.
///
/// A stream that ends before the completion marker is an error: partial
/// output is never treated as a finished message.
pub async fn pump<S, E>(mut stream: S, sender: Sender<String>) -> Result<String, InferenceError>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut decoder = LineDecoder::new();
    let mut message = String::new();

    debug!("reading inference stream");
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| InferenceError::Read(Box::new(e)))?;
        trace!(bytes = chunk.len(), "received");
        let frames = decoder.push(&chunk)?;
        if forward(frames, &mut message, &sender).await {
            debug!(chars = message.len(), "inference stream completed");
            return Ok(message);
        }
    }

    let frames = decoder.finish()?;
    if forward(frames, &mut message, &sender).await {
        return Ok(message);
    }

    debug!(chars = message.len(), "inference stream closed without completion marker");
    Err(InferenceError::Truncated)
}

/// Returns true once the completion marker is reached.
async fn forward(frames: Vec<Frame>, message: &mut String, sender: &Sender<String>) -> bool {
    for frame in frames {
        match frame {
            Frame::Text(text) => {
                message.push_str(&text);
                // A closed receiver means rendering stopped; keep accumulating.
                let _ = sender.send(text).await;
            }
            Frame::Done => return true,
        }
    }
    false
}
