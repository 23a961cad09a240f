//! Incremental rendering of streamed text.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::Receiver;
use tracing::debug;

/// Write every received chunk to `writer` as it arrives, flushing after each
/// so partial output is visible immediately.
pub async fn render_chunks<W>(writer: &mut W, mut receiver: Receiver<String>) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    while let Some(chunk) = receiver.recv().await {
        writer.write_all(chunk.as_bytes()).await?;
        writer.flush().await?;
    }
    debug!("End of streaming");
    Ok(())
}
