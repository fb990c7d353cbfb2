//! Voice and messaging transport seams
//!
//! The session layer that actually joins a channel and pushes audio bytes is
//! external. The engine drives it through these traits; the `Logging*`
//! implementations keep the daemon runnable headless.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::AsyncRead;
use tracing::{debug, info};

/// Handle to a previously sent message, usable for later edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHandle(pub u64);

/// Voice output channel: join once, then stream payloads into it.
#[async_trait]
pub trait VoiceOutput: Send + Sync {
    /// Join the configured output channel. Idempotent.
    async fn join(&self) -> anyhow::Result<()>;

    /// Begin streaming the given payload. Returns once the stream is handed
    /// off; the transport owns playout from there.
    async fn play(&self, audio: Box<dyn AsyncRead + Send + Unpin>) -> anyhow::Result<()>;

    /// Stop the current output stream, if any.
    async fn stop(&self);
}

/// Report channel for human-readable notifications and the progress message.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, text: &str) -> anyhow::Result<MessageHandle>;

    async fn edit(&self, handle: &MessageHandle, text: &str) -> anyhow::Result<()>;
}

/// Voice output that drains streams and logs, for headless operation.
#[derive(Debug, Default)]
pub struct LoggingVoice;

#[async_trait]
impl VoiceOutput for LoggingVoice {
    async fn join(&self) -> anyhow::Result<()> {
        info!("voice: joined output channel");
        Ok(())
    }

    async fn play(&self, mut audio: Box<dyn AsyncRead + Send + Unpin>) -> anyhow::Result<()> {
        let bytes = tokio::io::copy(&mut audio, &mut tokio::io::sink()).await?;
        info!(bytes, "voice: drained payload stream");
        Ok(())
    }

    async fn stop(&self) {
        info!("voice: stopped output stream");
    }
}

/// Messenger that writes notifications to the log.
#[derive(Debug, Default)]
pub struct LoggingMessenger {
    counter: AtomicU64,
}

#[async_trait]
impl Messenger for LoggingMessenger {
    async fn send(&self, text: &str) -> anyhow::Result<MessageHandle> {
        let id = self.counter.fetch_add(1, Ordering::Relaxed);
        info!(message = id, "report: {}", text);
        Ok(MessageHandle(id))
    }

    async fn edit(&self, handle: &MessageHandle, text: &str) -> anyhow::Result<()> {
        debug!(message = handle.0, "report edit: {}", text);
        Ok(())
    }
}
