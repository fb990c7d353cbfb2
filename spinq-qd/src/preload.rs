//! Background payload preloading
//!
//! Fetches track payloads ahead of playback need into the on-disk cache.
//! Layout per id: `<music_dir>/<id>.track` holds the raw payload and
//! `<music_dir>/<id>.complete` is a zero-byte completion marker. The marker
//! is created strictly after the payload is fully written, and it is the only
//! fact a process (including a freshly restarted one) may trust about cache
//! readiness; payload presence alone proves nothing.
//!
//! All work happens in spawned tasks; outcomes flow back to the engine task
//! over its internal channel, which re-validates state before acting.

use crate::error::{Error, Result};
use crate::playback::engine::{Internal, ProbeIntent};
use crate::provider::MediaProvider;
use spinq_common::{TrackId, TrackInfo};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub struct Preloader {
    music_dir: PathBuf,
    provider: Arc<dyn MediaProvider>,
    max_track_seconds: u64,
    internal_tx: mpsc::UnboundedSender<Internal>,
}

impl Preloader {
    pub(crate) fn new(
        music_dir: PathBuf,
        provider: Arc<dyn MediaProvider>,
        max_track_seconds: u64,
        internal_tx: mpsc::UnboundedSender<Internal>,
    ) -> Self {
        Self {
            music_dir,
            provider,
            max_track_seconds,
            internal_tx,
        }
    }

    /// Payload path for a track id.
    pub fn track_path(&self, id: &TrackId) -> PathBuf {
        self.music_dir.join(format!("{}.track", id))
    }

    /// Completion marker path for a track id.
    pub fn marker_path(&self, id: &TrackId) -> PathBuf {
        self.music_dir.join(format!("{}.complete", id))
    }

    /// Check the completion marker off the engine task and report back.
    pub(crate) fn spawn_probe(&self, id: TrackId, intent: ProbeIntent) {
        let marker = self.marker_path(&id);
        let tx = self.internal_tx.clone();

        tokio::spawn(async move {
            let cached = tokio::fs::try_exists(&marker).await.unwrap_or(false);
            let _ = tx.send(Internal::Probe { id, cached, intent });
        });
    }

    /// Download one track payload into the cache.
    ///
    /// The caller (engine) has already claimed the id in its preloading set;
    /// exactly one fetch task exists per claimed id.
    pub fn spawn_fetch(&self, info: TrackInfo) {
        let provider = Arc::clone(&self.provider);
        let track_path = self.track_path(&info.id);
        let marker_path = self.marker_path(&info.id);
        let max_track_seconds = self.max_track_seconds;
        let tx = self.internal_tx.clone();

        tokio::spawn(async move {
            let id = info.id.clone();
            match fetch_to_cache(
                provider,
                &track_path,
                &marker_path,
                &info,
                max_track_seconds,
            )
            .await
            {
                Ok(()) => {
                    info!(%id, "preload finished");
                    let _ = tx.send(Internal::FetchFinished { id });
                }
                Err(e) => {
                    // Never leave a partial payload behind; without the
                    // marker it would still be untrusted, but it would waste
                    // disk and confuse debugging.
                    if tokio::fs::try_exists(&track_path).await.unwrap_or(false) {
                        if let Err(rm) = tokio::fs::remove_file(&track_path).await {
                            warn!(%id, "could not remove partial payload: {}", rm);
                        }
                    }
                    let _ = tx.send(Internal::FetchFailed {
                        id,
                        reason: e.to_string(),
                    });
                }
            }
        });
    }
}

/// Stream the payload to disk, then write the completion marker.
///
/// Marker-after-payload ordering is mandatory: a crash between the two
/// leaves an unmarked partial file that the next run simply re-fetches.
async fn fetch_to_cache(
    provider: Arc<dyn MediaProvider>,
    track_path: &Path,
    marker_path: &Path,
    info: &TrackInfo,
    max_track_seconds: u64,
) -> Result<()> {
    let mut stream = provider
        .open_stream(&info.id)
        .await
        .map_err(|e| Error::Download(e.to_string()))?;

    // The provider reports metadata again at stream-open time; re-validate
    // the duration policy in case it changed since resolution.
    if stream.info.length_seconds > max_track_seconds {
        return Err(Error::Download(format!(
            "validation rejected: track runs {}s, over the {}s limit",
            stream.info.length_seconds, max_track_seconds
        )));
    }

    debug!(id = %info.id, "streaming payload to {}", track_path.display());

    let mut file = tokio::fs::File::create(track_path).await?;
    tokio::io::copy(&mut stream.reader, &mut file)
        .await
        .map_err(|e| Error::Download(e.to_string()))?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::File::create(marker_path).await?.sync_all().await?;
    Ok(())
}
