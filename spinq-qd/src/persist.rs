//! Queue snapshot persistence
//!
//! The whole queue state is serialized as one JSON document. All writes for a
//! path go through a single writer task fed by an unbounded FIFO channel, so
//! snapshots land on disk in submission order and a stale snapshot can never
//! overwrite a newer one. Write failures are logged; in-memory state stays
//! authoritative and the next successful save catches up.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use spinq_common::{TrackId, TrackInfo};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

/// Persisted queue state
///
/// Wire format matches the historical `data.json`:
/// `{ "playlist": [...], "trackInfo": { id: {...} }, "backlog": [...] }`.
/// Missing keys load as empty (older files had no `backlog`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub playlist: Vec<TrackId>,
    pub track_info: HashMap<TrackId, TrackInfo>,
    pub backlog: Vec<TrackId>,
}

/// Snapshot store bound to one state-file path.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the stored snapshot, defaulting to empty when the file is absent.
    ///
    /// A corrupt file is reported and treated as empty rather than aborting
    /// startup.
    pub async fn load(&self) -> Snapshot {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!(
                        "state file {} is corrupt, starting empty: {}",
                        self.path.display(),
                        e
                    );
                    Snapshot::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Snapshot::default(),
            Err(e) => {
                warn!("could not read state file {}: {}", self.path.display(), e);
                Snapshot::default()
            }
        }
    }

    /// Spawn the single writer task for this path and return its handle.
    pub fn spawn_writer(self) -> StoreHandle {
        let (tx, mut rx) = mpsc::unbounded_channel::<Snapshot>();

        tokio::spawn(async move {
            while let Some(snapshot) = rx.recv().await {
                match self.write(&snapshot).await {
                    Ok(()) => debug!("wrote state file {}", self.path.display()),
                    Err(e) => {
                        error!("could not write state file {}: {}", self.path.display(), e)
                    }
                }
            }
        });

        StoreHandle { tx }
    }

    /// Serialize and write one snapshot, via a temp file and rename so a
    /// crash mid-write never leaves a truncated state file.
    async fn write(&self, snapshot: &Snapshot) -> Result<()> {
        let bytes =
            serde_json::to_vec(snapshot).map_err(|e| Error::Persistence(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// Cheap cloneable handle for submitting snapshots to the writer task.
#[derive(Clone)]
pub struct StoreHandle {
    tx: mpsc::UnboundedSender<Snapshot>,
}

impl StoreHandle {
    /// Queue a snapshot for writing. Never blocks, never fails the caller.
    pub fn save(&self, snapshot: Snapshot) {
        if self.tx.send(snapshot).is_err() {
            warn!("state writer task is gone, dropping snapshot");
        }
    }
}
