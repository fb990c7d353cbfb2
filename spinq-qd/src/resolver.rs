//! Track metadata resolution policy
//!
//! The engine keeps the metadata cache (resolution is cache-first and cached
//! entries never expire); this component covers the cache-miss path: query
//! the provider and apply the maximum-duration policy before anything is
//! stored or queued.

use crate::error::{Error, Result};
use crate::provider::MediaProvider;
use spinq_common::{TrackId, TrackInfo};
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub struct Resolver {
    provider: Arc<dyn MediaProvider>,
    max_track_seconds: u64,
}

impl Resolver {
    pub fn new(provider: Arc<dyn MediaProvider>, max_track_seconds: u64) -> Self {
        Self {
            provider,
            max_track_seconds,
        }
    }

    /// Query the provider for fresh metadata.
    ///
    /// Any provider failure maps to `TrackUnavailable`; a duration over the
    /// configured maximum is rejected before it can reach the cache.
    pub async fn fetch(&self, id: &TrackId) -> Result<TrackInfo> {
        let info = self.provider.track_info(id).await.map_err(|e| {
            warn!(%id, "provider could not resolve track: {}", e);
            Error::TrackUnavailable(id.clone())
        })?;

        if info.length_seconds > self.max_track_seconds {
            return Err(Error::TrackTooLong {
                id: id.clone(),
                length_seconds: info.length_seconds,
                max_seconds: self.max_track_seconds,
            });
        }

        Ok(info)
    }
}
