//! Media provider seam
//!
//! The provider is the black box that turns a track id into metadata and a
//! payload byte stream. The daemon only depends on the `MediaProvider` trait;
//! the bundled `HttpProvider` talks to a provider service over HTTP.

use async_trait::async_trait;
use futures::TryStreamExt;
use spinq_common::{TrackId, TrackInfo};
use std::time::Duration;
use tokio::io::AsyncRead;
use tokio_util::io::StreamReader;
use tracing::debug;

/// Opaque payload byte stream with the metadata the provider reported for it.
pub struct MediaStream {
    /// Provider metadata observed at stream-open time. May differ from the
    /// metadata cached at resolution time, which is why the preloader
    /// re-validates duration against it.
    pub info: TrackInfo,

    /// Raw payload bytes
    pub reader: Box<dyn AsyncRead + Send + Unpin>,
}

/// External media provider: metadata lookup plus payload streaming.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Resolve durable metadata for a track id.
    async fn track_info(&self, id: &TrackId) -> anyhow::Result<TrackInfo>;

    /// Open the payload byte stream for a track id.
    async fn open_stream(&self, id: &TrackId) -> anyhow::Result<MediaStream>;
}

/// HTTP-backed provider client
///
/// Expects a service exposing:
/// - `GET {base}/tracks/{id}` → `TrackInfo` JSON
/// - `GET {base}/tracks/{id}/media` → payload bytes
pub struct HttpProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(concat!("spinq/", env!("CARGO_PKG_VERSION")))
                .connect_timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to build HTTP client (system error)"),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl MediaProvider for HttpProvider {
    async fn track_info(&self, id: &TrackId) -> anyhow::Result<TrackInfo> {
        let url = format!("{}/tracks/{}", self.base_url, id);
        debug!(%id, %url, "fetching track metadata");

        let info = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<TrackInfo>()
            .await?;

        Ok(info)
    }

    async fn open_stream(&self, id: &TrackId) -> anyhow::Result<MediaStream> {
        let info = self.track_info(id).await?;

        let url = format!("{}/tracks/{}/media", self.base_url, id);
        debug!(%id, %url, "opening media stream");

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let stream = response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));

        Ok(MediaStream {
            info,
            reader: Box::new(StreamReader::new(stream)),
        })
    }
}
