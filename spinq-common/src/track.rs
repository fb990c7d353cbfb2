//! Track identity and metadata types
//!
//! A track id is whatever opaque string the media provider uses to identify a
//! track. Resolved metadata is immutable once stored and is serialized into
//! the persisted snapshot using the historical `data.json` field names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque track identifier understood by the media provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TrackId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Resolved track metadata.
///
/// Field names are camelCase on the wire so snapshots written by earlier
/// deployments keep loading (`lengthSeconds` in particular).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackInfo {
    /// Provider track id
    pub id: TrackId,

    /// Display title
    pub title: String,

    /// Duration in seconds, per provider metadata
    pub length_seconds: u64,
}
