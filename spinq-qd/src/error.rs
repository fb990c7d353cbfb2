//! Error types for spinq-qd
//!
//! Defines module-specific error types using thiserror for clear error
//! propagation. Track-level failures are recovered locally and surfaced as a
//! single notification; only startup configuration errors are fatal.

use spinq_common::TrackId;
use thiserror::Error;

/// Main error type for the spinq queue daemon
#[derive(Error, Debug)]
pub enum Error {
    /// Provider could not resolve the track (missing, private, or geoblocked)
    #[error("track {0} does not exist or is geoblocked")]
    TrackUnavailable(TrackId),

    /// Track duration exceeds the configured maximum
    #[error("track {id} runs {length_seconds}s, over the configured maximum of {max_seconds}s")]
    TrackTooLong {
        id: TrackId,
        length_seconds: u64,
        max_seconds: u64,
    },

    /// Payload fetch failed (network error or validation rejection)
    #[error("download failed: {0}")]
    Download(String),

    /// Voice transport join or stream handoff failed
    #[error("voice session error: {0}")]
    Join(String),

    /// Snapshot serialization or write failure (logged, never fatal)
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Configuration loading or validation error (startup only)
    #[error("configuration error: {0}")]
    Config(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using the spinq-qd Error
pub type Result<T> = std::result::Result<T, Error>;
