//! Spinq Queue Daemon
//!
//! Orders, preloads, and plays back a queue of media tracks. A single engine
//! task owns all queue state; metadata resolution, cache downloads, voice
//! sessions, and progress reports run as spawned tasks that report back over
//! an internal channel. Queue state survives restarts via a JSON snapshot,
//! and track payloads are cached on disk with a completion-marker protocol.

pub mod config;
pub mod error;
pub mod persist;
pub mod playback;
pub mod preload;
pub mod provider;
pub mod request;
pub mod resolver;
pub mod transport;

pub use error::{Error, Result};
