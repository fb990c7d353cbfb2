//! # Spinq Common Library
//!
//! Shared code for the spinq media-queue orchestrator:
//! - Track identity and metadata types
//! - Event types (Event enum) and the EventBus
//! - Human-readable time formatting

pub mod events;
pub mod human_time;
pub mod track;

pub use events::{Event, EventBus, QueueEndReason};
pub use track::{TrackId, TrackInfo};
