//! Playback engine and queue management

pub mod engine;
pub mod progress;
pub mod queue;
pub mod state;

pub use engine::{paginate, Engine, EngineHandle, BACKLOG_PAGE_SIZE};
pub use queue::Queue;
pub use state::{CurrentTrack, PlayerState};
