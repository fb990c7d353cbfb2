//! Player state machine types
//!
//! The controller loops between four states for as long as the process
//! runs: `Idle` (nothing selected), `AwaitingPreload` (a track has been
//! popped from the backlog and playback is gated on its cache), `Joining`
//! (cache ready, transport handoff in flight), and `Playing`. The
//! popped-but-not-playing track is the "blocking track": selection never
//! pops another entry while one is pending.

use spinq_common::{TrackId, TrackInfo};
use tokio::time::Instant;

/// Track currently streaming to the voice output.
#[derive(Debug, Clone)]
pub struct CurrentTrack {
    pub info: TrackInfo,

    /// Playback start, on the tokio clock so simulated time works in tests.
    pub started: Instant,
}

/// Playback controller state.
#[derive(Debug)]
pub enum PlayerState {
    /// Nothing selected; the next trigger enters selection.
    Idle,

    /// `id` was popped from the backlog and is gating playback start
    /// (preload in progress or imminent).
    AwaitingPreload { id: TrackId },

    /// Cache is ready and the voice session is being established. Playing
    /// is entered only once the transport accepts the stream.
    Joining { info: TrackInfo },

    /// A track is streaming; the advance timer is armed for its duration.
    Playing { current: CurrentTrack },
}

impl PlayerState {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlayerState::Playing { .. })
    }

    /// The blocking track id, when playback is gated on a preload.
    pub fn blocking(&self) -> Option<&TrackId> {
        match self {
            PlayerState::AwaitingPreload { id } => Some(id),
            _ => None,
        }
    }
}
