//! Event types for the spinq event system
//!
//! Provides the shared event definitions and the EventBus used by the queue
//! daemon and any attached frontend.
//!
//! # Architecture
//!
//! spinq uses hybrid communication:
//! - **EventBus** (tokio::broadcast): one-to-many event broadcasting
//! - **Command channels** (tokio::mpsc): request → single handler
//!
//! Events are broadcast via EventBus and can be serialized for transmission
//! to remote frontends.

use crate::track::TrackId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Why the queue stopped advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueEndReason {
    /// Backlog empty and autoplay is disabled
    AutoplayDisabled,
    /// Backlog empty, autoplay enabled, but the playlist has no tracks
    EmptyPlaylist,
}

/// spinq event types
///
/// All runtime notifications funnel through this central enum so frontends
/// can match exhaustively.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Track accepted into the backlog
    TrackQueued {
        id: TrackId,
        title: String,
        /// 1-based backlog position at enqueue time (0 = front insert)
        position: usize,
        /// True when enqueued by autoplay rather than a user request
        automatic: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Background fetch of a track payload began
    PreloadStarted {
        id: TrackId,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Background fetch failed; the track was swept from the backlog
    PreloadFailed {
        id: TrackId,
        reason: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Playback of a track started
    PlaybackStarted {
        id: TrackId,
        title: String,
        length_seconds: u64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Playback of the current track ended
    ///
    /// `completed` is false when the track was skipped or the session dropped.
    PlaybackFinished {
        id: TrackId,
        completed: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Quantized playback progress changed
    ProgressStep {
        id: TrackId,
        /// 0..=50
        step: u8,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Backlog contents changed (notification only, no data)
    QueueChanged {
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Backlog drained with nothing left to select
    QueueEnded {
        reason: QueueEndReason,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Human-readable notification line for the bound report channel
    ///
    /// Every runtime failure produces exactly one of these before the
    /// orchestrator resumes automatic selection.
    Notification {
        text: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

/// Central event broadcaster
///
/// Thin wrapper over `tokio::sync::broadcast` so emitting with zero
/// subscribers is not an error path callers have to think about.
pub struct EventBus {
    tx: broadcast::Sender<Event>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with the specified channel capacity.
    ///
    /// Slow subscribers that fall more than `capacity` events behind start
    /// losing the oldest events.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers.
    ///
    /// Send errors (no subscribers) are ignored; a daemon with no attached
    /// frontend is a normal condition.
    pub fn emit(&self, event: Event) {
        let _ = self.tx.send(event);
    }

    /// Configured channel capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of currently attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eventbus_new() {
        let bus = EventBus::new(100);
        assert_eq!(bus.capacity(), 100);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_eventbus_subscribe() {
        let bus = EventBus::new(100);
        let _rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        let _rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[test]
    fn test_eventbus_emit_no_subscribers() {
        let bus = EventBus::new(100);

        // Must not panic without subscribers
        bus.emit(Event::QueueChanged {
            timestamp: chrono::Utc::now(),
        });
    }

    #[tokio::test]
    async fn test_eventbus_emit_with_subscriber() {
        let bus = EventBus::new(100);
        let mut rx = bus.subscribe();

        bus.emit(Event::QueueEnded {
            reason: QueueEndReason::AutoplayDisabled,
            timestamp: chrono::Utc::now(),
        });

        let received = rx.recv().await.unwrap();
        match received {
            Event::QueueEnded { reason, .. } => {
                assert_eq!(reason, QueueEndReason::AutoplayDisabled);
            }
            other => panic!("Wrong event type received: {:?}", other),
        }
    }

    #[test]
    fn test_event_serialization_tag() {
        let event = Event::PlaybackStarted {
            id: TrackId::new("abc"),
            title: "Song".into(),
            length_seconds: 180,
            timestamp: chrono::Utc::now(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "PlaybackStarted");
        assert_eq!(json["id"], "abc");
    }
}
