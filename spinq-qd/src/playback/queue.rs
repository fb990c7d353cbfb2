//! Backlog and playlist container
//!
//! Pure ordered state: strict FIFO backlog with front insertion for
//! play-now requests, plus the persisted playlist that autoplay draws from.
//! Duplicate ids are allowed; the failure sweep removes every occurrence.

use rand::Rng;
use spinq_common::TrackId;
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct Queue {
    backlog: VecDeque<TrackId>,
    playlist: Vec<TrackId>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted state.
    pub fn from_parts(backlog: Vec<TrackId>, playlist: Vec<TrackId>) -> Self {
        Self {
            backlog: backlog.into(),
            playlist,
        }
    }

    /// Append to the end of the backlog (normal enqueue).
    pub fn push_back(&mut self, id: TrackId) {
        self.backlog.push_back(id);
    }

    /// Insert at the front of the backlog (play-now enqueue).
    pub fn push_front(&mut self, id: TrackId) {
        self.backlog.push_front(id);
    }

    /// Pop the backlog head for selection.
    pub fn pop_front(&mut self) -> Option<TrackId> {
        self.backlog.pop_front()
    }

    /// Current backlog head, if any.
    pub fn head(&self) -> Option<&TrackId> {
        self.backlog.front()
    }

    pub fn len(&self) -> usize {
        self.backlog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backlog.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackId> {
        self.backlog.iter()
    }

    /// Remove every occurrence of `id` from the backlog. Returns the number
    /// of entries removed.
    pub fn sweep_remove(&mut self, id: &TrackId) -> usize {
        let before = self.backlog.len();
        self.backlog.retain(|entry| entry != id);
        before - self.backlog.len()
    }

    /// Backlog contents in order, for snapshots.
    pub fn backlog_ids(&self) -> Vec<TrackId> {
        self.backlog.iter().cloned().collect()
    }

    pub fn playlist(&self) -> &[TrackId] {
        &self.playlist
    }

    /// Pick a track uniformly at random from the playlist for autoplay.
    ///
    /// Draws are independent: repeats are possible and backlog history is
    /// not consulted.
    pub fn pick_autoplay<R: Rng>(&self, rng: &mut R) -> Option<TrackId> {
        if self.playlist.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.playlist.len());
        Some(self.playlist[index].clone())
    }
}
