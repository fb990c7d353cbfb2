//! Quantized playback progress
//!
//! Elapsed/total is mapped onto 50 discrete steps and an update is emitted
//! only when the step changes, so a 2-second tick cannot flood the report
//! channel with redundant edits. Track end forces a final update at the
//! maximum step (debounced like any other).

use crate::transport::MessageHandle;

/// Number of discrete progress steps (and cells in the rendered bar).
pub const PROGRESS_STEPS: u8 = 50;

/// Map elapsed/total milliseconds onto a step in `0..=PROGRESS_STEPS`.
///
/// Returns `None` for a zero-length track (no meaningful ratio).
pub fn quantize(elapsed_ms: u64, total_ms: u64) -> Option<u8> {
    if total_ms == 0 {
        return None;
    }
    Some((elapsed_ms.min(total_ms) * u64::from(PROGRESS_STEPS) / total_ms) as u8)
}

/// Render the progress bar for a step.
pub fn render_bar(step: u8) -> String {
    let step = step.min(PROGRESS_STEPS) as usize;
    format!(
        "[{}{}]",
        "\u{25A0}".repeat(step),
        " ".repeat(PROGRESS_STEPS as usize - step)
    )
}

/// Debounce state for the bound progress message.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    message: Option<MessageHandle>,
    last_step: u8,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a freshly created progress message, resetting the debounce.
    pub fn bind(&mut self, handle: MessageHandle) {
        self.message = Some(handle);
        self.last_step = 0;
    }

    /// Drop the bound message; later ticks become no-ops.
    pub fn clear(&mut self) {
        self.message = None;
        self.last_step = 0;
    }

    pub fn handle(&self) -> Option<&MessageHandle> {
        self.message.as_ref()
    }

    /// Record the step if it differs from the last emitted one.
    /// Returns true when an update should be emitted.
    pub fn advance_to(&mut self, step: u8) -> bool {
        if step == self.last_step {
            return false;
        }
        self.last_step = step;
        true
    }
}
