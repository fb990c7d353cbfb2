//! Fixed request vocabulary
//!
//! The engine accepts a small closed set of requests; this module carries
//! their names, usage examples, and descriptions for the help listing.

/// One request the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Append a track to the backlog.
    Queue,
    /// Front-insert a track and interrupt current playback.
    Now,
    /// Skip to the next backlog entry.
    Next,
    /// Show the backlog with remaining playtime.
    Backlog,
    /// Show this listing.
    Help,
}

impl RequestKind {
    pub const ALL: [RequestKind; 5] = [
        RequestKind::Queue,
        RequestKind::Now,
        RequestKind::Next,
        RequestKind::Backlog,
        RequestKind::Help,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RequestKind::Queue => "queue",
            RequestKind::Now => "now",
            RequestKind::Next => "next",
            RequestKind::Backlog => "backlog",
            RequestKind::Help => "help",
        }
    }

    pub fn example(&self) -> &'static str {
        match self {
            RequestKind::Queue => "queue <track-id>",
            RequestKind::Now => "now <track-id>",
            RequestKind::Next => "next",
            RequestKind::Backlog => "backlog",
            RequestKind::Help => "help",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RequestKind::Queue => "Add a track to the end of the backlog.",
            RequestKind::Now => "Play a track immediately, interrupting the current one.",
            RequestKind::Next => "Skip the current track.",
            RequestKind::Backlog => "List queued tracks and remaining playtime.",
            RequestKind::Help => "Show the available requests.",
        }
    }
}

/// Render the help listing, one request per line.
pub fn describe_commands() -> String {
    let mut out = String::from("Available requests:\n");
    for kind in RequestKind::ALL {
        out.push_str(&format!("  {:20} {}\n", kind.example(), kind.description()));
    }
    out
}
