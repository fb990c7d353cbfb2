//! Human-readable time formatting
//!
//! Consistent duration display for backlog listings and notifications.

/// Format a duration in seconds as `M:SS`, or `H:MM:SS` once it reaches an
/// hour.
///
/// # Examples
///
/// ```
/// use spinq_common::human_time::format_track_time;
///
/// assert_eq!(format_track_time(5), "0:05");
/// assert_eq!(format_track_time(330), "5:30");
/// assert_eq!(format_track_time(3661), "1:01:01");
/// ```
pub fn format_track_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds / 60) % 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
