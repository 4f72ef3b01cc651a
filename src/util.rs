//! Utility functions shared across the bazaar crate.

use std::time::Duration;

/// Render a duration as a short human-readable string for listing expiry
/// display: "2d 3h", "4h 10m", "12m". Zero clamps to "0m".
pub fn human_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    if seconds == 0 {
        return "0m".to_string();
    }

    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
