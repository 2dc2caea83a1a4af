//! Human-readable duration formatting
//!
//! Used by the import report and log output for consistent time display.

/// Format a duration in seconds for display.
///
/// - `45` → `"45s"`
/// - `330` → `"5m 30s"`
/// - `7265` → `"2h 01m 05s"`
pub fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {:02}s", seconds / 60, seconds % 60)
    } else {
        format!(
            "{}h {:02}m {:02}s",
            seconds / 3600,
            (seconds % 3600) / 60,
            seconds % 60
        )
    }
}
