//! Time Utilities

use chrono::{DateTime, Local, Utc};

/// Current time as milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Format an epoch-millisecond timestamp in local time for display
pub fn format_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| millis.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_millis() {
        let now = now_millis();
        // After 2020-01-01
        assert!(now > 1_577_836_800_000);
    }

    #[test]
    fn test_format_millis() {
        let formatted = format_millis(1_700_000_000_000);
        assert_eq!(formatted.len(), "2023-11-14 22:13:20".len());
        assert!(formatted.starts_with("2023-11-1"));
    }
}
