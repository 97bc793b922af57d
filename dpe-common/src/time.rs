//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current Unix epoch time in milliseconds
///
/// Submission records and fallback reviewer identifiers both use this
/// resolution.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
    }

    #[test]
    fn test_now_ms_matches_now() {
        let before = now().timestamp_millis();
        let ms = now_ms();
        let after = now().timestamp_millis();
        assert!(before <= ms && ms <= after);
    }

    #[test]
    fn test_now_ms_is_millisecond_scale() {
        // 2000-01-01 in milliseconds
        assert!(now_ms() > 946_684_800_000);
    }
}
