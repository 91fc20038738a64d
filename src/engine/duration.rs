//! Compact age buckets: `5s`, `30m`, `3h`, `2d`.

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Format whole seconds into the largest bucket that fits, floored.
pub fn format_duration(seconds: u64) -> String {
    if seconds < MINUTE {
        format!("{}s", seconds)
    } else if seconds < HOUR {
        format!("{}m", seconds / MINUTE)
    } else if seconds < DAY {
        format!("{}h", seconds / HOUR)
    } else {
        format!("{}d", seconds / DAY)
    }
}

/// Format the time from `start` to `end` (unix seconds).
///
/// An end before the start (clock skew between the feed and the local clock) is
/// clamped to zero.
pub fn format_elapsed(start: i64, end: i64) -> String {
    let elapsed = end.saturating_sub(start);
    if elapsed < 0 {
        tracing::warn!(
            "End time {} precedes start time {}, clamping duration to 0",
            end,
            start
        );
    }
    format_duration(u64::try_from(elapsed).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries() {
        let cases = [
            (0, "0s"),
            (5, "5s"),
            (59, "59s"),
            (60, "1m"),
            (90, "1m"),
            (1800, "30m"),
            (3599, "59m"),
            (3600, "1h"),
            (3 * 3600, "3h"),
            (86399, "23h"),
            (86400, "1d"),
            (7 * 86400, "7d"),
        ];
        for (seconds, expected) in cases {
            assert_eq!(format_duration(seconds), expected, "for {}s", seconds);
        }
    }

    #[test]
    fn test_seconds_bucket_is_identity() {
        for seconds in 0..60 {
            assert_eq!(format_duration(seconds), format!("{}s", seconds));
        }
    }

    #[test]
    fn test_elapsed() {
        assert_eq!(format_elapsed(1_766_215_187, 1_766_215_187 + 2 * 86400), "2d");
        assert_eq!(format_elapsed(100, 40), "0s");
    }
}
