// Human-readable durations for run listings
use chrono::DateTime;

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;
const MONTH_MS: i64 = 30 * DAY_MS;
const YEAR_MS: i64 = 365 * DAY_MS;

/// "HH:MM:SS", prefixed by "Nd " once the duration spans a day. Negative
/// durations have no display form.
pub fn format_duration(duration_ms: i64) -> Option<String> {
    if duration_ms < 0 {
        return None;
    }
    let clock = DateTime::from_timestamp_millis(duration_ms.rem_euclid(DAY_MS))?
        .format("%H:%M:%S")
        .to_string();
    let days = duration_ms / DAY_MS;
    if days > 0 {
        Some(format!("{}d {}", days, clock))
    } else {
        Some(clock)
    }
}

/// Coarsest non-zero unit between `start_ms` and `now_ms`, e.g. "3 days ago".
pub fn how_long_ago(start_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(start_ms);
    let units = [
        (YEAR_MS, "year"),
        (MONTH_MS, "month"),
        (DAY_MS, "day"),
        (HOUR_MS, "hour"),
        (MINUTE_MS, "minute"),
        (SECOND_MS, "second"),
    ];

    units
        .iter()
        .map(|(unit_ms, name)| (diff / unit_ms, name))
        .find(|(count, _)| *count > 0)
        .map(|(count, name)| {
            if count == 1 {
                format!("{} {} ago", count, name)
            } else {
                format!("{} {}s ago", count, name)
            }
        })
        .unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0).as_deref(), Some("00:00:00"));
        assert_eq!(format_duration(3_723_000).as_deref(), Some("01:02:03"));
        assert_eq!(
            format_duration(2 * DAY_MS + 5 * SECOND_MS).as_deref(),
            Some("2d 00:00:05")
        );
    }

    #[test]
    fn test_negative_duration_has_no_display() {
        assert_eq!(format_duration(-5_000), None);
        assert_eq!(format_duration(i64::MIN), None);
    }

    #[test]
    fn test_how_long_ago() {
        let now = 1_700_000_000_000;
        assert_eq!(how_long_ago(now - 1_500, now), "1 second ago");
        assert_eq!(how_long_ago(now - 3 * HOUR_MS - MINUTE_MS, now), "3 hours ago");
        assert_eq!(how_long_ago(now - 45 * DAY_MS, now), "1 month ago");
        assert_eq!(how_long_ago(now - 800 * DAY_MS, now), "2 years ago");
        assert_eq!(how_long_ago(now, now), "N/A");
        assert_eq!(how_long_ago(now + 10_000, now), "N/A");
        assert_eq!(how_long_ago(i64::MIN, i64::MAX), "292471208 years ago");
    }
}
