//! Date helper functions

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};

use crate::content::parse_date_string;

/// Relative time as shown on activity cards: minutes under an hour,
/// hours under a day, days after that. Future instants count as zero.
///
/// # Examples
/// ```ignore
/// time_ago(now - Duration::minutes(5), now) // -> "5分钟前"
/// ```
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let minutes = elapsed.num_minutes().max(0);
    let hours = elapsed.num_hours().max(0);
    let days = elapsed.num_days().max(0);

    if minutes < 60 {
        format!("{}分钟前", minutes)
    } else if hours < 24 {
        format!("{}小时前", hours)
    } else {
        format!("{}天前", days)
    }
}

/// Long-form date for post cards, e.g. "2024年1月15日"
pub fn long_date(date: &NaiveDateTime) -> String {
    format!("{}年{}月{}日", date.year(), date.month(), date.day())
}

/// Format a front-matter date string for display, leaving unreadable
/// values as they are
pub fn display_date(raw: &str) -> String {
    match parse_date_string(raw) {
        Some(date) => long_date(&date),
        None => raw.to_string(),
    }
}

/// Format a date in ISO 8601 form for `<time datetime>` attributes
pub fn date_xml(date: &NaiveDateTime) -> String {
    date.format("%Y-%m-%dT%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_time_ago_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(time_ago(now - Duration::seconds(30), now), "0分钟前");
        assert_eq!(time_ago(now - Duration::minutes(59), now), "59分钟前");
        assert_eq!(time_ago(now - Duration::minutes(60), now), "1小时前");
        assert_eq!(time_ago(now - Duration::hours(23), now), "23小时前");
        assert_eq!(time_ago(now - Duration::hours(49), now), "2天前");
        assert_eq!(time_ago(now + Duration::hours(2), now), "0分钟前");
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("2024-01-15"), "2024年1月15日");
        assert_eq!(display_date("2024-01-15 10:30:00"), "2024年1月15日");
        assert_eq!(display_date("soon"), "soon");
    }

    #[test]
    fn test_date_xml() {
        let date = parse_date_string("2024-01-15 10:30:00").unwrap();
        assert_eq!(date_xml(&date), "2024-01-15T10:30:00");
    }
}
