use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, NaiveDate};

/// Canonical storage format for a calendar day.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Format a date as its `YYYY-MM-DD` key
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

pub fn parse_date_key(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_KEY_FORMAT)
        .map_err(|e| anyhow!("Bad date '{}' (expected YYYY-MM-DD): {}", s, e))
}

/// 0 = Sunday .. 6 = Saturday
pub fn day_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_sunday() as usize
}

/// The Saturday that opens the Saturday→Friday week containing `date`.
pub fn week_anchor(date: NaiveDate) -> NaiveDate {
    let back = (day_index(date) + 1) % 7;
    date - Duration::days(back as i64)
}

/// Signed number of whole days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Inclusive window of `len` days ending at `end`, oldest first.
pub fn trailing_days(end: NaiveDate, len: u32) -> Vec<NaiveDate> {
    (0..len as i64)
        .rev()
        .map(|back| end - Duration::days(back))
        .collect()
}

pub const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn day_name(index: usize) -> &'static str {
    DAY_NAMES.get(index).copied().unwrap_or("?")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_date_key(s).unwrap()
    }

    #[test]
    fn test_date_key_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(date_key(date), "2024-03-09");
        assert_eq!(d("2024-03-09"), date);
        assert!(parse_date_key("09/03/2024").is_err());
    }

    #[test]
    fn test_day_index_sunday_first() {
        // 2024-03-10 was a Sunday
        assert_eq!(day_index(d("2024-03-10")), 0);
        assert_eq!(day_index(d("2024-03-15")), 5);
        assert_eq!(day_index(d("2024-03-16")), 6);
    }

    #[test]
    fn test_week_anchor_is_saturday() {
        // Saturday anchors itself
        assert_eq!(week_anchor(d("2024-03-16")), d("2024-03-16"));
        // Sunday belongs to the week opened the day before
        assert_eq!(week_anchor(d("2024-03-17")), d("2024-03-16"));
        // Friday closes the week
        assert_eq!(week_anchor(d("2024-03-22")), d("2024-03-16"));
        assert_eq!(week_anchor(d("2024-03-23")), d("2024-03-23"));
        for offset in 0..14 {
            let day = d("2024-02-25") + Duration::days(offset);
            assert_eq!(day_index(week_anchor(day)), 6);
        }
    }

    #[test]
    fn test_days_between_and_trailing_window() {
        assert_eq!(days_between(d("2024-02-28"), d("2024-03-01")), 2);
        assert_eq!(days_between(d("2024-03-01"), d("2024-02-28")), -2);

        let window = trailing_days(d("2024-03-03"), 7);
        assert_eq!(window.len(), 7);
        assert_eq!(window[0], d("2024-02-26"));
        assert_eq!(window[6], d("2024-03-03"));
    }
}
