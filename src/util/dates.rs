use std::sync::OnceLock;

use chrono::{Duration, Local, NaiveDate};
use regex::Regex;

/// Storage format for every date field (`2025-05-14`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's date in local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format a date in the storage format.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn date_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static date regex"))
}

/// Parse a `YYYY-MM-DD` string. Empty or malformed input yields `None`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// Strict check used by input validation: exact `YYYY-MM-DD` shape and a
/// real calendar date.
pub fn is_valid_date(s: &str) -> bool {
    date_shape().is_match(s) && NaiveDate::parse_from_str(s, DATE_FORMAT).is_ok()
}

/// Signed number of days from `today` to `date`.
///
/// Negative values lie in the past. An empty or unparseable date is "unset"
/// and yields `None`, never an error.
pub fn days_between(date: &str, today: NaiveDate) -> Option<i64> {
    parse_date(date).map(|d| (d - today).num_days())
}

/// Shift a date by `days`. An empty date starts from `today`; a malformed
/// date cannot be shifted and yields `None`.
pub fn adjust_date(date: &str, days: i64, today: NaiveDate) -> Option<String> {
    if date.trim().is_empty() {
        return Some(format_date(today));
    }
    let parsed = parse_date(date)?;
    parsed
        .checked_add_signed(Duration::days(days))
        .map(format_date)
}

/// English weekday name for a date string, e.g. `Monday`.
pub fn weekday_name(date: &str) -> Option<String> {
    parse_date(date).map(|d| d.format("%A").to_string())
}

/// How a task date relates to today, for colouring and summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStatus {
    /// Still ahead
    Upcoming,
    /// Due today, or started and still running
    Current,
    /// Past (for start dates: only when the end date has passed as well)
    Overdue,
}

/// Status of a start date. A started task only counts as overdue once its
/// end date has also passed.
pub fn start_status(days_to_start: Option<i64>, days_to_end: Option<i64>) -> Option<DateStatus> {
    let start = days_to_start?;
    Some(if start > 0 {
        DateStatus::Upcoming
    } else if start < 0 && days_to_end.is_some_and(|end| end < 0) {
        DateStatus::Overdue
    } else {
        DateStatus::Current
    })
}

/// Status of an end date.
pub fn end_status(days_to_end: Option<i64>) -> Option<DateStatus> {
    let end = days_to_end?;
    Some(match end {
        e if e > 0 => DateStatus::Upcoming,
        0 => DateStatus::Current,
        _ => DateStatus::Overdue,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn days_between_unset_and_malformed() {
        let today = day("2024-03-10");
        assert_eq!(days_between("", today), None);
        assert_eq!(days_between("not-a-date", today), None);
        assert_eq!(days_between("2024-02-30", today), None);
    }

    #[test]
    fn days_between_relative_offsets() {
        let today = day("2024-03-10");
        assert_eq!(days_between("2024-03-10", today), Some(0));
        assert_eq!(days_between("2024-03-11", today), Some(1));
        assert_eq!(days_between("2024-03-01", today), Some(-9));
        // crosses the leap day
        assert_eq!(days_between("2024-02-28", today), Some(-11));
    }

    #[test]
    fn strict_validation_rejects_loose_shapes() {
        assert!(is_valid_date("2024-01-05"));
        assert!(!is_valid_date("2024-1-5"));
        assert!(!is_valid_date("2024-13-01"));
        assert!(!is_valid_date(""));
        assert!(!is_valid_date(" 2024-01-05"));
    }

    #[test]
    fn adjust_date_shifts_and_starts_from_today() {
        let today = day("2024-12-31");
        assert_eq!(adjust_date("", 1, today).as_deref(), Some("2024-12-31"));
        assert_eq!(adjust_date("2024-12-31", 1, today).as_deref(), Some("2025-01-01"));
        assert_eq!(adjust_date("2024-03-01", -1, today).as_deref(), Some("2024-02-29"));
        assert_eq!(adjust_date("garbage", 1, today), None);
    }

    #[test]
    fn weekday_names() {
        assert_eq!(weekday_name("2024-01-01").as_deref(), Some("Monday"));
        assert_eq!(weekday_name("2024-01-07").as_deref(), Some("Sunday"));
        assert_eq!(weekday_name(""), None);
    }

    #[test]
    fn date_status_rules() {
        assert_eq!(start_status(Some(3), None), Some(DateStatus::Upcoming));
        assert_eq!(start_status(Some(-2), Some(4)), Some(DateStatus::Current));
        assert_eq!(start_status(Some(-2), None), Some(DateStatus::Current));
        assert_eq!(start_status(Some(-5), Some(-1)), Some(DateStatus::Overdue));
        assert_eq!(start_status(None, Some(-1)), None);
        assert_eq!(end_status(Some(0)), Some(DateStatus::Current));
        assert_eq!(end_status(Some(-1)), Some(DateStatus::Overdue));
        assert_eq!(end_status(Some(9)), Some(DateStatus::Upcoming));
    }
}
