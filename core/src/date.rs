//! Date token normalization

use chrono::{Local, NaiveDate};

/// Output format for resolved dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Keyword that resolves to yesterday's date.
pub const TODAY_KEYWORD: &str = "today";

/// Resolve a date token against the local calendar.
///
/// `"today"` (any case) becomes yesterday's date, since the imagery for the
/// current day is not complete yet. Every other token passes through as-is.
pub fn normalize_date(token: &str) -> String {
    normalize_date_on(token, Local::now().date_naive())
}

/// Same as [`normalize_date`] with an explicit "current" date.
pub fn normalize_date_on(token: &str, today: NaiveDate) -> String {
    if token.eq_ignore_ascii_case(TODAY_KEYWORD) {
        let yesterday = today.pred_opt().unwrap_or(today);
        yesterday.format(DATE_FORMAT).to_string()
    } else {
        token.to_string()
    }
}

/// Check that a token is a real `YYYY-MM-DD` calendar date.
pub fn is_valid_date(token: &str) -> bool {
    NaiveDate::parse_from_str(token, DATE_FORMAT).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_today_resolves_to_yesterday() {
        assert_eq!(normalize_date_on("today", day(2024, 3, 15)), "2024-03-14");
        assert_eq!(normalize_date_on("ToDaY", day(2024, 3, 15)), "2024-03-14");
    }

    #[test]
    fn test_today_crosses_month_and_year() {
        assert_eq!(normalize_date_on("today", day(2024, 3, 1)), "2024-02-29");
        assert_eq!(normalize_date_on("today", day(2024, 1, 1)), "2023-12-31");
    }

    #[test]
    fn test_zero_padding() {
        assert_eq!(normalize_date_on("today", day(2024, 2, 2)), "2024-02-01");
    }

    #[test]
    fn test_passthrough_is_idempotent() {
        let today = day(2024, 6, 10);
        for token in ["2024-01-01", "yesterday", "not-a-date", "01/02/2024"] {
            let once = normalize_date_on(token, today);
            assert_eq!(once, token);
            assert_eq!(normalize_date_on(&once, today), once);
        }
    }

    #[test]
    fn test_live_clock_format() {
        let resolved = normalize_date("today");
        assert!(is_valid_date(&resolved), "got {}", resolved);
    }

    #[test]
    fn test_is_valid_date() {
        assert!(is_valid_date("2024-02-29"));
        assert!(!is_valid_date("2023-02-29"));
        assert!(!is_valid_date("today"));
        assert!(!is_valid_date("2024/01/01"));
    }
}
