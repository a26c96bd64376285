//! Date helpers for the string-typed dates stored in documents.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMAT: &str = "%Y-%m-%d";
const MONTH_FORMAT: &str = "%Y-%m";
const DISPLAY_FORMAT: &str = "%B %d, %Y at %I:%M %p";

/// Parse a "YYYY-MM-DD" string. Surrounding whitespace makes the date invalid.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if s.trim() != s {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// "YYYY-MM" bucket for a "YYYY-MM-DD" string, or None when the date does not parse.
pub fn month_key(date: &str) -> Option<String> {
    parse_date(date).map(|d| d.format(MONTH_FORMAT).to_string())
}

/// Validate and normalize a "YYYY-MM" month key (e.g. "2024-3" -> "2024-03").
pub fn parse_month_key(s: &str) -> Option<String> {
    let (year, month) = s.trim().split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1).map(|d| d.format(MONTH_FORMAT).to_string())
}

/// Human-readable rendering of an ISO timestamp, "Unknown" if it does not parse.
pub fn format_timestamp(iso: &str) -> String {
    let iso = iso.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        return dt.format(DISPLAY_FORMAT).to_string();
    }
    match NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(dt) => dt.format(DISPLAY_FORMAT).to_string(),
        Err(_) => "Unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_key_from_valid_date() {
        assert_eq!(month_key("2024-02-29").as_deref(), Some("2024-02"));
        assert_eq!(month_key("2023-12-01").as_deref(), Some("2023-12"));
    }

    #[test]
    fn month_key_rejects_invalid_dates() {
        assert_eq!(month_key("2024-13-40"), None);
        assert_eq!(month_key("2023-02-29"), None);
        assert_eq!(month_key("yesterday"), None);
        assert_eq!(month_key(""), None);
        assert_eq!(month_key(" 2024-01-02"), None);
        assert_eq!(month_key("2024-01-02 "), None);
    }

    #[test]
    fn month_key_normalization() {
        assert_eq!(parse_month_key("2024-3").as_deref(), Some("2024-03"));
        assert_eq!(parse_month_key("2024-11").as_deref(), Some("2024-11"));
        assert_eq!(parse_month_key("2024-13"), None);
        assert_eq!(parse_month_key("2024"), None);
    }

    #[test]
    fn timestamp_formatting() {
        assert_eq!(
            format_timestamp("2024-05-01T14:05:09.123456"),
            "May 01, 2024 at 02:05 PM"
        );
        assert_eq!(
            format_timestamp("2024-05-01T09:30:00+00:00"),
            "May 01, 2024 at 09:30 AM"
        );
        assert_eq!(format_timestamp("not a time"), "Unknown");
    }
}
