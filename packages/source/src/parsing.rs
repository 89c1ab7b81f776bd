//! Shared timestamp parsing for SIM CSV exports.
//!
//! The creation-timestamp column changed format more than once across the
//! published export vintages, so parsing tries a fixed list of formats and
//! takes the first that matches. Rows matching none are dropped upstream.

use chrono::{NaiveDate, NaiveDateTime};

/// Timestamp formats observed across the SIM export vintages, tried in
/// order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

/// Date-only formats; parsed values land on midnight, which the midnight
/// precision flag then marks as low confidence.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Parses a creation timestamp from any of the known export formats.
#[must_use]
pub fn parse_creation_datetime(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_space_separated_datetime() {
        let dt = parse_creation_datetime("2021-06-15 14:30:00").unwrap();
        assert_eq!(dt.to_string(), "2021-06-15 14:30:00");
    }

    #[test]
    fn parses_iso_datetime_with_fractional() {
        let dt = parse_creation_datetime("2021-06-15T14:30:00.000").unwrap();
        assert_eq!(dt.to_string(), "2021-06-15 14:30:00");
    }

    #[test]
    fn parses_minute_precision() {
        let dt = parse_creation_datetime("2021-06-15 14:30").unwrap();
        assert_eq!(dt.to_string(), "2021-06-15 14:30:00");
    }

    #[test]
    fn parses_date_only_as_midnight() {
        let dt = parse_creation_datetime("2007-03-02").unwrap();
        assert_eq!(dt.to_string(), "2007-03-02 00:00:00");
    }

    #[test]
    fn parses_dmy_date() {
        let dt = parse_creation_datetime("02/03/2007").unwrap();
        assert_eq!(dt.to_string(), "2007-03-02 00:00:00");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_creation_datetime("not-a-date").is_none());
        assert!(parse_creation_datetime("").is_none());
        assert!(parse_creation_datetime("   ").is_none());
    }
}
