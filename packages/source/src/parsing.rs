//! Shared parsing utilities for exported incident data.
//!
//! Timestamp and coordinate parsing used by the record sources.

use chrono::NaiveDateTime;
use incident_survey_incident_models::Coordinates;

/// Timestamp layouts seen in incident exports, most common first.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

/// Parses a call date/time such as `"2023-12-24 23:45"`.
#[must_use]
pub fn parse_call_date_time(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Parses lat/lng from optional string fields. Returns `None` if missing,
/// unparseable, zero, or out of range.
#[must_use]
pub fn parse_lat_lng_str(lat: Option<&str>, lng: Option<&str>) -> Option<Coordinates> {
    let latitude = lat?.trim().parse::<f64>().ok()?;
    let longitude = lng?.trim().parse::<f64>().ok()?;
    Coordinates::new(latitude, longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minute_precision_timestamp() {
        let dt = parse_call_date_time("2023-12-24 23:45").unwrap();
        assert_eq!(dt.to_string(), "2023-12-24 23:45:00");
    }

    #[test]
    fn parses_timestamp_with_seconds() {
        let dt = parse_call_date_time(" 2023-04-01T07:05:09 ").unwrap();
        assert_eq!(dt.to_string(), "2023-04-01 07:05:09");
    }

    #[test]
    fn rejects_invalid_timestamp() {
        assert!(parse_call_date_time("not-a-date").is_none());
        assert!(parse_call_date_time("2023-13-01 00:00").is_none());
        assert!(parse_call_date_time("").is_none());
    }

    #[test]
    fn parses_lat_lng_strings() {
        let c = parse_lat_lng_str(Some("41.3935"), Some("-73.4555")).unwrap();
        assert!((c.latitude - 41.3935).abs() < f64::EPSILON);
        assert!((c.longitude - -73.4555).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_zero_lat_lng() {
        assert!(parse_lat_lng_str(Some("0.0"), Some("-73.4555")).is_none());
    }

    #[test]
    fn rejects_missing_or_garbage_lat_lng() {
        assert!(parse_lat_lng_str(None, Some("-73.4555")).is_none());
        assert!(parse_lat_lng_str(Some(""), Some("-73.4555")).is_none());
        assert!(parse_lat_lng_str(Some("north"), Some("-73.4555")).is_none());
    }
}
