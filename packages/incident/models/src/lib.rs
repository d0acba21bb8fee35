#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident record types shared across the incident survey workspace.
//!
//! An [`IncidentRecord`] is one logged emergency response. Records are
//! produced by a record source (see `incident_survey_source`) and consumed
//! read-only by the analytics engine.

use std::collections::BTreeSet;

use chrono::{Datelike as _, NaiveDateTime, NaiveTime, Timelike as _};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Number of minutes in a full day. Also the largest value a
/// [`TimeOfDay`] can hold (`24:00`, end of day).
pub const MINUTES_PER_DAY: u16 = 24 * 60;

// ── Month ────────────────────────────────────────────────────────────────

/// Calendar month used by month-restricted queries.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Month {
    January = 1,
    February = 2,
    March = 3,
    April = 4,
    May = 5,
    June = 6,
    July = 7,
    August = 8,
    September = 9,
    October = 10,
    November = 11,
    December = 12,
}

impl Month {
    /// Returns the 1-based month number.
    #[must_use]
    pub const fn number(self) -> u32 {
        self as u32
    }

    /// Creates a month from its 1-based number.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 1-12.
    pub fn from_number(value: u32) -> Result<Self, InvalidMonthError> {
        Self::all()
            .get((value as usize).wrapping_sub(1))
            .copied()
            .ok_or_else(|| InvalidMonthError {
                value: value.to_string(),
            })
    }

    /// Parses a month from either its English name (any case) or its
    /// number (`"1"` through `"12"`).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is neither.
    pub fn parse(raw: &str) -> Result<Self, InvalidMonthError> {
        let trimmed = raw.trim();
        if let Ok(number) = trimmed.parse::<u32>() {
            return Self::from_number(number).map_err(|_| InvalidMonthError {
                value: raw.to_string(),
            });
        }
        trimmed.parse().map_err(|_| InvalidMonthError {
            value: raw.to_string(),
        })
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::January,
            Self::February,
            Self::March,
            Self::April,
            Self::May,
            Self::June,
            Self::July,
            Self::August,
            Self::September,
            Self::October,
            Self::November,
            Self::December,
        ]
    }
}

/// Error returned when a string does not name a calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMonthError {
    /// The rejected input.
    pub value: String,
}

impl std::fmt::Display for InvalidMonthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid month '{}': expected a month name or 1-12",
            self.value
        )
    }
}

impl std::error::Error for InvalidMonthError {}

// ── Time of day ──────────────────────────────────────────────────────────

/// A clock time at minute precision, independent of any calendar date.
///
/// Ranges from `00:00` to `24:00` inclusive. `24:00` only makes sense as
/// the exclusive end of a window and never matches a record's own time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    /// Midnight, the start of the day.
    pub const MIDNIGHT: Self = Self { minutes: 0 };

    /// `24:00`, the exclusive end of the day.
    pub const END_OF_DAY: Self = Self {
        minutes: MINUTES_PER_DAY,
    };

    /// Creates a time from an hour and minute.
    ///
    /// # Errors
    ///
    /// Returns an error if the hour is above 23 or the minute above 59,
    /// except for the `24:00` end-of-day sentinel.
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, InvalidTimeOfDayError> {
        if hour == 24 && minute == 0 {
            return Ok(Self::END_OF_DAY);
        }
        if hour > 23 || minute > 59 {
            return Err(InvalidTimeOfDayError {
                value: format!("{hour:02}:{minute:02}"),
            });
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self {
            minutes: (hour * 60 + minute) as u16,
        })
    }

    /// Truncates a `chrono` time to minute precision.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_time(time: NaiveTime) -> Self {
        Self {
            minutes: (time.hour() * 60 + time.minute()) as u16,
        }
    }

    /// Parses an `HH:MM` string (24-hour clock). `24:00` is accepted.
    ///
    /// # Errors
    ///
    /// Returns an error for anything that is not a valid `HH:MM` time.
    pub fn parse(raw: &str) -> Result<Self, InvalidTimeOfDayError> {
        let trimmed = raw.trim();
        if trimmed == "24:00" {
            return Ok(Self::END_OF_DAY);
        }
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .map(Self::from_time)
            .map_err(|_| InvalidTimeOfDayError {
                value: raw.to_string(),
            })
    }

    /// Minutes elapsed since midnight.
    #[must_use]
    pub const fn minutes(self) -> u16 {
        self.minutes
    }

    /// The hour component (`0..=24`).
    #[must_use]
    pub const fn hour(self) -> u16 {
        self.minutes / 60
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes / 60, self.minutes % 60)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = InvalidTimeOfDayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Error returned when a string is not a valid `HH:MM` time of day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTimeOfDayError {
    /// The rejected input.
    pub value: String,
}

impl std::fmt::Display for InvalidTimeOfDayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid time of day '{}': expected HH:MM between 00:00 and 24:00",
            self.value
        )
    }
}

impl std::error::Error for InvalidTimeOfDayError {}

// ── Units ────────────────────────────────────────────────────────────────

/// A responding unit identifier such as `E23` or `TAC1`.
///
/// Always stored trimmed and uppercased so comparisons are
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UnitCode(String);

impl UnitCode {
    /// Normalizes and validates a unit identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is empty or contains whitespace or a
    /// unit separator.
    pub fn parse(raw: &str) -> Result<Self, InvalidUnitCodeError> {
        let code = raw.trim().to_uppercase();
        if code.is_empty() || code.chars().any(is_unit_separator) {
            return Err(InvalidUnitCodeError {
                value: raw.to_string(),
            });
        }
        Ok(Self(code))
    }

    /// The normalized code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UnitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UnitCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<UnitCode> for String {
    fn from(value: UnitCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for UnitCode {
    type Error = InvalidUnitCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Error returned when a unit identifier is empty or malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidUnitCodeError {
    /// The rejected input.
    pub value: String,
}

impl std::fmt::Display for InvalidUnitCodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid unit code '{}'", self.value)
    }
}

impl std::error::Error for InvalidUnitCodeError {}

const fn is_unit_separator(c: char) -> bool {
    matches!(c, ',' | ';' | '/') || c.is_whitespace()
}

/// The set of units that co-responded to one incident.
///
/// Exported data stores all responding units in a single text field
/// (`"E23,TAC1"`). The field is split once at ingestion so membership is
/// an exact set lookup: `E2` is not a member of `{E23, E24}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSet(BTreeSet<UnitCode>);

impl UnitSet {
    /// Splits a raw units field on commas, semicolons, slashes and
    /// whitespace. Empty fragments are ignored.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(is_unit_separator)
                .filter_map(|part| UnitCode::parse(part).ok())
                .collect(),
        )
    }

    /// Returns `true` if the given unit responded.
    #[must_use]
    pub fn contains(&self, unit: &UnitCode) -> bool {
        self.0.contains(unit)
    }

    /// Iterates the units in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitCode> {
        self.0.iter()
    }

    /// Number of distinct units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no unit could be parsed from the raw field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<UnitCode> for UnitSet {
    fn from_iter<T: IntoIterator<Item = UnitCode>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ── Records ──────────────────────────────────────────────────────────────

/// WGS84 coordinates of an incident.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinates {
    /// Validates a latitude/longitude pair. Returns `None` if either value
    /// is non-finite, zero, or out of range.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        if latitude == 0.0 || longitude == 0.0 {
            return None;
        }
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return None;
        }
        Some(Self {
            latitude,
            longitude,
        })
    }
}

/// One logged emergency response.
///
/// Records are immutable once built. Coordinates are optional: rows with
/// missing or invalid coordinates still count toward type, time and unit
/// aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Incident type label (e.g. `"STRUCTURE FIRE"`).
    pub call_type: String,
    /// Units field as it appeared in the source data.
    pub units_raw: String,
    /// Parsed responding units.
    pub units: UnitSet,
    /// Free-text incident address.
    pub location: String,
    /// Location, when the source provided usable coordinates.
    pub coordinates: Option<Coordinates>,
    /// Local date and time the call was logged.
    pub occurred_at: NaiveDateTime,
}

impl IncidentRecord {
    /// Builds a record, parsing the raw units field into a [`UnitSet`].
    #[must_use]
    pub fn new(
        call_type: impl Into<String>,
        units_raw: impl Into<String>,
        location: impl Into<String>,
        coordinates: Option<Coordinates>,
        occurred_at: NaiveDateTime,
    ) -> Self {
        let units_raw = units_raw.into();
        let units = UnitSet::parse(&units_raw);
        Self {
            call_type: call_type.into(),
            units_raw,
            units,
            location: location.into(),
            coordinates,
            occurred_at,
        }
    }

    /// Time of day the call was logged, ignoring the date.
    #[must_use]
    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_time(self.occurred_at.time())
    }

    /// Calendar month the call was logged in.
    #[must_use]
    pub fn month(&self) -> Month {
        // chrono months are always 1-12
        Month::from_number(self.occurred_at.month()).unwrap_or(Month::January)
    }

    /// Calendar year the call was logged in.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.occurred_at.year()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 6, 15)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn month_parses_names_and_numbers() {
        assert_eq!(Month::parse("December").unwrap(), Month::December);
        assert_eq!(Month::parse("march").unwrap(), Month::March);
        assert_eq!(Month::parse("7").unwrap(), Month::July);
        assert_eq!(Month::parse("12").unwrap().number(), 12);
        assert!(Month::parse("0").is_err());
        assert!(Month::parse("13").is_err());
        assert!(Month::parse("Smarch").is_err());
    }

    #[test]
    fn month_numbers_match_position() {
        for (idx, month) in Month::all().iter().enumerate() {
            assert_eq!(month.number() as usize, idx + 1);
            assert_eq!(Month::from_number(month.number()).unwrap(), *month);
        }
    }

    #[test]
    fn time_of_day_parses_clock_strings() {
        let t = TimeOfDay::parse("07:30").unwrap();
        assert_eq!(t.minutes(), 450);
        assert_eq!(t.to_string(), "07:30");
        assert_eq!(TimeOfDay::parse("23:59").unwrap().minutes(), 1439);
        assert_eq!(TimeOfDay::parse("24:00").unwrap(), TimeOfDay::END_OF_DAY);
        assert!(TimeOfDay::parse("24:30").is_err());
        assert!(TimeOfDay::parse("7pm").is_err());
        assert!(TimeOfDay::parse("").is_err());
    }

    #[test]
    fn time_of_day_from_hm_rejects_out_of_range() {
        assert!(TimeOfDay::from_hm(23, 60).is_err());
        assert!(TimeOfDay::from_hm(25, 0).is_err());
        assert_eq!(TimeOfDay::from_hm(24, 0).unwrap(), TimeOfDay::END_OF_DAY);
    }

    #[test]
    fn unit_code_is_uppercased() {
        let code = UnitCode::parse(" e23 ").unwrap();
        assert_eq!(code.as_str(), "E23");
        assert!(UnitCode::parse("").is_err());
        assert!(UnitCode::parse("E23,E24").is_err());
    }

    #[test]
    fn unit_set_splits_multi_unit_field() {
        let units = UnitSet::parse("E23, tac1;T1/E24  SQ21");
        let codes: Vec<&str> = units.iter().map(UnitCode::as_str).collect();
        assert_eq!(codes, vec!["E23", "E24", "SQ21", "T1", "TAC1"]);
        assert!(units.contains(&UnitCode::parse("TAC1").unwrap()));
        assert!(!units.contains(&UnitCode::parse("E2").unwrap()));
    }

    #[test]
    fn unit_set_ignores_empty_fragments() {
        assert!(UnitSet::parse(" , ;").is_empty());
        assert_eq!(UnitSet::parse("E23,,E23").len(), 1);
    }

    #[test]
    fn coordinates_reject_invalid_values() {
        assert!(Coordinates::new(41.39, -73.45).is_some());
        assert!(Coordinates::new(0.0, -73.45).is_none());
        assert!(Coordinates::new(f64::NAN, -73.45).is_none());
        assert!(Coordinates::new(91.0, -73.45).is_none());
        assert!(Coordinates::new(41.39, -181.0).is_none());
    }

    #[test]
    fn record_exposes_time_and_month() {
        let record = IncidentRecord::new("EMS", "E23,E24", "1 MAIN ST", None, at(23, 45));
        assert_eq!(record.time_of_day().to_string(), "23:45");
        assert_eq!(record.month(), Month::June);
        assert_eq!(record.year(), 2023);
        assert_eq!(record.units.len(), 2);
        assert_eq!(record.units_raw, "E23,E24");
    }
}
