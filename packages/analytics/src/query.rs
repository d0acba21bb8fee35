//! Validated query parameters.
//!
//! Raw [`QueryParams`] are checked once at the boundary. Unknown or
//! malformed values are rejected with [`AnalyticsError::InvalidParameter`]
//! rather than silently treated as "no restriction".

use incident_survey_analytics_models::{LocationThresholds, QueryParams, is_unrestricted};
use incident_survey_incident_models::{Month, TimeOfDay, UnitCode};

use crate::AnalyticsError;
use crate::units::UnitSelector;
use crate::window::{TimeFilter, TimeWindow};

/// A validated query: time-of-day window, month and unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilter {
    /// Inclusive start of the time-of-day window.
    pub start: Option<TimeOfDay>,
    /// Exclusive end of the time-of-day window.
    pub end: Option<TimeOfDay>,
    /// Calendar month.
    pub month: Option<Month>,
    /// Responding unit.
    pub unit: UnitSelector,
}

impl QueryFilter {
    /// A filter that passes every record.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Validates raw parameters.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidParameter`] for a time that is not
    /// `HH:MM`, a month that is neither a name nor 1-12, or a malformed
    /// unit code.
    pub fn parse(params: &QueryParams) -> Result<Self, AnalyticsError> {
        Ok(Self {
            start: parse_time("start_time", params.start_time.as_deref())?,
            end: parse_time("end_time", params.end_time.as_deref())?,
            month: parse_month(params.month.as_deref())?,
            unit: UnitSelector::parse(params.unit.as_deref())?,
        })
    }

    /// Restricts the time of day to `[start, end)`.
    #[must_use]
    pub fn with_window(mut self, start: TimeOfDay, end: TimeOfDay) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Restricts to one calendar month.
    #[must_use]
    pub fn with_month(mut self, month: Month) -> Self {
        self.month = Some(month);
        self
    }

    /// Restricts to records the unit responded to.
    #[must_use]
    pub fn with_unit(mut self, unit: UnitCode) -> Self {
        self.unit = UnitSelector::Unit(unit);
        self
    }

    /// The time-of-day window this filter describes.
    #[must_use]
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start, self.end)
    }

    /// Resolves the time and month dimensions against a data set year.
    #[must_use]
    pub fn time_filter(&self, reference_year: Option<i32>) -> TimeFilter {
        TimeFilter::resolve(self.start, self.end, self.month, reference_year)
    }

    /// Picks the caller's location threshold for this query: the smaller
    /// per-unit value when a unit is selected, otherwise the
    /// department-wide value.
    #[must_use]
    pub fn location_threshold(&self, thresholds: &LocationThresholds) -> u64 {
        match self.unit {
            UnitSelector::All => thresholds.department_wide,
            UnitSelector::Unit(_) => thresholds.per_unit,
        }
    }

    /// Human-readable summary, e.g. `"E23, 22:00 to 06:00, December"`.
    #[must_use]
    pub fn describe(&self) -> String {
        let window = match self.window() {
            TimeWindow::Unrestricted => "all hours".to_string(),
            TimeWindow::Between { start, end } => format!("{start} to {end}"),
        };
        let month = self
            .month
            .map_or_else(|| "all months".to_string(), |m| m.to_string());
        format!("{}, {window}, {month}", self.unit)
    }
}

fn parse_time(name: &'static str, raw: Option<&str>) -> Result<Option<TimeOfDay>, AnalyticsError> {
    if is_unrestricted(raw) {
        return Ok(None);
    }
    let value = raw.unwrap_or_default();
    TimeOfDay::parse(value)
        .map(Some)
        .map_err(|e| AnalyticsError::InvalidParameter {
            name,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn parse_month(raw: Option<&str>) -> Result<Option<Month>, AnalyticsError> {
    if is_unrestricted(raw) {
        return Ok(None);
    }
    let value = raw.unwrap_or_default();
    Month::parse(value)
        .map(Some)
        .map_err(|e| AnalyticsError::InvalidParameter {
            name: "month",
            value: value.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(start: &str, end: &str, month: &str, unit: &str) -> QueryParams {
        QueryParams {
            start_time: Some(start.to_string()),
            end_time: Some(end.to_string()),
            month: Some(month.to_string()),
            unit: Some(unit.to_string()),
        }
    }

    #[test]
    fn all_sentinels_mean_no_restriction() {
        let filter = QueryFilter::parse(&params("ALL", "", "all", "ALL")).unwrap();
        assert_eq!(filter, QueryFilter::all());
        assert_eq!(
            QueryFilter::parse(&QueryParams::default()).unwrap(),
            QueryFilter::all()
        );
    }

    #[test]
    fn parses_recognized_values() {
        let filter = QueryFilter::parse(&params("22:00", "06:00", "December", "e23")).unwrap();
        assert_eq!(filter.start, Some(TimeOfDay::parse("22:00").unwrap()));
        assert_eq!(filter.end, Some(TimeOfDay::parse("06:00").unwrap()));
        assert_eq!(filter.month, Some(Month::December));
        assert_eq!(
            filter.unit,
            UnitSelector::Unit(UnitCode::parse("E23").unwrap())
        );
        assert!(filter.window().wraps_midnight());
        assert_eq!(filter.describe(), "E23, 22:00 to 06:00, December");
    }

    #[test]
    fn rejects_malformed_time() {
        let err = QueryFilter::parse(&params("7am", "17:00", "ALL", "ALL")).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::InvalidParameter {
                name: "start_time",
                ..
            }
        ));
        let err = QueryFilter::parse(&params("07:00", "25:00", "ALL", "ALL")).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::InvalidParameter {
                name: "end_time",
                ..
            }
        ));
    }

    #[test]
    fn rejects_unknown_month() {
        let err = QueryFilter::parse(&params("ALL", "ALL", "Thermidor", "ALL")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid month 'Thermidor': invalid month 'Thermidor': expected a month name or 1-12"
        );
    }

    #[test]
    fn location_threshold_follows_unit_selection() {
        let thresholds = LocationThresholds::default();
        assert_eq!(QueryFilter::all().location_threshold(&thresholds), 20);
        let per_unit = QueryFilter::all().with_unit(UnitCode::parse("E24").unwrap());
        assert_eq!(per_unit.location_threshold(&thresholds), 5);
    }

    #[test]
    fn describes_unrestricted_filter() {
        assert_eq!(
            QueryFilter::all().describe(),
            "all units, all hours, all months"
        );
    }
}
