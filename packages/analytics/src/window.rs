//! Time-of-day windows and month restrictions.
//!
//! [`TimeFilter::resolve`] turns a pair of optional clock bounds and an
//! optional month into a predicate over records. Absent parameters never
//! fail: they mean the dimension is unrestricted.

use std::ops::Range;

use chrono::{NaiveDate, NaiveDateTime};
use incident_survey_incident_models::{IncidentRecord, Month, TimeOfDay};

/// A half-open interval of clock time, possibly wrapping past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    /// Every time of day passes.
    Unrestricted,
    /// Times in `[start, end)`, or `[start, 24:00) ∪ [00:00, end)` when
    /// `start > end`. Empty when `start == end`.
    Between {
        /// Inclusive start.
        start: TimeOfDay,
        /// Exclusive end.
        end: TimeOfDay,
    },
}

impl TimeWindow {
    /// Builds a window from optional bounds. A missing start means
    /// midnight and a missing end means `24:00`.
    #[must_use]
    pub fn new(start: Option<TimeOfDay>, end: Option<TimeOfDay>) -> Self {
        match (start, end) {
            (None, None) => Self::Unrestricted,
            (start, end) => Self::Between {
                start: start.unwrap_or(TimeOfDay::MIDNIGHT),
                end: end.unwrap_or(TimeOfDay::END_OF_DAY),
            },
        }
    }

    /// Returns `true` if `time` falls inside the window.
    #[must_use]
    pub fn contains(self, time: TimeOfDay) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Between { start, end } if start < end => start <= time && time < end,
            Self::Between { start, end } if start > end => time >= start || time < end,
            Self::Between { .. } => false,
        }
    }

    /// Returns `true` if no time of day can pass.
    #[must_use]
    pub fn is_empty(self) -> bool {
        matches!(self, Self::Between { start, end } if start == end)
    }

    /// Returns `true` if the window crosses midnight.
    #[must_use]
    pub fn wraps_midnight(self) -> bool {
        matches!(self, Self::Between { start, end } if start > end)
    }
}

/// First and one-past-last instants of a calendar month.
#[must_use]
pub fn month_range(year: i32, month: Month) -> Option<Range<NaiveDateTime>> {
    let (next_year, next_month) = if month == Month::December {
        (year.checked_add(1)?, 1)
    } else {
        (year, month.number() + 1)
    };
    let start = NaiveDate::from_ymd_opt(year, month.number(), 1)?.and_hms_opt(0, 0, 0)?;
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)?.and_hms_opt(0, 0, 0)?;
    Some(start..end)
}

/// The combined time-of-day and month predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeFilter {
    /// Time-of-day restriction.
    pub window: TimeWindow,
    /// Month restriction, if any.
    pub month: Option<Month>,
    /// Timestamp range of `month` within the data set's year. `None` when
    /// no month is set or the year is unknown.
    pub period: Option<Range<NaiveDateTime>>,
}

impl TimeFilter {
    /// Resolves query bounds into a predicate.
    ///
    /// `reference_year` is the single year present in the data set. When
    /// it is unknown a month restriction compares the month alone.
    #[must_use]
    pub fn resolve(
        start: Option<TimeOfDay>,
        end: Option<TimeOfDay>,
        month: Option<Month>,
        reference_year: Option<i32>,
    ) -> Self {
        let period = month.zip(reference_year).and_then(|(m, y)| month_range(y, m));
        Self {
            window: TimeWindow::new(start, end),
            month,
            period,
        }
    }

    /// Returns `true` if the record passes both dimensions.
    #[must_use]
    pub fn matches(&self, record: &IncidentRecord) -> bool {
        let in_month = match (&self.period, self.month) {
            (Some(period), _) => period.contains(&record.occurred_at),
            (None, Some(month)) => record.month() == month,
            (None, None) => true,
        };
        in_month && self.window.contains(record.time_of_day())
    }
}
