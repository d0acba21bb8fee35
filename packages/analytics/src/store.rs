//! Immutable in-memory incident record store.
//!
//! Records are sorted by timestamp once at construction. Nothing in the
//! engine adds, removes, or mutates a record afterwards.

use chrono::NaiveDateTime;
use incident_survey_incident_models::IncidentRecord;

/// The full set of incident records, ordered by timestamp.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<IncidentRecord>,
    reference_year: Option<i32>,
}

impl RecordStore {
    /// Builds a store from already-parsed records.
    ///
    /// The sort is stable, so records sharing a timestamp keep the order
    /// they were supplied in. That order is the "first seen" tie-break used
    /// by the aggregates.
    #[must_use]
    pub fn new(mut records: Vec<IncidentRecord>) -> Self {
        records.sort_by_key(|record| record.occurred_at);

        let reference_year = records.first().map(IncidentRecord::year);
        if let (Some(first), Some(last)) = (records.first(), records.last())
            && first.year() != last.year()
        {
            log::warn!(
                "Records span {} to {}; month queries are limited to {}",
                first.year(),
                last.year(),
                first.year()
            );
        }

        log::debug!("Record store built with {} records", records.len());

        Self {
            records,
            reference_year,
        }
    }

    /// All records in timestamp order.
    #[must_use]
    pub fn records(&self) -> &[IncidentRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The calendar year month queries refer to: the year of the earliest
    /// record. `None` for an empty store.
    #[must_use]
    pub const fn reference_year(&self) -> Option<i32> {
        self.reference_year
    }

    /// Records with `from <= occurred_at < to`, found by binary search on
    /// the timestamp order.
    #[must_use]
    pub fn between(&self, from: NaiveDateTime, to: NaiveDateTime) -> &[IncidentRecord] {
        if to <= from {
            return &[];
        }
        let lo = self.records.partition_point(|r| r.occurred_at < from);
        let hi = self.records.partition_point(|r| r.occurred_at < to);
        &self.records[lo..hi]
    }
}

impl From<Vec<IncidentRecord>> for RecordStore {
    fn from(records: Vec<IncidentRecord>) -> Self {
        Self::new(records)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(call_type: &str, month: u32, day: u32, hour: u32) -> IncidentRecord {
        let at = NaiveDate::from_ymd_opt(2023, month, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        IncidentRecord::new(call_type, "E23", "1 MAIN ST", None, at)
    }

    #[test]
    fn sorts_by_timestamp() {
        let store = RecordStore::new(vec![
            record("C", 12, 1, 0),
            record("A", 4, 1, 0),
            record("B", 6, 1, 0),
        ]);
        let types: Vec<&str> = store
            .records()
            .iter()
            .map(|r| r.call_type.as_str())
            .collect();
        assert_eq!(types, vec!["A", "B", "C"]);
        assert_eq!(store.reference_year(), Some(2023));
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let store = RecordStore::new(vec![
            record("FIRST", 5, 1, 8),
            record("SECOND", 5, 1, 8),
            record("EARLIER", 4, 1, 8),
        ]);
        let types: Vec<&str> = store
            .records()
            .iter()
            .map(|r| r.call_type.as_str())
            .collect();
        assert_eq!(types, vec!["EARLIER", "FIRST", "SECOND"]);
    }

    #[test]
    fn between_is_half_open() {
        let store = RecordStore::new(vec![
            record("A", 5, 1, 0),
            record("B", 5, 31, 23),
            record("C", 6, 1, 0),
        ]);
        let from = NaiveDate::from_ymd_opt(2023, 5, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let to = NaiveDate::from_ymd_opt(2023, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let slice = store.between(from, to);
        assert_eq!(slice.len(), 2);
        assert_eq!(slice[1].call_type, "B");
        assert!(store.between(to, from).is_empty());
    }

    #[test]
    fn empty_store() {
        let store = RecordStore::default();
        assert!(store.is_empty());
        assert_eq!(store.reference_year(), None);
    }
}
