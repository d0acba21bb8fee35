//! Aggregate views over a filtered record subset.
//!
//! Every function takes the records that survived filtering and never
//! fails: an empty subset yields an empty (or zero-filled) table.
//!
//! Categorical axes are ordered by descending count with ties kept in
//! first-seen order. The hour axis is always chronological and the unit
//! axis follows the caller's unit list.

use std::collections::BTreeMap;

use incident_survey_analytics_models::{
    CategoryCount, HeatPoint, HourBucket, UnitSummary, UnitSummaryRow,
};
use incident_survey_incident_models::{IncidentRecord, TimeOfDay, UnitCode};

use crate::units::UnitSelector;

/// Number of hour buckets in a day.
pub const HOURS_PER_DAY: usize = 24;

/// Counts occurrences of each key, remembering the order keys were first
/// seen in.
fn tally<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<CategoryCount> {
    let mut index: BTreeMap<&'a str, usize> = BTreeMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for key in keys {
        if let Some(&i) = index.get(key) {
            counts[i].count += 1;
        } else {
            index.insert(key, counts.len());
            counts.push(CategoryCount {
                category: key.to_string(),
                count: 1,
            });
        }
    }

    // Stable sort: equal counts stay in first-seen order.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Incidents per call type. The counts always sum to `records.len()`.
#[must_use]
pub fn count_by_type(records: &[&IncidentRecord]) -> Vec<CategoryCount> {
    tally(records.iter().map(|r| r.call_type.as_str()))
}

/// Incidents per address, keeping only addresses with at least
/// `min_count` incidents.
///
/// Returns the surviving counts and the number of addresses dropped.
#[must_use]
pub fn count_by_location(records: &[&IncidentRecord], min_count: u64) -> (Vec<CategoryCount>, u64) {
    let (kept, dropped): (Vec<_>, Vec<_>) = tally(records.iter().map(|r| r.location.as_str()))
        .into_iter()
        .partition(|c| c.count >= min_count);
    (kept, dropped.len() as u64)
}

/// Label for the bucket starting at `hour`, e.g. `"07:00-08:00"`.
#[must_use]
pub fn hour_label(hour: usize) -> String {
    format!("{hour:02}:00-{:02}:00", hour + 1)
}

/// Incident volume for each of the 24 hours of the day.
///
/// Each record lands in exactly one bucket by its time of day. The result
/// always has 24 entries, `[00:00, 01:00)` through `[23:00, 24:00)`.
#[must_use]
pub fn hourly_buckets(records: &[&IncidentRecord]) -> Vec<HourBucket> {
    let mut counts = [0u64; HOURS_PER_DAY];
    for record in records {
        counts[usize::from(record.time_of_day().hour())] += 1;
    }

    counts
        .iter()
        .enumerate()
        .map(|(hour, &count)| {
            #[allow(clippy::cast_possible_truncation)]
            let h = hour as u32;
            HourBucket {
                label: hour_label(hour),
                start: TimeOfDay::from_hm(h, 0).unwrap_or(TimeOfDay::MIDNIGHT),
                end: TimeOfDay::from_hm(h + 1, 0).unwrap_or(TimeOfDay::END_OF_DAY),
                count,
            }
        })
        .collect()
}

/// Cross tabulates call type against each unit in `units`.
///
/// Rows appear in first-seen call type order; columns follow `units`. A
/// cell counts the records of that type the unit responded to.
#[must_use]
pub fn cross_tabulate<'a>(
    records: impl IntoIterator<Item = &'a IncidentRecord>,
    units: &[UnitCode],
) -> UnitSummary {
    let selectors: Vec<UnitSelector> = units.iter().cloned().map(UnitSelector::Unit).collect();
    let mut index: BTreeMap<&'a str, usize> = BTreeMap::new();
    let mut rows: Vec<UnitSummaryRow> = Vec::new();

    for record in records {
        let row = *index.entry(record.call_type.as_str()).or_insert_with(|| {
            rows.push(UnitSummaryRow {
                call_type: record.call_type.clone(),
                counts: vec![0; units.len()],
            });
            rows.len() - 1
        });
        for (cell, selector) in rows[row].counts.iter_mut().zip(&selectors) {
            if selector.matches(record) {
                *cell += 1;
            }
        }
    }

    UnitSummary {
        units: units.to_vec(),
        rows,
    }
}

/// Density map points for records with usable coordinates.
///
/// Returns the points and the number of records skipped for missing or
/// invalid coordinates.
#[must_use]
pub fn heat_points(records: &[&IncidentRecord]) -> (Vec<HeatPoint>, u64) {
    let points: Vec<HeatPoint> = records
        .iter()
        .filter_map(|r| {
            r.coordinates.map(|c| HeatPoint {
                latitude: c.latitude,
                longitude: c.longitude,
                call_type: r.call_type.clone(),
                location: r.location.clone(),
                units: r.units_raw.clone(),
            })
        })
        .collect();
    let dropped = (records.len() - points.len()) as u64;
    (points, dropped)
}
