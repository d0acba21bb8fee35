//! The query surface consumed by the presentation layer.
//!
//! An [`Engine`] owns the record store and the department's unit roster.
//! Every query borrows it immutably, so one engine can serve any number of
//! concurrent callers without coordination.

use std::sync::OnceLock;

use incident_survey_analytics_models::{
    HeatMapResult, HourlyVolumeResult, LocationCountsResult, StationDirectory, TypeCountsResult,
    UnitSummary,
};
use incident_survey_incident_models::{IncidentRecord, UnitCode};

use crate::aggregate;
use crate::query::QueryFilter;
use crate::store::RecordStore;

/// Read-only query engine over a fixed set of incident records.
#[derive(Debug)]
pub struct Engine {
    store: RecordStore,
    roster: Vec<UnitCode>,
    summary: OnceLock<UnitSummary>,
}

impl Engine {
    /// Creates an engine. `roster` is the unit list (in display order)
    /// used for the call type by unit summary.
    #[must_use]
    pub fn new(store: RecordStore, roster: Vec<UnitCode>) -> Self {
        Self {
            store,
            roster,
            summary: OnceLock::new(),
        }
    }

    /// The underlying record store.
    #[must_use]
    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    /// The configured unit roster.
    #[must_use]
    pub fn roster(&self) -> &[UnitCode] {
        &self.roster
    }

    /// Applies a filter to the store.
    ///
    /// Month-restricted queries only scan the month's slice of the
    /// timestamp-ordered store.
    #[must_use]
    pub fn filter(&self, filter: &QueryFilter) -> Vec<&IncidentRecord> {
        let time = filter.time_filter(self.store.reference_year());
        let candidates = time.period.as_ref().map_or(self.store.records(), |period| {
            self.store.between(period.start, period.end)
        });

        let matched: Vec<&IncidentRecord> = candidates
            .iter()
            .filter(|record| time.matches(record) && filter.unit.matches(record))
            .collect();

        log::debug!(
            "Query [{}] matched {} of {} records",
            filter.describe(),
            matched.len(),
            self.store.len()
        );

        matched
    }

    /// Incident counts per call type.
    #[must_use]
    pub fn incidents_by_type(&self, filter: &QueryFilter) -> TypeCountsResult {
        let records = self.filter(filter);
        TypeCountsResult {
            total: records.len() as u64,
            counts: aggregate::count_by_type(&records),
            description: filter.describe(),
        }
    }

    /// Incident counts per address, keeping addresses with at least
    /// `min_count` incidents.
    #[must_use]
    pub fn incidents_by_location(
        &self,
        filter: &QueryFilter,
        min_count: u64,
    ) -> LocationCountsResult {
        let records = self.filter(filter);
        let (counts, suppressed_locations) = aggregate::count_by_location(&records, min_count);
        LocationCountsResult {
            total: records.len() as u64,
            min_count,
            counts,
            suppressed_locations,
            description: filter.describe(),
        }
    }

    /// Incident volume for each hour of the day.
    #[must_use]
    pub fn hourly_volume(&self, filter: &QueryFilter) -> HourlyVolumeResult {
        let records = self.filter(filter);
        HourlyVolumeResult {
            buckets: aggregate::hourly_buckets(&records),
            total: records.len() as u64,
            description: filter.describe(),
        }
    }

    /// Call type by unit cross tabulation over the full record set.
    ///
    /// Built on first access and then shared read-only for the life of
    /// the engine.
    pub fn unit_summary(&self) -> &UnitSummary {
        self.summary.get_or_init(|| {
            log::info!(
                "Building unit summary for {} units over {} records",
                self.roster.len(),
                self.store.len()
            );
            aggregate::cross_tabulate(self.store.records(), &self.roster)
        })
    }

    /// Density map points for the filtered records, centered for the
    /// selected unit.
    #[must_use]
    pub fn heat_map(&self, filter: &QueryFilter, stations: &StationDirectory) -> HeatMapResult {
        let records = self.filter(filter);
        let (points, dropped_without_coordinates) = aggregate::heat_points(&records);
        if dropped_without_coordinates > 0 {
            log::debug!("{dropped_without_coordinates} records have no usable coordinates");
        }
        HeatMapResult {
            points,
            dropped_without_coordinates,
            center: stations.map_center(filter.unit.unit()),
            description: filter.describe(),
        }
    }
}
