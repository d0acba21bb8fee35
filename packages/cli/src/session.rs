//! Loaded state shared by the subcommands and the interactive mode.

use std::path::{Path, PathBuf};

use incident_survey_analytics::{
    AnalyticsError, Engine, QueryFilter, RecordStore, TimeWindow, colors,
};
use incident_survey_analytics_models::{
    ColorAssignment, HeatMapResult, HourlyVolumeResult, LocationCountsResult, Palette,
    QueryParams, TypeCountsResult,
};
use incident_survey_source::csv_source::CsvFileSource;
use incident_survey_source::department::{self, DEFAULT_DEPARTMENT, DepartmentDefinition};
use incident_survey_source::{LoadReport, RecordSource, SourceError};
use serde::Serialize;

/// Environment variable holding the incident export path.
pub const CSV_ENV: &str = "INCIDENT_SURVEY_CSV";
/// Environment variable holding the department id.
pub const DEPARTMENT_ENV: &str = "INCIDENT_SURVEY_DEPARTMENT";

/// A query result with the colors for its categorical axis.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Charted<T: Serialize> {
    /// The aggregate.
    #[serde(flatten)]
    pub result: T,
    /// One color per category, in result order.
    pub colors: ColorAssignment,
}

/// Picks the department from the flag, then the environment, then the
/// default.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if the department is unknown.
pub fn resolve_department(flag: Option<&str>) -> Result<DepartmentDefinition, SourceError> {
    let id = flag.map_or_else(
        || std::env::var(DEPARTMENT_ENV).unwrap_or_else(|_| DEFAULT_DEPARTMENT.to_string()),
        ToString::to_string,
    );
    department::department(&id)
}

/// Picks the incident export path from the flag or the environment.
///
/// # Errors
///
/// Returns an error if neither is set.
pub fn resolve_csv_path(flag: Option<PathBuf>) -> Result<PathBuf, String> {
    flag.or_else(|| std::env::var(CSV_ENV).ok().map(PathBuf::from))
        .ok_or_else(|| format!("No incident export given: pass --csv or set {CSV_ENV}"))
}

/// A department with its incident records loaded into an engine.
#[derive(Debug)]
pub struct Session {
    /// The department definition.
    pub department: DepartmentDefinition,
    /// Query engine over the loaded records.
    pub engine: Engine,
    /// Row statistics from the load.
    pub report: LoadReport,
}

impl Session {
    /// Loads the export at `csv` for `department`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the export cannot be read.
    pub fn load(csv: &Path, department: DepartmentDefinition) -> Result<Self, SourceError> {
        let loaded = CsvFileSource::new(csv).load()?;
        let store = RecordStore::new(loaded.records);
        log::info!(
            "{}: {} records, reference year {}",
            department.name,
            store.len(),
            store
                .reference_year()
                .map_or_else(|| "n/a".to_string(), |y| y.to_string())
        );
        let engine = Engine::new(store, department.units.clone());
        Ok(Self {
            department,
            engine,
            report: loaded.report,
        })
    }

    /// Validates raw parameters, warning about units not on the roster.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is malformed.
    pub fn filter(&self, params: &QueryParams) -> Result<QueryFilter, AnalyticsError> {
        let filter = QueryFilter::parse(params)?;
        if let Some(unit) = filter.unit.unit()
            && !self.department.has_unit(unit)
        {
            log::warn!("Unit {unit} is not on the {} roster", self.department.id);
        }
        Ok(filter)
    }

    /// Palette for call type charts. Windowed queries use the department's
    /// time-window palette.
    #[must_use]
    pub fn type_palette(&self, filter: &QueryFilter) -> Palette {
        match filter.window() {
            TimeWindow::Unrestricted => self.department.palettes.by_type,
            TimeWindow::Between { .. } => self.department.palettes.time_window,
        }
    }

    /// Incidents by call type, colored.
    #[must_use]
    pub fn by_type(&self, filter: &QueryFilter) -> Charted<TypeCountsResult> {
        let result = self.engine.incidents_by_type(filter);
        let labels: Vec<&str> = result.counts.iter().map(|c| c.category.as_str()).collect();
        let colors = colors::assign_colors(&labels, self.type_palette(filter));
        Charted { result, colors }
    }

    /// Incidents by address, colored. `min_count` overrides the
    /// department threshold.
    #[must_use]
    pub fn by_location(
        &self,
        filter: &QueryFilter,
        min_count: Option<u64>,
    ) -> Charted<LocationCountsResult> {
        let min_count = min_count
            .unwrap_or_else(|| filter.location_threshold(&self.department.location_thresholds()));
        let result = self.engine.incidents_by_location(filter, min_count);
        let labels: Vec<&str> = result.counts.iter().map(|c| c.category.as_str()).collect();
        let colors = colors::assign_colors(&labels, self.department.palettes.by_type);
        Charted { result, colors }
    }

    /// Hourly volume, colored.
    #[must_use]
    pub fn hourly(&self, filter: &QueryFilter) -> Charted<HourlyVolumeResult> {
        let result = self.engine.hourly_volume(filter);
        let labels: Vec<&str> = result.buckets.iter().map(|b| b.label.as_str()).collect();
        let colors = colors::assign_colors(&labels, self.department.palettes.hourly);
        Charted { result, colors }
    }

    /// Density map points centered for the selected unit.
    #[must_use]
    pub fn heat_map(&self, filter: &QueryFilter) -> HeatMapResult {
        self.engine
            .heat_map(filter, &self.department.station_directory())
    }
}

/// Pretty-prints a result as JSON on stdout.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
