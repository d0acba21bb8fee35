//! Department registry, loaded from embedded TOML configs.
//!
//! Each `.toml` file in `packages/source/departments/` is baked into the
//! binary at compile time via [`include_str!`]. A department lists its
//! unit roster, headquarters and station locations, location thresholds
//! and the palettes used for each chart.

use incident_survey_analytics_models::{LocationThresholds, Palette, Station, StationDirectory};
use incident_survey_incident_models::UnitCode;
use serde::Deserialize;

use crate::SourceError;

/// TOML configs embedded at compile time.
const DEPARTMENT_TOMLS: &[(&str, &str)] = &[
    // ── Connecticut ──────────────────────────────────────────────────
    ("danbury", include_str!("../departments/danbury.toml")),
];

/// Department used when none is configured.
pub const DEFAULT_DEPARTMENT: &str = "danbury";

/// Latitude/longitude pair as written in a department config.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ConfigPoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// Location thresholds as written in a department config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ConfigThresholds {
    /// Threshold for department-wide location queries.
    pub department_wide: u64,
    /// Threshold for single-unit location queries.
    pub per_unit: u64,
}

/// Palette choice for each chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ChartPalettes {
    /// Incidents by call type.
    pub by_type: Palette,
    /// Hourly volume.
    pub hourly: Palette,
    /// Time-window comparisons.
    pub time_window: Palette,
}

/// A single department definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DepartmentDefinition {
    /// Short identifier, e.g. `danbury`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Unit roster in display order.
    pub units: Vec<UnitCode>,
    /// Headquarters location.
    pub headquarters: ConfigPoint,
    /// Units with their own station.
    #[serde(default)]
    pub stations: Vec<Station>,
    /// Location aggregation thresholds.
    pub thresholds: ConfigThresholds,
    /// Chart palettes.
    pub palettes: ChartPalettes,
}

impl DepartmentDefinition {
    /// Headquarters and stations, for centering maps.
    #[must_use]
    pub fn station_directory(&self) -> StationDirectory {
        StationDirectory {
            headquarters_latitude: self.headquarters.latitude,
            headquarters_longitude: self.headquarters.longitude,
            stations: self.stations.clone(),
        }
    }

    /// Location thresholds as used by the query layer.
    #[must_use]
    pub const fn location_thresholds(&self) -> LocationThresholds {
        LocationThresholds {
            department_wide: self.thresholds.department_wide,
            per_unit: self.thresholds.per_unit,
        }
    }

    /// Whether `unit` is on the roster.
    #[must_use]
    pub fn has_unit(&self, unit: &UnitCode) -> bool {
        self.units.contains(unit)
    }
}

/// Parses a department definition from TOML.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if the TOML is malformed or a station
/// refers to a unit that is not on the roster.
pub fn parse_department_toml(raw: &str) -> Result<DepartmentDefinition, SourceError> {
    let department: DepartmentDefinition =
        toml::from_str(raw).map_err(|e| SourceError::Config {
            message: e.to_string(),
        })?;

    if let Some(station) = department
        .stations
        .iter()
        .find(|s| !department.units.contains(&s.unit))
    {
        return Err(SourceError::Config {
            message: format!(
                "{}: station for unit '{}' which is not on the roster",
                department.id, station.unit
            ),
        });
    }

    Ok(department)
}

/// Returns all configured department definitions.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if any embedded config is malformed.
pub fn all_departments() -> Result<Vec<DepartmentDefinition>, SourceError> {
    DEPARTMENT_TOMLS
        .iter()
        .map(|(name, raw)| {
            parse_department_toml(raw).map_err(|e| SourceError::Config {
                message: format!("Failed to parse {name}.toml: {e}"),
            })
        })
        .collect()
}

/// Looks up a department by id (case-insensitive).
///
/// # Errors
///
/// Returns [`SourceError::Config`] if no department has that id or its
/// config is malformed.
pub fn department(id: &str) -> Result<DepartmentDefinition, SourceError> {
    all_departments()?
        .into_iter()
        .find(|d| d.id.eq_ignore_ascii_case(id.trim()))
        .ok_or_else(|| SourceError::Config {
            message: format!("Unknown department '{id}'"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_all_departments() {
        let departments = all_departments().unwrap();
        assert_eq!(departments.len(), DEPARTMENT_TOMLS.len());
        for department in &departments {
            assert!(!department.id.is_empty());
            assert!(!department.name.is_empty());
            assert!(!department.units.is_empty(), "{}: no units", department.id);
        }
    }

    #[test]
    fn default_department_roster_order() {
        let danbury = department(DEFAULT_DEPARTMENT).unwrap();
        let roster: Vec<&str> = danbury.units.iter().map(UnitCode::as_str).collect();
        assert_eq!(
            roster,
            vec!["TAC1", "SQ21", "E22", "E23", "E24", "E25", "E26", "T1", "C30"]
        );
        assert_eq!(danbury.location_thresholds(), LocationThresholds::default());
        assert_eq!(danbury.palettes.by_type, Palette::Red);
        assert_eq!(danbury.palettes.hourly, Palette::Blue);
    }

    #[test]
    fn station_directory_centers_on_station() {
        let danbury = department("DANBURY").unwrap();
        let directory = danbury.station_directory();

        let e25 = UnitCode::parse("E25").unwrap();
        let center = directory.map_center(Some(&e25));
        assert!((center.latitude - 41.427_157).abs() < 1e-9);
        assert_eq!(center.zoom, StationDirectory::UNIT_ZOOM);

        let t1 = UnitCode::parse("T1").unwrap();
        let center = directory.map_center(Some(&t1));
        assert!((center.latitude - 41.393_510).abs() < 1e-9);
        assert_eq!(center.zoom, StationDirectory::UNIT_ZOOM);
    }

    #[test]
    fn unknown_department_is_a_config_error() {
        assert!(matches!(
            department("springfield"),
            Err(SourceError::Config { .. })
        ));
    }

    #[test]
    fn rejects_station_for_unlisted_unit() {
        let raw = r#"
id = "test"
name = "Test"
units = ["E1"]

[headquarters]
latitude = 41.0
longitude = -73.0

[[stations]]
unit = "E9"
latitude = 41.1
longitude = -73.1

[thresholds]
department_wide = 10
per_unit = 2

[palettes]
by_type = "red_alt"
hourly = "dark_blue"
time_window = "green_alt"
"#;
        let err = parse_department_toml(raw).unwrap_err();
        assert!(err.to_string().contains("E9"));
    }

    #[test]
    fn rejects_unknown_palette() {
        let raw = r#"
id = "test"
name = "Test"
units = ["E1"]

[headquarters]
latitude = 41.0
longitude = -73.0

[thresholds]
department_wide = 10
per_unit = 2

[palettes]
by_type = "purple"
hourly = "blue"
time_window = "green"
"#;
        assert!(matches!(
            parse_department_toml(raw),
            Err(SourceError::Config { .. })
        ));
    }
}
