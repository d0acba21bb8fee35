#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Query parameter and aggregate result types for the incident survey
//! analytics engine.
//!
//! These are plain data: the presentation layer receives them as
//! category-to-count and category-to-color mappings and decides how to
//! render them.

use incident_survey_incident_models::{TimeOfDay, UnitCode};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Parameter value meaning "no restriction" for any query dimension.
pub const ALL: &str = "ALL";

/// Returns `true` if a raw parameter value is absent, blank, or the
/// [`ALL`] sentinel (any case).
#[must_use]
pub fn is_unrestricted(raw: Option<&str>) -> bool {
    raw.is_none_or(|value| {
        let value = value.trim();
        value.is_empty() || value.eq_ignore_ascii_case(ALL)
    })
}

/// Raw query parameters as supplied by a caller.
///
/// Every field is optional; `None`, `""` and `"ALL"` all mean the
/// dimension is unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    /// Start of the time-of-day window (`HH:MM`, inclusive).
    pub start_time: Option<String>,
    /// End of the time-of-day window (`HH:MM`, exclusive).
    pub end_time: Option<String>,
    /// Month name or number.
    pub month: Option<String>,
    /// Responding unit code.
    pub unit: Option<String>,
}

/// Minimum incident counts used to trim the long tail of one-off
/// addresses from location aggregates.
///
/// These are caller defaults, not engine constants: the engine always
/// receives an explicit threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationThresholds {
    /// Threshold for department-wide queries.
    pub department_wide: u64,
    /// Threshold when the query is restricted to a single unit.
    pub per_unit: u64,
}

impl Default for LocationThresholds {
    fn default() -> Self {
        Self {
            department_wide: 20,
            per_unit: 5,
        }
    }
}

/// Count of incidents in a single category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Category label (call type or address).
    pub category: String,
    /// Number of incidents.
    pub count: u64,
}

/// Incident counts per call type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCountsResult {
    /// Records in the filtered subset. Always equals the sum of `counts`.
    pub total: u64,
    /// Per-type counts, most frequent first.
    pub counts: Vec<CategoryCount>,
    /// Description of the applied filter.
    pub description: String,
}

/// Incident counts per address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationCountsResult {
    /// Records in the filtered subset, before the threshold is applied.
    pub total: u64,
    /// Threshold that was applied.
    pub min_count: u64,
    /// Addresses at or above the threshold, most frequent first.
    pub counts: Vec<CategoryCount>,
    /// Number of addresses dropped by the threshold.
    pub suppressed_locations: u64,
    /// Description of the applied filter.
    pub description: String,
}

/// One hour of the day and the incidents logged in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourBucket {
    /// Display label, e.g. `"07:00-08:00"`.
    pub label: String,
    /// Inclusive start of the bucket.
    pub start: TimeOfDay,
    /// Exclusive end of the bucket.
    pub end: TimeOfDay,
    /// Number of incidents.
    pub count: u64,
}

/// Incident volume across the 24 hours of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyVolumeResult {
    /// Exactly 24 buckets in chronological order.
    pub buckets: Vec<HourBucket>,
    /// Records in the filtered subset.
    pub total: u64,
    /// Description of the applied filter.
    pub description: String,
}

/// One call type row of the unit summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSummaryRow {
    /// Call type label.
    pub call_type: String,
    /// Responses per unit, aligned with [`UnitSummary::units`].
    pub counts: Vec<u64>,
}

/// Cross tabulation of responses by call type and unit.
///
/// A record answered by several units counts once for each of them, so
/// row totals can exceed the number of incidents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSummary {
    /// Column order, as configured by the caller.
    pub units: Vec<UnitCode>,
    /// One row per call type, in first-seen order.
    pub rows: Vec<UnitSummaryRow>,
}

impl UnitSummary {
    /// Looks up a single cell.
    #[must_use]
    pub fn count(&self, call_type: &str, unit: &UnitCode) -> Option<u64> {
        let col = self.units.iter().position(|u| u == unit)?;
        self.rows
            .iter()
            .find(|row| row.call_type == call_type)
            .map(|row| row.counts[col])
    }

    /// Total responses per unit, aligned with [`Self::units`].
    #[must_use]
    pub fn unit_totals(&self) -> Vec<u64> {
        let mut totals = vec![0; self.units.len()];
        for row in &self.rows {
            for (total, count) in totals.iter_mut().zip(&row.counts) {
                *total += count;
            }
        }
        totals
    }
}

/// Where a map of the results should be centered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapCenter {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Suggested zoom level.
    pub zoom: u8,
}

/// A unit's home station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// Unit housed at the station.
    pub unit: UnitCode,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// Headquarters and station locations used to center maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDirectory {
    /// Headquarters latitude.
    pub headquarters_latitude: f64,
    /// Headquarters longitude.
    pub headquarters_longitude: f64,
    /// Units with their own station.
    pub stations: Vec<Station>,
}

impl StationDirectory {
    /// Zoom for department-wide maps.
    pub const DEPARTMENT_ZOOM: u8 = 11;
    /// Zoom for single-unit maps.
    pub const UNIT_ZOOM: u8 = 12;

    /// Centers on the unit's station when it has one, otherwise on
    /// headquarters. Single-unit maps are zoomed in one level further.
    #[must_use]
    pub fn map_center(&self, unit: Option<&UnitCode>) -> MapCenter {
        let zoom = if unit.is_some() {
            Self::UNIT_ZOOM
        } else {
            Self::DEPARTMENT_ZOOM
        };
        unit.and_then(|u| self.stations.iter().find(|s| &s.unit == u))
            .map_or(
                MapCenter {
                    latitude: self.headquarters_latitude,
                    longitude: self.headquarters_longitude,
                    zoom,
                },
                |station| MapCenter {
                    latitude: station.latitude,
                    longitude: station.longitude,
                    zoom,
                },
            )
    }
}

/// A single incident location on the density map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatPoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Call type, for hover text.
    pub call_type: String,
    /// Address, for hover text.
    pub location: String,
    /// Raw units field, for hover text.
    pub units: String,
}

/// Incident density map data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatMapResult {
    /// Points with valid coordinates.
    pub points: Vec<HeatPoint>,
    /// Records in the filtered subset that had no usable coordinates.
    pub dropped_without_coordinates: u64,
    /// Suggested map center.
    pub center: MapCenter,
    /// Description of the applied filter.
    pub description: String,
}

// ── Colors ───────────────────────────────────────────────────────────────

/// An RGB color with floating point channels in `0.0..=255.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
}

impl Rgb {
    /// Creates a color from its channels.
    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Formats the color as `#rrggbb`, rounding each channel.
    #[must_use]
    pub fn to_hex(self) -> String {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let channel = |v: f64| v.round().clamp(0.0, 255.0) as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Named two-endpoint gradients used to color categorical axes.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Palette {
    /// Red to blue.
    Red,
    /// Blue to red.
    Blue,
    /// Green to blue.
    Green,
    /// Yellow to blue.
    Yellow,
    /// Navy to cornflower blue.
    DarkBlue,
    /// Crimson to royal blue.
    RedAlt,
    /// Forest green to steel blue.
    GreenAlt,
}

impl Palette {
    /// The start and end colors of the gradient.
    #[must_use]
    pub const fn endpoints(self) -> (Rgb, Rgb) {
        match self {
            Self::Red => (Rgb::new(255.0, 0.0, 0.0), Rgb::new(0.001, 0.0, 255.0)),
            Self::Blue => (Rgb::new(0.0, 0.0, 255.0), Rgb::new(255.0, 0.0, 0.001)),
            Self::Green => (Rgb::new(0.0, 255.0, 0.0), Rgb::new(0.0, 0.001, 255.0)),
            Self::Yellow => (Rgb::new(255.0, 255.0, 0.0), Rgb::new(0.001, 0.0, 255.0)),
            Self::DarkBlue => (Rgb::new(0.0, 0.0, 80.0), Rgb::new(100.0, 149.0, 237.0)),
            Self::RedAlt => (Rgb::new(220.0, 20.0, 60.0), Rgb::new(65.0, 105.0, 225.0)),
            Self::GreenAlt => (Rgb::new(34.0, 139.0, 34.0), Rgb::new(70.0, 130.0, 180.0)),
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Red,
            Self::Blue,
            Self::Green,
            Self::Yellow,
            Self::DarkBlue,
            Self::RedAlt,
            Self::GreenAlt,
        ]
    }
}

/// A label and the color assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelColor {
    /// Category label.
    pub label: String,
    /// Assigned color.
    pub color: Rgb,
}

/// Colors assigned to an ordered sequence of labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorAssignment {
    /// Gradient the colors were sampled from.
    pub palette: Palette,
    /// One entry per distinct label, in input order.
    pub entries: Vec<LabelColor>,
}

impl ColorAssignment {
    /// Color assigned to `label`, if it was part of the input.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<Rgb> {
        self.entries
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| entry.color)
    }

    /// Number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no labels were colored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrestricted_sentinels() {
        assert!(is_unrestricted(None));
        assert!(is_unrestricted(Some("")));
        assert!(is_unrestricted(Some("  ")));
        assert!(is_unrestricted(Some("ALL")));
        assert!(is_unrestricted(Some("all")));
        assert!(!is_unrestricted(Some("E23")));
    }

    #[test]
    fn palette_names_parse() {
        assert_eq!("red".parse::<Palette>().unwrap(), Palette::Red);
        assert_eq!("DARK_BLUE".parse::<Palette>().unwrap(), Palette::DarkBlue);
        assert_eq!(Palette::GreenAlt.to_string(), "green_alt");
        assert!("purple".parse::<Palette>().is_err());
    }

    #[test]
    fn palettes_have_distinct_gradients() {
        let mut seen = Vec::new();
        for palette in Palette::all() {
            let (start, end) = palette.endpoints();
            assert_ne!(start, end, "{palette} has identical endpoints");
            assert!(
                !seen.contains(&(start, end)),
                "{palette} duplicates another gradient"
            );
            seen.push((start, end));
        }
    }

    #[test]
    fn rgb_formats() {
        let color = Rgb::new(255.0, 127.5, 0.0);
        assert_eq!(color.to_string(), "rgb(255, 127.5, 0)");
        assert_eq!(color.to_hex(), "#ff8000");
    }

    #[test]
    fn unit_summary_lookup_and_totals() {
        let e23 = UnitCode::parse("E23").unwrap();
        let e24 = UnitCode::parse("E24").unwrap();
        let summary = UnitSummary {
            units: vec![e23.clone(), e24.clone()],
            rows: vec![
                UnitSummaryRow {
                    call_type: "FIRE".to_string(),
                    counts: vec![1, 1],
                },
                UnitSummaryRow {
                    call_type: "EMS".to_string(),
                    counts: vec![1, 1],
                },
            ],
        };
        assert_eq!(summary.count("FIRE", &e24), Some(1));
        assert_eq!(summary.count("ALARM", &e24), None);
        assert_eq!(summary.unit_totals(), vec![2, 2]);
    }

    #[test]
    fn map_center_prefers_unit_station() {
        let directory = StationDirectory {
            headquarters_latitude: 41.393_510,
            headquarters_longitude: -73.455_480,
            stations: vec![Station {
                unit: UnitCode::parse("E23").unwrap(),
                latitude: 41.407_951,
                longitude: -73.436_729,
            }],
        };

        let hq = directory.map_center(None);
        assert!((hq.latitude - 41.393_510).abs() < f64::EPSILON);
        assert_eq!(hq.zoom, StationDirectory::DEPARTMENT_ZOOM);

        let e23 = directory.map_center(Some(&UnitCode::parse("E23").unwrap()));
        assert!((e23.latitude - 41.407_951).abs() < f64::EPSILON);
        assert_eq!(e23.zoom, StationDirectory::UNIT_ZOOM);

        let truck = directory.map_center(Some(&UnitCode::parse("T1").unwrap()));
        assert!((truck.longitude - -73.455_480).abs() < f64::EPSILON);
        assert_eq!(truck.zoom, StationDirectory::UNIT_ZOOM);
    }
}
