//! CSV incident export reader.
//!
//! Reads the exported incident table (one row per call) with columns
//! `Latitude`, `Longitude`, `Call_Location`, `Units`, `Call_Type` and
//! `Call_Date_Time`. Extra columns, including an unnamed leading index
//! column, are ignored.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use csv::StringRecord;
use incident_survey_incident_models::IncidentRecord;

use crate::parsing::{parse_call_date_time, parse_lat_lng_str};
use crate::{LoadReport, LoadedRecords, RecordSource, SourceError};

const LATITUDE: &str = "Latitude";
const LONGITUDE: &str = "Longitude";
const LOCATION: &str = "Call_Location";
const UNITS: &str = "Units";
const CALL_TYPE: &str = "Call_Type";
const DATE_TIME: &str = "Call_Date_Time";

/// Positions of the required columns in the header row.
struct Columns {
    latitude: usize,
    longitude: usize,
    location: usize,
    units: usize,
    call_type: usize,
    date_time: usize,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self, SourceError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(SourceError::MissingColumn(name))
        };
        Ok(Self {
            latitude: find(LATITUDE)?,
            longitude: find(LONGITUDE)?,
            location: find(LOCATION)?,
            units: find(UNITS)?,
            call_type: find(CALL_TYPE)?,
            date_time: find(DATE_TIME)?,
        })
    }
}

/// Parses an incident export from any reader.
///
/// Rows without a call type or with an unparseable timestamp are skipped
/// and counted; rows with bad coordinates are kept without coordinates.
///
/// # Errors
///
/// Returns [`SourceError::MissingColumn`] if a required header is absent,
/// or [`SourceError::Csv`] if the CSV itself is malformed.
pub fn load_csv<R: Read>(reader: R) -> Result<LoadedRecords, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(reader.headers()?)?;
    let mut records = Vec::new();
    let mut report = LoadReport::default();

    for row in reader.records() {
        let row = row?;
        report.rows_read += 1;
        let line = row.position().map_or(0, csv::Position::line);

        let call_type = row.get(columns.call_type).unwrap_or_default();
        if call_type.is_empty() {
            log::warn!("Skipping line {line}: empty call type");
            report.rows_skipped += 1;
            continue;
        }

        let raw_time = row.get(columns.date_time).unwrap_or_default();
        let Some(occurred_at) = parse_call_date_time(raw_time) else {
            log::warn!("Skipping line {line}: unparseable call time '{raw_time}'");
            report.rows_skipped += 1;
            continue;
        };

        let coordinates = parse_lat_lng_str(row.get(columns.latitude), row.get(columns.longitude));
        if coordinates.is_none() {
            report.rows_without_coordinates += 1;
        }

        records.push(IncidentRecord::new(
            call_type,
            row.get(columns.units).unwrap_or_default(),
            row.get(columns.location).unwrap_or_default(),
            coordinates,
            occurred_at,
        ));
        report.rows_loaded += 1;
    }

    log::info!(
        "Loaded {} of {} rows ({} skipped, {} without coordinates)",
        report.rows_loaded,
        report.rows_read,
        report.rows_skipped,
        report.rows_without_coordinates
    );

    Ok(LoadedRecords { records, report })
}

/// A CSV incident export on disk.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    /// Creates a source for the file at `path`.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl RecordSource for CsvFileSource {
    fn id(&self) -> &str {
        self.path.to_str().unwrap_or("csv")
    }

    fn load(&self) -> Result<LoadedRecords, SourceError> {
        log::info!("Reading incidents from {}", self.path.display());
        let file = File::open(&self.path)?;
        load_csv(BufReader::new(file))
    }
}
