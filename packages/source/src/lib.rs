#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Record sources and department definitions for the incident survey.
//!
//! A [`RecordSource`] turns an exported incident file into
//! [`IncidentRecord`]s once, before the analytics engine is built. The
//! engine itself never touches files.

pub mod csv_source;
pub mod department;
pub mod parsing;

use incident_survey_incident_models::IncidentRecord;
use serde::{Deserialize, Serialize};

/// Errors that can occur while loading records or configuration.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV framing or decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is missing from the header row.
    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),

    /// A department definition is malformed or unknown.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },
}

/// Row-level statistics from a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    /// Data rows read from the file.
    pub rows_read: u64,
    /// Rows turned into records.
    pub rows_loaded: u64,
    /// Rows skipped for a missing call type or unparseable timestamp.
    pub rows_skipped: u64,
    /// Loaded rows without usable coordinates.
    pub rows_without_coordinates: u64,
}

/// Records produced by a source along with load statistics.
#[derive(Debug, Clone)]
pub struct LoadedRecords {
    /// Successfully parsed records, in file order.
    pub records: Vec<IncidentRecord>,
    /// Row-level statistics.
    pub report: LoadReport,
}

/// Something that can produce the full incident record set.
pub trait RecordSource {
    /// Short identifier used in log output.
    fn id(&self) -> &str;

    /// Loads every record.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the underlying data cannot be read.
    fn load(&self) -> Result<LoadedRecords, SourceError>;
}
