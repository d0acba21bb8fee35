#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Query and aggregation engine for emergency-response incident records.
//!
//! A query (time-of-day window, month, unit) is resolved into a filter,
//! applied to the read-only [`RecordStore`], and the surviving records are
//! handed to the aggregate functions in [`aggregate`]. Colors for any
//! categorical axis come from [`colors::assign_colors`].
//!
//! Everything here is synchronous and side-effect free. An [`Engine`] can
//! be shared by reference across threads and queried concurrently.

pub mod aggregate;
pub mod colors;
pub mod engine;
pub mod query;
pub mod store;
pub mod units;
pub mod window;

pub use engine::Engine;
pub use query::QueryFilter;
pub use store::RecordStore;
pub use units::UnitSelector;
pub use window::{TimeFilter, TimeWindow};

use thiserror::Error;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A query parameter was not a recognized value.
    #[error("Invalid {name} '{value}': {reason}")]
    InvalidParameter {
        /// Parameter name (`start_time`, `end_time`, `month`, `unit`).
        name: &'static str,
        /// The rejected value.
        value: String,
        /// Description of what went wrong.
        reason: String,
    },

    /// A palette name did not match any known gradient.
    #[error("Unknown palette '{0}'")]
    UnknownPalette(String),
}
