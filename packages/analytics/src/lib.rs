#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation engine behind the three report figures.
//!
//! Every function here is a pure transformation from loaded incidents (and
//! the sun table, for the day/night figure) into the result types of
//! [`crime_report_analytics_models`]. Rendering happens elsewhere.

pub mod daylight;
pub mod density;
pub mod monthly;
pub mod regression;

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// An incident is dated outside the year being reported on.
    #[error("Incident dated {date} is outside the report year {year}")]
    OutsideYear {
        /// The offending incident date.
        date: NaiveDate,
        /// The configured report year.
        year: i32,
    },

    /// The report year cannot be represented as a calendar.
    #[error("Invalid report year {year}")]
    InvalidYear {
        /// The rejected year.
        year: i32,
    },
}
