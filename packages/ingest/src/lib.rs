#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loads crime incidents from the city's CSV export.
//!
//! Only four columns matter: `DATE OCC`, `TIME OCC`, `LAT` and `LON`. All
//! other columns are ignored. A row whose fields cannot be parsed is
//! skipped with a warning; a file missing one of the required columns is
//! rejected outright.

pub mod parsing;
pub mod progress;

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crime_report_incident_models::Incident;

use crate::parsing::{parse_date_occ, parse_lat_lng, parse_time_occ};
use crate::progress::ProgressCallback;

/// Column holding the occurrence date.
pub const COLUMN_DATE: &str = "DATE OCC";
/// Column holding the HHMM occurrence time.
pub const COLUMN_TIME: &str = "TIME OCC";
/// Column holding the latitude.
pub const COLUMN_LAT: &str = "LAT";
/// Column holding the longitude.
pub const COLUMN_LON: &str = "LON";

/// Skipped rows beyond this count are summarized instead of logged one by one.
const MAX_LOGGED_SKIPS: usize = 25;

/// How often (in rows) the progress position is refreshed.
const PROGRESS_INTERVAL: usize = 10_000;

/// Errors that can occur while loading incidents.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV header could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("Incident file is missing required column '{column}'")]
    MissingColumn {
        /// Name of the missing column.
        column: String,
    },
}

/// Result of loading an incident file.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentLoad {
    /// Successfully parsed incidents in file order.
    pub incidents: Vec<Incident>,
    /// Data rows read, including skipped ones.
    pub rows: usize,
    /// Rows skipped because a field could not be parsed.
    pub skipped: usize,
}

/// Positions of the required columns within a record.
struct ColumnIndex {
    date: usize,
    time: usize,
    lat: usize,
    lon: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, IngestError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| IngestError::MissingColumn {
                    column: name.to_string(),
                })
        };

        Ok(Self {
            date: find(COLUMN_DATE)?,
            time: find(COLUMN_TIME)?,
            lat: find(COLUMN_LAT)?,
            lon: find(COLUMN_LON)?,
        })
    }
}

/// Loads incidents from a CSV file on disk, reporting progress in bytes.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be opened, its header cannot
/// be read, or a required column is missing.
pub fn load_incidents(
    path: &Path,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<IncidentLoad, IngestError> {
    let file = std::fs::File::open(path)?;
    if let Ok(metadata) = file.metadata() {
        progress.set_total(metadata.len());
    }
    progress.set_message(format!("Reading {}", path.display()));

    let load = read_incidents(file, progress)?;

    log::info!(
        "Loaded {} incidents from {} ({} rows, {} skipped)",
        load.incidents.len(),
        path.display(),
        load.rows,
        load.skipped
    );
    Ok(load)
}

/// Reads incidents from any CSV reader.
///
/// # Errors
///
/// Returns [`IngestError`] if the header row is unreadable or lacks a
/// required column. Problems in individual data rows are not errors.
pub fn read_incidents(
    reader: impl Read,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<IncidentLoad, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnIndex::from_headers(reader.headers()?)?;

    let mut incidents = Vec::new();
    let mut rows = 0usize;
    let mut skipped = 0usize;
    let mut record = csv::StringRecord::new();

    loop {
        let line = reader.position().line();
        match reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {
                rows += 1;
                match parse_record(&record, &columns) {
                    Ok(incident) => incidents.push(incident),
                    Err(reason) => {
                        skipped += 1;
                        log_skip(skipped, line, &reason);
                    }
                }
            }
            Err(e) => {
                rows += 1;
                skipped += 1;
                log_skip(skipped, line, &e.to_string());
            }
        }

        if rows % PROGRESS_INTERVAL == 0 {
            progress.set_position(reader.position().byte());
        }
    }

    if skipped > MAX_LOGGED_SKIPS {
        log::warn!(
            "... {} more malformed row(s) skipped",
            skipped - MAX_LOGGED_SKIPS
        );
    }

    progress.set_position(reader.position().byte());
    progress.finish(format!("Loaded {} incidents", incidents.len()));

    Ok(IncidentLoad {
        incidents,
        rows,
        skipped,
    })
}

fn parse_record(record: &csv::StringRecord, columns: &ColumnIndex) -> Result<Incident, String> {
    let field = |idx: usize, name: &str| {
        record
            .get(idx)
            .ok_or_else(|| format!("row has no '{name}' field"))
    };

    let date = parse_date_occ(field(columns.date, COLUMN_DATE)?)?;
    let time = parse_time_occ(field(columns.time, COLUMN_TIME)?)?;
    let location = parse_lat_lng(field(columns.lat, COLUMN_LAT)?, field(columns.lon, COLUMN_LON)?)?;

    Ok(Incident {
        date,
        time,
        location,
    })
}

fn log_skip(skipped: usize, line: u64, reason: &str) {
    if skipped <= MAX_LOGGED_SKIPS {
        log::warn!("Skipping malformed incident row at line {line}: {reason}");
    }
}
