//! Field parsers for the incident CSV.
//!
//! Each parser returns a `Result` whose error string ends up in the
//! warning logged for a skipped row.

use chrono::{NaiveDate, NaiveDateTime};
use crime_report_incident_models::{ClockTime, Coordinates};

/// Date-time layouts seen in `DATE OCC`, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    // LAPD open data portal export
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    // Socrata API
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Date-only layouts seen in `DATE OCC`, tried in order.
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];

/// Parses the `DATE OCC` column. Any time-of-day part is discarded; the
/// incident time comes from `TIME OCC`.
///
/// # Errors
///
/// Returns a description of the value if no known layout matches.
pub fn parse_date_occ(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt.date());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date);
        }
    }
    Err(format!("unrecognized date '{s}'"))
}

/// Parses the `TIME OCC` column, an HHMM integer without zero padding.
///
/// # Errors
///
/// Returns a description of the value if it is not a valid HHMM time.
pub fn parse_time_occ(s: &str) -> Result<ClockTime, String> {
    let s = s.trim();
    let value = s
        .parse::<u32>()
        .map_err(|e| format!("time '{s}' is not an integer: {e}"))?;
    ClockTime::from_hhmm(value).map_err(|e| e.to_string())
}

/// Parses the `LAT`/`LON` pair.
///
/// Empty fields or a zero on either axis mean "location withheld" and
/// yield `Ok(None)`.
///
/// # Errors
///
/// Returns a description if a non-empty value is not a number or lies
/// outside the valid coordinate range.
pub fn parse_lat_lng(lat: &str, lng: &str) -> Result<Option<Coordinates>, String> {
    let (lat, lng) = (lat.trim(), lng.trim());
    if lat.is_empty() || lng.is_empty() {
        return Ok(None);
    }

    let latitude = lat
        .parse::<f64>()
        .map_err(|e| format!("latitude '{lat}' is not a number: {e}"))?;
    let longitude = lng
        .parse::<f64>()
        .map_err(|e| format!("longitude '{lng}' is not a number: {e}"))?;

    if latitude == 0.0 || longitude == 0.0 {
        return Ok(None);
    }
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(format!("coordinates ({latitude}, {longitude}) out of range"));
    }

    Ok(Some(Coordinates {
        latitude,
        longitude,
    }))
}
