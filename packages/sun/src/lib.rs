#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Sunrise/sunset reference table.
//!
//! The table is the whitespace-delimited layout published by the US Naval
//! Observatory: one row per day of the month (1-31), followed by 24 HHMM
//! columns holding a rise/set pair for each month from January to
//! December. Times are recorded in local standard time. A `0` marks a cell
//! with no data (e.g. February 30) and is never treated as midnight.

pub mod dst;

use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, TimeDelta};
use crime_report_incident_models::{ClockTime, InvalidClockTimeError, Month};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of value columns following the day-of-month column.
const VALUE_COLUMNS: usize = 24;

/// Errors that can occur while loading a sun table.
#[derive(Debug, Error)]
pub enum SunTableError {
    /// The table file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line of the table is structurally invalid.
    #[error("Sun table line {line}: {message}")]
    Parse {
        /// 1-based line number in the input.
        line: usize,
        /// Description of what went wrong.
        message: String,
    },

    /// A non-zero cell does not hold a valid HHMM clock time.
    #[error("Sun table line {line}, {month} column: {source}")]
    InvalidTime {
        /// 1-based line number in the input.
        line: usize,
        /// Month whose column held the bad value.
        month: Month,
        /// The underlying decoding failure.
        source: InvalidClockTimeError,
    },
}

/// Sunrise and sunset for one calendar day, in local standard time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SunTimes {
    /// Time the sun rises.
    pub sunrise: ClockTime,
    /// Time the sun sets.
    pub sunset: ClockTime,
}

impl SunTimes {
    /// Creates a rise/set pair.
    #[must_use]
    pub const fn new(sunrise: ClockTime, sunset: ClockTime) -> Self {
        Self { sunrise, sunset }
    }

    /// Elapsed time between sunrise and sunset.
    ///
    /// Computed on real clock times rather than HHMM integers. A sunset at
    /// or before sunrise is malformed data and yields zero.
    #[must_use]
    pub fn daylight(&self) -> TimeDelta {
        let span = self.sunset.to_naive_time() - self.sunrise.to_naive_time();
        if span > TimeDelta::zero() {
            span
        } else {
            TimeDelta::zero()
        }
    }
}

/// Per-day sunrise/sunset lookup for a single year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SunTable {
    /// Indexed by `[day - 1][month index]`.
    days: [[Option<SunTimes>; 12]; 31],
}

impl Default for SunTable {
    fn default() -> Self {
        Self {
            days: [[None; 12]; 31],
        }
    }
}

impl SunTable {
    /// Loads a sun table from a file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`SunTableError`] if the file cannot be read or is malformed.
    pub fn load(path: &Path) -> Result<Self, SunTableError> {
        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(file)?;
        log::info!(
            "Loaded sun table from {} ({} days with data)",
            path.display(),
            table.len()
        );
        Ok(table)
    }

    /// Reads and parses a sun table from any reader.
    ///
    /// # Errors
    ///
    /// Returns [`SunTableError`] if reading fails or the content is malformed.
    pub fn from_reader(mut reader: impl Read) -> Result<Self, SunTableError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse(&text)
    }

    /// Parses the whitespace-delimited table text.
    ///
    /// Blank lines and `#` comments are skipped. Rows shorter than 25
    /// columns are padded with missing values; a rise/set pair with only
    /// one side present is treated as missing.
    ///
    /// # Errors
    ///
    /// Returns [`SunTableError`] for non-numeric tokens, day numbers
    /// outside 1-31, duplicated days, extra columns, or invalid HHMM values.
    pub fn parse(text: &str) -> Result<Self, SunTableError> {
        let mut table = Self::default();
        let mut seen = [false; 31];

        for (idx, raw_line) in text.lines().enumerate() {
            let line = idx + 1;
            let trimmed = raw_line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let values = trimmed
                .split_whitespace()
                .map(|token| {
                    token.parse::<u32>().map_err(|e| SunTableError::Parse {
                        line,
                        message: format!("'{token}' is not a number: {e}"),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let Some((&day, cells)) = values.split_first() else {
                continue;
            };

            if !(1..=31).contains(&day) {
                return Err(SunTableError::Parse {
                    line,
                    message: format!("day of month {day} is outside 1-31"),
                });
            }
            if cells.len() > VALUE_COLUMNS {
                return Err(SunTableError::Parse {
                    line,
                    message: format!(
                        "expected at most {VALUE_COLUMNS} rise/set columns, found {}",
                        cells.len()
                    ),
                });
            }

            let day_idx = day as usize - 1;
            if seen[day_idx] {
                return Err(SunTableError::Parse {
                    line,
                    message: format!("day {day} appears more than once"),
                });
            }
            seen[day_idx] = true;

            for &month in Month::all() {
                let rise = cells.get(month.index() * 2).copied().unwrap_or(0);
                let set = cells.get(month.index() * 2 + 1).copied().unwrap_or(0);
                table.days[day_idx][month.index()] = decode_pair(line, month, rise, set)?;
            }
        }

        Ok(table)
    }

    /// Sun times for a month/day, or `None` if the table has no data.
    #[must_use]
    pub fn get(&self, month: Month, day: u32) -> Option<SunTimes> {
        if !(1..=31).contains(&day) {
            return None;
        }
        self.days[day as usize - 1][month.index()]
    }

    /// Sun times for a calendar date.
    #[must_use]
    pub fn for_date(&self, date: NaiveDate) -> Option<SunTimes> {
        use chrono::Datelike as _;

        self.get(Month::of(date), date.day())
    }

    /// Records sun times for a month/day, replacing any existing entry.
    pub fn insert(&mut self, month: Month, day: u32, times: SunTimes) {
        if (1..=31).contains(&day) {
            self.days[day as usize - 1][month.index()] = Some(times);
        }
    }

    /// Number of month/day cells holding data.
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Whether the table holds no data at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn decode_pair(
    line: usize,
    month: Month,
    rise: u32,
    set: u32,
) -> Result<Option<SunTimes>, SunTableError> {
    let decode = |value: u32| {
        ClockTime::from_hhmm(value).map_err(|source| SunTableError::InvalidTime {
            line,
            month,
            source,
        })
    };

    match (rise, set) {
        (0, 0) => Ok(None),
        (0, _) | (_, 0) => {
            log::debug!("Sun table line {line}: {month} has only half of its rise/set pair");
            Ok(None)
        }
        (rise, set) => Ok(Some(SunTimes::new(decode(rise)?, decode(set)?))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(day: u32, pair: (u32, u32)) -> String {
        let mut cols = vec![day.to_string()];
        for _ in 0..12 {
            cols.push(format!("{:04}", pair.0));
            cols.push(format!("{:04}", pair.1));
        }
        cols.join(" ")
    }

    #[test]
    fn parses_full_rows() {
        let text = format!("{}\n{}\n", row(1, (658, 1655)), row(2, (659, 1656)));
        let table = SunTable::parse(&text).unwrap();

        let jan_1 = table.get(Month::January, 1).unwrap();
        assert_eq!(jan_1.sunrise.hhmm(), 658);
        assert_eq!(jan_1.sunset.hhmm(), 1655);
        assert_eq!(table.get(Month::December, 2).unwrap().sunset.hhmm(), 1656);
        assert_eq!(table.len(), 24);
    }

    #[test]
    fn zero_cells_are_missing_not_midnight() {
        let mut cols = vec!["30".to_string(), "0658".to_string(), "1655".to_string()];
        // February 30 has no data
        cols.push("0".to_string());
        cols.push("0".to_string());
        let table = SunTable::parse(&cols.join(" ")).unwrap();

        assert!(table.get(Month::January, 30).is_some());
        assert!(table.get(Month::February, 30).is_none());
        // Short row: remaining months padded as missing
        assert!(table.get(Month::July, 30).is_none());
    }

    #[test]
    fn half_pairs_are_missing() {
        let table = SunTable::parse("5 0700 0").unwrap();
        assert!(table.get(Month::January, 5).is_none());
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let text = format!("# Los Angeles, CA\n\n{}\n", row(3, (700, 1700)));
        let table = SunTable::parse(&text).unwrap();
        assert!(table.get(Month::March, 3).is_some());
    }

    #[test]
    fn rejects_non_numeric_token() {
        let err = SunTable::parse("1 0658 abc").unwrap_err();
        assert!(matches!(err, SunTableError::Parse { line: 1, .. }));
    }

    #[test]
    fn rejects_invalid_hhmm() {
        let err = SunTable::parse("1 0675 1655").unwrap_err();
        assert!(matches!(
            err,
            SunTableError::InvalidTime {
                line: 1,
                month: Month::January,
                ..
            }
        ));
    }

    #[test]
    fn rejects_out_of_range_and_duplicate_days() {
        assert!(SunTable::parse("32 0658 1655").is_err());
        assert!(SunTable::parse("0 0658 1655").is_err());
        assert!(SunTable::parse("1 0658 1655\n1 0658 1655").is_err());
    }

    #[test]
    fn rejects_extra_columns() {
        let text = format!("{} 0700", row(1, (658, 1655)));
        assert!(SunTable::parse(&text).is_err());
    }

    #[test]
    fn daylight_uses_real_durations() {
        let times = SunTimes::new(
            ClockTime::from_hhmm(630).unwrap(),
            ClockTime::from_hhmm(1845).unwrap(),
        );
        // 18:45 - 06:30 = 12h15m, not 1845 - 630 = 1215 "HHMM units"
        assert_eq!(times.daylight(), TimeDelta::minutes(12 * 60 + 15));
    }

    #[test]
    fn inverted_pair_has_no_daylight() {
        let times = SunTimes::new(
            ClockTime::from_hhmm(1800).unwrap(),
            ClockTime::from_hhmm(600).unwrap(),
        );
        assert_eq!(times.daylight(), TimeDelta::zero());
    }

    #[test]
    fn for_date_looks_up_month_and_day() {
        let mut table = SunTable::default();
        let times = SunTimes::new(
            ClockTime::from_hhmm(542).unwrap(),
            ClockTime::from_hhmm(1908).unwrap(),
        );
        table.insert(Month::June, 1, times);
        let date = NaiveDate::from_ymd_opt(2022, 6, 1).unwrap();
        assert_eq!(table.for_date(date), Some(times));
        assert!(table.get(Month::June, 0).is_none());
    }
}
