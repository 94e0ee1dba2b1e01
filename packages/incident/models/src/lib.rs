#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident record types shared across the crime report toolchain.
//!
//! Defines the canonical [`Incident`] produced by the ingest step, the
//! HHMM-encoded [`ClockTime`] used by both the incident file and the
//! sunrise/sunset table, and the [`Month`] calendar used to label every
//! monthly aggregate.

use chrono::{Datelike as _, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Number of minutes in a civil day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Time of day stored as minutes since midnight.
///
/// Both input files encode clock times as HHMM integers (`1845` is
/// 18:45, `5` is 00:05). The encoding is validated once on the way in so
/// that later arithmetic works on real minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClockTime(u32);

impl ClockTime {
    /// Midnight (`0000`).
    pub const MIDNIGHT: Self = Self(0);

    /// Decodes an HHMM integer.
    ///
    /// # Errors
    ///
    /// Returns an error if the hour is above 23 or the minute above 59.
    pub const fn from_hhmm(hhmm: u32) -> Result<Self, InvalidClockTimeError> {
        let hour = hhmm / 100;
        let minute = hhmm % 100;
        if hour > 23 || minute > 59 {
            return Err(InvalidClockTimeError { value: hhmm });
        }
        Ok(Self(hour * 60 + minute))
    }

    /// Creates a clock time from hour and minute components.
    ///
    /// # Errors
    ///
    /// Returns an error if either component is out of range.
    pub const fn from_hm(hour: u32, minute: u32) -> Result<Self, InvalidClockTimeError> {
        if hour > 23 || minute > 59 {
            return Err(InvalidClockTimeError {
                value: hour * 100 + minute,
            });
        }
        Ok(Self(hour * 60 + minute))
    }

    /// Minutes elapsed since midnight (`0..1440`).
    #[must_use]
    pub const fn minutes(self) -> u32 {
        self.0
    }

    /// Re-encodes this time as an HHMM integer.
    #[must_use]
    pub const fn hhmm(self) -> u32 {
        (self.0 / 60) * 100 + self.0 % 60
    }

    /// Hour component (`0..24`).
    #[must_use]
    pub const fn hour(self) -> u32 {
        self.0 / 60
    }

    /// Minute component (`0..60`).
    #[must_use]
    pub const fn minute(self) -> u32 {
        self.0 % 60
    }

    /// Converts to a [`NaiveTime`].
    #[must_use]
    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0).unwrap_or(NaiveTime::MIN)
    }
}

impl std::fmt::Display for ClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Error returned when an HHMM value does not describe a valid clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidClockTimeError {
    /// The rejected HHMM value.
    pub value: u32,
}

impl std::fmt::Display for InvalidClockTimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid HHMM clock time {}: expected 0000-2359 with minutes below 60",
            self.value
        )
    }
}

impl std::error::Error for InvalidClockTimeError {}

/// WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

/// A single crime incident.
///
/// Coordinates are optional: the LAPD export writes `0, 0` when the
/// location is withheld. Such incidents still count toward the monthly
/// and day/night figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Calendar date the incident occurred on.
    pub date: NaiveDate,
    /// Local clock time the incident occurred at.
    pub time: ClockTime,
    /// Where the incident occurred, if known.
    pub location: Option<Coordinates>,
}

impl Incident {
    /// Month the incident occurred in.
    #[must_use]
    pub fn month(&self) -> Month {
        Month::of(self.date)
    }
}

/// Calendar month.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "title_case")]
pub enum Month {
    January = 1,
    February = 2,
    March = 3,
    April = 4,
    May = 5,
    June = 6,
    July = 7,
    August = 8,
    September = 9,
    October = 10,
    November = 11,
    December = 12,
}

impl Month {
    /// Month number (1-12).
    #[must_use]
    pub const fn number(self) -> u32 {
        self as u32
    }

    /// Zero-based month index, January = 0.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    /// Creates a month from its number.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 1-12.
    pub const fn from_number(value: u32) -> Result<Self, InvalidMonthError> {
        match value {
            1 => Ok(Self::January),
            2 => Ok(Self::February),
            3 => Ok(Self::March),
            4 => Ok(Self::April),
            5 => Ok(Self::May),
            6 => Ok(Self::June),
            7 => Ok(Self::July),
            8 => Ok(Self::August),
            9 => Ok(Self::September),
            10 => Ok(Self::October),
            11 => Ok(Self::November),
            12 => Ok(Self::December),
            _ => Err(InvalidMonthError { value }),
        }
    }

    /// Month containing the given date.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        // `NaiveDate::month()` is always 1-12.
        Self::all()[date.month0() as usize]
    }

    /// Three-letter label used on chart axes (`"Jan"`, `"Feb"`, ...).
    #[must_use]
    pub const fn short_label(self) -> &'static str {
        match self {
            Self::January => "Jan",
            Self::February => "Feb",
            Self::March => "Mar",
            Self::April => "Apr",
            Self::May => "May",
            Self::June => "Jun",
            Self::July => "Jul",
            Self::August => "Aug",
            Self::September => "Sep",
            Self::October => "Oct",
            Self::November => "Nov",
            Self::December => "Dec",
        }
    }

    /// First day of this month in `year`.
    #[must_use]
    pub fn first_day(self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.number(), 1)
    }

    /// Last day of this month in `year`.
    #[must_use]
    pub fn last_day(self, year: i32) -> Option<NaiveDate> {
        let first = self.first_day(year)?;
        let next = match self {
            Self::December => NaiveDate::from_ymd_opt(year + 1, 1, 1)?,
            _ => NaiveDate::from_ymd_opt(year, self.number() + 1, 1)?,
        };
        next.pred_opt().filter(|last| *last >= first)
    }

    /// Number of days in this month for `year` (leap years included).
    #[must_use]
    pub fn days_in(self, year: i32) -> u32 {
        self.last_day(year).map_or(0, |d| d.day())
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::January,
            Self::February,
            Self::March,
            Self::April,
            Self::May,
            Self::June,
            Self::July,
            Self::August,
            Self::September,
            Self::October,
            Self::November,
            Self::December,
        ]
    }
}

/// Error returned when attempting to create a [`Month`] from an invalid
/// numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidMonthError {
    /// The invalid month value that was provided.
    pub value: u32,
}

impl std::fmt::Display for InvalidMonthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid month value {}: expected 1-12", self.value)
    }
}

impl std::error::Error for InvalidMonthError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_time_decodes_hhmm() {
        let t = ClockTime::from_hhmm(1845).unwrap();
        assert_eq!(t.hour(), 18);
        assert_eq!(t.minute(), 45);
        assert_eq!(t.minutes(), 18 * 60 + 45);
        assert_eq!(t.hhmm(), 1845);
        assert_eq!(t.to_string(), "18:45");
    }

    #[test]
    fn clock_time_accepts_unpadded_values() {
        let t = ClockTime::from_hhmm(5).unwrap();
        assert_eq!(t.minutes(), 5);
        assert_eq!(t.to_string(), "00:05");
    }

    #[test]
    fn clock_time_rejects_invalid_values() {
        assert!(ClockTime::from_hhmm(2400).is_err());
        assert!(ClockTime::from_hhmm(1260).is_err());
        assert!(ClockTime::from_hhmm(2359).is_ok());
        assert!(ClockTime::from_hm(24, 0).is_err());
    }

    #[test]
    fn month_from_number_roundtrip() {
        for m in 1..=12u32 {
            assert_eq!(Month::from_number(m).unwrap().number(), m);
        }
        assert!(Month::from_number(0).is_err());
        assert!(Month::from_number(13).is_err());
    }

    #[test]
    fn month_days_follow_calendar() {
        assert_eq!(Month::February.days_in(2022), 28);
        assert_eq!(Month::February.days_in(2024), 29);
        assert_eq!(Month::December.days_in(2022), 31);
        assert_eq!(Month::April.days_in(2022), 30);
        let total: u32 = Month::all().iter().map(|m| m.days_in(2022)).sum();
        assert_eq!(total, 365);
    }

    #[test]
    fn month_labels() {
        assert_eq!(Month::January.short_label(), "Jan");
        assert_eq!(Month::September.to_string(), "September");
        assert_eq!("March".parse::<Month>().unwrap(), Month::March);
    }

    #[test]
    fn month_of_date() {
        let date = NaiveDate::from_ymd_opt(2022, 6, 1).unwrap();
        assert_eq!(Month::of(date), Month::June);
        assert_eq!(Month::June.index(), 5);
    }
}
