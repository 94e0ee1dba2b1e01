#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate result types for the crime report.
//!
//! Each figure consumes one family of types defined here: density points
//! for the heatmap, monthly counts plus a trend line for the monthly
//! chart, and daily exposure records rolled up into monthly rates for the
//! day/night chart. All types serialize to JSON for the summary export.

use chrono::{NaiveDate, TimeDelta};
use crime_report_incident_models::{MINUTES_PER_DAY, Month};
use crime_report_sun::SunTimes;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Which half of the solar day an incident fell in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DayPhase {
    /// After sunrise, up to and including sunset.
    Day,
    /// Everything else.
    Night,
}

// ── Figure 1 ─────────────────────────────────────────────

/// Number of incidents recorded at one exact coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityPoint {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Incidents at this location.
    pub count: u64,
}

// ── Figure 2 ─────────────────────────────────────────────

/// Incident count for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCount {
    /// The month.
    pub month: Month,
    /// Short axis label (e.g. `"Jan"`).
    pub label: String,
    /// Incidents that occurred during the month.
    pub count: u64,
    /// Days in the month for the report year.
    pub days_in_month: u32,
    /// `count / days_in_month`.
    pub average_per_day: f64,
}

/// Ordinary-least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendLine {
    /// Change in `y` per unit of `x`.
    pub slope: f64,
    /// Value of `y` at `x = 0`.
    pub intercept: f64,
    /// Coefficient of determination. `None` when `y` has no variance.
    pub r_squared: Option<f64>,
}

impl TrendLine {
    /// Evaluates the line at `x`.
    #[must_use]
    pub fn at(&self, x: f64) -> f64 {
        self.slope.mul_add(x, self.intercept)
    }
}

/// Monthly counts together with their fitted trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    /// Report year.
    pub year: i32,
    /// One entry per month, January first.
    pub months: Vec<MonthlyCount>,
    /// Regression of month index (January = 0) against daily average.
    pub trend: Option<TrendLine>,
}

// ── Figure 3 ─────────────────────────────────────────────

/// Exposure hours and incident tallies for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyExposure {
    /// The day.
    pub date: NaiveDate,
    /// Sunrise/sunset for the day, if the table has data.
    pub sun: Option<SunTimes>,
    /// Minutes between sunrise and sunset.
    pub daylight_minutes: u32,
    /// `1440 - daylight_minutes`.
    pub dark_minutes: u32,
    /// Incidents classified as daytime.
    pub day_incidents: u64,
    /// Incidents classified as nighttime.
    pub night_incidents: u64,
    /// Incidents on a day without sun data.
    pub unclassified_incidents: u64,
    /// Daytime incidents per daylight hour.
    pub day_rate: Option<f64>,
    /// Nighttime incidents per dark hour.
    pub night_rate: Option<f64>,
}

impl DailyExposure {
    /// Creates an empty record for `date`.
    #[must_use]
    pub const fn new(date: NaiveDate, sun: Option<SunTimes>, daylight_minutes: u32) -> Self {
        Self {
            date,
            sun,
            daylight_minutes,
            dark_minutes: MINUTES_PER_DAY.saturating_sub(daylight_minutes),
            day_incidents: 0,
            night_incidents: 0,
            unclassified_incidents: 0,
            day_rate: None,
            night_rate: None,
        }
    }

    /// Time between sunrise and sunset.
    #[must_use]
    pub fn daylight(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.daylight_minutes))
    }

    /// Time between sunset and the next sunrise.
    #[must_use]
    pub fn dark(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.dark_minutes))
    }

    /// Total incidents recorded on this day.
    #[must_use]
    pub const fn total_incidents(&self) -> u64 {
        self.day_incidents + self.night_incidents + self.unclassified_incidents
    }
}

/// Average day and night crime rates for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRate {
    /// The month.
    pub month: Month,
    /// Short axis label (e.g. `"Jan"`).
    pub label: String,
    /// Mean of the defined daily day rates.
    pub day_rate: Option<f64>,
    /// Mean of the defined daily night rates.
    pub night_rate: Option<f64>,
    /// Days in the month that contributed a day rate.
    pub day_samples: u32,
    /// Days in the month that contributed a night rate.
    pub night_samples: u32,
}

// ── Export ───────────────────────────────────────────────

/// Everything the report computes, as written by `--export-json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// City the incidents belong to.
    pub city: String,
    /// Report year.
    pub year: i32,
    /// Incidents analyzed.
    pub incident_count: u64,
    /// Figure 1 data.
    pub density: Vec<DensityPoint>,
    /// Figure 2 data.
    pub monthly_trend: MonthlyTrend,
    /// Figure 3 data.
    pub monthly_rates: Vec<MonthlyRate>,
}
