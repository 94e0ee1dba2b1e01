#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report configuration.
//!
//! The defaults live in `config/default.toml`, embedded at compile time.
//! A user-supplied TOML file is layered on top key by key, so it only
//! needs to name the values it changes.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use crime_report_sun::dst::DstWindow;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_TOML: &str = include_str!("../config/default.toml");

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// The TOML could not be parsed or does not match the schema.
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value parsed but is not acceptable.
    #[error("Invalid config: {message}")]
    Invalid {
        /// Description of what went wrong.
        message: String,
    },
}

/// Top-level report configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportConfig {
    /// City name used in chart titles.
    pub city: String,
    /// Year the incidents and sun table cover.
    pub year: i32,
    /// Incident CSV export.
    pub incidents_path: PathBuf,
    /// Whitespace-delimited sunrise/sunset table.
    pub sun_table_path: PathBuf,
    /// Directory the figures are written to.
    pub output_dir: PathBuf,
    /// Daylight-saving window.
    pub dst: DstConfig,
    /// Figure 1 map settings.
    pub heatmap: HeatmapConfig,
    /// Figure 2 and 3 canvas size.
    pub charts: ChartConfig,
}

/// Daylight-saving transition days as `MM-DD` in the report year.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DstConfig {
    /// Day clocks spring forward.
    pub start: String,
    /// Day clocks fall back.
    pub end: String,
    /// Minutes local clocks run ahead.
    pub offset_minutes: u32,
}

/// Heatmap view settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HeatmapConfig {
    /// Initial map center latitude.
    pub center_latitude: f64,
    /// Initial map center longitude.
    pub center_longitude: f64,
    /// Initial zoom level.
    pub zoom: f64,
    /// Heat point radius in pixels.
    pub radius: u32,
}

/// Chart canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ChartConfig {
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
}

impl ReportConfig {
    /// The embedded defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] only if the embedded file is broken.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::from_toml_str("")
    }

    /// Loads `path` layered over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, is not valid
    /// TOML, or produces invalid values.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded report config from {}", path.display());
        Ok(config)
    }

    /// Parses `overrides` layered over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on malformed TOML or invalid values.
    pub fn from_toml_str(overrides: &str) -> Result<Self, ConfigError> {
        let mut base: toml::Table = toml::from_str(DEFAULT_TOML)?;
        let user: toml::Table = toml::from_str(overrides)?;
        merge(&mut base, user);

        let config: Self = toml::Value::Table(base).try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that parse but make no sense.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1900..=2100).contains(&self.year) {
            return Err(invalid(format!("year {} is out of range", self.year)));
        }
        let window = self.dst_window()?;
        if window.start >= window.end {
            return Err(invalid(format!(
                "dst.start {} must be before dst.end {}",
                self.dst.start, self.dst.end
            )));
        }
        if self.dst.offset_minutes > 120 {
            return Err(invalid(format!(
                "dst.offset_minutes {} exceeds two hours",
                self.dst.offset_minutes
            )));
        }
        if self.heatmap.zoom <= 0.0 || self.heatmap.radius == 0 {
            return Err(invalid("heatmap zoom and radius must be positive"));
        }
        if !(-90.0..=90.0).contains(&self.heatmap.center_latitude)
            || !(-180.0..=180.0).contains(&self.heatmap.center_longitude)
        {
            return Err(invalid("heatmap center is not a valid coordinate"));
        }
        if self.charts.width < 200 || self.charts.height < 150 {
            return Err(invalid("charts must be at least 200x150 pixels"));
        }
        Ok(())
    }

    /// The DST window resolved against the report year.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if either boundary is not a valid
    /// `MM-DD` date in the report year.
    pub fn dst_window(&self) -> Result<DstWindow, ConfigError> {
        let start = month_day(self.year, &self.dst.start)?;
        let end = month_day(self.year, &self.dst.end)?;
        Ok(DstWindow {
            start,
            end,
            offset_minutes: self.dst.offset_minutes,
        })
    }
}

fn month_day(year: i32, value: &str) -> Result<NaiveDate, ConfigError> {
    let parsed = value
        .split_once('-')
        .and_then(|(m, d)| Some((m.trim().parse().ok()?, d.trim().parse().ok()?)))
        .and_then(|(m, d)| NaiveDate::from_ymd_opt(year, m, d));
    parsed.ok_or_else(|| invalid(format!("'{value}' is not a valid MM-DD date in {year}")))
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        message: message.into(),
    }
}

/// Recursively overlays `overlay` onto `base`; nested tables merge, other
/// values replace.
fn merge(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_la_2022() {
        let config = ReportConfig::defaults().unwrap();
        assert_eq!(config.city, "LA");
        assert_eq!(config.year, 2022);
        assert_eq!(config.heatmap.radius, 8);
        assert!((config.heatmap.zoom - 8.25).abs() < f64::EPSILON);

        let window = config.dst_window().unwrap();
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2022, 3, 13).unwrap());
        assert_eq!(window.end, NaiveDate::from_ymd_opt(2022, 11, 6).unwrap());
        assert_eq!(window.offset_minutes, 60);
    }

    #[test]
    fn overrides_merge_nested_tables() {
        let config = ReportConfig::from_toml_str(
            "year = 2023\n[dst]\nstart = \"03-12\"\nend = \"11-05\"\n[heatmap]\nzoom = 10.0\n",
        )
        .unwrap();

        assert_eq!(config.year, 2023);
        assert_eq!(config.dst.start, "03-12");
        assert_eq!(config.dst.offset_minutes, 60);
        assert!((config.heatmap.zoom - 10.0).abs() < f64::EPSILON);
        assert!((config.heatmap.center_latitude - 34.0549).abs() < f64::EPSILON);
        assert_eq!(config.city, "LA");
    }

    #[test]
    fn rejects_inverted_dst_window() {
        let err = ReportConfig::from_toml_str("[dst]\nstart = \"11-06\"\nend = \"03-13\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn rejects_bad_dst_dates() {
        assert!(ReportConfig::from_toml_str("[dst]\nstart = \"02-30\"\n").is_err());
        assert!(ReportConfig::from_toml_str("[dst]\nstart = \"March\"\n").is_err());
    }

    #[test]
    fn rejects_wrong_types() {
        let err = ReportConfig::from_toml_str("year = \"twenty\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn rejects_non_positive_heatmap_settings() {
        assert!(ReportConfig::from_toml_str("[heatmap]\nradius = 0\n").is_err());
    }
}
