#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Renders the report figures from finished aggregates.
//!
//! Nothing here computes statistics; every function takes the output of
//! `crime_report_analytics` and writes files:
//!
//! - [`heatmap`]: `heatmap.html` (Leaflet heat layer) and `heatmap.geojson`
//! - [`charts`]: `monthly_trend.svg` and `day_night_rates.svg`

pub mod charts;
pub mod heatmap;

use std::path::{Path, PathBuf};

use plotters::drawing::DrawingAreaErrorKind;

/// File name of the interactive heatmap page.
pub const HEATMAP_HTML: &str = "heatmap.html";
/// File name of the density `FeatureCollection`.
pub const HEATMAP_GEOJSON: &str = "heatmap.geojson";
/// File name of the monthly trend chart.
pub const TREND_SVG: &str = "monthly_trend.svg";
/// File name of the day/night rate chart.
pub const DAY_NIGHT_SVG: &str = "day_night_rates.svg";

/// Errors that can occur while writing figures.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// I/O error (output directory or file write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The SVG backend failed to draw.
    #[error("Chart error: {0}")]
    Chart(#[from] DrawingAreaErrorKind<std::io::Error>),
}

/// City and year shown in figure titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLabels {
    /// City name, e.g. `"LA"`.
    pub city: String,
    /// Report year.
    pub year: i32,
}

impl ReportLabels {
    /// Creates labels for `city` in `year`.
    #[must_use]
    pub fn new(city: impl Into<String>, year: i32) -> Self {
        Self {
            city: city.into(),
            year,
        }
    }

    /// Figure 1 title.
    #[must_use]
    pub fn heatmap_title(&self) -> String {
        format!("{} {} Crime Heatmap", self.year, self.city)
    }

    /// Figure 2 title.
    #[must_use]
    pub fn trend_title(&self) -> String {
        format!("{} Average Daily Crime Reports in {}", self.city, self.year)
    }

    /// Figure 3 title.
    #[must_use]
    pub fn day_night_title(&self) -> String {
        format!("{} {} Average Hourly Crime Reports", self.year, self.city)
    }
}

/// Creates `dir` if needed and returns the path of `file_name` inside it.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the directory cannot be created.
pub fn output_path(dir: &Path, file_name: &str) -> Result<PathBuf, RenderError> {
    std::fs::create_dir_all(dir)?;
    Ok(dir.join(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_include_city_and_year() {
        let labels = ReportLabels::new("LA", 2022);
        assert_eq!(labels.heatmap_title(), "2022 LA Crime Heatmap");
        assert_eq!(
            labels.trend_title(),
            "LA Average Daily Crime Reports in 2022"
        );
        assert_eq!(
            labels.day_night_title(),
            "2022 LA Average Hourly Crime Reports"
        );
    }

    #[test]
    fn output_path_creates_directory() {
        let dir = std::env::temp_dir().join(format!("crime_report_render_{}", std::process::id()));
        let path = output_path(&dir.join("nested"), TREND_SVG).unwrap();
        assert!(dir.join("nested").is_dir());
        assert!(path.ends_with(TREND_SVG));
        std::fs::remove_dir_all(&dir).ok();
    }
}
