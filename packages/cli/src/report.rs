//! Loads the inputs, computes the aggregates each output needs, and writes
//! the figures.

use std::path::PathBuf;
use std::time::Instant;

use crime_report_analytics::daylight::day_night_rates;
use crime_report_analytics::density::density;
use crime_report_analytics::monthly::monthly_trend;
use crime_report_analytics_models::{DensityPoint, MonthlyRate, MonthlyTrend, ReportSummary};
use crime_report_cli_utils::{IndicatifProgress, MultiProgress};
use crime_report_config::ReportConfig;
use crime_report_incident_models::Incident;
use crime_report_ingest::load_incidents;
use crime_report_render::charts::{write_day_night_chart, write_trend_chart};
use crime_report_render::heatmap::{HeatmapView, write_heatmap};
use crime_report_render::{DAY_NIGHT_SVG, ReportLabels, TREND_SVG, output_path};
use crime_report_sun::SunTable;

use crate::summary::format_summary;

/// File name of the JSON export.
const SUMMARY_JSON: &str = "summary.json";

/// What a single run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    All,
    Heatmap,
    Trend,
    DayNight,
    Summary,
}

impl Action {
    pub const ALL: &[Self] = &[
        Self::All,
        Self::Heatmap,
        Self::Trend,
        Self::DayNight,
        Self::Summary,
    ];

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::All => "All figures + summary",
            Self::Heatmap => "Figure 1: crime heatmap",
            Self::Trend => "Figure 2: monthly trend",
            Self::DayNight => "Figure 3: day vs. night rates",
            Self::Summary => "Print summary only",
        }
    }

    const fn needs_density(self, export_json: bool) -> bool {
        export_json || matches!(self, Self::All | Self::Heatmap)
    }

    const fn needs_trend(self, export_json: bool) -> bool {
        export_json || matches!(self, Self::All | Self::Trend | Self::Summary)
    }

    const fn needs_day_night(self, export_json: bool) -> bool {
        export_json || matches!(self, Self::All | Self::DayNight | Self::Summary)
    }

    const fn prints_summary(self) -> bool {
        matches!(self, Self::All | Self::Summary)
    }
}

/// Aggregates computed for a run; absent when the action does not need
/// them.
#[derive(Default)]
struct Aggregates {
    density: Option<Vec<DensityPoint>>,
    trend: Option<MonthlyTrend>,
    rates: Option<Vec<MonthlyRate>>,
}

/// Runs `action` against `config`.
///
/// # Errors
///
/// Returns an error if an input cannot be loaded, an incident falls
/// outside the report year, or a figure cannot be written.
pub fn run(
    action: Action,
    config: &ReportConfig,
    export_json: bool,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let labels = ReportLabels::new(&config.city, config.year);

    // --- 1. Load inputs ---
    let progress = IndicatifProgress::bytes_bar(multi, "Loading incidents");
    let load = load_incidents(&config.incidents_path, &progress)?;
    let incidents = load.incidents;

    // --- 2. Aggregate ---
    let aggregates = aggregate(action, config, export_json, &incidents)?;

    // --- 3. Write outputs ---
    let mut written: Vec<PathBuf> = Vec::new();

    if matches!(action, Action::All | Action::Heatmap)
        && let Some(points) = &aggregates.density
    {
        let view = HeatmapView {
            center_latitude: config.heatmap.center_latitude,
            center_longitude: config.heatmap.center_longitude,
            zoom: config.heatmap.zoom,
            radius: config.heatmap.radius,
        };
        let files = write_heatmap(&config.output_dir, points, &view, &labels.heatmap_title())?;
        written.push(files.html);
        written.push(files.geojson);
    }

    let size = (config.charts.width, config.charts.height);

    if matches!(action, Action::All | Action::Trend)
        && let Some(trend) = &aggregates.trend
    {
        let path = output_path(&config.output_dir, TREND_SVG)?;
        write_trend_chart(&path, trend, &labels.trend_title(), size)?;
        written.push(path);
    }

    if matches!(action, Action::All | Action::DayNight)
        && let Some(rates) = &aggregates.rates
    {
        let path = output_path(&config.output_dir, DAY_NIGHT_SVG)?;
        write_day_night_chart(&path, rates, &labels.day_night_title(), size)?;
        written.push(path);
    }

    if export_json {
        let summary = ReportSummary {
            city: config.city.clone(),
            year: config.year,
            incident_count: incidents.len() as u64,
            density: aggregates.density.clone().unwrap_or_default(),
            monthly_trend: aggregates.trend.clone().ok_or("monthly trend was not computed")?,
            monthly_rates: aggregates.rates.clone().unwrap_or_default(),
        };
        let path = output_path(&config.output_dir, SUMMARY_JSON)?;
        std::fs::write(&path, serde_json::to_string_pretty(&summary)?)?;
        written.push(path);
    }

    if action.prints_summary()
        && let (Some(trend), Some(rates)) = (&aggregates.trend, &aggregates.rates)
    {
        println!();
        print!("{}", format_summary(&labels, incidents.len(), trend, rates));
    }

    for path in &written {
        println!("Wrote {}", path.display());
    }

    log::info!(
        "Report finished in {:.1}s ({} incidents, {} skipped rows)",
        start.elapsed().as_secs_f64(),
        incidents.len(),
        load.skipped
    );

    Ok(())
}

fn aggregate(
    action: Action,
    config: &ReportConfig,
    export_json: bool,
    incidents: &[Incident],
) -> Result<Aggregates, Box<dyn std::error::Error>> {
    let mut aggregates = Aggregates::default();

    if action.needs_density(export_json) {
        aggregates.density = Some(density(incidents));
    }

    if action.needs_trend(export_json) {
        aggregates.trend = Some(monthly_trend(incidents, config.year)?);
    }

    if action.needs_day_night(export_json) {
        let sun_table = SunTable::load(&config.sun_table_path)?;
        let dst = config.dst_window()?;
        let rates = day_night_rates(incidents, &sun_table, &dst, config.year)?;
        aggregates.rates = Some(rates.monthly);
    }

    Ok(aggregates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_unique() {
        let mut labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), Action::ALL.len());
    }

    #[test]
    fn single_figures_compute_only_what_they_draw() {
        assert!(Action::Heatmap.needs_density(false));
        assert!(!Action::Heatmap.needs_trend(false));
        assert!(!Action::Heatmap.needs_day_night(false));

        assert!(!Action::Trend.needs_day_night(false));
        assert!(!Action::DayNight.needs_trend(false));
    }

    #[test]
    fn summary_needs_trend_and_rates() {
        assert!(Action::Summary.needs_trend(false));
        assert!(Action::Summary.needs_day_night(false));
        assert!(!Action::Summary.needs_density(false));
        assert!(Action::Summary.prints_summary());
    }

    #[test]
    fn export_computes_everything() {
        for action in Action::ALL {
            assert!(action.needs_density(true));
            assert!(action.needs_trend(true));
            assert!(action.needs_day_night(true));
        }
    }
}
