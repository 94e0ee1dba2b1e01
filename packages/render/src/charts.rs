//! Figures 2 and 3 as SVG line charts.

use std::path::Path;

use crime_report_analytics_models::{MonthlyRate, MonthlyTrend};
use crime_report_incident_models::Month;
use plotters::prelude::*;

use crate::RenderError;

const TREND_POINTS: RGBColor = RGBColor(31, 119, 180);
const TREND_LINE: RGBColor = RGBColor(214, 39, 40);
const DAY_COLOR: RGBColor = RGBColor(230, 159, 0);
const NIGHT_COLOR: RGBColor = RGBColor(0, 114, 178);

/// Writes the monthly average scatter with its OLS trend line.
///
/// The x axis is the month index (January = 0) labelled with short month
/// names; the axis title is the report year.
///
/// # Errors
///
/// Returns [`RenderError`] if the SVG cannot be drawn or written.
pub fn write_trend_chart(
    path: &Path,
    trend: &MonthlyTrend,
    title: &str,
    size: (u32, u32),
) -> Result<(), RenderError> {
    let points: Vec<(f64, f64)> = trend
        .months
        .iter()
        .map(|m| (month_x(m.month), m.average_per_day))
        .collect();
    let y_max = axis_max(points.iter().map(|&(_, y)| y));

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..11.5f64, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_labels(12)
        .x_label_formatter(&|x| month_tick(*x))
        .x_desc(trend.year.to_string())
        .y_desc("Average Crimes Per Day")
        .draw()?;

    chart
        .draw_series(
            points
                .iter()
                .map(|&point| Circle::new(point, 5, TREND_POINTS.filled())),
        )?
        .label("Monthly average")
        .legend(|(x, y)| Circle::new((x + 10, y), 5, TREND_POINTS.filled()));

    if let Some(line) = &trend.trend {
        chart
            .draw_series(LineSeries::new(
                [0.0, 11.0].into_iter().map(|x| (x, line.at(x))),
                TREND_LINE.stroke_width(2),
            ))?
            .label(format!("Trend ({:+.2}/month)", line.slope))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], TREND_LINE));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    log::info!("Wrote monthly trend chart to {}", path.display());
    Ok(())
}

/// Writes the day and night crimes-per-hour series by month.
///
/// Months with an undefined rate leave a gap in that series.
///
/// # Errors
///
/// Returns [`RenderError`] if the SVG cannot be drawn or written.
pub fn write_day_night_chart(
    path: &Path,
    rates: &[MonthlyRate],
    title: &str,
    size: (u32, u32),
) -> Result<(), RenderError> {
    let day: Vec<(f64, Option<f64>)> = rates
        .iter()
        .map(|r| (month_x(r.month), r.day_rate))
        .collect();
    let night: Vec<(f64, Option<f64>)> = rates
        .iter()
        .map(|r| (month_x(r.month), r.night_rate))
        .collect();
    let y_max = axis_max(day.iter().chain(&night).filter_map(|&(_, y)| y));

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..11.5f64, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_labels(12)
        .x_label_formatter(&|x| month_tick(*x))
        .x_desc("Month")
        .y_desc("Crimes Per Hour")
        .draw()?;

    let series = [
        ("Daytime", &day, DAY_COLOR),
        ("Nighttime", &night, NIGHT_COLOR),
    ];
    for (label, values, color) in series {
        for (i, run) in segments(values).into_iter().enumerate() {
            chart.draw_series(
                run.iter()
                    .map(|&point| Circle::new(point, 4, color.filled())),
            )?;
            let drawn = chart.draw_series(LineSeries::new(run, color.stroke_width(2)))?;
            if i == 0 {
                drawn
                    .label(label)
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            }
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    log::info!("Wrote day/night rate chart to {}", path.display());
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn month_x(month: Month) -> f64 {
    month.index() as f64
}

/// Short month name for integral ticks in `0..12`, empty otherwise.
fn month_tick(x: f64) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || !(0.0..12.0).contains(&rounded) {
        return String::new();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let number = rounded as u32 + 1;
    Month::from_number(number)
        .map(|m| m.short_label().to_string())
        .unwrap_or_default()
}

/// Top of the y axis: 10% headroom over the largest value, or 1 if there
/// is nothing positive to show.
fn axis_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.filter(|v| v.is_finite()).fold(0.0, f64::max);
    if max > 0.0 { max * 1.1 } else { 1.0 }
}

/// Splits a series into runs of consecutive defined points.
fn segments(series: &[(f64, Option<f64>)]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for &(x, y) in series {
        if let Some(y) = y {
            current.push((x, y));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

#[cfg(test)]
mod tests {
    use crime_report_analytics_models::{MonthlyCount, TrendLine};

    use super::*;

    fn temp_svg(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("crime_report_{name}_{}.svg", std::process::id()))
    }

    fn rate(month: Month, day_rate: Option<f64>, night_rate: Option<f64>) -> MonthlyRate {
        MonthlyRate {
            month,
            label: month.short_label().to_string(),
            day_rate,
            night_rate,
            day_samples: u32::from(day_rate.is_some()),
            night_samples: u32::from(night_rate.is_some()),
        }
    }

    #[test]
    fn month_ticks_label_integers_only() {
        assert_eq!(month_tick(0.0), "Jan");
        assert_eq!(month_tick(11.0), "Dec");
        assert_eq!(month_tick(0.5), "");
        assert_eq!(month_tick(-0.5), "");
        assert_eq!(month_tick(12.0), "");
    }

    #[test]
    fn axis_max_has_headroom_and_floor() {
        assert!((axis_max([2.0, 10.0].into_iter()) - 11.0).abs() < 1e-9);
        assert!((axis_max(std::iter::empty()) - 1.0).abs() < f64::EPSILON);
        assert!((axis_max([f64::NAN, 0.0].into_iter()) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn segments_break_at_gaps() {
        let runs = segments(&[
            (0.0, Some(1.0)),
            (1.0, Some(2.0)),
            (2.0, None),
            (3.0, Some(4.0)),
            (4.0, None),
        ]);
        assert_eq!(runs, vec![vec![(0.0, 1.0), (1.0, 2.0)], vec![(3.0, 4.0)]]);
        assert!(segments(&[(0.0, None)]).is_empty());
    }

    #[test]
    fn writes_trend_svg() {
        let months = Month::all()
            .iter()
            .map(|&month| MonthlyCount {
                month,
                label: month.short_label().to_string(),
                count: 310,
                days_in_month: 31,
                average_per_day: 10.0 + f64::from(month.number()),
            })
            .collect();
        let trend = MonthlyTrend {
            year: 2022,
            months,
            trend: Some(TrendLine {
                slope: 1.0,
                intercept: 11.0,
                r_squared: Some(1.0),
            }),
        };

        let path = temp_svg("trend");
        write_trend_chart(&path, &trend, "LA Average Daily Crime Reports in 2022", (800, 600))
            .unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Average Crimes Per Day"));
        assert!(svg.contains("2022"));
    }

    #[test]
    fn writes_day_night_svg_with_gaps() {
        let rates: Vec<MonthlyRate> = Month::all()
            .iter()
            .map(|&month| {
                if month == Month::February {
                    rate(month, None, None)
                } else {
                    rate(month, Some(30.0), Some(45.0))
                }
            })
            .collect();

        let path = temp_svg("day_night");
        write_day_night_chart(&path, &rates, "2022 LA Average Hourly Crime Reports", (800, 600))
            .unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(svg.contains("Crimes Per Hour"));
        assert!(svg.contains("Daytime"));
        assert!(svg.contains("Nighttime"));
    }
}
