//! Plain-text summary printed by `crime_report summary` and `all`.

use std::fmt::Write as _;

use crime_report_analytics_models::{MonthlyRate, MonthlyTrend};
use crime_report_render::ReportLabels;

/// Formats the monthly counts, the trend fit and the day/night rates as a
/// fixed-width table.
pub fn format_summary(
    labels: &ReportLabels,
    incident_count: usize,
    trend: &MonthlyTrend,
    rates: &[MonthlyRate],
) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} {} crime report: {incident_count} incidents",
        labels.year, labels.city
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<5} {:>8} {:>9} {:>9} {:>9}",
        "Month", "Count", "Per day", "Day/hr", "Night/hr"
    );

    for month in &trend.months {
        let rate = rates.iter().find(|r| r.month == month.month);
        let _ = writeln!(
            out,
            "{:<5} {:>8} {:>9.2} {:>9} {:>9}",
            month.label,
            month.count,
            month.average_per_day,
            optional(rate.and_then(|r| r.day_rate)),
            optional(rate.and_then(|r| r.night_rate)),
        );
    }

    let _ = writeln!(out);
    match &trend.trend {
        Some(line) => {
            let r_squared = line
                .r_squared
                .map_or_else(|| "n/a".to_string(), |r| format!("{r:.3}"));
            let _ = writeln!(
                out,
                "Trend: {:+.2} crimes/day per month (intercept {:.2}, R\u{b2} {r_squared})",
                line.slope, line.intercept
            );
        }
        None => {
            let _ = writeln!(out, "Trend: not enough data to fit");
        }
    }

    let day = mean(rates.iter().filter_map(|r| r.day_rate));
    let night = mean(rates.iter().filter_map(|r| r.night_rate));
    let _ = writeln!(
        out,
        "Average crimes per hour: day {}, night {}",
        optional(day),
        optional(night)
    );

    out
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0u32), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / f64::from(n))
}

#[cfg(test)]
mod tests {
    use crime_report_analytics_models::{MonthlyCount, TrendLine};
    use crime_report_incident_models::Month;

    use super::*;

    fn trend() -> MonthlyTrend {
        MonthlyTrend {
            year: 2022,
            months: vec![
                MonthlyCount {
                    month: Month::January,
                    label: "Jan".to_string(),
                    count: 310,
                    days_in_month: 31,
                    average_per_day: 10.0,
                },
                MonthlyCount {
                    month: Month::February,
                    label: "Feb".to_string(),
                    count: 336,
                    days_in_month: 28,
                    average_per_day: 12.0,
                },
            ],
            trend: Some(TrendLine {
                slope: 2.0,
                intercept: 10.0,
                r_squared: Some(1.0),
            }),
        }
    }

    fn rates() -> Vec<MonthlyRate> {
        vec![
            MonthlyRate {
                month: Month::January,
                label: "Jan".to_string(),
                day_rate: Some(1.5),
                night_rate: Some(2.5),
                day_samples: 31,
                night_samples: 31,
            },
            MonthlyRate {
                month: Month::February,
                label: "Feb".to_string(),
                day_rate: None,
                night_rate: None,
                day_samples: 0,
                night_samples: 0,
            },
        ]
    }

    #[test]
    fn summary_lists_months_and_trend() {
        let text = format_summary(&ReportLabels::new("LA", 2022), 646, &trend(), &rates());

        assert!(text.starts_with("2022 LA crime report: 646 incidents"));
        assert!(text.contains("Jan        310     10.00      1.50      2.50"));
        assert!(text.contains("Feb        336     12.00       n/a       n/a"));
        assert!(text.contains("Trend: +2.00 crimes/day per month"));
        assert!(text.contains("day 1.50, night 2.50"));
    }

    #[test]
    fn summary_without_trend() {
        let mut trend = trend();
        trend.trend = None;
        let text = format_summary(&ReportLabels::new("LA", 2022), 0, &trend, &[]);
        assert!(text.contains("not enough data"));
        assert!(text.contains("day n/a, night n/a"));
    }

    #[test]
    fn mean_of_nothing_is_undefined() {
        assert!(mean(std::iter::empty()).is_none());
        assert!((mean([1.0, 2.0].into_iter()).unwrap() - 1.5).abs() < f64::EPSILON);
    }
}
