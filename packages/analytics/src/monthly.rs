//! Monthly incident counts and their trend.

use chrono::Datelike as _;
use crime_report_analytics_models::{MonthlyCount, MonthlyTrend};
use crime_report_incident_models::{Incident, Month};

use crate::AnalyticsError;
use crate::regression::fit_ols;

/// Counts incidents per month of `year` and converts each count into an
/// average per day.
///
/// # Errors
///
/// Returns [`AnalyticsError::OutsideYear`] if an incident is dated in a
/// different year.
#[allow(clippy::cast_precision_loss)]
pub fn monthly_counts(incidents: &[Incident], year: i32) -> Result<Vec<MonthlyCount>, AnalyticsError> {
    let mut counts = [0u64; 12];
    for incident in incidents {
        if incident.date.year() != year {
            return Err(AnalyticsError::OutsideYear {
                date: incident.date,
                year,
            });
        }
        counts[incident.month().index()] += 1;
    }

    Ok(Month::all()
        .iter()
        .map(|&month| {
            let count = counts[month.index()];
            let days_in_month = month.days_in(year);
            MonthlyCount {
                month,
                label: month.short_label().to_string(),
                count,
                days_in_month,
                average_per_day: count as f64 / f64::from(days_in_month),
            }
        })
        .collect())
}

/// Monthly counts plus an OLS line of month index (January = 0) against
/// the daily average.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if an incident falls outside `year`.
pub fn monthly_trend(incidents: &[Incident], year: i32) -> Result<MonthlyTrend, AnalyticsError> {
    let months = monthly_counts(incidents, year)?;

    #[allow(clippy::cast_precision_loss)]
    let points: Vec<(f64, f64)> = months
        .iter()
        .map(|m| (m.month.index() as f64, m.average_per_day))
        .collect();
    let trend = fit_ols(&points);

    if let Some(line) = &trend {
        log::info!(
            "Monthly trend for {year}: {:+.3} incidents/day per month (intercept {:.2})",
            line.slope,
            line.intercept
        );
    }

    Ok(MonthlyTrend {
        year,
        months,
        trend,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use crime_report_incident_models::ClockTime;

    use super::*;

    fn incident(y: i32, m: u32, d: u32) -> Incident {
        Incident {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            time: ClockTime::MIDNIGHT,
            location: None,
        }
    }

    #[test]
    fn averages_by_days_in_month() {
        let mut incidents: Vec<Incident> = (1..=28).map(|d| incident(2022, 2, d)).collect();
        incidents.extend((1..=31).flat_map(|d| [incident(2022, 1, d), incident(2022, 1, d)]));

        let months = monthly_counts(&incidents, 2022).unwrap();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].count, 62);
        assert!((months[0].average_per_day - 2.0).abs() < 1e-12);
        assert_eq!(months[1].days_in_month, 28);
        assert!((months[1].average_per_day - 1.0).abs() < 1e-12);
        assert_eq!(months[11].count, 0);
        assert_eq!(months[11].label, "Dec");
    }

    #[test]
    fn leap_february_has_29_days() {
        let months = monthly_counts(&[incident(2024, 2, 29)], 2024).unwrap();
        assert_eq!(months[1].days_in_month, 29);
    }

    #[test]
    fn trend_follows_rising_counts() {
        // Month index i gets (i + 1) incidents per day
        let incidents: Vec<Incident> = Month::all()
            .iter()
            .flat_map(|&month| {
                (1..=month.days_in(2022)).flat_map(move |d| {
                    (0..=month.index()).map(move |_| incident(2022, month.number(), d))
                })
            })
            .collect();

        let trend = monthly_trend(&incidents, 2022).unwrap();
        let line = trend.trend.unwrap();
        assert!((line.slope - 1.0).abs() < 1e-9);
        assert!((line.intercept - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_other_years() {
        assert!(monthly_counts(&[incident(2023, 1, 1)], 2022).is_err());
    }
}
