//! Day/night crime rates.
//!
//! The pipeline runs in four steps, each usable on its own:
//!
//! 1. [`daily_records`] creates one empty [`DailyExposure`] per day of the
//!    report year, filled with that day's sunrise/sunset and exposure
//!    minutes.
//! 2. [`tally_incidents`] classifies every incident with [`classify`] and
//!    bumps the matching counter on its day.
//! 3. [`compute_rates`] divides the counters by the exposure hours.
//! 4. [`monthly_rollup`] averages the daily rates per month.
//!
//! [`day_night_rates`] chains all four.

use chrono::{Datelike as _, NaiveDate};
use crime_report_analytics_models::{DailyExposure, DayPhase, MonthlyRate};
use crime_report_incident_models::{ClockTime, Incident, Month};
use crime_report_sun::dst::DstWindow;
use crime_report_sun::{SunTable, SunTimes};

use crate::AnalyticsError;

/// Daily records and their monthly rollup.
#[derive(Debug, Clone, PartialEq)]
pub struct DayNightRates {
    /// One record per day of the report year.
    pub daily: Vec<DailyExposure>,
    /// One entry per month, January first.
    pub monthly: Vec<MonthlyRate>,
}

/// Classifies a local incident time against a day's sun times.
///
/// Inside the DST window the incident time is moved onto the table's
/// standard-time clock first. The incident is daytime iff
/// `sunrise < t <= sunset`; a shifted time past midnight is night.
#[must_use]
pub fn classify(time: ClockTime, date: NaiveDate, sun: SunTimes, dst: &DstWindow) -> DayPhase {
    classify_minutes(time.minutes() + dst.offset_on(date), sun)
}

/// Applies the boundary rule to a time already on the table's clock.
///
/// `minutes` may exceed a day when a DST shift pushes a late incident past
/// midnight.
#[must_use]
pub const fn classify_minutes(minutes: u32, sun: SunTimes) -> DayPhase {
    if sun.sunrise.minutes() < minutes && minutes <= sun.sunset.minutes() {
        DayPhase::Day
    } else {
        DayPhase::Night
    }
}

/// Creates an empty exposure record for every day of `year`.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidYear`] if `year` is outside chrono's
/// supported range.
pub fn daily_records(year: i32, sun_table: &SunTable) -> Result<Vec<DailyExposure>, AnalyticsError> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(AnalyticsError::InvalidYear { year })?;
    let last = NaiveDate::from_ymd_opt(year, 12, 31).ok_or(AnalyticsError::InvalidYear { year })?;

    let records: Vec<DailyExposure> = first
        .iter_days()
        .take_while(|date| *date <= last)
        .map(|date| {
            let sun = sun_table.for_date(date);
            let daylight_minutes = sun.map_or(0, |s| {
                u32::try_from(s.daylight().num_minutes()).unwrap_or(0)
            });
            DailyExposure::new(date, sun, daylight_minutes)
        })
        .collect();

    let missing = records.iter().filter(|r| r.sun.is_none()).count();
    if missing > 0 {
        log::info!("{missing} day(s) of {year} have no sun table data");
    }

    Ok(records)
}

/// Classifies each incident and adds it to its day's counters.
///
/// Incidents on days without sun data cannot be classified; they are
/// counted as unclassified and reported once per affected day.
///
/// # Errors
///
/// Returns [`AnalyticsError::OutsideYear`] if an incident does not fall
/// within the year covered by `records`.
pub fn tally_incidents(
    records: &mut [DailyExposure],
    incidents: &[Incident],
    dst: &DstWindow,
) -> Result<(), AnalyticsError> {
    let Some(year) = records.first().map(|r| r.date.year()) else {
        return Ok(());
    };

    for incident in incidents {
        let record = usize::try_from(incident.date.ordinal0())
            .ok()
            .filter(|_| incident.date.year() == year)
            .and_then(|idx| records.get_mut(idx))
            .ok_or(AnalyticsError::OutsideYear {
                date: incident.date,
                year,
            })?;

        match record.sun {
            Some(sun) => match classify(incident.time, incident.date, sun, dst) {
                DayPhase::Day => record.day_incidents += 1,
                DayPhase::Night => record.night_incidents += 1,
            },
            None => record.unclassified_incidents += 1,
        }
    }

    for record in records.iter().filter(|r| r.unclassified_incidents > 0) {
        log::warn!(
            "No sun data for {}: {} incident(s) left unclassified, rates undefined",
            record.date,
            record.unclassified_incidents
        );
    }

    Ok(())
}

/// Converts each day's counters into incidents per exposure hour.
///
/// A rate is `None` when its exposure is zero or the day has no sun data.
pub fn compute_rates(records: &mut [DailyExposure]) {
    for record in records {
        if record.sun.is_none() {
            record.day_rate = None;
            record.night_rate = None;
            continue;
        }
        record.day_rate = per_hour(record.day_incidents, record.daylight_minutes);
        record.night_rate = per_hour(record.night_incidents, record.dark_minutes);
    }
}

#[allow(clippy::cast_precision_loss)]
fn per_hour(count: u64, exposure_minutes: u32) -> Option<f64> {
    if exposure_minutes == 0 {
        return None;
    }
    Some(count as f64 / (f64::from(exposure_minutes) / 60.0))
}

/// Averages daily rates over each month's own date range.
///
/// Undefined daily rates are left out of the mean; a month with no defined
/// rate at all reports `None`.
#[must_use]
pub fn monthly_rollup(records: &[DailyExposure]) -> Vec<MonthlyRate> {
    let Some(year) = records.first().map(|r| r.date.year()) else {
        return Vec::new();
    };

    Month::all()
        .iter()
        .map(|&month| {
            let (first, last) = (month.first_day(year), month.last_day(year));
            let in_month: Vec<&DailyExposure> = records
                .iter()
                .filter(|r| first.is_some_and(|f| r.date >= f) && last.is_some_and(|l| r.date <= l))
                .collect();

            let (day_rate, day_samples) = mean(in_month.iter().filter_map(|r| r.day_rate));
            let (night_rate, night_samples) = mean(in_month.iter().filter_map(|r| r.night_rate));

            MonthlyRate {
                month,
                label: month.short_label().to_string(),
                day_rate,
                night_rate,
                day_samples,
                night_samples,
            }
        })
        .collect()
}

fn mean(values: impl Iterator<Item = f64>) -> (Option<f64>, u32) {
    let (sum, n) = values.fold((0.0, 0u32), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        (None, 0)
    } else {
        (Some(sum / f64::from(n)), n)
    }
}

/// Runs the full day/night pipeline for one year.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the year is invalid or an incident falls
/// outside it.
pub fn day_night_rates(
    incidents: &[Incident],
    sun_table: &SunTable,
    dst: &DstWindow,
    year: i32,
) -> Result<DayNightRates, AnalyticsError> {
    let mut daily = daily_records(year, sun_table)?;
    tally_incidents(&mut daily, incidents, dst)?;
    compute_rates(&mut daily);
    let monthly = monthly_rollup(&daily);

    let (day, night): (u64, u64) = daily
        .iter()
        .fold((0, 0), |(d, n), r| (d + r.day_incidents, n + r.night_incidents));
    log::info!("Classified {day} daytime and {night} nighttime incidents for {year}");

    Ok(DayNightRates { daily, monthly })
}
