//! Incident density per exact coordinate pair.

use std::collections::BTreeMap;

use crime_report_analytics_models::DensityPoint;
use crime_report_incident_models::Incident;

/// Counts incidents at each distinct `(latitude, longitude)`.
///
/// Incidents without a location are skipped. The result is ordered by
/// descending count, then by latitude and longitude.
#[must_use]
pub fn density(incidents: &[Incident]) -> Vec<DensityPoint> {
    let mut cells: BTreeMap<(u64, u64), DensityPoint> = BTreeMap::new();
    let mut skipped = 0usize;

    for incident in incidents {
        let Some(location) = incident.location else {
            skipped += 1;
            continue;
        };
        // `+ 0.0` folds -0.0 into 0.0 so both share a cell.
        let latitude = location.latitude + 0.0;
        let longitude = location.longitude + 0.0;

        cells
            .entry((latitude.to_bits(), longitude.to_bits()))
            .or_insert(DensityPoint {
                latitude,
                longitude,
                count: 0,
            })
            .count += 1;
    }

    if skipped > 0 {
        log::debug!("{skipped} incident(s) without coordinates left off the density map");
    }

    let mut points: Vec<DensityPoint> = cells.into_values().collect();
    points.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.latitude.total_cmp(&b.latitude))
            .then_with(|| a.longitude.total_cmp(&b.longitude))
    });

    log::info!(
        "Built density map: {} distinct locations from {} incidents",
        points.len(),
        incidents.len() - skipped
    );

    points
}
