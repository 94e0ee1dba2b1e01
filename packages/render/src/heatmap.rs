//! Figure 1: geographic density heatmap.
//!
//! The page is self-contained apart from the Leaflet and `leaflet.heat`
//! scripts, which load from a CDN. Density points are embedded as a JSON
//! array of `[lat, lng, count]` triples.

use std::path::{Path, PathBuf};

use crime_report_analytics_models::DensityPoint;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject};

use crate::{HEATMAP_GEOJSON, HEATMAP_HTML, RenderError, output_path};

const LEAFLET_VERSION: &str = "1.9.4";
const LEAFLET_HEAT_VERSION: &str = "0.2.0";

/// Initial map view and heat layer settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapView {
    /// Map center latitude.
    pub center_latitude: f64,
    /// Map center longitude.
    pub center_longitude: f64,
    /// Initial zoom level. Fractional zoom is enabled on the page.
    pub zoom: f64,
    /// Heat point radius in pixels.
    pub radius: u32,
}

/// Paths written by [`write_heatmap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeatmapFiles {
    /// The interactive page.
    pub html: PathBuf,
    /// The raw points as GeoJSON.
    pub geojson: PathBuf,
}

/// Writes `heatmap.html` and `heatmap.geojson` into `dir`.
///
/// # Errors
///
/// Returns [`RenderError`] if the directory or either file cannot be
/// written.
pub fn write_heatmap(
    dir: &Path,
    points: &[DensityPoint],
    view: &HeatmapView,
    title: &str,
) -> Result<HeatmapFiles, RenderError> {
    let html = output_path(dir, HEATMAP_HTML)?;
    std::fs::write(&html, heatmap_html(points, view, title)?)?;

    let geojson = output_path(dir, HEATMAP_GEOJSON)?;
    std::fs::write(&geojson, GeoJson::from(density_geojson(points)).to_string())?;

    log::info!(
        "Wrote heatmap with {} locations to {}",
        points.len(),
        html.display()
    );
    Ok(HeatmapFiles { html, geojson })
}

/// Builds a `FeatureCollection` with one `Point` feature per location and
/// the incident count in the `count` property.
#[must_use]
pub fn density_geojson(points: &[DensityPoint]) -> FeatureCollection {
    let features = points
        .iter()
        .map(|p| {
            let mut properties = JsonObject::new();
            properties.insert("count".to_string(), serde_json::Value::from(p.count));
            Feature {
                bbox: None,
                geometry: Some(Geometry::new(geojson::Value::Point(vec![
                    p.longitude,
                    p.latitude,
                ]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Renders the heatmap page.
///
/// # Errors
///
/// Returns [`RenderError::Json`] if the points cannot be serialized.
pub fn heatmap_html(
    points: &[DensityPoint],
    view: &HeatmapView,
    title: &str,
) -> Result<String, RenderError> {
    #[allow(clippy::cast_precision_loss)]
    let data: Vec<[f64; 3]> = points
        .iter()
        .map(|p| [p.latitude, p.longitude, p.count as f64])
        .collect();
    let max = points.iter().map(|p| p.count).max().unwrap_or(1);

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@{leaflet}/dist/leaflet.css">
    <style>
        html, body {{ height: 100%; margin: 0; font-family: sans-serif; }}
        #map {{ position: absolute; top: 3rem; bottom: 0; width: 100%; }}
        h1 {{ margin: 0; height: 3rem; line-height: 3rem; font-size: 1.4rem; text-align: center; }}
    </style>
</head>
<body>
    <h1>{title}</h1>
    <div id="map"></div>
    <script src="https://unpkg.com/leaflet@{leaflet}/dist/leaflet.js"></script>
    <script src="https://unpkg.com/leaflet.heat@{heat}/dist/leaflet-heat.js"></script>
    <script>
        const points = {data};
        const map = L.map("map", {{ zoomSnap: 0.25 }}).setView([{lat}, {lng}], {zoom});
        L.tileLayer("https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
            attribution: "&copy; OpenStreetMap contributors",
        }}).addTo(map);
        L.heatLayer(points, {{ radius: {radius}, max: {max} }}).addTo(map);
    </script>
</body>
</html>
"#,
        title = escape_html(title),
        leaflet = LEAFLET_VERSION,
        heat = LEAFLET_HEAT_VERSION,
        data = serde_json::to_string(&data)?,
        lat = view.center_latitude,
        lng = view.center_longitude,
        zoom = view.zoom,
        radius = view.radius,
    ))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
