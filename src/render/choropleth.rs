//! Renders the aggregated quadrant totals as a self-contained interactive
//! HTML choropleth.
//!
//! The page embeds every year's totals alongside the quadrant polygons, so
//! moving the year slider recolors the polygons entirely client-side; the
//! fetch/join/aggregate work is done once, before rendering.

use crate::render::color;
use crate::render::error::RenderError;
use crate::types::quadrant_year_frame::QuadrantYearTotal;
use crate::yycrain::LatLon;
use crate::{QuadrantBoundaries, YEAR_MAX, YEAR_MIN};
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject, JsonValue};
use log::info;
use std::collections::BTreeMap;
use std::path::Path;

/// Map center over downtown Calgary.
pub const CALGARY_CENTER: LatLon = LatLon(51.0447, -114.0719);
/// Default zoom level; frames all four quadrants.
pub const DEFAULT_ZOOM: f64 = 9.5;

const DEFAULT_TITLE: &str = "Historical Rainfall by City Quadrant";

/// An interactive choropleth of per-quadrant rainfall totals.
///
/// Built from a boundary set and collected totals, typically through
/// [`crate::YycRain::render_map`]. Quadrants are shaded on a continuous red
/// scale over the full rainfall range; a year slider (1990–2021) selects the
/// displayed year, and a year with no totals leaves every quadrant unfilled.
pub struct ChoroplethMap<'a> {
    boundaries: &'a QuadrantBoundaries,
    totals: Vec<QuadrantYearTotal>,
    center: LatLon,
    zoom: f64,
    title: String,
}

impl<'a> ChoroplethMap<'a> {
    pub fn new(boundaries: &'a QuadrantBoundaries, totals: Vec<QuadrantYearTotal>) -> Self {
        Self {
            boundaries,
            totals,
            center: CALGARY_CENTER,
            zoom: DEFAULT_ZOOM,
            title: DEFAULT_TITLE.to_owned(),
        }
    }

    pub fn with_center(mut self, center: LatLon) -> Self {
        self.center = center;
        self
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Produces the complete HTML document.
    pub fn to_html(&self) -> Result<String, RenderError> {
        let geojson = self.feature_collection().to_string();
        let totals_json =
            serde_json::to_string(&self.totals_by_year()).map_err(RenderError::DataEncode)?;
        let (rain_min, rain_max) = self.rainfall_range();

        Ok(TEMPLATE
            .replace("__TITLE__", &escape_html(&self.title))
            .replace("__GEOJSON__", &geojson)
            .replace("__TOTALS__", &totals_json)
            .replace("__STOPS__", &color::stops_js())
            .replace("__GRADIENT__", &color::gradient_css())
            .replace("__LAT__", &self.center.0.to_string())
            .replace("__LNG__", &self.center.1.to_string())
            .replace("__ZOOM__", &self.zoom.to_string())
            .replace("__MIN__", &rain_min.to_string())
            .replace("__MAX__", &rain_max.to_string())
            .replace("__YEAR_MIN__", &YEAR_MIN.to_string())
            .replace("__YEAR_MAX__", &YEAR_MAX.to_string()))
    }

    /// Writes the document to `path`.
    pub fn save(&self, path: &Path) -> Result<(), RenderError> {
        let html = self.to_html()?;
        std::fs::write(path, html).map_err(|e| RenderError::Io(path.to_path_buf(), e))?;
        info!("Wrote choropleth map to {}", path.display());
        Ok(())
    }

    /// One feature per boundary quadrant, labelled for the client-side
    /// rainfall lookup.
    fn feature_collection(&self) -> GeoJson {
        let features = self
            .boundaries
            .iter()
            .map(|boundary| {
                let mut properties = JsonObject::new();
                properties.insert(
                    "quadrant".to_owned(),
                    JsonValue::from(boundary.quadrant.clone()),
                );
                Feature {
                    bbox: None,
                    geometry: Some(boundary.geometry.clone()),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();
        GeoJson::from(FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        })
    }

    /// Nested year → quadrant → rainfall map. Boundary-only rows (no year)
    /// contribute nothing; their quadrants simply render unfilled.
    fn totals_by_year(&self) -> BTreeMap<i32, BTreeMap<&str, f64>> {
        let mut by_year: BTreeMap<i32, BTreeMap<&str, f64>> = BTreeMap::new();
        for total in &self.totals {
            if let (Some(year), Some(rainfall)) = (total.year, total.rainfall) {
                by_year
                    .entry(year)
                    .or_default()
                    .insert(total.quadrant.as_str(), rainfall);
            }
        }
        by_year
    }

    /// Color-scale domain over every year, so shading stays comparable as
    /// the slider moves. Falls back to [0, 1] when there is no data at all.
    fn rainfall_range(&self) -> (f64, f64) {
        let mut values = self.totals.iter().filter_map(|total| total.rainfall);
        let Some(first) = values.next() else {
            return (0.0, 1.0);
        };
        values.fold((first, first), |(min, max), value| {
            (min.min(value), max.max(value))
        })
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

const TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>__TITLE__</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>
  body { margin: 0; font-family: system-ui, sans-serif; }
  header { padding: 0.75rem 1rem; }
  header h1 { margin: 0 0 0.5rem; font-size: 1.25rem; }
  #map { height: 900px; }
  .controls { display: flex; align-items: center; gap: 0.75rem; }
  .controls input { flex: 1; max-width: 28rem; }
  .legend { background: #fff; padding: 0.5rem 0.75rem; border-radius: 4px; box-shadow: 0 1px 4px rgba(0,0,0,0.3); font-size: 0.8rem; text-align: center; }
  .legend .bar { width: 1rem; height: 8rem; background: __GRADIENT__; margin: 0.25rem auto; }
</style>
</head>
<body>
<header>
  <h1>__TITLE__</h1>
  <div class="controls">
    <label for="year">Year</label>
    <input id="year" type="range" min="__YEAR_MIN__" max="__YEAR_MAX__" step="1" value="__YEAR_MIN__">
    <output id="year-label" for="year">__YEAR_MIN__</output>
  </div>
</header>
<div id="map"></div>
<script>
"use strict";
var QUADRANTS = __GEOJSON__;
var TOTALS = __TOTALS__;
var STOPS = __STOPS__;
var RAIN_MIN = __MIN__;
var RAIN_MAX = __MAX__;

var map = L.map("map").setView([__LAT__, __LNG__], __ZOOM__);
L.tileLayer("https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png", {
  maxZoom: 19,
  attribution: "&copy; OpenStreetMap contributors &copy; CARTO"
}).addTo(map);

function rampColor(t) {
  var n = STOPS.length - 1;
  var x = Math.max(0, Math.min(1, t)) * n;
  var i = Math.min(Math.floor(x), n - 1);
  var f = x - i;
  function mix(a, b) { return Math.round(a + (b - a) * f); }
  var lo = STOPS[i], hi = STOPS[i + 1];
  return "rgb(" + mix(lo[0], hi[0]) + "," + mix(lo[1], hi[1]) + "," + mix(lo[2], hi[2]) + ")";
}

function rainfallFor(quadrant, year) {
  var byQuadrant = TOTALS[String(year)];
  if (!byQuadrant) { return null; }
  var value = byQuadrant[quadrant];
  return value === undefined ? null : value;
}

function styleFor(feature) {
  var value = rainfallFor(feature.properties.quadrant, currentYear);
  if (value === null) {
    return { color: "#888", weight: 1, fillOpacity: 0 };
  }
  var span = RAIN_MAX - RAIN_MIN;
  var t = span > 0 ? (value - RAIN_MIN) / span : 0.5;
  return { color: "#444", weight: 1, fillColor: rampColor(t), fillOpacity: 0.8 };
}

function tooltipFor(feature) {
  var value = rainfallFor(feature.properties.quadrant, currentYear);
  var formatted = value === null
    ? "no data"
    : value.toLocaleString(undefined, { maximumFractionDigits: 0 }) + " mm";
  return "<b>" + feature.properties.quadrant + "</b><br>Rainfall: " + formatted;
}

var currentYear = Number(document.getElementById("year").value);
var layer = L.geoJSON(QUADRANTS, { style: styleFor }).addTo(map);

function refresh() {
  layer.setStyle(styleFor);
  layer.eachLayer(function (quadrantLayer) {
    quadrantLayer.unbindTooltip();
    quadrantLayer.bindTooltip(tooltipFor(quadrantLayer.feature), { sticky: true });
  });
}

var legend = L.control({ position: "bottomright" });
legend.onAdd = function () {
  var div = L.DomUtil.create("div", "legend");
  div.innerHTML = "<div>Rainfall (mm)</div>"
    + "<div>" + Math.round(RAIN_MAX).toLocaleString() + "</div>"
    + "<div class=\"bar\"></div>"
    + "<div>" + Math.round(RAIN_MIN).toLocaleString() + "</div>";
  return div;
};
legend.addTo(map);

document.getElementById("year").addEventListener("input", function (event) {
  currentYear = Number(event.target.value);
  document.getElementById("year-label").textContent = String(currentYear);
  refresh();
});
refresh();
</script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::{Geometry, Value};
    use crate::QuadrantBoundary;

    fn square(west: f64, south: f64) -> Geometry {
        Geometry::new(Value::Polygon(vec![vec![
            vec![west, south],
            vec![west + 0.1, south],
            vec![west + 0.1, south + 0.1],
            vec![west, south + 0.1],
            vec![west, south],
        ]]))
    }

    fn boundaries_fixture() -> QuadrantBoundaries {
        QuadrantBoundaries::from_boundaries(vec![
            QuadrantBoundary {
                quadrant: "NW".to_owned(),
                status: Some("active".to_owned()),
                geometry: square(-114.2, 51.05),
            },
            QuadrantBoundary {
                quadrant: "SE".to_owned(),
                status: Some("active".to_owned()),
                geometry: square(-114.0, 50.9),
            },
        ])
    }

    fn totals_fixture() -> Vec<QuadrantYearTotal> {
        vec![
            QuadrantYearTotal {
                quadrant: "NW".to_owned(),
                year: Some(1995),
                rainfall: Some(16.0),
            },
            QuadrantYearTotal {
                quadrant: "SE".to_owned(),
                year: None,
                rainfall: None,
            },
        ]
    }

    #[test]
    fn test_html_carries_slider_bounds_and_data() {
        let boundaries = boundaries_fixture();
        let html = ChoroplethMap::new(&boundaries, totals_fixture())
            .to_html()
            .unwrap();

        assert!(html.contains(r#"min="1990""#));
        assert!(html.contains(r#"max="2021""#));
        assert!(html.contains(r#"step="1""#));
        assert!(html.contains(r#""quadrant":"NW""#));
        assert!(html.contains(r#""1995":{"NW":16.0}"#));
        assert!(html.contains("Rainfall (mm)"));
        assert!(!html.contains("__GEOJSON__"));
    }

    #[test]
    fn test_boundary_only_quadrants_carry_no_totals() {
        let boundaries = boundaries_fixture();
        let map = ChoroplethMap::new(&boundaries, totals_fixture());

        let by_year = map.totals_by_year();
        assert_eq!(by_year.len(), 1);
        assert!(!by_year[&1995].contains_key("SE"));
    }

    #[test]
    fn test_empty_totals_still_render() {
        let boundaries = boundaries_fixture();
        let map = ChoroplethMap::new(&boundaries, Vec::new());

        assert_eq!(map.rainfall_range(), (0.0, 1.0));
        let html = map.to_html().unwrap();
        assert!(html.contains("var TOTALS = {}"));
    }

    #[test]
    fn test_title_is_escaped() {
        let boundaries = boundaries_fixture();
        let html = ChoroplethMap::new(&boundaries, Vec::new())
            .with_title("Rain <&> Quadrants")
            .to_html()
            .unwrap();

        assert!(html.contains("Rain &lt;&amp;&gt; Quadrants"));
    }

    #[test]
    fn test_save_writes_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rainfall_map.html");
        let boundaries = boundaries_fixture();

        ChoroplethMap::new(&boundaries, totals_fixture())
            .save(&path)
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
    }
}
