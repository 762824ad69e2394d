//! Data structure for a single city-quadrant boundary as read from the
//! local GeoJSON file.

use geojson::Geometry;
use serde::{Deserialize, Serialize};

/// One named quadrant polygon from the boundary file.
///
/// The City of Calgary quadrant file carries one feature per quadrant
/// (`NW`, `NE`, `SW`, `SE`), each with a `quadrant` label property, an
/// administrative `quadrant_status` property, and a (multi)polygon geometry.
/// The status column travels through the aggregation join and is dropped
/// there; the geometry is re-attached when the map is rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuadrantBoundary {
    /// Quadrant label, matched exactly against the gauge feed's `quadrant`
    /// column.
    pub quadrant: String,
    /// Administrative status label, if the file carries one.
    pub status: Option<String>,
    /// Boundary polygon in WGS84 coordinates.
    pub geometry: Geometry,
}
