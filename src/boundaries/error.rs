use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("Failed to read boundary file '{0}'")]
    FileRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse GeoJSON from '{0}'")]
    GeoJsonParse(PathBuf, #[source] Box<geojson::Error>),

    #[error("Boundary file '{0}' is not a GeoJSON FeatureCollection")]
    NotAFeatureCollection(PathBuf),

    #[error("Boundary feature {index} has no string 'quadrant' property")]
    MissingQuadrantProperty { index: usize },

    #[error("Boundary feature for quadrant '{quadrant}' has no geometry")]
    MissingGeometry { quadrant: String },

    #[error("Failed to build quadrant key frame")]
    KeyFrame(#[source] PolarsError),
}
