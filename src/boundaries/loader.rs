//! Loads the city-quadrant boundary polygons from a local GeoJSON file.
//!
//! The boundary file is the one static input of the pipeline: a
//! FeatureCollection with one feature per quadrant. Labels must match the
//! gauge feed's `quadrant` column exactly for the aggregation join to line up.

use crate::boundaries::error::BoundaryError;
use crate::types::quadrant::QuadrantBoundary;
use geojson::{GeoJson, Geometry};
use log::warn;
use polars::prelude::*;
use std::path::Path;

/// The full set of quadrant boundaries, in file order.
///
/// Built once via [`QuadrantBoundaries::from_file`] and read-only afterwards.
/// Provides the `quadrant`/`quadrant_status` key frame the aggregation
/// pipeline outer-joins against, and the geometry lookup the renderer uses.
#[derive(Debug, Clone)]
pub struct QuadrantBoundaries {
    boundaries: Vec<QuadrantBoundary>,
}

impl QuadrantBoundaries {
    /// Reads and validates a GeoJSON boundary file.
    ///
    /// Every feature must carry a string `quadrant` property and a geometry;
    /// `quadrant_status` is optional. A missing or malformed file aborts with
    /// a [`BoundaryError`].
    pub fn from_file(path: &Path) -> Result<Self, BoundaryError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| BoundaryError::FileRead(path.to_path_buf(), e))?;
        let geojson: GeoJson = contents
            .parse()
            .map_err(|e| BoundaryError::GeoJsonParse(path.to_path_buf(), Box::new(e)))?;

        let collection = match geojson {
            GeoJson::FeatureCollection(collection) => collection,
            _ => return Err(BoundaryError::NotAFeatureCollection(path.to_path_buf())),
        };

        let mut boundaries = Vec::with_capacity(collection.features.len());
        for (index, feature) in collection.features.into_iter().enumerate() {
            let quadrant = feature
                .properties
                .as_ref()
                .and_then(|properties| properties.get("quadrant"))
                .and_then(|value| value.as_str())
                .map(str::to_owned)
                .ok_or(BoundaryError::MissingQuadrantProperty { index })?;
            let status = feature
                .properties
                .as_ref()
                .and_then(|properties| properties.get("quadrant_status"))
                .and_then(|value| value.as_str())
                .map(str::to_owned);
            let geometry = feature.geometry.ok_or_else(|| BoundaryError::MissingGeometry {
                quadrant: quadrant.clone(),
            })?;
            boundaries.push(QuadrantBoundary {
                quadrant,
                status,
                geometry,
            });
        }

        if boundaries.is_empty() {
            warn!(
                "Boundary file {} contains no features; the rendered map will be empty",
                path.display()
            );
        }

        Ok(Self { boundaries })
    }

    /// Builds a boundary set directly from in-memory features, bypassing the
    /// file format.
    pub fn from_boundaries(boundaries: Vec<QuadrantBoundary>) -> Self {
        Self { boundaries }
    }

    /// One row per boundary feature: `quadrant` and `quadrant_status`.
    ///
    /// This is the right-hand side of the pipeline's full outer join, which
    /// guarantees every quadrant in the file survives into the aggregated
    /// output even when no rainfall rows exist for it.
    pub fn key_frame(&self) -> Result<DataFrame, BoundaryError> {
        let quadrants: Vec<&str> = self
            .boundaries
            .iter()
            .map(|boundary| boundary.quadrant.as_str())
            .collect();
        let statuses: Vec<Option<&str>> = self
            .boundaries
            .iter()
            .map(|boundary| boundary.status.as_deref())
            .collect();
        df!(
            "quadrant" => quadrants,
            "quadrant_status" => statuses,
        )
        .map_err(BoundaryError::KeyFrame)
    }

    /// The geometry for a quadrant label, if the file has one.
    pub fn geometry(&self, quadrant: &str) -> Option<&Geometry> {
        self.boundaries
            .iter()
            .find(|boundary| boundary.quadrant == quadrant)
            .map(|boundary| &boundary.geometry)
    }

    /// Quadrant labels in file order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.boundaries.iter().map(|boundary| boundary.quadrant.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuadrantBoundary> {
        self.boundaries.iter()
    }

    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }
}
