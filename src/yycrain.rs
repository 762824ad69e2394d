//! This module provides the main entry point for the Calgary rainfall
//! client. It fetches the two open-data feeds, joins them against the local
//! quadrant boundary file, and hands out aggregated frames or a rendered
//! choropleth map.

use crate::open_data::FrameFetcher;
use crate::render::ChoroplethMap;
use crate::types::feed::Feed;
use crate::types::quadrant_year_frame::QuadrantYearLazyFrame;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use crate::{pipeline, QuadrantBoundaries, YycRainError};
use bon::bon;
use log::info;
use polars::prelude::{IntoLazy, LazyFrame};
use std::io;
use std::path::{Path, PathBuf};

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second
/// (index 1). Both values are represented as `f64`.
///
/// # Examples
///
/// ```
/// use yycrain::LatLon;
///
/// let downtown_calgary = LatLon(51.0447, -114.0719);
/// assert_eq!(downtown_calgary.0, 51.0447); // Latitude
/// assert_eq!(downtown_calgary.1, -114.0719); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// The main client for Calgary's historical rainfall data.
///
/// This struct handles fetching the rainfall readings and gauge-location
/// feeds (`LazyFrame`s from Polars), running the quadrant aggregation
/// pipeline, and rendering the interactive map. Downloaded feeds are cached
/// on disk as parquet and memoized in-process, so repeated interactions
/// never refetch.
///
/// Create an instance using [`YycRain::new()`] for default behavior (using a
/// standard cache directory) or [`YycRain::with_cache_folder()`] for custom
/// cache locations.
///
/// # Examples
///
/// ```no_run
/// # use yycrain::{YycRain, YycRainError};
/// # async fn run() -> Result<(), YycRainError> {
/// let client = YycRain::new("City_Quadrants.geojson").await?;
/// let totals = client.quadrant_totals().await?.collect_totals()?;
/// println!("{} quadrant-year rows", totals.len());
/// # Ok(())
/// # }
/// ```
pub struct YycRain {
    fetcher: FrameFetcher,
    boundaries: QuadrantBoundaries,
}

impl YycRain {
    /// Creates a client with a specified cache directory.
    ///
    /// The boundary file is read and validated eagerly; the remote feeds are
    /// only fetched when first requested.
    ///
    /// # Errors
    ///
    /// Returns [`YycRainError::CacheDirCreation`] if the cache directory
    /// cannot be created, and [`YycRainError::Boundary`] variants if the
    /// boundary file is missing or malformed.
    pub async fn with_cache_folder(
        boundary_file: impl AsRef<Path>,
        cache_folder: PathBuf,
    ) -> Result<Self, YycRainError> {
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| YycRainError::CacheDirCreation(cache_folder.clone(), e))?;
        let boundaries = QuadrantBoundaries::from_file(boundary_file.as_ref())?;
        Ok(Self {
            fetcher: FrameFetcher::new(&cache_folder),
            boundaries,
        })
    }

    /// Creates a client using the default cache directory (resolved via the
    /// `dirs` crate, e.g. `~/.cache/yycrain_cache` on Linux).
    ///
    /// # Errors
    ///
    /// Returns [`YycRainError::CacheDirResolution`] if no system cache
    /// directory can be found, plus everything
    /// [`YycRain::with_cache_folder`] can return.
    pub async fn new(boundary_file: impl AsRef<Path>) -> Result<Self, YycRainError> {
        let cache_folder = get_cache_dir().map_err(YycRainError::CacheDirResolution)?;
        Self::with_cache_folder(boundary_file, cache_folder).await
    }

    /// The raw rainfall-readings feed as a `LazyFrame`, downloading it on
    /// first use. Columns arrive as strings straight from the portal; use
    /// [`crate::normalize_readings`] or [`YycRain::quadrant_totals`] for
    /// typed data.
    pub async fn readings(&self) -> Result<LazyFrame, YycRainError> {
        self.fetcher
            .get_cache_lazyframe(Feed::Readings)
            .await
            .map_err(YycRainError::from)
    }

    /// The raw gauge-locations feed as a `LazyFrame`, downloading it on
    /// first use.
    pub async fn gauges(&self) -> Result<LazyFrame, YycRainError> {
        self.fetcher
            .get_cache_lazyframe(Feed::Gauges)
            .await
            .map_err(YycRainError::from)
    }

    /// The quadrant boundary set read at construction.
    pub fn boundaries(&self) -> &QuadrantBoundaries {
        &self.boundaries
    }

    /// Runs the full aggregation pipeline lazily: normalize both feeds,
    /// inner-join readings to gauges on `channel`, sum rainfall per
    /// (quadrant, year), and outer-join against the boundary set so every
    /// quadrant is represented.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use yycrain::{YycRain, YycRainError};
    /// # async fn run() -> Result<(), YycRainError> {
    /// let client = YycRain::new("City_Quadrants.geojson").await?;
    /// let frame_1995 = client.quadrant_totals().await?.for_year(1995);
    /// println!("{}", frame_1995.frame.collect()?);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn quadrant_totals(&self) -> Result<QuadrantYearLazyFrame, YycRainError> {
        let readings = self.readings().await?;
        let gauges = self.gauges().await?;
        let boundary_keys = self.boundaries.key_frame()?.lazy();
        Ok(QuadrantYearLazyFrame::new(pipeline::quadrant_totals(
            readings,
            gauges,
            boundary_keys,
        )))
    }

    /// Deletes the cached feed files and drops the in-process memoization,
    /// forcing fresh downloads on the next request.
    pub async fn clear_cache(&self) -> Result<(), YycRainError> {
        for path in self.fetcher.evict().await {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => info!("Deleted cache file {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(YycRainError::CacheDeletion(path, e)),
            }
        }
        Ok(())
    }
}

#[bon]
impl YycRain {
    /// Aggregates the feeds and writes the interactive choropleth map.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.output(PathBuf)`: **Required.** Where to write the HTML document.
    /// * `.title(String)`: Optional. Page heading.
    /// * `.center(LatLon)`: Optional. Map center; defaults to downtown
    ///   Calgary ([`crate::CALGARY_CENTER`]).
    /// * `.zoom(f64)`: Optional. Initial zoom; defaults to
    ///   [`crate::DEFAULT_ZOOM`].
    ///
    /// # Returns
    ///
    /// The path the map was written to.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use yycrain::{YycRain, YycRainError};
    /// # use std::path::PathBuf;
    /// # async fn run() -> Result<(), YycRainError> {
    /// let client = YycRain::new("City_Quadrants.geojson").await?;
    /// let written = client
    ///     .render_map()
    ///     .output(PathBuf::from("rainfall_map.html"))
    ///     .call()
    ///     .await?;
    /// println!("Map written to {}", written.display());
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn render_map(
        &self,
        output: PathBuf,
        title: Option<String>,
        center: Option<LatLon>,
        zoom: Option<f64>,
    ) -> Result<PathBuf, YycRainError> {
        let totals = self.quadrant_totals().await?.collect_totals()?;

        let mut map = ChoroplethMap::new(&self.boundaries, totals);
        if let Some(title) = title {
            map = map.with_title(title);
        }
        if let Some(center) = center {
            map = map.with_center(center);
        }
        if let Some(zoom) = zoom {
            map = map.with_zoom(zoom);
        }
        map.save(&output)?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const QUADRANTS_FIXTURE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"quadrant": "NW", "quadrant_status": "active"},
                "geometry": {"type": "Polygon", "coordinates": [[[-114.2, 51.05], [-114.06, 51.05], [-114.06, 51.2], [-114.2, 51.2], [-114.2, 51.05]]]}
            }
        ]
    }"#;

    #[tokio::test]
    async fn test_client_reads_boundaries_eagerly() -> Result<(), YycRainError> {
        let dir = tempfile::tempdir().unwrap();
        let boundary_path = dir.path().join("City_Quadrants.geojson");
        let mut file = std::fs::File::create(&boundary_path).unwrap();
        file.write_all(QUADRANTS_FIXTURE.as_bytes()).unwrap();

        let client =
            YycRain::with_cache_folder(&boundary_path, dir.path().join("cache")).await?;
        assert_eq!(client.boundaries().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_boundary_file_fails_construction() {
        let dir = tempfile::tempdir().unwrap();
        let result = YycRain::with_cache_folder(
            dir.path().join("nowhere.geojson"),
            dir.path().join("cache"),
        )
        .await;
        assert!(matches!(result, Err(YycRainError::Boundary(_))));
    }

    #[tokio::test]
    async fn test_clear_cache_on_empty_cache_is_a_noop() -> Result<(), YycRainError> {
        let dir = tempfile::tempdir().unwrap();
        let boundary_path = dir.path().join("City_Quadrants.geojson");
        let mut file = std::fs::File::create(&boundary_path).unwrap();
        file.write_all(QUADRANTS_FIXTURE.as_bytes()).unwrap();

        let client =
            YycRain::with_cache_folder(&boundary_path, dir.path().join("cache")).await?;
        client.clear_cache().await?;
        Ok(())
    }
}
