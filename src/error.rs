use crate::boundaries::error::BoundaryError;
use crate::open_data::error::OpenDataError;
use crate::render::error::RenderError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum YycRainError {
    #[error(transparent)]
    OpenData(#[from] OpenDataError),

    #[error(transparent)]
    Boundary(#[from] BoundaryError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),

    #[error("Failed to delete cache file '{0}'")]
    CacheDeletion(PathBuf, #[source] std::io::Error),

    #[error("Failed processing DataFrame: {0}")]
    Polars(#[from] PolarsError),
}
