mod boundaries;
mod error;
mod open_data;
mod pipeline;
mod render;
mod types;
mod utils;
mod yycrain;

pub use error::YycRainError;
pub use yycrain::*;

pub use pipeline::*;

pub use types::feed::Feed;
pub use types::quadrant::QuadrantBoundary;
pub use types::quadrant_year_frame::{QuadrantYearLazyFrame, QuadrantYearTotal};

pub use boundaries::QuadrantBoundaries;
pub use render::{ChoroplethMap, CALGARY_CENTER, DEFAULT_ZOOM};

pub use boundaries::error::BoundaryError;
pub use open_data::error::OpenDataError;
pub use render::error::RenderError;
