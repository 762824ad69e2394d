use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to serialize map data")]
    DataEncode(#[source] serde_json::Error),

    #[error("Failed to write map file '{0}'")]
    Io(PathBuf, #[source] std::io::Error),
}
