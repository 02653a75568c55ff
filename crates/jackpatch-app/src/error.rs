//! Application errors.

use jackpatch_core::AssetError;
use jackpatch_render::RenderError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the host.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid arguments: {0}")]
    Usage(String),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Result type for host operations.
pub type AppResult<T> = Result<T, AppError>;
