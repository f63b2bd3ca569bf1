use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between reading a config and writing a render.
///
/// Numerical blow-up has no variant: non-finite states are valid
/// integrator output.
#[derive(Debug, Error)]
pub enum LorenzError {
    #[error("time grid must contain at least one point")]
    EmptyTimeGrid,
    #[error("time grid must be finite and strictly increasing (violated at index {index})")]
    NonIncreasingTimeGrid { index: usize },
    #[error("step size must be finite and positive (got {0})")]
    InvalidStepSize(f64),
    #[error("invalid grid spec: {0}")]
    InvalidGridSpec(String),
    #[error("failed to read config at {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LorenzError>;
