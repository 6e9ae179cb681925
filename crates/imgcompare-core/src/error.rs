use std::path::PathBuf;
use thiserror::Error;

use crate::types::ComparisonKind;

pub type Result<T> = core::result::Result<T, Error>;

/// Custom error types for the imgcompare library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encode/decode error
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// Metadata (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File not found error
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Invalid configuration error
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Comparison name outside the supported set
    #[error("Comparison type \"{0}\" not supported")]
    UnknownComparison(String),

    /// One source is a file while the other is a directory
    #[error("Sources differ, comparing file to directory: {a} vs {b}")]
    MixedSources { a: PathBuf, b: PathBuf },

    /// A source image could not be decoded
    #[error("Failed to load image {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Metric requires dimensions the image does not have
    #[error("{kind} comparison requires even resolution, got {width} x {height}")]
    Dimension {
        kind: ComparisonKind,
        width: u32,
        height: u32,
    },

    /// The two images do not share pixel bounds
    #[error("Image sizes differ: {a:?} vs {b:?}")]
    DimensionMismatch { a: (u32, u32), b: (u32, u32) },

    /// Export directory could not be written
    #[error("Export to {path} failed: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Whether the error only invalidates a single metric of a job
    pub fn is_metric_error(&self) -> bool {
        matches!(self, Self::Dimension { .. } | Self::DimensionMismatch { .. })
    }
}
