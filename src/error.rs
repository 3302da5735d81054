// Errors raised while turning uploaded bytes into a dataset

use std::path::PathBuf;
use thiserror::Error;

/// An upload that could not be admitted. Nothing of the file is kept.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported file type for '{name}': only .csv and .json are accepted")]
    UnsupportedExtension { name: String },

    #[error("file is too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid JSON that holds no array of records.
    #[error("invalid JSON structure: {reason}")]
    InvalidJsonStructure { reason: String },

    #[error("failed to read file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
