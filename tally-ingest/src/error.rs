use std::path::PathBuf;
use thiserror::Error;

/// Failures reading a statement before any normalization happens.
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Statement has no header row")]
    MissingHeader,

    #[error("Unsupported file type: {} (expected one of: {})", .path.display(), .allowed.join(", "))]
    UnsupportedExtension { path: PathBuf, allowed: Vec<String> },
}

pub type Result<T> = std::result::Result<T, IngestionError>;
