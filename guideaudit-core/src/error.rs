use guideaudit_scanner::ScanError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unexpected document shape in {path}: {source}")]
    Extraction {
        path: PathBuf,
        #[source]
        source: ScanError,
    },

    #[error("Scanner error: {0}")]
    Scan(#[from] ScanError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Known-redirect list {path} has no column named {column:?}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;
