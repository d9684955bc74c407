//! Error types for volume page generation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Failed to read {path}: {reason}")]
    ReadError { path: String, reason: String },

    #[error("Failed to write {path}: {reason}")]
    WriteError { path: String, reason: String },

    #[error("Invalid metadata pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
