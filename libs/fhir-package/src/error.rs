//! Error types for package documents

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid package identifier: {0}")]
    InvalidIdentifier(String),
}

pub type PackageResult<T> = Result<T, PackageError>;
