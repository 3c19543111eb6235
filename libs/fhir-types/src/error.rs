//! Error types for FHIR type conversions

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown FHIR version: {0}")]
    UnknownFhirVersion(String),

    #[error("Invalid {kind} value: {value}")]
    UnknownLiteral { kind: &'static str, value: String },

    #[error("Resource type mismatch: expected {expected}, found {found}")]
    ResourceTypeMismatch { expected: String, found: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
