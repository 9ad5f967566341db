//! Error types for loading and parsing API descriptions

use thiserror::Error;

/// Errors raised while turning raw OpenAPI content into a [`Document`](super::Document)
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Invalid document: {0}")]
    Invalid(String),

    #[error("Unable to resolve reference: {0}")]
    UnresolvedReference(String),

    #[error("OpenAPI loading error: {0}")]
    LoadError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
