//! Error types for registry loading.

use std::io;
use thiserror::Error;

/// The error type for registry snapshot operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading a snapshot file.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON snapshot could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML snapshot could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Two objects in one snapshot share a name.
    #[error("Duplicate object name: {0}")]
    DuplicateObject(String),

    /// An object name is empty or whitespace-only.
    #[error("Invalid object name: {0:?}")]
    InvalidName(String),
}

/// A specialized Result type for registry operations.
pub type Result<T> = std::result::Result<T, Error>;
