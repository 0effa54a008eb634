//! Error types for the lineage engine.
//!
//! Graph building, selection, filtering and layout never fail: dangling
//! references are dropped, unknown selector names are ignored and cycles are
//! broken for ranking. Errors only come from the outer surface, loading
//! configuration and project snapshots.

use std::io;
use thiserror::Error;

/// The error type for lineage engine operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading a configuration file.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration document could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration values are out of range.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Registry snapshot could not be loaded.
    #[error("Registry error: {0}")]
    Registry(#[from] lineage_registry::Error),
}

/// A specialized Result type for lineage engine operations.
pub type Result<T> = std::result::Result<T, Error>;
