//! Core error types.

use thiserror::Error;

/// Catalog and inference errors.
///
/// Incomplete metadata is not an error: lookups on missing objects return
/// empty results. Only contract violations by the caller surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// A required argument was missing or did not resolve in the catalog.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A table was expected in the catalog but is not there.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// Snapshot serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Reading an input resource failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
