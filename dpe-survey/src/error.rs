//! Error types for dpe-survey
//!
//! Module-specific error types using thiserror for clear error propagation.

use thiserror::Error;

/// Main error type for the survey service
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Audio catalog scan errors
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// The filtered catalog has no samples to pick from
    #[error("No samples available for genre: {genre}")]
    EmptyCatalog { genre: String },

    /// Object storage write errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Record serialization errors
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Convenience Result type using dpe-survey Error
pub type Result<T> = std::result::Result<T, Error>;
