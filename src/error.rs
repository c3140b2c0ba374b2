//! Error types for the face runner library.
//!
//! Gameplay conditions (lost face, rejected commands, repeated collisions) are
//! not errors and never surface here. These variants cover construction,
//! configuration and file handling only.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization failed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Smoothing filter initialization error
    #[error("Filter error: {0}")]
    FilterError(String),

    /// Landmark set did not satisfy the input contract
    #[error("Landmark error: {0}")]
    LandmarkError(String),

    /// Gesture script could not be loaded or is inconsistent
    #[error("Script error: {0}")]
    ScriptError(String),

    /// Best-score store could not be read or written
    #[error("Score store error: {0}")]
    StoreError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
