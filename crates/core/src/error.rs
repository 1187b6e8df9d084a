//! Error types for taskview-core
//!
//! Rendering itself never fails on data; these errors cover loading
//! configuration, parsing user-supplied names and reading result dumps.

use thiserror::Error;

/// Result type alias for taskview-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for taskview-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown result attribute name
    #[error("Invalid attribute: {0}")]
    InvalidAttribute(String),

    /// Unknown severity level name or out-of-range number
    #[error("Invalid severity level: {0}")]
    InvalidSeverity(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => 2,                                       // UsageError
            Error::InvalidAttribute(_) | Error::InvalidSeverity(_) => 2, // UsageError
            Error::Io(_) | Error::Json(_) => 3,                          // IoError
            _ => 1,                                                      // GeneralError
        }
    }
}
