//! Error types for the Calligraphy facade.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading configuration and content.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Prototype loading error.
    #[error("{0}")]
    Prototype(#[from] calligraphy_prototype::Error),

    /// Property layout error.
    #[error("{0}")]
    Property(#[from] calligraphy_property::Error),

    /// Malformed configuration file.
    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Well-formed configuration with an unusable value.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, Error>;
