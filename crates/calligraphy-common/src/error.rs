//! Error types for calligraphy-common.

use thiserror::Error;

/// Common error type for Calligraphy operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer at offset {offset}: needed {needed} bytes but only {available} available")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Invalid magic bytes encountered.
    #[error("invalid magic: expected {expected:?}, got {actual:?}")]
    InvalidMagic {
        expected: Vec<u8>,
        actual: Vec<u8>,
    },

    /// A count does not fit the width of its wire field.
    #[error("{what} count {count} exceeds the wire limit of {max}")]
    CountOverflow {
        what: &'static str,
        count: usize,
        max: usize,
    },

    /// Invalid textual id.
    #[error("invalid id: {0}")]
    InvalidId(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
