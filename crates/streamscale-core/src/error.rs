//! Error types for streamscale-core
//!
//! The datapath itself has no failure modes: malformed frame configuration
//! is a caller contract, not a runtime error. The variants here cover the
//! edges where values enter the library (format options, image buffers).

use thiserror::Error;

/// streamscale core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Stream format outside the supported lane range
    #[error("invalid stream format: {0}")]
    InvalidFormat(String),

    /// Pixel buffer does not match the declared dimensions
    #[error("buffer size mismatch: expected {expected} pixels, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
