//! I/O error types
//!
//! One error type for file I/O and frame transport. Errors from the core
//! library and from the stream stages are wrapped so that callers only
//! need to handle `IoError`.

use thiserror::Error;

/// Error type for image I/O and frame transport.
#[derive(Error, Debug)]
pub enum IoError {
    /// Standard I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file format is not supported
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The image or word stream is structurally invalid
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// An error from the core library
    #[error("core error: {0}")]
    Core(#[from] streamscale_core::Error),

    /// An error from the stream stages
    #[error("stream error: {0}")]
    Stream(#[from] streamscale_stream::StreamError),
}

/// Convenience alias for I/O results.
pub type IoResult<T> = Result<T, IoError>;
