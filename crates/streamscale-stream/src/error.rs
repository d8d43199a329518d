//! Error types for streamscale-stream

use thiserror::Error;

/// Errors raised by the pipeline stages and executors.
///
/// None of these come from the datapath itself; they report a broken
/// stream contract at a stage boundary.
#[derive(Debug, Clone, Error)]
pub enum StreamError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] streamscale_core::Error),

    /// Upstream ended before the stage had read everything it needs
    #[error("{stage}: upstream ended early")]
    UnexpectedEndOfStream { stage: &'static str },

    /// Downstream stopped accepting words
    #[error("{stage}: downstream channel closed")]
    ChannelClosed { stage: &'static str },

    /// A stage thread panicked
    #[error("{stage}: stage thread panicked")]
    StagePanicked { stage: &'static str },
}

/// Result type for stream operations
pub type StreamResult<T> = Result<T, StreamError>;
