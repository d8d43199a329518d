//! streamscale-stream - Streaming resize stages
//!
//! This crate provides the stages of the word-stream downscaler and the
//! executors that connect them:
//!
//! - Configuration (frame geometry from a 4-word burst)
//! - Unpacking source words into processing units
//! - Line window with fixed-point bilinear interpolation
//! - Output row and column selection
//! - Output word packing, and the identity path that bypasses resizing
//! - Inline and threaded frame execution

pub mod config;
mod error;
pub mod pack;
pub mod passthrough;
pub mod pipeline;
pub mod select;
pub mod shifter;
pub mod source;
pub mod unpack;
pub mod window;

pub use config::{CONFIG_IN_WORDS, ConfigStage, config_response};
pub use error::{StreamError, StreamResult};
pub use pack::OutputPacker;
pub use passthrough::{InputGroups, Passthrough, passthrough};
pub use pipeline::{
    DEFAULT_CHANNEL_DEPTH, Execution, FrameOutput, PipelineOptions, ResizeChain, resize_chain,
    resize_frame,
};
pub use select::{ColumnSelector, SelectedGroup, column_range, row_selected};
pub use shifter::Shifter;
pub use source::{Items, IterSource, Source, drain, from_iter};
pub use unpack::PixelUnpacker;
pub use window::{LineWindow, Stencil, WindowInterpolator, interpolate};
