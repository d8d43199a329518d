//! streamscale-core - Basic data structures for the streaming resizer
//!
//! This crate provides the types shared by every stage of the pipeline:
//!
//! - [`UFixed`] - Unsigned fixed-point values with hardware rounding rules
//! - [`Lanes`] - Up to 16 packed 8-bit pixels
//! - [`StreamWord`] - One beat of a transport stream with its `last` flag
//! - [`Geometry`] / [`ScaleFactor`] / [`DerivedGeometry`] / [`FrameContext`]
//! - [`StreamFormat`] - Word widths of the source, unit and output streams
//! - [`GrayImage`] - Whole-frame buffer used at the edges of the pipeline

pub mod error;
pub mod fixed;
pub mod format;
pub mod geometry;
pub mod image;
pub mod lanes;
pub mod word;

pub use error::{Error, Result};
pub use fixed::{IndexFixed, PixelFixed, ScaleFixed, UFixed, ceil_scaled};
pub use format::{StreamFormat, WINDOW_SIZE};
pub use geometry::{DerivedGeometry, FrameContext, Geometry, ScaleFactor};
pub use image::GrayImage;
pub use lanes::{Lanes, MAX_LANES, MAX_PIXEL_VAL, PIXEL_BITS, lane_mask};
pub use word::{ConfigWord, PixelWord, StreamWord};
