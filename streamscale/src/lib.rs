//! streamscale - Fixed-point streaming bilinear image downscaler
//!
//! A word-stream resizer for 8-bit grayscale frames. A frame enters as a
//! 4-word configuration burst and a stream of packed source words, and
//! leaves as a 2-word geometry burst and a stream of packed output words.
//! All arithmetic is unsigned fixed point with hardware rounding rules, so
//! results are bit-exact across runs and executors.
//!
//! # Overview
//!
//! - [`stream`] - The resize stages and the inline/threaded executors
//! - [`io`] - PGM files and image/word-stream conversion
//! - Core types ([`UFixed`], [`FrameContext`], [`StreamFormat`], ...) are
//!   re-exported at the crate root
//!
//! # Example
//!
//! ```
//! use streamscale::{GrayImage, ScaleFactor, StreamFormat};
//! use streamscale::io::resize_image;
//! use streamscale::stream::PipelineOptions;
//!
//! let src = GrayImage::from_fn(64, 48, |x, y| (x + y) as u8).unwrap();
//! let out = resize_image(
//!     &src,
//!     ScaleFactor::from_step(2.0).unwrap(),
//!     StreamFormat::default(),
//!     &PipelineOptions::default(),
//! )
//! .unwrap();
//! assert_eq!((out.width(), out.height()), (32, 24));
//! ```

// Re-export core types (primary data structures used everywhere)
pub use streamscale_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use streamscale_io as io;
pub use streamscale_stream as stream;
