//! streamscale-io - File I/O and frame transport for streamscale
//!
//! This crate sits at the edges of the pipeline:
//!
//! - [`pnm`] - PGM graymap read (P5/P2) and write (P5)
//! - [`frame`] - Image to word stream conversion and single-frame resize

mod error;
pub mod frame;
pub mod pnm;

pub use error::{IoError, IoResult};
pub use frame::{config_words, pack_frame, resize_image, unpack_frame};
pub use pnm::{read_pgm, read_pgm_file, write_pgm, write_pgm_file, write_pgm_mem};
