//! Stream format options
//!
//! The datapath has three word widths: the source word, the internal
//! processing unit and the output word. Each is a whole number of 8-bit
//! lanes between 1 and [`MAX_LANES`]. The default is the reference
//! layout: 128-bit source words, 16-pixel units, 32-bit output words.

use crate::error::{Error, Result};
use crate::lanes::{MAX_LANES, PIXEL_BITS};

/// Number of source rows held by the line window (bilinear: 2).
pub const WINDOW_SIZE: usize = 2;

/// Pixel counts of the three word widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamFormat {
    input_pixels: u32,
    output_pixels: u32,
    process_width: u32,
}

impl Default for StreamFormat {
    fn default() -> Self {
        Self {
            input_pixels: 16,
            output_pixels: 4,
            process_width: 16,
        }
    }
}

impl StreamFormat {
    /// Create a format, validating each width.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if any width is 0 or exceeds
    /// [`MAX_LANES`].
    pub fn new(input_pixels: u32, output_pixels: u32, process_width: u32) -> Result<Self> {
        check_lanes("input_pixels", input_pixels)?;
        check_lanes("output_pixels", output_pixels)?;
        check_lanes("process_width", process_width)?;
        Ok(Self {
            input_pixels,
            output_pixels,
            process_width,
        })
    }

    /// Same format with a different source word width.
    pub fn with_input_pixels(self, input_pixels: u32) -> Result<Self> {
        Self::new(input_pixels, self.output_pixels, self.process_width)
    }

    /// Same format with a different output word width.
    pub fn with_output_pixels(self, output_pixels: u32) -> Result<Self> {
        Self::new(self.input_pixels, output_pixels, self.process_width)
    }

    /// Same format with a different processing unit width.
    pub fn with_process_width(self, process_width: u32) -> Result<Self> {
        Self::new(self.input_pixels, self.output_pixels, process_width)
    }

    /// Pixels per source word.
    #[inline]
    pub fn input_pixels(&self) -> u32 {
        self.input_pixels
    }

    /// Pixels per output word.
    #[inline]
    pub fn output_pixels(&self) -> u32 {
        self.output_pixels
    }

    /// Pixels per processing unit.
    #[inline]
    pub fn process_width(&self) -> u32 {
        self.process_width
    }

    /// Source word width in bits.
    pub fn input_bits(&self) -> u32 {
        self.input_pixels * PIXEL_BITS
    }

    /// Output word width in bits.
    pub fn output_bits(&self) -> u32 {
        self.output_pixels * PIXEL_BITS
    }
}

fn check_lanes(name: &str, value: u32) -> Result<()> {
    if value == 0 || value > MAX_LANES {
        return Err(Error::InvalidFormat(format!(
            "{name} must be in 1..={MAX_LANES}, got {value}"
        )));
    }
    Ok(())
}
