//! Frame geometry
//!
//! A frame is described by its source [`Geometry`] and a [`ScaleFactor`].
//! Everything else the stages need ([`DerivedGeometry`]) is computed once
//! per frame and bundled into a read-only [`FrameContext`] that each stage
//! receives at construction.
//!
//! # Scale convention
//!
//! `scale` is the distance in source pixels between two output samples,
//! so `scale >= 1` downscales and `scale == 1` is the identity.
//! `inv_scale` is its reciprocal. Both are Q2.14 values supplied by the
//! caller. `inv_scale` must not exceed `1 / scale`.
//!
//! The reciprocal only seeds the output index search:
//! [`ScaleFactor::first_output`] settles every index against `scale` so
//! that each output sample lands on exactly one source row pair and one
//! source column.

use crate::error::{Error, Result};
use crate::fixed::{IndexFixed, ScaleFixed, ceil_scaled};
use crate::format::StreamFormat;

/// Source image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels in the frame.
    pub fn pixels(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Sampling step and its reciprocal, both Q2.14.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScaleFactor {
    scale: ScaleFixed,
    inv_scale: ScaleFixed,
}

impl ScaleFactor {
    /// The 1:1 scale.
    pub const IDENTITY: Self = Self {
        scale: ScaleFixed::ONE,
        inv_scale: ScaleFixed::ONE,
    };

    /// Build from the low 16 bits of the two configuration words.
    ///
    /// `inv_scale` must be at most `1 / scale`, i.e. at most
    /// `floor(2^28 / scale)` in raw terms, as [`ScaleFactor::from_step`]
    /// produces. A larger reciprocal still yields correct sample indices
    /// but costs an extra correction step per lookup.
    pub fn from_raw(scale: u16, inv_scale: u16) -> Self {
        Self {
            scale: ScaleFixed::from_raw(u64::from(scale)),
            inv_scale: ScaleFixed::from_raw(u64::from(inv_scale)),
        }
    }

    /// Build a consistent pair from a real sampling step.
    ///
    /// `step` is rounded to the nearest Q2.14 value and the reciprocal is
    /// taken from that quantized step, rounded down.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] unless `1.0 <= step < 4.0` and
    /// the quantized step still fits Q2.14.
    pub fn from_step(step: f64) -> Result<Self> {
        let scale = ScaleFixed::from_f64(step);
        if !(1.0..4.0).contains(&step) || scale < ScaleFixed::ONE {
            return Err(Error::InvalidParameter(format!(
                "scale step must be in [1, 4), got {step}"
            )));
        }
        let one = 1u64 << (2 * ScaleFixed::FRAC_BITS);
        Ok(Self {
            scale,
            inv_scale: ScaleFixed::from_raw(one / scale.raw()),
        })
    }

    /// Source pixels per output pixel.
    #[inline]
    pub fn scale(&self) -> ScaleFixed {
        self.scale
    }

    /// Output pixels per source pixel.
    #[inline]
    pub fn inv_scale(&self) -> ScaleFixed {
        self.inv_scale
    }

    /// True for the pass-through case.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.scale == ScaleFixed::ONE
    }

    /// Source coordinate `output * scale` of an output sample, truncated to
    /// coordinate precision.
    #[inline]
    pub fn position(&self, output: u64) -> IndexFixed {
        IndexFixed::from_int(output).mul(self.scale)
    }

    /// Smallest output index whose [`position`](Self::position) is at or
    /// after source index `index`.
    ///
    /// `ceil(index * inv_scale)` gives the first guess; a quantized
    /// reciprocal can be off by one either way, so the guess is moved until
    /// it brackets `index`.
    pub fn first_output(&self, index: u64) -> u64 {
        let mut output = ceil_scaled(index, self.inv_scale);
        if self.scale == ScaleFixed::ZERO {
            return output;
        }
        let target = IndexFixed::from_int(index);
        while self.position(output) < target {
            output += 1;
        }
        while output > 0 && self.position(output - 1) >= target {
            output -= 1;
        }
        output
    }

    /// Raw Q2.14 bit patterns `(scale, inv_scale)`.
    pub fn to_raw(&self) -> (u16, u16) {
        (self.scale.raw() as u16, self.inv_scale.raw() as u16)
    }
}

/// Geometry computed once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivedGeometry {
    pub new_width: u32,
    pub new_height: u32,
    /// Processing units per source row
    pub unit_count: u32,
}

impl DerivedGeometry {
    /// `floor(width/scale)`, `floor(height/scale)`, `ceil(width/process_width)`.
    ///
    /// All three go through the coordinate fixed-point format, so widths
    /// and heights are limited to 16 bits.
    ///
    /// # Panics
    ///
    /// Panics if `scale` is zero.
    pub fn derive(geometry: Geometry, scale: ScaleFactor, format: &StreamFormat) -> Self {
        let new_width = IndexFixed::div_int(u64::from(geometry.width), scale.scale())
            .floor()
            .to_int();
        let new_height = IndexFixed::div_int(u64::from(geometry.height), scale.scale())
            .floor()
            .to_int();
        let unit_count = IndexFixed::from_int(u64::from(geometry.width))
            .div_by(u64::from(format.process_width()))
            .ceil()
            .to_int();
        Self {
            new_width: new_width as u32,
            new_height: new_height as u32,
            unit_count: unit_count as u32,
        }
    }

    /// Number of pixels in the resized frame.
    pub fn output_pixels(&self) -> u64 {
        u64::from(self.new_width) * u64::from(self.new_height)
    }
}

/// Everything a stage needs to know about the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameContext {
    pub geometry: Geometry,
    pub scale: ScaleFactor,
    pub derived: DerivedGeometry,
    pub format: StreamFormat,
}

impl FrameContext {
    /// Derive the frame context.
    ///
    /// Zero width or height, or a scale pair that is not mutually
    /// consistent, are caller contract violations: the stages still run
    /// to completion but the output is unspecified.
    pub fn new(geometry: Geometry, scale: ScaleFactor, format: StreamFormat) -> Self {
        let derived = DerivedGeometry::derive(geometry, scale, &format);
        Self {
            geometry,
            scale,
            derived,
            format,
        }
    }

    /// Valid pixels in unit `unit` of a row.
    ///
    /// Every unit is full except the last, which carries
    /// `width - process_width * (unit_count - 1)` pixels. A width that is
    /// an exact multiple of the unit width yields a full last unit.
    pub fn unit_pixels(&self, unit: u32) -> u32 {
        let p = self.format.process_width();
        if unit + 1 == self.derived.unit_count {
            self.geometry.width - p * (self.derived.unit_count - 1)
        } else {
            p
        }
    }

    /// Row length in the line window, padded to whole units.
    pub fn padded_row_pixels(&self) -> usize {
        self.derived.unit_count as usize * self.format.process_width() as usize
    }

    /// Source words in one frame: `ceil(width * height / input_pixels)`.
    pub fn source_words(&self) -> u64 {
        self.geometry
            .pixels()
            .div_ceil(u64::from(self.format.input_pixels()))
    }

    /// Unit words the unpacker emits per frame.
    pub fn unit_words(&self) -> u64 {
        u64::from(self.geometry.height) * u64::from(self.derived.unit_count)
    }
}
