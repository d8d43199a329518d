//! 8-bit grayscale frame buffer
//!
//! The datapath never holds a whole frame; `GrayImage` exists for the
//! edges: building source streams, decoding output streams, file I/O and
//! reference comparisons in tests.

use crate::error::{Error, Result};
use crate::geometry::Geometry;

/// Row-major 8 bpp image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl GrayImage {
    /// Create a black image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let len = (width as usize) * (height as usize);
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Wrap an existing row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] for zero dimensions and
    /// [`Error::BufferSize`] if `data` has the wrong length.
    pub fn from_vec(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = (width as usize) * (height as usize);
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create an image whose pixels are `f(x, y)`.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> u8) -> Result<Self> {
        let mut image = Self::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                image.data[(y as usize) * (width as usize) + (x as usize)] = f(x, y);
            }
        }
        Ok(image)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.width, self.height)
    }

    /// Pixel at (x, y), or `None` outside the image.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[self.offset(x, y)])
    }

    /// Pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn get_unchecked(&self, x: u32, y: u32) -> u8 {
        self.data[self.offset(x, y)]
    }

    /// Set the pixel at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the coordinates are out of
    /// bounds.
    pub fn set(&mut self, x: u32, y: u32, value: u8) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::InvalidParameter(format!(
                "pixel ({x}, {y}) outside {}x{}",
                self.width, self.height
            )));
        }
        let offset = self.offset(x, y);
        self.data[offset] = value;
        Ok(())
    }

    /// One row of pixels.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = (y as usize) * (self.width as usize);
        &self.data[start..start + self.width as usize]
    }

    /// All pixels, row-major.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }
}
