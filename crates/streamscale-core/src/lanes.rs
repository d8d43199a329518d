//! Packed pixel lanes
//!
//! Every word that moves between stages (source words, unit words,
//! selected groups, output words) is a row of 8-bit lanes packed into a
//! `u128`. Lane `i` occupies bits `8*i .. 8*i + 8`, so the first pixel of
//! a word sits in the least significant byte.

/// Bits per pixel.
pub const PIXEL_BITS: u32 = 8;

/// Largest intensity a pixel can hold.
pub const MAX_PIXEL_VAL: u8 = u8::MAX;

/// Maximum number of lanes a word can carry.
pub const MAX_LANES: u32 = 128 / PIXEL_BITS;

/// Up to [`MAX_LANES`] pixels packed into one word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Lanes(pub u128);

/// Mask covering the low `count` lanes.
#[inline]
pub const fn lane_mask(count: u32) -> u128 {
    if count >= MAX_LANES {
        u128::MAX
    } else {
        (1u128 << (count * PIXEL_BITS)) - 1
    }
}

impl Lanes {
    /// All lanes zero.
    pub const ZERO: Self = Self(0);

    /// Pack `pixels` into the low lanes.
    ///
    /// # Panics
    ///
    /// Panics if more than [`MAX_LANES`] pixels are given.
    pub fn from_pixels(pixels: &[u8]) -> Self {
        assert!(
            pixels.len() <= MAX_LANES as usize,
            "{} pixels do not fit in one word",
            pixels.len()
        );
        let data = pixels
            .iter()
            .rev()
            .fold(0u128, |acc, &p| (acc << PIXEL_BITS) | u128::from(p));
        Self(data)
    }

    /// Pixel in lane `index`.
    #[inline]
    pub fn get(self, index: u32) -> u8 {
        debug_assert!(index < MAX_LANES);
        (self.0 >> (index * PIXEL_BITS)) as u8
    }

    /// Overwrite lane `index`.
    #[inline]
    pub fn set(&mut self, index: u32, value: u8) {
        debug_assert!(index < MAX_LANES);
        let shift = index * PIXEL_BITS;
        self.0 = (self.0 & !(0xFFu128 << shift)) | (u128::from(value) << shift);
    }

    /// Keep only the low `count` lanes.
    #[inline]
    pub fn low(self, count: u32) -> Self {
        Self(self.0 & lane_mask(count))
    }

    /// Drop the low `count` lanes, moving the rest down.
    #[inline]
    pub fn shift_down(self, count: u32) -> Self {
        if count >= MAX_LANES {
            Self::ZERO
        } else {
            Self(self.0 >> (count * PIXEL_BITS))
        }
    }

    /// Place the low `count` lanes of `other` starting at lane `at`.
    ///
    /// Lanes at or above `at + count` are left untouched; lanes that would
    /// land past the end of the word are discarded.
    #[inline]
    pub fn insert(&mut self, at: u32, other: Lanes, count: u32) {
        if at >= MAX_LANES || count == 0 {
            return;
        }
        let field = lane_mask(count) << (at * PIXEL_BITS);
        self.0 = (self.0 & !field) | ((other.low(count).0 << (at * PIXEL_BITS)) & field);
    }

    /// The low `count` lanes as a vector.
    pub fn to_pixels(self, count: u32) -> Vec<u8> {
        (0..count.min(MAX_LANES)).map(|i| self.get(i)).collect()
    }
}

impl From<u128> for Lanes {
    fn from(data: u128) -> Self {
        Self(data)
    }
}

impl From<Lanes> for u128 {
    fn from(lanes: Lanes) -> Self {
        lanes.0
    }
}
