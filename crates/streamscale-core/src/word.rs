//! Transport words
//!
//! A [`StreamWord`] is one beat of a back-pressured word stream: a data
//! payload plus the `last` flag that marks the end of a burst. For the
//! configuration streams the flag closes the burst; for pixel streams it
//! is the terminal marker, the only end-of-frame signal.

use crate::lanes::Lanes;

/// One transport beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StreamWord<T> {
    /// Payload
    pub data: T,
    /// Burst / frame terminator
    pub last: bool,
}

/// 32-bit configuration word.
pub type ConfigWord = StreamWord<u32>;

/// Pixel word carrying up to 16 lanes.
pub type PixelWord = StreamWord<u128>;

impl<T> StreamWord<T> {
    /// A word that does not end the burst.
    #[inline]
    pub fn new(data: T) -> Self {
        Self { data, last: false }
    }

    /// The final word of a burst.
    #[inline]
    pub fn last(data: T) -> Self {
        Self { data, last: true }
    }
}

impl PixelWord {
    /// The payload viewed as pixel lanes.
    #[inline]
    pub fn lanes(&self) -> Lanes {
        Lanes(self.data)
    }

    /// Build a pixel word from lanes.
    #[inline]
    pub fn from_lanes(lanes: Lanes, last: bool) -> Self {
        Self {
            data: lanes.0,
            last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_marker() {
        assert!(!ConfigWord::new(5).last);
        assert!(ConfigWord::last(5).last);
    }

    #[test]
    fn test_pixel_word_lanes() {
        let w = PixelWord::from_lanes(Lanes::from_pixels(&[1, 2, 3, 4]), true);
        assert_eq!(w.lanes().to_pixels(4), vec![1, 2, 3, 4]);
        assert!(w.last);
    }
}
