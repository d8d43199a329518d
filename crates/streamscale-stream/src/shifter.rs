//! Remainder register for width conversion
//!
//! Word boundaries on either side of a stage rarely line up with unit or
//! row boundaries. A [`Shifter`] holds the pixels of the most recent input
//! that have not been consumed yet (the carry) together with the output
//! word being assembled. The owning stage alternates between two moves:
//!
//! - [`Shifter::fill`] drains the carry into the output word and hands the
//!   word back once it holds the requested number of pixels;
//! - [`Shifter::feed`] loads the next input into the empty carry.
//!
//! The unpacker uses it to cut source words into units, the packer to
//! glue selected groups into output words.

use streamscale_core::Lanes;

/// Carry register plus the partially assembled output word.
#[derive(Debug, Clone, Copy, Default)]
pub struct Shifter {
    carry: Lanes,
    carry_len: u32,
    word: Lanes,
    filled: u32,
}

impl Shifter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pixels waiting in the carry.
    #[inline]
    pub fn carry_len(&self) -> u32 {
        self.carry_len
    }

    /// Pixels already placed in the output word.
    #[inline]
    pub fn filled(&self) -> u32 {
        self.filled
    }

    /// Load `count` pixels from the low lanes of `input` into the carry.
    ///
    /// The carry must be empty: `fill` drains it before asking for more.
    pub fn feed(&mut self, input: Lanes, count: u32) {
        debug_assert_eq!(self.carry_len, 0, "feeding a non-empty carry");
        self.carry = input.low(count);
        self.carry_len = count;
    }

    /// Move carry pixels into the output word until it holds `target`.
    ///
    /// Returns the completed word (unused high lanes zero) or `None` when
    /// the carry ran dry first and the caller must `feed` more input.
    pub fn fill(&mut self, target: u32) -> Option<Lanes> {
        let take = self.carry_len.min(target.saturating_sub(self.filled));
        if take > 0 {
            self.word.insert(self.filled, self.carry, take);
            self.carry = self.carry.shift_down(take);
            self.carry_len -= take;
            self.filled += take;
        }
        if self.filled >= target {
            Some(self.take_word())
        } else {
            None
        }
    }

    /// Hand back a partially filled word together with its pixel count.
    pub fn flush(&mut self) -> Option<(Lanes, u32)> {
        if self.filled == 0 {
            return None;
        }
        let count = self.filled;
        Some((self.take_word(), count))
    }

    fn take_word(&mut self) -> Lanes {
        let word = self.word;
        self.word = Lanes::ZERO;
        self.filled = 0;
        word
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_from_single_feed() {
        let mut s = Shifter::new();
        s.feed(Lanes::from_pixels(&[1, 2, 3, 4, 5, 6]), 6);
        assert_eq!(s.fill(4).unwrap().to_pixels(4), vec![1, 2, 3, 4]);
        assert_eq!(s.carry_len(), 2);
        assert!(s.fill(4).is_none());
        assert_eq!(s.filled(), 2);
        s.feed(Lanes::from_pixels(&[7, 8, 9]), 3);
        assert_eq!(s.fill(4).unwrap().to_pixels(4), vec![5, 6, 7, 8]);
        assert_eq!(s.carry_len(), 1);
    }

    #[test]
    fn test_fill_zero_target_is_immediate() {
        let mut s = Shifter::new();
        assert_eq!(s.fill(0), Some(Lanes::ZERO));
    }

    #[test]
    fn test_variable_targets() {
        let mut s = Shifter::new();
        s.feed(Lanes::from_pixels(&[1, 2, 3, 4, 5]), 5);
        assert_eq!(s.fill(3).unwrap().to_pixels(3), vec![1, 2, 3]);
        assert_eq!(s.fill(1).unwrap().to_pixels(1), vec![4]);
        let w = s.fill(1).unwrap();
        assert_eq!(w.to_pixels(2), vec![5, 0]);
    }

    #[test]
    fn test_feed_masks_unused_lanes() {
        let mut s = Shifter::new();
        s.feed(Lanes::from_pixels(&[1, 2, 3, 4]), 2);
        assert!(s.fill(3).is_none());
        let (word, count) = s.flush().unwrap();
        assert_eq!(count, 2);
        assert_eq!(word.to_pixels(4), vec![1, 2, 0, 0]);
        assert!(s.flush().is_none());
    }

    #[test]
    fn test_narrow_inputs_into_wide_word() {
        let mut s = Shifter::new();
        let mut out = None;
        for chunk in [[1u8, 2, 3], [4, 5, 6], [7, 8, 9]] {
            s.feed(Lanes::from_pixels(&chunk), 3);
            out = s.fill(8);
            if out.is_some() {
                break;
            }
        }
        assert_eq!(out.unwrap().to_pixels(8), vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(s.carry_len(), 1);
    }
}
