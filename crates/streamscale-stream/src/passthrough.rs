//! Identity path
//!
//! With a scale of exactly one the frame bypasses the unpack, interpolate
//! and select stages: every source word becomes a pixel group and goes
//! straight to the [`OutputPacker`], re-cut to the output word width.

use crate::pack::OutputPacker;
use crate::select::SelectedGroup;
use crate::source::{Source, require};
use crate::StreamResult;
use log::warn;
use streamscale_core::{FrameContext, PixelWord};

const STAGE: &str = "passthrough";

/// Source words of one frame as pixel groups.
///
/// Reads exactly `ceil(width * height / input_pixels)` words. Every group
/// carries `input_pixels` pixels except the last, which carries the
/// remainder (a full word when the frame divides evenly).
pub struct InputGroups<S> {
    upstream: S,
    total: u64,
    input_pixels: u32,
    words: u64,
    read: u64,
}

impl<S> InputGroups<S>
where
    S: Source<Item = PixelWord>,
{
    pub fn new(upstream: S, ctx: &FrameContext) -> Self {
        Self {
            upstream,
            total: ctx.geometry.pixels(),
            input_pixels: ctx.format.input_pixels(),
            words: ctx.source_words(),
            read: 0,
        }
    }
}

impl<S> Source for InputGroups<S>
where
    S: Source<Item = PixelWord>,
{
    type Item = SelectedGroup;

    fn read(&mut self) -> StreamResult<Option<SelectedGroup>> {
        if self.read == self.words {
            return Ok(None);
        }
        let word = require(&mut self.upstream, STAGE)?;
        self.read += 1;
        let count = if self.read == self.words {
            if !word.last {
                warn!("{STAGE}: final source word {} has no terminal marker", self.read);
            }
            self.total - u64::from(self.input_pixels) * (self.words - 1)
        } else {
            u64::from(self.input_pixels)
        };
        Ok(Some(SelectedGroup::new(word.lanes(), count as u32)))
    }
}

/// The complete identity path: source words in, output words out.
pub type Passthrough<S> = OutputPacker<InputGroups<S>>;

/// Build the identity path for the frame described by `ctx`.
pub fn passthrough<S>(upstream: S, ctx: &FrameContext) -> Passthrough<S>
where
    S: Source<Item = PixelWord>,
{
    OutputPacker::new(
        InputGroups::new(upstream, ctx),
        ctx.geometry.pixels(),
        ctx.format.output_pixels(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{drain, from_iter};
    use streamscale_core::{Geometry, Lanes, ScaleFactor, StreamFormat};

    fn ctx(w: u32, h: u32, format: StreamFormat) -> FrameContext {
        FrameContext::new(Geometry::new(w, h), ScaleFactor::IDENTITY, format)
    }

    fn source(pixels: &[u8], per_word: usize) -> Vec<PixelWord> {
        let n = pixels.len().div_ceil(per_word);
        pixels
            .chunks(per_word)
            .enumerate()
            .map(|(i, c)| PixelWord::from_lanes(Lanes::from_pixels(c), i + 1 == n))
            .collect()
    }

    fn unpack(words: &[PixelWord], per_word: u32) -> Vec<u8> {
        words
            .iter()
            .flat_map(|w| w.lanes().to_pixels(per_word))
            .collect()
    }

    #[test]
    fn test_last_group_carries_remainder() {
        let c = ctx(5, 5, StreamFormat::default());
        let pixels: Vec<u8> = (0..25).collect();
        let groups = drain(InputGroups::new(from_iter(source(&pixels, 16)), &c)).unwrap();
        let counts: Vec<u32> = groups.iter().map(|g| g.count).collect();
        assert_eq!(counts, vec![16, 9]);
    }

    #[test]
    fn test_exact_multiple_is_full() {
        let c = ctx(8, 4, StreamFormat::default());
        let groups = drain(InputGroups::new(from_iter(source(&[3; 32], 16)), &c)).unwrap();
        let counts: Vec<u32> = groups.iter().map(|g| g.count).collect();
        assert_eq!(counts, vec![16, 16]);
    }

    #[test]
    fn test_identity_rewraps_words() {
        let c = ctx(7, 3, StreamFormat::default());
        let pixels: Vec<u8> = (100..121).collect();
        let words = drain(passthrough(from_iter(source(&pixels, 16)), &c)).unwrap();
        assert_eq!(words.len(), 6);
        assert_eq!(&unpack(&words, 4)[..21], &pixels[..]);
        assert_eq!(words.iter().filter(|w| w.last).count(), 1);
        assert!(words[5].last);
    }

    #[test]
    fn test_identity_odd_formats() {
        let format = StreamFormat::new(5, 3, 16).unwrap();
        let c = ctx(11, 2, format);
        let pixels: Vec<u8> = (1..=22).collect();
        let words = drain(passthrough(from_iter(source(&pixels, 5)), &c)).unwrap();
        assert_eq!(words.len(), 8);
        assert_eq!(&unpack(&words, 3)[..22], &pixels[..]);
        assert!(words[7].last);
        assert_eq!(words[7].lanes().to_pixels(3), vec![22, 0, 0]);
    }
}
