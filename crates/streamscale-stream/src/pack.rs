//! Output word packer
//!
//! Glues variable-size pixel groups into fixed-width output words. A word
//! is emitted as soon as it is full; the word that completes the frame
//! carries the terminal marker. If the groups run out while a word is only
//! partly filled, that word is flushed with the marker set and its unused
//! lanes zero.

use crate::select::SelectedGroup;
use crate::shifter::Shifter;
use crate::source::Source;
use crate::StreamResult;
use log::{debug, warn};
use streamscale_core::{FrameContext, Lanes, PixelWord};

const STAGE: &str = "pack";

/// Packs groups into `output_pixels`-wide words.
pub struct OutputPacker<S> {
    upstream: S,
    total: u64,
    consumed: u64,
    output_pixels: u32,
    shifter: Shifter,
    words: u64,
    terminated: bool,
    exhausted: bool,
}

impl<S> OutputPacker<S>
where
    S: Source<Item = SelectedGroup>,
{
    /// A packer expecting `total` pixels in all.
    pub fn new(upstream: S, total: u64, output_pixels: u32) -> Self {
        debug!("{STAGE}: {total} pixels into {output_pixels}-pixel words");
        Self {
            upstream,
            total,
            consumed: 0,
            output_pixels,
            shifter: Shifter::new(),
            words: 0,
            terminated: false,
            exhausted: false,
        }
    }

    /// A packer for the resized frame described by `ctx`.
    pub fn for_frame(upstream: S, ctx: &FrameContext) -> Self {
        Self::new(
            upstream,
            ctx.derived.output_pixels(),
            ctx.format.output_pixels(),
        )
    }

    /// Words emitted so far.
    pub fn words(&self) -> u64 {
        self.words
    }

    fn emit(&mut self, lanes: Lanes, last: bool) -> PixelWord {
        if self.terminated {
            warn!(
                "{STAGE}: word {} follows the terminal word ({} of {} pixels)",
                self.words, self.consumed, self.total
            );
        }
        self.terminated |= last;
        self.words += 1;
        PixelWord::from_lanes(lanes, last)
    }
}

impl<S> Source for OutputPacker<S>
where
    S: Source<Item = SelectedGroup>,
{
    type Item = PixelWord;

    fn read(&mut self) -> StreamResult<Option<PixelWord>> {
        if self.exhausted {
            return Ok(None);
        }
        loop {
            if let Some(lanes) = self.shifter.fill(self.output_pixels) {
                let last = self.consumed == self.total && self.shifter.carry_len() == 0;
                return Ok(Some(self.emit(lanes, last)));
            }
            match self.upstream.read()? {
                Some(group) => {
                    self.consumed += u64::from(group.count);
                    self.shifter.feed(group.pixels, group.count);
                }
                None => {
                    self.exhausted = true;
                    debug!("{STAGE}: {} words for {} pixels", self.words, self.consumed);
                    return Ok(self
                        .shifter
                        .flush()
                        .map(|(lanes, _)| self.emit(lanes, true)));
                }
            }
        }
    }
}
