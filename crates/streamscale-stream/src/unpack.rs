//! Source word unpacker
//!
//! Cuts the contiguous row-major source stream into processing units:
//! `unit_count` units per row, every unit `process_width` pixels wide
//! except the last of each row, which carries the row remainder. Row and
//! unit boundaries fall anywhere inside a source word; the leftover pixels
//! of a word wait in the [`Shifter`] carry for the next unit.

use crate::shifter::Shifter;
use crate::source::{Source, require};
use crate::StreamResult;
use log::{debug, warn};
use streamscale_core::{FrameContext, Lanes, PixelWord};

const STAGE: &str = "unpack";

/// Emits `height * unit_count` unit words in row-major order.
pub struct PixelUnpacker<S> {
    upstream: S,
    ctx: FrameContext,
    shifter: Shifter,
    row: u32,
    unit: u32,
    words_read: u64,
}

impl<S> PixelUnpacker<S>
where
    S: Source<Item = PixelWord>,
{
    pub fn new(upstream: S, ctx: &FrameContext) -> Self {
        debug!(
            "{STAGE}: {} rows x {} units, {} source words",
            ctx.geometry.height,
            ctx.derived.unit_count,
            ctx.source_words()
        );
        Self {
            upstream,
            ctx: *ctx,
            shifter: Shifter::new(),
            row: 0,
            unit: 0,
            words_read: 0,
        }
    }

    /// Source words consumed so far.
    pub fn words_read(&self) -> u64 {
        self.words_read
    }

    fn next_unit(&mut self) -> StreamResult<Lanes> {
        let demand = self.ctx.unit_pixels(self.unit);
        loop {
            if let Some(unit) = self.shifter.fill(demand) {
                return Ok(unit);
            }
            let word = require(&mut self.upstream, STAGE)?;
            self.words_read += 1;
            self.check_marker(&word);
            self.shifter
                .feed(word.lanes(), self.ctx.format.input_pixels());
        }
    }

    fn check_marker(&self, word: &PixelWord) {
        let expected = self.ctx.source_words();
        if self.words_read == expected && !word.last {
            warn!("{STAGE}: final source word {expected} has no terminal marker");
        } else if self.words_read < expected && word.last {
            warn!(
                "{STAGE}: terminal marker on word {} of {expected}",
                self.words_read
            );
        }
    }
}

impl<S> Source for PixelUnpacker<S>
where
    S: Source<Item = PixelWord>,
{
    type Item = Lanes;

    fn read(&mut self) -> StreamResult<Option<Lanes>> {
        if self.row >= self.ctx.geometry.height || self.ctx.derived.unit_count == 0 {
            return Ok(None);
        }
        let unit = self.next_unit()?;
        self.unit += 1;
        if self.unit == self.ctx.derived.unit_count {
            self.unit = 0;
            self.row += 1;
        }
        Ok(Some(unit))
    }
}
