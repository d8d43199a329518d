//! Configuration stage
//!
//! Consumes the 4-word configuration burst of a frame
//! (`[width, height, scale_q14, inv_scale_q14]`), derives the frame
//! geometry, and answers with the 2-word burst `[new_width, new_height]`.
//! The resulting [`FrameContext`] is what every later stage is built from;
//! a new frame always starts with a new configuration pass.

use crate::source::{Source, require};
use crate::StreamResult;
use log::debug;
use streamscale_core::{ConfigWord, FrameContext, Geometry, ScaleFactor, StreamFormat};

const STAGE: &str = "config";

/// Words in the inbound configuration burst.
pub const CONFIG_IN_WORDS: usize = 4;

/// Derives the per-frame context from the configuration stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigStage {
    format: StreamFormat,
}

impl ConfigStage {
    pub fn new(format: StreamFormat) -> Self {
        Self { format }
    }

    /// Read one configuration burst and derive the frame context.
    ///
    /// Only the low 16 bits of the two scale words are used. The `last`
    /// flags of the inbound burst are not checked.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StreamError::UnexpectedEndOfStream`] if the
    /// burst has fewer than four words.
    pub fn read_frame<S>(&self, config: &mut S) -> StreamResult<FrameContext>
    where
        S: Source<Item = ConfigWord> + ?Sized,
    {
        let mut words = [0u32; CONFIG_IN_WORDS];
        for word in &mut words {
            *word = require(config, STAGE)?.data;
        }
        Ok(self.decode(words))
    }

    /// Derive the frame context from raw burst words.
    pub fn decode(&self, words: [u32; CONFIG_IN_WORDS]) -> FrameContext {
        let [width, height, scale, inv_scale] = words;
        let ctx = FrameContext::new(
            Geometry::new(width, height),
            ScaleFactor::from_raw(scale as u16, inv_scale as u16),
            self.format,
        );
        debug!(
            "{STAGE}: {}x{} step {} -> {}x{}, {} units/row",
            width,
            height,
            ctx.scale.scale(),
            ctx.derived.new_width,
            ctx.derived.new_height,
            ctx.derived.unit_count
        );
        ctx
    }
}

/// The outbound burst: new width, then new height with `last` set.
pub fn config_response(ctx: &FrameContext) -> [ConfigWord; 2] {
    [
        ConfigWord::new(ctx.derived.new_width),
        ConfigWord::last(ctx.derived.new_height),
    ]
}
