//! Frame pipeline
//!
//! [`resize_frame`] runs one frame end to end: it reads the configuration
//! burst, answers it, and then streams the pixels either through the
//! identity path or through the four resize stages. The stages can be
//! driven two ways with identical results:
//!
//! - [`Execution::Inline`]: the stages are nested inside each other and
//!   the calling thread pulls from the outermost one.
//! - [`Execution::Threaded`]: every stage runs on its own scoped thread
//!   and hands its output to the next through a bounded channel.

use crate::config::{ConfigStage, config_response};
use crate::pack::OutputPacker;
use crate::passthrough::{InputGroups, passthrough};
use crate::select::ColumnSelector;
use crate::source::{Source, drain};
use crate::unpack::PixelUnpacker;
use crate::window::WindowInterpolator;
use crate::{StreamError, StreamResult};
use crossbeam_channel::{Sender, bounded};
use log::debug;
use std::thread::{self, ScopedJoinHandle};
use streamscale_core::{ConfigWord, FrameContext, PixelWord, StreamFormat};

/// Default capacity of the channels between threaded stages.
pub const DEFAULT_CHANNEL_DEPTH: usize = 2;

// ============================================================================
// Options
// ============================================================================

/// How the stages of a frame are driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Execution {
    /// Nested pull chain on the calling thread
    #[default]
    Inline,
    /// One scoped thread per stage, bounded channels in between
    Threaded,
}

/// Pipeline execution options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub execution: Execution,
    /// Capacity of each inter-stage channel (threaded execution only)
    pub channel_depth: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            execution: Execution::Inline,
            channel_depth: DEFAULT_CHANNEL_DEPTH,
        }
    }
}

impl PipelineOptions {
    /// Threaded execution with the default channel depth.
    pub fn threaded() -> Self {
        Self {
            execution: Execution::Threaded,
            ..Self::default()
        }
    }

    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Set the channel depth; a depth of zero is raised to one.
    pub fn with_channel_depth(mut self, depth: usize) -> Self {
        self.channel_depth = depth.max(1);
        self
    }
}

// ============================================================================
// Frame
// ============================================================================

/// Everything one frame produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameOutput {
    /// Derived frame geometry
    pub context: FrameContext,
    /// Outbound configuration burst `[new_width, new_height]`
    pub config: [ConfigWord; 2],
    /// Output pixel words; the last one carries the terminal marker
    pub pixels: Vec<PixelWord>,
}

/// The four resize stages nested into one pull chain.
pub type ResizeChain<S> = OutputPacker<ColumnSelector<WindowInterpolator<PixelUnpacker<S>>>>;

/// Build the inline resize chain for one frame.
pub fn resize_chain<S>(pixels: S, ctx: &FrameContext) -> ResizeChain<S>
where
    S: Source<Item = PixelWord>,
{
    let units = PixelUnpacker::new(pixels, ctx);
    let rows = WindowInterpolator::new(units, ctx);
    let groups = ColumnSelector::new(rows, ctx);
    OutputPacker::for_frame(groups, ctx)
}

/// Process one frame.
///
/// Reads the 4-word configuration burst from `config`, then exactly the
/// frame's source words from `pixels`. Both sources are left positioned at
/// the start of the next frame.
///
/// # Arguments
///
/// * `config` - Inbound configuration words
/// * `pixels` - Source pixel words, `format.input_pixels()` pixels each
/// * `format` - Word widths of the pipeline
/// * `options` - How the stages are driven
///
/// # Errors
///
/// Returns [`StreamError::UnexpectedEndOfStream`] naming the first stage
/// that ran out of input, or [`StreamError::StagePanicked`] if a stage
/// thread panicked.
pub fn resize_frame<C, P>(
    config: &mut C,
    pixels: &mut P,
    format: StreamFormat,
    options: &PipelineOptions,
) -> StreamResult<FrameOutput>
where
    C: Source<Item = ConfigWord> + ?Sized,
    P: Source<Item = PixelWord> + Send,
{
    let ctx = ConfigStage::new(format).read_frame(config)?;
    let identity = ctx.scale.is_identity();
    debug!(
        "pipeline: {}x{} -> {}x{}, {:?}{}",
        ctx.geometry.width,
        ctx.geometry.height,
        ctx.derived.new_width,
        ctx.derived.new_height,
        options.execution,
        if identity { ", identity" } else { "" }
    );

    let words = match (options.execution, identity) {
        (Execution::Inline, true) => drain(passthrough(pixels, &ctx))?,
        (Execution::Inline, false) => drain(resize_chain(pixels, &ctx))?,
        (Execution::Threaded, true) => run_identity_threaded(pixels, &ctx, options.channel_depth)?,
        (Execution::Threaded, false) => run_threaded(pixels, &ctx, options.channel_depth)?,
    };

    Ok(FrameOutput {
        context: ctx,
        config: config_response(&ctx),
        pixels: words,
    })
}

// ============================================================================
// Threaded execution
// ============================================================================

/// Run `stage` to its end, forwarding every item downstream.
fn pump<S>(mut stage: S, tx: Sender<S::Item>, name: &'static str) -> StreamResult<()>
where
    S: Source,
{
    while let Some(item) = stage.read()? {
        tx.send(item)
            .map_err(|_| StreamError::ChannelClosed { stage: name })?;
    }
    Ok(())
}

fn join(handle: ScopedJoinHandle<'_, StreamResult<()>>, name: &'static str) -> StreamResult<()> {
    handle
        .join()
        .unwrap_or(Err(StreamError::StagePanicked { stage: name }))
}

/// Pick the error that explains the others.
///
/// Results are in stream order. A closed channel is the echo of a failure
/// further downstream and an early end of stream the echo of one further
/// upstream, so the first error that is not a closed channel is the cause.
fn first_cause(results: Vec<StreamResult<()>>) -> StreamResult<()> {
    let errors: Vec<StreamError> = results.into_iter().filter_map(Result::err).collect();
    let cause = errors
        .iter()
        .position(|e| !matches!(e, StreamError::ChannelClosed { .. }))
        .unwrap_or(0);
    match errors.into_iter().nth(cause) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn run_threaded<P>(pixels: &mut P, ctx: &FrameContext, depth: usize) -> StreamResult<Vec<PixelWord>>
where
    P: Source<Item = PixelWord> + Send,
{
    thread::scope(|s| {
        let (unit_tx, unit_rx) = bounded(depth);
        let (row_tx, row_rx) = bounded(depth);
        let (group_tx, group_rx) = bounded(depth);

        let unpack = s.spawn(move || pump(PixelUnpacker::new(pixels, ctx), unit_tx, "unpack"));
        let interpolate =
            s.spawn(move || pump(WindowInterpolator::new(unit_rx, ctx), row_tx, "interpolate"));
        let select = s.spawn(move || pump(ColumnSelector::new(row_rx, ctx), group_tx, "select"));

        let packed = drain(OutputPacker::for_frame(group_rx, ctx));

        let stages = vec![
            join(unpack, "unpack"),
            join(interpolate, "interpolate"),
            join(select, "select"),
            packed.as_ref().map(|_| ()).map_err(|e| e.clone()),
        ];
        first_cause(stages)?;
        packed
    })
}

fn run_identity_threaded<P>(
    pixels: &mut P,
    ctx: &FrameContext,
    depth: usize,
) -> StreamResult<Vec<PixelWord>>
where
    P: Source<Item = PixelWord> + Send,
{
    thread::scope(|s| {
        let (group_tx, group_rx) = bounded(depth);
        let groups = s.spawn(move || pump(InputGroups::new(pixels, ctx), group_tx, "passthrough"));
        let packer: OutputPacker<_> = OutputPacker::new(
            group_rx,
            ctx.geometry.pixels(),
            ctx.format.output_pixels(),
        );
        let packed = drain(packer);
        first_cause(vec![
            join(groups, "passthrough"),
            packed.as_ref().map(|_| ()).map_err(|e| e.clone()),
        ])?;
        packed
    })
}
