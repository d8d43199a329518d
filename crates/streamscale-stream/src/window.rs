//! Line window and bilinear interpolation
//!
//! The interpolator keeps the last [`WINDOW_SIZE`] source rows in a
//! [`LineWindow`] and slides a two-row [`Stencil`] along them one unit at
//! a time. For every source column it emits the value the output grid
//! would take if an output column landed just left of it, at full source
//! resolution; the [`ColumnSelector`](crate::select::ColumnSelector)
//! later keeps only the columns and rows that correspond to real output
//! samples.

use crate::source::{Source, require};
use crate::StreamResult;
use log::{debug, trace};
use streamscale_core::{
    FrameContext, IndexFixed, Lanes, MAX_LANES, MAX_PIXEL_VAL, PixelFixed, WINDOW_SIZE,
};

const STAGE: &str = "interpolate";

/// Width of a stencil row: the look-behind lane plus a full unit.
const STENCIL_LANES: usize = MAX_LANES as usize + 1;

/// One coordinate unit in `IndexFixed` raw form.
const INDEX_ONE: i64 = IndexFixed::ONE.raw() as i64;

// ============================================================================
// LineWindow
// ============================================================================

/// Ring of the most recent source rows.
///
/// Rows are never moved: `order[0]` names the slot holding the oldest row,
/// `order[WINDOW_SIZE - 1]` the slot the incoming row is written to.
/// Advancing to the next row rotates `order` instead of copying rows.
#[derive(Debug, Clone)]
pub struct LineWindow {
    rows: [Vec<u8>; WINDOW_SIZE],
    order: [usize; WINDOW_SIZE],
}

impl LineWindow {
    /// A window of zeroed rows, `row_len` pixels each.
    pub fn new(row_len: usize) -> Self {
        Self {
            rows: std::array::from_fn(|_| vec![0; row_len]),
            order: std::array::from_fn(|i| i),
        }
    }

    /// Index of the slot receiving the incoming row.
    pub const NEWEST: usize = WINDOW_SIZE - 1;

    /// Row at logical position `pos` (0 is the oldest).
    pub fn row(&self, pos: usize) -> &[u8] {
        &self.rows[self.order[pos]]
    }

    /// Write `width` lanes of `unit` at pixel offset `start` of the row at
    /// logical position `pos`.
    pub fn store(&mut self, pos: usize, start: usize, unit: Lanes, width: u32) {
        let row = &mut self.rows[self.order[pos]];
        for (i, px) in row[start..start + width as usize].iter_mut().enumerate() {
            *px = unit.get(i as u32);
        }
    }

    /// Make the newest row the oldest and free the oldest slot.
    pub fn rotate(&mut self) {
        self.order.rotate_left(1);
    }
}

// ============================================================================
// Stencil
// ============================================================================

/// Two stencil rows of `1 + P` pixels: lane 0 is the look-behind column.
#[derive(Debug, Clone, Copy)]
pub struct Stencil {
    lanes: [[u8; STENCIL_LANES]; 2],
}

impl Default for Stencil {
    fn default() -> Self {
        Self {
            lanes: [[0; STENCIL_LANES]; 2],
        }
    }
}

impl Stencil {
    /// Load lanes `1..=width` of stencil row `row` from `pixels`.
    pub fn load(&mut self, row: usize, pixels: &[u8]) {
        self.lanes[row][1..=pixels.len()].copy_from_slice(pixels);
    }

    /// The 2x2 neighbourhood whose right column is lane `k + 1`.
    #[inline]
    pub fn quad(&self, k: usize) -> [[u8; 2]; 2] {
        [
            [self.lanes[0][k], self.lanes[0][k + 1]],
            [self.lanes[1][k], self.lanes[1][k + 1]],
        ]
    }

    /// Carry lane `width` into lane 0 of both rows.
    pub fn advance(&mut self, width: usize) {
        for row in &mut self.lanes {
            row[0] = row[width];
        }
    }

    /// Forget the look-behind column at the start of a row.
    pub fn reset_look_behind(&mut self) {
        for row in &mut self.lanes {
            row[0] = 0;
        }
    }
}

// ============================================================================
// Fixed-point kernel
// ============================================================================

/// Blend a 2x2 neighbourhood with `IndexFixed` raw weights.
///
/// `quad[0]` is the upper row and `quad[1]` the lower; within a row the
/// first pixel is the left column. The weighted sum is exact, truncated to
/// [`PixelFixed`] precision, clamped to `0..=MAX_PIXEL_VAL` and rounded
/// half up.
pub fn interpolate(quad: [[u8; 2]; 2], row_weights: [i64; 2], col_weights: [i64; 2]) -> u8 {
    let mut acc: i64 = 0;
    for (row, wr) in quad.iter().zip(row_weights) {
        for (&px, wc) in row.iter().zip(col_weights) {
            acc += i64::from(px) * wr * wc;
        }
    }
    let shift = 2 * IndexFixed::FRAC_BITS - PixelFixed::FRAC_BITS;
    let max = i64::from(MAX_PIXEL_VAL) << PixelFixed::FRAC_BITS;
    let truncated = (acc >> shift).clamp(0, max);
    PixelFixed::from_raw(truncated as u64).round().to_int() as u8
}

/// Position of the first output sample at or after source `index`, as an
/// `IndexFixed` raw.
#[inline]
fn sample_position(index: u64, ctx: &FrameContext) -> i64 {
    let output = ctx.scale.first_output(index);
    ctx.scale.position(output).raw() as i64
}

/// Vertical weights `[(r + 1) - pos, pos - r]` for source row pair `r, r + 1`.
pub fn row_weights(row: u32, ctx: &FrameContext) -> [i64; 2] {
    let pos = sample_position(u64::from(row), ctx);
    let r = i64::from(row) * INDEX_ONE;
    [r + INDEX_ONE - pos, pos - r]
}

/// Horizontal weights `[c - pos, pos - (c - 1)]` for source column `c`.
///
/// Column 0 takes its position from column `-1` saturated to 0, which puts
/// the whole weight on column 0 itself.
pub fn col_weights(col: u32, ctx: &FrameContext) -> [i64; 2] {
    let pos = sample_position(u64::from(col.saturating_sub(1)), ctx);
    let c = i64::from(col) * INDEX_ONE;
    [c - pos, pos - (c - INDEX_ONE)]
}

// ============================================================================
// WindowInterpolator
// ============================================================================

/// Interpolates every source row pair at full column resolution.
///
/// Emits `(height - 1) * unit_count` words of `process_width` pixels.
pub struct WindowInterpolator<S> {
    upstream: S,
    ctx: FrameContext,
    window: LineWindow,
    stencil: Stencil,
    row: u32,
    unit: u32,
    row_weights: [i64; 2],
    warmed: bool,
}

impl<S> WindowInterpolator<S>
where
    S: Source<Item = Lanes>,
{
    pub fn new(upstream: S, ctx: &FrameContext) -> Self {
        debug!(
            "{STAGE}: window {} rows of {} pixels, {} output row-units",
            WINDOW_SIZE,
            ctx.padded_row_pixels(),
            u64::from(ctx.geometry.height.saturating_sub(1)) * u64::from(ctx.derived.unit_count)
        );
        Self {
            upstream,
            ctx: *ctx,
            window: LineWindow::new(ctx.padded_row_pixels()),
            stencil: Stencil::default(),
            row: 0,
            unit: 0,
            row_weights: row_weights(0, ctx),
            warmed: false,
        }
    }

    fn width(&self) -> u32 {
        self.ctx.format.process_width()
    }

    /// Load the first `WINDOW_SIZE - 1` rows without producing output.
    fn warm_up(&mut self) -> StreamResult<()> {
        let rows = (WINDOW_SIZE as u32 - 1).min(self.ctx.geometry.height);
        let width = self.width();
        for pos in 0..rows as usize {
            for unit in 0..self.ctx.derived.unit_count {
                let data = require(&mut self.upstream, STAGE)?;
                self.window.store(pos, (unit * width) as usize, data, width);
            }
        }
        self.warmed = true;
        Ok(())
    }

    fn interpolate_unit(&mut self, incoming: Lanes) -> Lanes {
        let width = self.width();
        let start = (self.unit * width) as usize;
        let end = start + width as usize;

        self.window.store(LineWindow::NEWEST, start, incoming, width);
        self.stencil.load(0, &self.window.row(0)[start..end]);
        self.stencil
            .load(1, &self.window.row(LineWindow::NEWEST)[start..end]);

        let mut out = Lanes::ZERO;
        for k in 0..width {
            let col = self.unit * width + k;
            let value = interpolate(
                self.stencil.quad(k as usize),
                self.row_weights,
                col_weights(col, &self.ctx),
            );
            out.set(k, value);
        }
        self.stencil.advance(width as usize);
        out
    }

    fn next_row(&mut self) {
        trace!("{STAGE}: row pair {} done", self.row);
        self.unit = 0;
        self.row += 1;
        self.window.rotate();
        self.stencil.reset_look_behind();
        self.row_weights = row_weights(self.row, &self.ctx);
    }
}

impl<S> Source for WindowInterpolator<S>
where
    S: Source<Item = Lanes>,
{
    type Item = Lanes;

    fn read(&mut self) -> StreamResult<Option<Lanes>> {
        if !self.warmed {
            self.warm_up()?;
        }
        let pairs = self.ctx.geometry.height.saturating_sub(1);
        if self.row >= pairs || self.ctx.derived.unit_count == 0 {
            return Ok(None);
        }
        let incoming = require(&mut self.upstream, STAGE)?;
        let out = self.interpolate_unit(incoming);
        self.unit += 1;
        if self.unit == self.ctx.derived.unit_count {
            self.next_row();
        }
        Ok(Some(out))
    }
}
