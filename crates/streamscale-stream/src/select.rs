//! Output row and column selection
//!
//! The interpolator produces one row-unit for every source row pair and
//! every source column. Only the pairs that contain an output row, and
//! only the lanes that contain an output column, survive; the survivors
//! are compacted to the low lanes of a [`SelectedGroup`].

use crate::source::{Source, require};
use crate::StreamResult;
use log::{debug, trace};
use streamscale_core::{FrameContext, Lanes};

const STAGE: &str = "select";

/// Output pixels of one row-unit, compacted to the low lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectedGroup {
    pub pixels: Lanes,
    /// Valid lanes, `0..=process_width`.
    pub count: u32,
}

impl SelectedGroup {
    pub fn new(pixels: Lanes, count: u32) -> Self {
        Self { pixels, count }
    }
}

/// True if source row pair `row, row + 1` contains an output row.
///
/// Output row `m` sits at source row `m * scale`; the pair is selected
/// when the first output rows at or after `row` and `row + 1` differ and
/// the later index still lies inside the output frame.
pub fn row_selected(ctx: &FrameContext, row: u32) -> bool {
    let up = ctx.scale.first_output(u64::from(row));
    let down = ctx.scale.first_output(u64::from(row) + 1);
    up != down && down <= u64::from(ctx.derived.new_height)
}

/// Output column range `[min, max)` covered by unit `unit`.
pub fn column_range(ctx: &FrameContext, unit: u32) -> (u64, u64) {
    let p = u64::from(ctx.format.process_width());
    let base = u64::from(unit) * p;
    let min = if unit == 0 {
        0
    } else {
        ctx.scale.first_output(base - 1)
    };
    let max = ctx
        .scale
        .first_output(base + p - 1)
        .min(u64::from(ctx.derived.new_width));
    (min, max)
}

/// Keeps the selected rows and columns of the interpolated stream.
pub struct ColumnSelector<S> {
    upstream: S,
    ctx: FrameContext,
    row: u32,
    unit: u32,
    selected: bool,
}

impl<S> ColumnSelector<S>
where
    S: Source<Item = Lanes>,
{
    pub fn new(upstream: S, ctx: &FrameContext) -> Self {
        debug!(
            "{STAGE}: {}x{} output from {} row pairs",
            ctx.derived.new_width,
            ctx.derived.new_height,
            ctx.geometry.height.saturating_sub(1)
        );
        Self {
            upstream,
            ctx: *ctx,
            row: 0,
            unit: 0,
            selected: row_selected(ctx, 0),
        }
    }

    fn select(&self, unit: Lanes) -> SelectedGroup {
        let p = self.ctx.format.process_width();
        let base = u64::from(self.unit) * u64::from(p);
        let (min, max) = column_range(&self.ctx, self.unit);
        let mut pixels = Lanes::ZERO;
        for i in 0..p {
            let col = min + u64::from(i);
            let lane = if col < max {
                let src = self.ctx.scale.position(col).to_int() + 1;
                match src.checked_sub(base) {
                    Some(lane) if lane < u64::from(p) => lane as u32,
                    _ => 0,
                }
            } else {
                0
            };
            pixels.set(i, unit.get(lane));
        }
        let count = max.saturating_sub(min).min(u64::from(p)) as u32;
        SelectedGroup::new(pixels, count)
    }

    /// Move to the next row-unit, re-evaluating the row at row boundaries.
    fn advance(&mut self) {
        self.unit += 1;
        if self.unit == self.ctx.derived.unit_count {
            trace!(
                "{STAGE}: row pair {} {}",
                self.row,
                if self.selected { "kept" } else { "dropped" }
            );
            self.unit = 0;
            self.row += 1;
            self.selected = row_selected(&self.ctx, self.row);
        }
    }
}

impl<S> Source for ColumnSelector<S>
where
    S: Source<Item = Lanes>,
{
    type Item = SelectedGroup;

    fn read(&mut self) -> StreamResult<Option<SelectedGroup>> {
        let pairs = self.ctx.geometry.height.saturating_sub(1);
        if self.ctx.derived.unit_count == 0 {
            return Ok(None);
        }
        while self.row < pairs {
            let unit = require(&mut self.upstream, STAGE)?;
            let group = self.selected.then(|| self.select(unit));
            self.advance();
            if group.is_some() {
                return Ok(group);
            }
        }
        Ok(None)
    }
}
