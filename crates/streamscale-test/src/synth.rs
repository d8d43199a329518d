//! Synthetic test images

use crate::error::TestResult;
use streamscale_core::GrayImage;

/// Diagonal ramp from 0 at the top-left to 255 at the bottom-right.
pub fn gradient(width: u32, height: u32) -> TestResult<GrayImage> {
    let span = u64::from((width + height).saturating_sub(2).max(1));
    Ok(GrayImage::from_fn(width, height, |x, y| {
        (u64::from(x + y) * 255 / span) as u8
    })?)
}

/// Black and white squares of `cell` pixels, black at the origin.
pub fn checkerboard(width: u32, height: u32, cell: u32) -> TestResult<GrayImage> {
    let cell = cell.max(1);
    Ok(GrayImage::from_fn(width, height, |x, y| {
        if (x / cell + y / cell) % 2 == 0 { 0 } else { 255 }
    })?)
}

/// Uniform noise from a seeded generator; equal seeds give equal images.
pub fn noise(width: u32, height: u32, seed: u32) -> TestResult<GrayImage> {
    let mut rng = SimpleRng::new(seed);
    Ok(GrayImage::from_fn(width, height, |_, _| rng.next_u8())?)
}

/// Linear congruential generator (Numerical Recipes parameters)
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u32) -> Self {
        Self {
            state: u64::from(seed),
        }
    }

    fn next(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.state
    }

    /// High bits; the low bits of an LCG have short periods.
    fn next_u8(&mut self) -> u8 {
        (self.next() >> 56) as u8
    }
}
