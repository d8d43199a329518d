//! streamscale-test - Regression test framework for streamscale
//!
//! This crate provides the regression harness shared by the workspace's
//! integration tests, supporting three modes:
//!
//! - **Generate**: Create golden files for comparison
//! - **Compare**: Compare results with golden files
//! - **Display**: Run checks without golden comparison
//!
//! It also carries the synthetic images and the floating-point bilinear
//! reference the resize tests compare against.
//!
//! # Usage
//!
//! ```ignore
//! use streamscale_test::{RegParams, synth};
//!
//! let mut rp = RegParams::new("pipeline");
//! let src = synth::gradient(64, 48)?;
//! rp.compare_values(32.0, f64::from(out.width()), 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "generate", "compare", or "display"

mod error;
mod params;
pub mod reference;
pub mod synth;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // streamscale-test is at crates/streamscale-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the golden files directory
pub fn golden_dir() -> String {
    format!("{}/tests/golden", workspace_root())
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
