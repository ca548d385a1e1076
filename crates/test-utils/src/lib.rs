//! Shared test utilities for the forecast-panels workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic chart and canvas generators
//! - Layout fixtures taken from the shipped jobs
//! - Workspace and temporary directory helpers
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../../crates/test-utils" }
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Assert that a pixel of an `RgbaImage` has the expected RGBA value.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_pixel_eq;
///
/// assert_pixel_eq!(canvas, 10, 20, [255, 0, 0, 255]);
/// ```
#[macro_export]
macro_rules! assert_pixel_eq {
    ($img:expr, $x:expr, $y:expr, $expected:expr) => {{
        let actual = $img.get_pixel($x, $y).0;
        let expected: [u8; 4] = $expected;
        if actual != expected {
            panic!(
                "pixel mismatch at ({}, {})\n  actual: `{:?}`,\nexpected: `{:?}`",
                $x, $y, actual, expected
            );
        }
    }};
}
