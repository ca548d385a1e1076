//! Raster pipeline for forecast panels.
//!
//! A downloaded chart goes through:
//! - [`filter::declare_transparent`]: white background to transparency
//! - [`pipeline::build_layer`]: resize, place on a canvas-sized layer, clip to
//!   the keep-region and cut out mask rectangles
//! - [`blend::composite_over`]: source-over onto the canvas
//!
//! [`pipeline::composite`] runs the last two steps and leaves the canvas
//! untouched when anything fails.

pub mod blend;
pub mod filter;
pub mod mask;
pub mod pipeline;
pub mod raster;
pub mod resize;

pub use blend::{composite_over, over};
pub use filter::{declare_transparent, DEFAULT_WHITE_THRESHOLD};
pub use pipeline::{build_layer, composite, Placement};
pub use raster::{decode_rgba, load_background, load_overlay, save_png};
pub use resize::resize_lanczos;

/// Minimum pixels before per-pixel passes are split across rayon workers.
pub(crate) const PARALLEL_THRESHOLD: usize = 64 * 1024;
