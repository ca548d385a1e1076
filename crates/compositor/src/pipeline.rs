//! Placement of one overlay onto a canvas.

use image::RgbaImage;
use panel_common::{PanelResult, Rect};
use tracing::{debug, warn};

use crate::blend::composite_over;
use crate::mask::{apply_alpha, clear_rect, clip_to_keep_region, extract_alpha};
use crate::resize::resize_lanczos;

/// Where an overlay goes and which parts of it survive.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Target position and size of the resized overlay.
    pub layout: Rect,
    /// Only the interior of this rectangle may stay visible.
    pub keep_region: Option<Rect>,
    /// Areas forced transparent (legends, axis labels, borders).
    pub masks: Vec<Rect>,
}

impl Placement {
    pub fn new(layout: Rect) -> Self {
        Self {
            layout,
            keep_region: None,
            masks: Vec::new(),
        }
    }

    pub fn with_keep_region(mut self, keep: Rect) -> Self {
        self.keep_region = Some(keep);
        self
    }

    pub fn with_mask(mut self, mask: Rect) -> Self {
        self.masks.push(mask);
        self
    }
}

/// Build the canvas-sized overlay layer for `overlay`.
///
/// The layer is transparent outside the pasted layout rectangle, outside the
/// keep-region (if any) and inside every mask rectangle.
pub fn build_layer(
    canvas_size: (u32, u32),
    overlay: &RgbaImage,
    placement: &Placement,
) -> PanelResult<RgbaImage> {
    let (canvas_w, canvas_h) = canvas_size;
    let layout = placement.layout.to_pixels();

    if !layout.fits_within(canvas_w, canvas_h) {
        warn!(
            layout = ?layout,
            canvas_w,
            canvas_h,
            "Layout extends past canvas, overlay will be clipped"
        );
    }

    let resized = resize_lanczos(overlay, layout.width, layout.height)?;

    // RgbaImage::new is zero-filled: fully transparent
    let mut layer = RgbaImage::new(canvas_w, canvas_h);
    paste(&mut layer, &resized, layout.x, layout.y);

    let mut mask = extract_alpha(&layer);
    if let Some(keep) = placement.keep_region {
        clip_to_keep_region(&mut mask, keep.to_pixels());
    }
    for rect in &placement.masks {
        clear_rect(&mut mask, rect.to_pixels());
    }
    apply_alpha(&mut layer, &mask)?;

    debug!(
        layout = ?layout,
        keep_region = placement.keep_region.is_some(),
        masks = placement.masks.len(),
        "Built overlay layer"
    );
    Ok(layer)
}

/// Composite `overlay` onto `canvas` according to `placement`.
///
/// On error the canvas is left exactly as it was.
pub fn composite(canvas: &mut RgbaImage, overlay: &RgbaImage, placement: &Placement) -> PanelResult<()> {
    let layer = build_layer(canvas.dimensions(), overlay, placement)?;
    composite_over(canvas, &layer)
}

/// Copy `src` into a fresh transparent `layer` with its top-left at `(x, y)`.
///
/// Pixels are copied verbatim, alpha included. This differs from pasting the
/// source through its own alpha as a mask, which would scale a partially
/// transparent edge pixel's alpha to `a * a / 255` and darken it. The layer
/// is blended once, in [`composite_over`]. Anything falling outside the layer
/// is dropped.
fn paste(layer: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    let (lw, lh) = (layer.width() as i64, layer.height() as i64);
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + src.width() as i64).min(lw);
    let y1 = (y + src.height() as i64).min(lh);

    for ly in y0..y1 {
        for lx in x0..x1 {
            let px = *src.get_pixel((lx - x) as u32, (ly - y) as u32);
            layer.put_pixel(lx as u32, ly as u32, px);
        }
    }
}
