//! Alpha mask editing.
//!
//! Rectangle fills follow the drawing convention of the artwork tooling the
//! coordinates were measured with: both end coordinates are inclusive, so a
//! mask `{x, y, w, h}` clears columns `x..=x+w` and rows `y..=y+h`. Fills are
//! clipped to the mask bounds.

use image::{GrayImage, Luma, RgbaImage};
use panel_common::{PanelError, PanelResult, PixelRect};

/// Copy the alpha channel of `image` into a standalone mask.
pub fn extract_alpha(image: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([image.get_pixel(x, y).0[3]])
    })
}

/// Replace the alpha channel of `image` with `mask`.
pub fn apply_alpha(image: &mut RgbaImage, mask: &GrayImage) -> PanelResult<()> {
    if image.dimensions() != mask.dimensions() {
        return Err(PanelError::CompositeFailed(format!(
            "mask {:?} does not match layer {:?}",
            mask.dimensions(),
            image.dimensions()
        )));
    }
    for (px, m) in image.pixels_mut().zip(mask.pixels()) {
        px.0[3] = m.0[0];
    }
    Ok(())
}

/// Zero the mask over the inclusive box `(x0, y0)..=(x1, y1)`.
pub fn clear_inclusive(mask: &mut GrayImage, x0: i64, y0: i64, x1: i64, y1: i64) {
    let (w, h) = (mask.width() as i64, mask.height() as i64);
    if w == 0 || h == 0 {
        return;
    }
    let (x0, x1) = (x0.max(0), x1.min(w - 1));
    let (y0, y1) = (y0.max(0), y1.min(h - 1));
    if x0 > x1 || y0 > y1 {
        return;
    }
    for y in y0..=y1 {
        for x in x0..=x1 {
            mask.put_pixel(x as u32, y as u32, Luma([0]));
        }
    }
}

/// Zero the mask inside a mask rectangle.
pub fn clear_rect(mask: &mut GrayImage, rect: PixelRect) {
    clear_inclusive(mask, rect.x, rect.y, rect.right(), rect.bottom());
}

/// Zero the mask everywhere outside the keep-region.
///
/// Four strips are cleared: top, bottom, left and right of the region. The
/// region's own border row and column fall under the strips, so only
/// strictly interior pixels are left as they were.
pub fn clip_to_keep_region(mask: &mut GrayImage, keep: PixelRect) {
    let (w, h) = (mask.width() as i64, mask.height() as i64);
    let (kx, ky, kr, kb) = (keep.x, keep.y, keep.right(), keep.bottom());

    clear_inclusive(mask, 0, 0, w, ky);
    clear_inclusive(mask, 0, kb, w, h);
    clear_inclusive(mask, 0, ky, kx, kb);
    clear_inclusive(mask, kr, ky, w, kb);
}
