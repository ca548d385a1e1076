//! White-to-transparency filter.

use image::RgbaImage;
use rayon::prelude::*;

use crate::PARALLEL_THRESHOLD;

/// Threshold applied to model charts that do not set their own.
pub const DEFAULT_WHITE_THRESHOLD: u8 = 200;

/// Make near-white pixels fully transparent.
///
/// A pixel is cleared when red, green and blue are each strictly greater
/// than `threshold`. Every other pixel keeps its original alpha. Light chart
/// content above the threshold is cleared too.
pub fn declare_transparent(image: &mut RgbaImage, threshold: u8) {
    let num_pixels = (image.width() as usize) * (image.height() as usize);
    let buf: &mut [u8] = &mut **image;

    if num_pixels >= PARALLEL_THRESHOLD {
        buf.par_chunks_exact_mut(4)
            .for_each(|px| clear_if_white(px, threshold));
    } else {
        buf.chunks_exact_mut(4)
            .for_each(|px| clear_if_white(px, threshold));
    }
}

#[inline(always)]
fn clear_if_white(px: &mut [u8], threshold: u8) {
    if px[0] > threshold && px[1] > threshold && px[2] > threshold {
        px[3] = 0;
    }
}
