//! Synthetic rasters for exercising the compositing pipeline.
//!
//! The patterns are simple enough that the expected result of every
//! pipeline step can be computed by hand in a test.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

/// A uniformly coloured image.
pub fn solid_image(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(rgba))
}

/// A plain opaque canvas, like a flat-coloured panel background.
pub fn blank_canvas(width: u32, height: u32) -> RgbaImage {
    solid_image(width, height, [30, 60, 90, 255])
}

/// A chart-like image: white background with an opaque coloured block in
/// the middle half.
///
/// After the white filter only the block survives.
///
/// # Example
///
/// ```
/// use test_utils::chart_on_white;
///
/// let chart = chart_on_white(8, 8, [0, 0, 255, 255]);
/// assert_eq!(chart.get_pixel(0, 0).0, [255, 255, 255, 255]);
/// assert_eq!(chart.get_pixel(4, 4).0, [0, 0, 255, 255]);
/// ```
pub fn chart_on_white(width: u32, height: u32, block: [u8; 4]) -> RgbaImage {
    let (x0, x1) = (width / 4, width - width / 4);
    let (y0, y1) = (height / 4, height - height / 4);
    RgbaImage::from_fn(width, height, |x, y| {
        if (x0..x1).contains(&x) && (y0..y1).contains(&y) {
            Rgba(block)
        } else {
            Rgba([255, 255, 255, 255])
        }
    })
}

/// Encode an image as PNG bytes, as a chart server would return it.
pub fn encode_png(image: &RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("PNG encoding of an in-memory image cannot fail");
    bytes
}

/// Count pixels with non-zero alpha.
pub fn count_visible(image: &RgbaImage) -> usize {
    image.pixels().filter(|p| p.0[3] != 0).count()
}
