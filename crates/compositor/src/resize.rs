//! High-quality resampling of RGBA charts.

use image::imageops::{self, FilterType};
use image::{Rgba, Rgba32FImage, RgbaImage};
use panel_common::{PanelError, PanelResult};

/// Resize with a Lanczos3 filter.
///
/// Colour is premultiplied by alpha while resampling, so fully transparent
/// pixels (typically white background that was just cleared) do not bleed
/// into the edges of the chart.
pub fn resize_lanczos(src: &RgbaImage, width: u32, height: u32) -> PanelResult<RgbaImage> {
    if width == 0 || height == 0 {
        return Err(PanelError::CompositeFailed(format!(
            "cannot resize to empty target {}x{}",
            width, height
        )));
    }
    if src.width() == 0 || src.height() == 0 {
        return Err(PanelError::CompositeFailed(format!(
            "cannot resize empty source {}x{}",
            src.width(),
            src.height()
        )));
    }
    if src.dimensions() == (width, height) {
        return Ok(src.clone());
    }

    let resized = imageops::resize(&premultiply(src), width, height, FilterType::Lanczos3);
    Ok(unpremultiply(&resized))
}

fn premultiply(src: &RgbaImage) -> Rgba32FImage {
    Rgba32FImage::from_fn(src.width(), src.height(), |x, y| {
        let [r, g, b, a] = src.get_pixel(x, y).0;
        let a = a as f32 / 255.0;
        Rgba([
            r as f32 / 255.0 * a,
            g as f32 / 255.0 * a,
            b as f32 / 255.0 * a,
            a,
        ])
    })
}

fn unpremultiply(src: &Rgba32FImage) -> RgbaImage {
    RgbaImage::from_fn(src.width(), src.height(), |x, y| {
        let [r, g, b, a] = src.get_pixel(x, y).0;
        if a <= 0.0 {
            return Rgba([0, 0, 0, 0]);
        }
        Rgba([to_u8(r / a), to_u8(g / a), to_u8(b / a), to_u8(a)])
    })
}

#[inline(always)]
fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_dimensions() {
        let src = RgbaImage::from_pixel(40, 30, Rgba([10, 20, 30, 255]));
        let out = resize_lanczos(&src, 90, 160).unwrap();
        assert_eq!(out.dimensions(), (90, 160));
    }

    #[test]
    fn test_solid_colour_survives_resampling() {
        let src = RgbaImage::from_pixel(16, 16, Rgba([200, 0, 0, 255]));
        let out = resize_lanczos(&src, 37, 23).unwrap();
        for px in out.pixels() {
            assert_eq!(px.0, [200, 0, 0, 255]);
        }
    }

    #[test]
    fn test_transparent_background_does_not_bleed() {
        // left half opaque red, right half transparent white
        let src = RgbaImage::from_fn(20, 10, |x, _| {
            if x < 10 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 0])
            }
        });
        let out = resize_lanczos(&src, 40, 20).unwrap();
        for px in out.pixels() {
            let [r, g, b, a] = px.0;
            if a > 0 {
                assert!(r >= 250, "red channel drifted: {:?}", px.0);
                assert!(g <= 5 && b <= 5, "white bled into edge: {:?}", px.0);
            }
        }
    }

    #[test]
    fn test_empty_target_is_composite_failure() {
        let src = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let err = resize_lanczos(&src, 0, 10).unwrap_err();
        assert!(matches!(err, PanelError::CompositeFailed(_)));

        let empty = RgbaImage::new(0, 0);
        assert!(resize_lanczos(&empty, 10, 10).is_err());
    }

    #[test]
    fn test_same_size_is_copy() {
        let src = RgbaImage::from_fn(5, 5, |x, y| Rgba([x as u8, y as u8, 7, 128]));
        assert_eq!(resize_lanczos(&src, 5, 5).unwrap(), src);
    }
}
