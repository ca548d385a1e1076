//! Source-over alpha compositing (straight, non-premultiplied alpha).

use image::{Rgba, RgbaImage};
use panel_common::{PanelError, PanelResult};
use rayon::prelude::*;

use crate::PARALLEL_THRESHOLD;

/// Blend `src` over `dst`.
///
/// `out.a = s.a + d.a * (1 - s.a)` and colour is the alpha-weighted sum
/// normalised by `out.a`. Over an opaque destination this is
/// `out.rgb = s.rgb * s.a + d.rgb * (1 - s.a)`.
#[inline]
pub fn over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    match src.0[3] {
        0 => return dst,
        255 => return src,
        _ => {}
    }

    let sa = src.0[3] as f32 / 255.0;
    let da = dst.0[3] as f32 / 255.0;
    let dw = da * (1.0 - sa);
    let oa = sa + dw;

    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = (src.0[i] as f32 * sa + dst.0[i] as f32 * dw) / oa;
        out[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (oa * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba(out)
}

/// Composite a canvas-sized `layer` onto `canvas` in place.
pub fn composite_over(canvas: &mut RgbaImage, layer: &RgbaImage) -> PanelResult<()> {
    if canvas.dimensions() != layer.dimensions() {
        return Err(PanelError::CompositeFailed(format!(
            "layer {:?} does not match canvas {:?}",
            layer.dimensions(),
            canvas.dimensions()
        )));
    }

    let num_pixels = (canvas.width() as usize) * (canvas.height() as usize);
    let dst: &mut [u8] = &mut **canvas;
    let src: &[u8] = layer;

    let blend_px = |(d, s): (&mut [u8], &[u8])| {
        let out = over(Rgba([d[0], d[1], d[2], d[3]]), Rgba([s[0], s[1], s[2], s[3]]));
        d.copy_from_slice(&out.0);
    };

    if num_pixels >= PARALLEL_THRESHOLD {
        dst.par_chunks_exact_mut(4)
            .zip(src.par_chunks_exact(4))
            .for_each(blend_px);
    } else {
        dst.chunks_exact_mut(4).zip(src.chunks_exact(4)).for_each(blend_px);
    }
    Ok(())
}
