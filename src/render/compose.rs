use image::{Rgba, RgbaImage};

use crate::foundation::error::{EmblemError, EmblemResult};

pub type Rgba8 = [u8; 4];

/// Straight-alpha source-over for one pixel: `src` over `dst`.
pub fn over(dst: Rgba8, src: Rgba8) -> Rgba8 {
    let sa = u32::from(src[3]);
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }

    let da = u32::from(dst[3]);
    let inv = 255 - sa;
    // out alpha scaled by 255: true alpha is out_a / 255
    let out_a = sa * 255 + da * inv;
    if out_a == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let sc = u32::from(src[i]);
        let dc = u32::from(dst[i]);
        let num = sc * sa * 255 + dc * da * inv;
        out[i] = ((num + out_a / 2) / out_a) as u8;
    }
    out[3] = ((out_a + 127) / 255) as u8;
    out
}

/// Alpha-composite `fg` over `bg` into a new buffer. Both images must have
/// the same pixel dimensions; a mismatch is an engine invariant violation.
pub fn alpha_over(bg: &RgbaImage, fg: &RgbaImage) -> EmblemResult<RgbaImage> {
    if bg.dimensions() != fg.dimensions() {
        return Err(EmblemError::image(format!(
            "composite size mismatch: background {:?} vs foreground {:?}",
            bg.dimensions(),
            fg.dimensions()
        )));
    }
    let mut out = bg.clone();
    for (d, s) in out.pixels_mut().zip(fg.pixels()) {
        *d = Rgba(over(d.0, s.0));
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compose.rs"]
mod tests;
