use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::foundation::error::{EmblemError, EmblemResult};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Center `image` on a fully-transparent square canvas sized to its larger
/// edge. Squares pass through unchanged; nothing is ever cropped.
pub fn pad_to_square(image: RgbaImage) -> RgbaImage {
    let (w, h) = image.dimensions();
    if w == h {
        return image;
    }
    let edge = w.max(h);
    let mut canvas = RgbaImage::from_pixel(edge, edge, TRANSPARENT);
    imageops::replace(
        &mut canvas,
        &image,
        i64::from((edge - w) / 2),
        i64::from((edge - h) / 2),
    );
    canvas
}

/// Force alpha to zero outside the inscribed circle touching all four edges.
/// Alpha inside the circle is preserved: a pixel that was already transparent
/// stays transparent.
pub fn mask_circle(image: &mut RgbaImage) {
    let edge = image.width().min(image.height());
    let r = f64::from(edge) / 2.0;
    for (x, y, px) in image.enumerate_pixels_mut() {
        let dx = f64::from(x) + 0.5 - r;
        let dy = f64::from(y) + 0.5 - r;
        if dx * dx + dy * dy > r * r {
            px[3] = 0;
        }
    }
}

/// Shrink a square image by `factor` and recenter the result on a
/// transparent canvas of the original size, so content gets smaller while
/// the canvas dimensions stay constant.
///
/// Factors above 1.0 are rejected: callers must route through the
/// downscale-only clamp first, so hitting this is a programming error.
pub fn scale_image(image: &RgbaImage, factor: f64) -> EmblemResult<RgbaImage> {
    if factor > 1.0 {
        return Err(EmblemError::image(format!(
            "cannot upscale an image (factor {factor})"
        )));
    }
    let size = image.width();
    let new_size = ((f64::from(size) * factor) as u32).max(1);
    if new_size >= size {
        return Ok(image.clone());
    }
    let scaled = imageops::resize(image, new_size, new_size, FilterType::Lanczos3);
    let mut canvas = RgbaImage::from_pixel(size, size, TRANSPARENT);
    let off = i64::from((size - new_size) / 2);
    imageops::replace(&mut canvas, &scaled, off, off);
    Ok(canvas)
}

/// Downscale a square image to exactly `size × size`. Sources already at or
/// below the target pass through unchanged (thumbnail semantics: the final
/// resize never enlarges pixel data either).
pub fn shrink_to(image: RgbaImage, size: u32) -> RgbaImage {
    if image.width() <= size {
        return image;
    }
    imageops::resize(&image, size, size, FilterType::Lanczos3)
}

/// Solid-fill canvas.
pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(rgba))
}

#[cfg(test)]
#[path = "../../tests/unit/render/ops.rs"]
mod tests;
