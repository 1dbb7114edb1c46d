use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbaImage};
use md5::Digest as _;
use sha2::Digest as _;

use crate::foundation::error::EmblemResult;
use crate::render::{compose, ops};
use crate::rules::model::ImageType;

/// Edge limit of the ICO container; larger images are downscaled to fit.
pub const ICO_MAX_EDGE: u32 = 256;

/// Flatten fill for JPG output. Deliberately jarring so that accidental
/// transparency loss is visually obvious in review.
const JPG_FLATTEN_RGBA: [u8; 4] = [255, 0, 255, 255];

/// Encode to the container bytes for `image_type`.
pub fn encode(image: &RgbaImage, image_type: ImageType) -> EmblemResult<Vec<u8>> {
    match image_type {
        ImageType::Png => encode_png(image),
        ImageType::Jpg => encode_jpg(image),
        ImageType::Ico => encode_ico(image),
    }
}

fn encode_png(image: &RgbaImage) -> EmblemResult<Vec<u8>> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(image.clone()).write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

fn encode_jpg(image: &RgbaImage) -> EmblemResult<Vec<u8>> {
    let base = ops::solid(image.width(), image.height(), JPG_FLATTEN_RGBA);
    let flat = compose::alpha_over(&base, image)?;
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(flat).to_rgb8())
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)?;
    Ok(buf)
}

fn encode_ico(image: &RgbaImage) -> EmblemResult<Vec<u8>> {
    let fitted;
    let image = if image.width().max(image.height()) > ICO_MAX_EDGE {
        fitted = ops::shrink_to(image.clone(), ICO_MAX_EDGE);
        &fitted
    } else {
        image
    };
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(image.clone()).write_to(&mut Cursor::new(&mut buf), ImageFormat::Ico)?;
    Ok(buf)
}

/// First `len` hex characters of the SHA-256 of `bytes`; the slug part of
/// content-addressed output filenames.
pub fn content_slug(bytes: &[u8], len: usize) -> String {
    let mut hex = to_hex(&sha2::Sha256::digest(bytes));
    hex.truncate(len);
    hex
}

/// MD5 digest of `bytes`, as carried by hashed manifest entries.
pub fn md5_hex(bytes: &[u8]) -> String {
    to_hex(&md5::Md5::digest(bytes))
}

fn to_hex(digest: &[u8]) -> String {
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/encode.rs"]
mod tests;
