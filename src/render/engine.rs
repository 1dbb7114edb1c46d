use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use tracing::warn;

use crate::foundation::error::{EmblemError, EmblemResult};
use crate::render::{compose, encode, ops};
use crate::rules::model::{GenerationRule, ImageShape};

/// Execute one generation rule against a source image and write the encoded
/// result under `out_dir` as `<out_prefix>.<slug>.<ext>`.
///
/// The transformation order is fixed: normalize to square, mask the
/// foreground, scale (downscale-only), build and mask the background,
/// scale the background, composite, final resize, encode. Reordering any of
/// these changes the produced bytes.
pub fn generate_icon(
    rule: &GenerationRule,
    image_path: &Path,
    out_dir: &Path,
    out_prefix: &str,
    slug_len: usize,
) -> EmblemResult<PathBuf> {
    let decoded = image::open(image_path)
        .map_err(|e| EmblemError::image(format!("decode '{}': {e}", image_path.display())))?;
    let mut fg = ops::pad_to_square(decoded.to_rgba8());

    if rule.recipe.image_mask == ImageShape::Circle {
        ops::mask_circle(&mut fg);
    }

    let mut effective_image_scale = rule.recipe.effective_image_scale();
    let mut background_scale = rule.recipe.background_scale;
    if effective_image_scale > 1.0 {
        // Never enlarge pixel data: shrink the background instead, so the
        // foreground-to-background size ratio stays what the rule asked for.
        background_scale /= effective_image_scale;
        effective_image_scale = 1.0;
    }
    let mut fg = ops::scale_image(&fg, effective_image_scale)?;

    let mut bg = ops::solid(fg.width(), fg.height(), rule.recipe.background.rgba8());
    if rule.recipe.output_shape == ImageShape::Circle {
        ops::mask_circle(&mut fg);
        ops::mask_circle(&mut bg);
    }
    let bg = ops::scale_image(&bg, background_scale)?;

    let mut composited = compose::alpha_over(&bg, &fg)?;

    if let Some(output_size) = rule.recipe.output_size {
        if composited.width() != composited.height() {
            return Err(EmblemError::image(
                "composited image is not square before the final resize",
            ));
        }
        if composited.width() < output_size {
            let message = format!(
                "rule {}: '{}' has only {} pixels, but {} are needed",
                rule.label.as_deref().unwrap_or(out_prefix),
                image_path.display(),
                composited.width(),
                output_size
            );
            if rule.recipe.force_output_size == Some(true) {
                return Err(EmblemError::resource(message));
            }
            warn!("{message}");
        }
        composited = ops::shrink_to(composited, output_size);
    }

    let bytes = encode::encode(&composited, rule.recipe.image_type)?;
    let slug = encode::content_slug(&bytes, slug_len);
    let ext = rule.recipe.image_type.ext();

    fs::create_dir_all(out_dir)
        .with_context(|| format!("create output dir '{}'", out_dir.display()))?;
    let tmp_path = out_dir.join(format!("tmp.{ext}"));
    let out_path = out_dir.join(format!("{out_prefix}.{slug}.{ext}"));
    fs::write(&tmp_path, &bytes).with_context(|| format!("write '{}'", tmp_path.display()))?;
    fs::rename(&tmp_path, &out_path).with_context(|| {
        format!(
            "rename '{}' to '{}'",
            tmp_path.display(),
            out_path.display()
        )
    })?;
    Ok(out_path)
}

#[cfg(test)]
#[path = "../../tests/unit/render/engine.rs"]
mod tests;
