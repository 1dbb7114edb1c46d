use serde::{Deserialize, Serialize};

use crate::foundation::color::Color;
use crate::foundation::error::{EmblemError, EmblemResult};

/// Container format of a produced icon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImageType {
    Png,
    Jpg,
    Ico,
}

impl ImageType {
    /// Lowercase file extension, also the manifest `type` value.
    pub fn ext(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Ico => "ico",
        }
    }
}

/// Mask shape, applied either to the foreground or to the whole result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageShape {
    Square,
    Circle,
}

/// The complete, resolved set of transformation parameters for one output.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRecipe {
    /// Image type to produce.
    pub image_type: ImageType,
    /// Shape applied as a mask to the source image.
    pub image_mask: ImageShape,
    /// Shape of the resulting icon (masks foreground and background alike).
    pub output_shape: ImageShape,
    /// Background fill color.
    pub background: Color,
    /// Factor to scale the image by.
    pub image_scale: f64,
    /// Factor to scale the border by.
    pub border_scale: f64,
    /// Factor to scale the background by.
    pub background_scale: f64,
    /// Edge length of the resulting image; unset keeps the source size.
    pub output_size: Option<u32>,
    /// Whether an input smaller than `output_size` fails the build.
    pub force_output_size: Option<bool>,
}

impl Default for GenerationRecipe {
    fn default() -> Self {
        Self {
            image_type: ImageType::Png,
            image_mask: ImageShape::Square,
            output_shape: ImageShape::Square,
            background: Color::transparent(),
            image_scale: 1.0,
            border_scale: 1.0,
            background_scale: 1.0,
            output_size: None,
            force_output_size: None,
        }
    }
}

impl GenerationRecipe {
    /// Combined foreground scale; the downscale-only clamp in the engine
    /// keeps the applied value at or below 1.0.
    pub fn effective_image_scale(&self) -> f64 {
        self.image_scale * self.border_scale
    }

    /// Reject mutually-incompatible option combinations. A violation fails
    /// the whole player, not just this rule.
    pub fn validate(&self) -> EmblemResult<()> {
        if self.image_type == ImageType::Ico && self.output_size.is_some() {
            return Err(EmblemError::validation(
                "image type ICO cannot have an output size",
            ));
        }
        if self.image_type == ImageType::Jpg && self.output_shape != ImageShape::Square {
            return Err(EmblemError::validation(
                "image type JPG cannot have a non-square shape",
            ));
        }
        if self.image_type == ImageType::Jpg && self.background_scale != 1.0 {
            return Err(EmblemError::validation(
                "background scale not allowed for image type JPG",
            ));
        }
        if self.image_type == ImageType::Jpg && !self.background.is_opaque() {
            return Err(EmblemError::validation(
                "image type JPG cannot have a transparent background",
            ));
        }
        for (name, value) in [
            ("image_scale", self.image_scale),
            ("border_scale", self.border_scale),
            ("background_scale", self.background_scale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EmblemError::validation(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }
        if self.effective_image_scale() > 1.0 {
            return Err(EmblemError::validation(format!(
                "the effective image scale would scale up the image: {}",
                self.effective_image_scale()
            )));
        }
        if let Some(size) = self.output_size
            && size == 0
        {
            return Err(EmblemError::validation("output_size must be positive"));
        }
        Ok(())
    }
}

/// A recipe plus the per-output routing fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationRule {
    pub recipe: GenerationRecipe,
    /// Identifier distinguishing same-recipe outputs ("tray-menu", "app-icon").
    pub label: Option<String>,
    /// Source image override, relative to the image root.
    pub from_image: Option<String>,
    /// Produce the output but keep it out of the public manifest.
    pub exclude: bool,
}

impl GenerationRule {
    /// Apply a partial-field update, returning a new rule. Keys absent from
    /// the patch keep their prior value.
    pub fn merged(&self, patch: &RulePatch) -> GenerationRule {
        GenerationRule {
            recipe: GenerationRecipe {
                image_type: patch.image_type.unwrap_or(self.recipe.image_type),
                image_mask: patch.image_mask.unwrap_or(self.recipe.image_mask),
                output_shape: patch.output_shape.unwrap_or(self.recipe.output_shape),
                background: patch
                    .background
                    .clone()
                    .unwrap_or_else(|| self.recipe.background.clone()),
                image_scale: patch.image_scale.unwrap_or(self.recipe.image_scale),
                border_scale: patch.border_scale.unwrap_or(self.recipe.border_scale),
                background_scale: patch
                    .background_scale
                    .unwrap_or(self.recipe.background_scale),
                output_size: patch.output_size.or(self.recipe.output_size),
                force_output_size: patch.force_output_size.or(self.recipe.force_output_size),
            },
            label: patch.label.clone().or_else(|| self.label.clone()),
            from_image: patch.from_image.clone().or_else(|| self.from_image.clone()),
            exclude: patch.exclude.unwrap_or(self.exclude),
        }
    }
}

/// Partial-field update as it appears in rule-definition and override
/// documents. The schema is closed: unknown keys fail parsing.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulePatch {
    pub image_type: Option<ImageType>,
    pub image_mask: Option<ImageShape>,
    pub output_shape: Option<ImageShape>,
    pub background: Option<Color>,
    pub image_scale: Option<f64>,
    pub border_scale: Option<f64>,
    pub background_scale: Option<f64>,
    pub output_size: Option<u32>,
    pub force_output_size: Option<bool>,
    pub label: Option<String>,
    pub from_image: Option<String>,
    pub exclude: Option<bool>,
}

#[cfg(test)]
#[path = "../../tests/unit/rules/model.rs"]
mod tests;
