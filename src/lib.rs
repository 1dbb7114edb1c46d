//! Emblem generates the published icon assets for the media players dataset.
//!
//! The pipeline turns a declarative rule document plus a per-player base
//! image into a set of derived icons:
//!
//! 1. **Resolve**: merge `gen.yaml` rule entries with per-player overrides
//!    into concrete [`GenerationRule`]s and validate them
//! 2. **Transform**: mask, scale (downscale-only), composite onto a solid
//!    background and resize, in a fixed deterministic order
//! 3. **Encode**: PNG, JPG or ICO bytes, named by a content-addressed slug
//! 4. **Publish**: aggregate per-player results into the icon manifest
//!
//! Processing is single-threaded and batch-oriented; a fatal error aborts
//! the run, warnings never do.
#![forbid(unsafe_code)]

mod foundation;
mod manifest;
mod pipeline;
mod render;
mod rules;

pub use foundation::color::Color;
pub use foundation::error::{EmblemError, EmblemResult};
pub use manifest::{IconEntry, IconManifest};
pub use pipeline::{
    IconResult, PipelineConfig, generate_icons, generate_player_icons, run_batch,
};
pub use render::compose::{alpha_over, over};
pub use render::encode::{ICO_MAX_EDGE, content_slug, encode, md5_hex};
pub use render::engine::generate_icon;
pub use render::ops::{mask_circle, pad_to_square, scale_image, shrink_to, solid};
pub use rules::model::{GenerationRecipe, GenerationRule, ImageShape, ImageType, RulePatch};
pub use rules::resolve::{OverridesDoc, RulesDoc, load_overrides, load_rules, resolve_rules};
