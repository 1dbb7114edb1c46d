use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::foundation::error::{EmblemError, EmblemResult};
use crate::manifest::IconManifest;
use crate::render::engine::generate_icon;
use crate::rules::model::{GenerationRule, ImageType};
use crate::rules::resolve::{load_overrides, load_rules, resolve_rules};

/// Startup configuration, loaded once and threaded explicitly through the
/// resolution and generation functions.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Root of the icon source tree: `gen.yaml`, `images/`, `overrides/`.
    pub icons_dir: PathBuf,
    /// Public output root; one subdirectory per player.
    pub out_dir: PathBuf,
    /// Output root for excluded (side-channel) outputs, keyed by label.
    pub excluded_dir: PathBuf,
    /// URL prefix for manifest entries.
    pub base_url: String,
    /// Labels whose manifest entries carry a content digest.
    pub labels_to_hash: BTreeSet<String>,
    /// Hex length of the content-addressed filename slug.
    pub slug_len: usize,
}

impl PipelineConfig {
    pub fn new(
        icons_dir: impl Into<PathBuf>,
        out_dir: impl Into<PathBuf>,
        excluded_dir: impl Into<PathBuf>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            icons_dir: icons_dir.into(),
            out_dir: out_dir.into(),
            excluded_dir: excluded_dir.into(),
            base_url: base_url.into(),
            // only hash the tray menu logo, to not inflate the manifest
            labels_to_hash: BTreeSet::from(["tray-menu".to_string()]),
            slug_len: 12,
        }
    }
}

/// One produced, non-excluded output.
#[derive(Clone, Debug, PartialEq)]
pub struct IconResult {
    pub label: String,
    pub image_type: ImageType,
    pub path: PathBuf,
}

/// Resolve the rule set for `player` (category rules plus optional per-player
/// overrides) and generate every output it describes.
#[tracing::instrument(skip(cfg))]
pub fn generate_player_icons(cfg: &PipelineConfig, player: &str) -> EmblemResult<Vec<IconResult>> {
    let gen_file = cfg.icons_dir.join("gen.yaml");
    if !gen_file.exists() {
        return Err(EmblemError::config(format!(
            "file does not exist: {}",
            gen_file.display()
        )));
    }
    let image_root = cfg.icons_dir.join("images");
    let base_image = ["png", "jpg"]
        .iter()
        .map(|ext| image_root.join(format!("{player}.{ext}")))
        .find(|p| p.exists());

    let doc = load_rules(&gen_file)?;
    let overrides_file = cfg.icons_dir.join("overrides").join(format!("{player}.yaml"));
    let overrides = if overrides_file.exists() {
        Some(load_overrides(&overrides_file)?)
    } else {
        None
    };
    let rules = resolve_rules(&doc, overrides.as_ref())?;

    generate_icons(cfg, player, &rules, base_image.as_deref(), &image_root)
}

/// Drive the resolved rules for one player: pick the source image per rule,
/// route excluded outputs aside, and collect the manifest-facing results.
pub fn generate_icons(
    cfg: &PipelineConfig,
    player: &str,
    rules: &[GenerationRule],
    base_image: Option<&Path>,
    image_root: &Path,
) -> EmblemResult<Vec<IconResult>> {
    if rules.is_empty() {
        return Err(EmblemError::validation(format!(
            "generation rules for player \"{player}\" are empty"
        )));
    }
    let out_dir = cfg.out_dir.join(player);

    // Label multiplicity is diagnostic only; identical content-addressed
    // paths below are the hard duplicate check.
    let mut label_counts: HashMap<&str, usize> = HashMap::new();
    for rule in rules {
        if let Some(label) = rule.label.as_deref() {
            *label_counts.entry(label).or_default() += 1;
        }
    }
    for (label, count) in &label_counts {
        if *count > 1 {
            warn!(player, label = %label, count = %count, "label used by more than one rule");
        }
    }

    let mut produced: HashSet<PathBuf> = HashSet::new();
    let mut results = Vec::new();
    for (i, rule) in rules.iter().enumerate() {
        let Some(label) = rule.label.as_deref() else {
            return Err(EmblemError::validation(format!(
                "rule {i} for player {player} has no label"
            )));
        };
        let source = match &rule.from_image {
            Some(from) => {
                let p = image_root.join(from);
                if !p.exists() {
                    return Err(EmblemError::resource(format!(
                        "rule {i} ({label}) for player {player} references a non-existent \
                         image: {}",
                        p.display()
                    )));
                }
                p
            }
            None => base_image.map(Path::to_path_buf).unwrap_or_default(),
        };
        if base_image.is_none() {
            warn!("no image for rule {i} ({label}) for player {player}");
            return Ok(Vec::new());
        }

        let (rule_out_dir, out_prefix) = if rule.exclude {
            (cfg.excluded_dir.join(label), player)
        } else {
            (out_dir.clone(), label)
        };
        let path = generate_icon(rule, &source, &rule_out_dir, out_prefix, cfg.slug_len)?;
        if !produced.insert(path.clone()) {
            return Err(EmblemError::validation(format!(
                "output image already exists, duplicate rule? {}",
                path.display()
            )));
        }
        if !rule.exclude {
            results.push(IconResult {
                label: label.to_string(),
                image_type: rule.recipe.image_type,
                path,
            });
        }
    }
    Ok(results)
}

/// Process `players` in order and aggregate their results into the published
/// manifest. The first fatal error aborts the run; players yielding zero
/// results are logged and omitted.
pub fn run_batch(cfg: &PipelineConfig, players: &[String]) -> EmblemResult<IconManifest> {
    let mut manifest = IconManifest::default();
    for player in players {
        info!(player = %player, "generating icons");
        let results = match generate_player_icons(cfg, player) {
            Ok(results) => results,
            Err(e) => {
                error!(player = %player, error = %e, "icon generation failed");
                return Err(e);
            }
        };
        if results.is_empty() {
            warn!(player = %player, "no icons produced");
            continue;
        }
        manifest.insert_player(cfg, player, &results)?;
    }
    Ok(manifest)
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
