use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context as _;
use serde::Serialize;

use crate::foundation::error::{EmblemError, EmblemResult};
use crate::pipeline::{IconResult, PipelineConfig};
use crate::render::encode;

/// One public manifest entry for a produced icon.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IconEntry {
    pub label: String,
    /// Lowercase container format: `png`, `jpg` or `ico`.
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    /// Content digest, attached only for configured labels so downstream
    /// consumers can detect changes without re-downloading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
}

/// The published icon manifest: player id to ordered entry list. Players
/// that produced zero results are absent, and "no entry" means "no icons
/// available" downstream, not an error.
#[derive(Clone, Debug, Default, Serialize)]
pub struct IconManifest(BTreeMap<String, Vec<IconEntry>>);

impl IconManifest {
    /// Add one player's results, in rule order.
    pub fn insert_player(
        &mut self,
        cfg: &PipelineConfig,
        player: &str,
        results: &[IconResult],
    ) -> EmblemResult<()> {
        let base_url = cfg.base_url.trim_end_matches('/');
        let mut entries = Vec::with_capacity(results.len());
        for result in results {
            let file_name = result
                .path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| {
                    EmblemError::validation(format!(
                        "output path has no usable file name: {}",
                        result.path.display()
                    ))
                })?;
            let md5 = if cfg.labels_to_hash.contains(&result.label) {
                let bytes = fs::read(&result.path)
                    .with_context(|| format!("read '{}'", result.path.display()))?;
                Some(encode::md5_hex(&bytes))
            } else {
                None
            };
            entries.push(IconEntry {
                label: result.label.clone(),
                kind: result.image_type.ext().to_string(),
                url: format!("{base_url}/{player}/{file_name}"),
                md5,
            });
        }
        self.0.insert(player.to_string(), entries);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn players(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn entries(&self, player: &str) -> Option<&[IconEntry]> {
        self.0.get(player).map(Vec::as_slice)
    }

    /// Compact JSON, the published wire form.
    pub fn to_json(&self) -> EmblemResult<String> {
        serde_json::to_string(&self.0)
            .map_err(|e| EmblemError::validation(format!("serialize manifest: {e}")))
    }

    /// Write the manifest via a temporary file so readers never observe a
    /// partially-written document.
    pub fn write_to(&self, path: &Path) -> EmblemResult<()> {
        let json = self.to_json()?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create manifest dir '{}'", parent.display()))?;
        }
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, &json).with_context(|| format!("write '{}'", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!("rename '{}' to '{}'", tmp_path.display(), path.display())
        })?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/manifest.rs"]
mod tests;
