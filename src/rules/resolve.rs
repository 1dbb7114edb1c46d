use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;

use crate::foundation::error::{EmblemError, EmblemResult};
use crate::rules::model::{GenerationRule, RulePatch};

/// Per-category rule-definition document (`gen.yaml`). Document order is
/// preserved: it determines output enumeration order and the rule indices
/// used in diagnostics.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesDoc {
    pub rules: Vec<RulePatch>,
}

/// Optional per-player override document (`overrides/<player>.yaml`).
///
/// `global` applies to every rule first; the matching `label` entry applies
/// after it, so the most specific layer wins.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverridesDoc {
    #[serde(default)]
    pub global: Option<RulePatch>,
    #[serde(default)]
    pub label: Option<BTreeMap<String, RulePatch>>,
}

pub fn load_rules(path: &Path) -> EmblemResult<RulesDoc> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read rules '{}'", path.display()))?;
    serde_yaml::from_str(&text)
        .map_err(|e| EmblemError::config(format!("failed to parse {}: {e}", path.display())))
}

pub fn load_overrides(path: &Path) -> EmblemResult<OverridesDoc> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read overrides '{}'", path.display()))?;
    serde_yaml::from_str(&text)
        .map_err(|e| EmblemError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Merge every document entry onto an all-defaults rule, layer the override
/// document on top, and validate the final rules.
///
/// Every resolved rule must carry a label; an empty rule list is an error
/// because a player must produce at least one output.
pub fn resolve_rules(
    doc: &RulesDoc,
    overrides: Option<&OverridesDoc>,
) -> EmblemResult<Vec<GenerationRule>> {
    if doc.rules.is_empty() {
        return Err(EmblemError::validation("generation rules are empty"));
    }

    let defaults = GenerationRule::default();
    let mut resolved = Vec::with_capacity(doc.rules.len());
    for (i, patch) in doc.rules.iter().enumerate() {
        let mut rule = defaults.merged(patch);
        if let Some(ov) = overrides {
            if let Some(global) = &ov.global {
                rule = rule.merged(global);
            }
            if let Some(by_label) = &ov.label
                && let Some(label) = rule.label.clone()
                && let Some(label_patch) = by_label.get(&label)
            {
                rule = rule.merged(label_patch);
            }
        }

        let Some(label) = rule.label.clone() else {
            return Err(EmblemError::validation(format!("rule {i} has no label")));
        };
        rule.recipe.validate().map_err(|e| match e {
            EmblemError::Validation(msg) => {
                EmblemError::Validation(format!("rule {i} ({label}): {msg}"))
            }
            other => other,
        })?;
        resolved.push(rule);
    }
    Ok(resolved)
}

#[cfg(test)]
#[path = "../../tests/unit/rules/resolve.rs"]
mod tests;
