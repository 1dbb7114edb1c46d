use super::*;

use crate::foundation::color::Color;
use crate::rules::model::{ImageShape, ImageType};

fn rules_doc(yaml: &str) -> RulesDoc {
    serde_yaml::from_str(yaml).unwrap()
}

fn overrides_doc(yaml: &str) -> OverridesDoc {
    serde_yaml::from_str(yaml).unwrap()
}

#[test]
fn document_order_is_preserved() {
    let doc = rules_doc(
        "rules:\n\
         \x20 - {label: app-icon, output_size: 512}\n\
         \x20 - {label: tray-menu, output_size: 32}\n",
    );
    let rules = resolve_rules(&doc, None).unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].label.as_deref(), Some("app-icon"));
    assert_eq!(rules[1].label.as_deref(), Some("tray-menu"));
    assert_eq!(rules[0].recipe.output_size, Some(512));
}

#[test]
fn entries_merge_onto_defaults() {
    let doc = rules_doc("rules:\n  - {label: icon, image_mask: circle}\n");
    let rules = resolve_rules(&doc, None).unwrap();
    assert_eq!(rules[0].recipe.image_mask, ImageShape::Circle);
    // everything else stays at the recipe defaults
    assert_eq!(rules[0].recipe.image_type, ImageType::Png);
    assert_eq!(rules[0].recipe.background, Color::transparent());
    assert!(!rules[0].exclude);
}

#[test]
fn label_override_wins_over_global() {
    let doc = rules_doc("rules:\n  - {label: icon, background: white}\n");
    let overrides = overrides_doc(
        "global: {background: black}\n\
         label:\n\
         \x20 icon: {background: transparent}\n",
    );
    let rules = resolve_rules(&doc, Some(&overrides)).unwrap();
    assert_eq!(rules[0].recipe.background, Color::transparent());
}

#[test]
fn global_override_applies_to_every_rule() {
    let doc = rules_doc(
        "rules:\n\
         \x20 - {label: a}\n\
         \x20 - {label: b}\n",
    );
    let overrides = overrides_doc("global: {output_shape: circle}");
    let rules = resolve_rules(&doc, Some(&overrides)).unwrap();
    assert!(
        rules
            .iter()
            .all(|r| r.recipe.output_shape == ImageShape::Circle)
    );
}

#[test]
fn label_override_only_touches_matching_rules() {
    let doc = rules_doc(
        "rules:\n\
         \x20 - {label: a, background: white}\n\
         \x20 - {label: b, background: white}\n",
    );
    let overrides = overrides_doc("label:\n  a: {background: black}\n");
    let rules = resolve_rules(&doc, Some(&overrides)).unwrap();
    assert_eq!(rules[0].recipe.background, Color::black());
    assert_eq!(rules[1].recipe.background, Color::white());
}

#[test]
fn empty_rule_list_is_an_error() {
    let doc = rules_doc("rules: []");
    assert!(resolve_rules(&doc, None).is_err());
}

#[test]
fn missing_label_is_an_error() {
    let doc = rules_doc("rules:\n  - {output_size: 64}\n");
    let err = resolve_rules(&doc, None).unwrap_err();
    assert!(err.to_string().contains("rule 0"));
}

#[test]
fn validation_failure_names_rule_index_and_label() {
    let doc = rules_doc(
        "rules:\n\
         \x20 - {label: ok}\n\
         \x20 - {label: bad, image_type: ICO, output_size: 64}\n",
    );
    let err = resolve_rules(&doc, None).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("rule 1 (bad)"), "unexpected message: {msg}");
}

#[test]
fn override_can_invalidate_a_rule() {
    // the document alone is fine; the override pushes it over the limit
    let doc = rules_doc("rules:\n  - {label: icon, image_scale: 0.9}\n");
    let overrides = overrides_doc("global: {border_scale: 1.2}");
    assert!(resolve_rules(&doc, None).is_ok());
    assert!(resolve_rules(&doc, Some(&overrides)).is_err());
}

#[test]
fn unknown_document_fields_are_rejected() {
    assert!(serde_yaml::from_str::<RulesDoc>("rules: []\nextra: 1\n").is_err());
    assert!(serde_yaml::from_str::<OverridesDoc>("globall: {}\n").is_err());
}

#[test]
fn load_rules_reports_the_file_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gen.yaml");
    std::fs::write(&path, "rules: [{label: icon, image_type: WEBP}]").unwrap();
    let err = load_rules(&path).unwrap_err();
    assert!(err.to_string().contains("gen.yaml"));
}
