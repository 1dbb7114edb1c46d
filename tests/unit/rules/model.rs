use super::*;

fn patch(yaml: &str) -> RulePatch {
    serde_yaml::from_str(yaml).unwrap()
}

#[test]
fn recipe_defaults() {
    let recipe = GenerationRecipe::default();
    assert_eq!(recipe.image_type, ImageType::Png);
    assert_eq!(recipe.image_mask, ImageShape::Square);
    assert_eq!(recipe.output_shape, ImageShape::Square);
    assert_eq!(recipe.background, Color::transparent());
    assert_eq!(recipe.image_scale, 1.0);
    assert_eq!(recipe.border_scale, 1.0);
    assert_eq!(recipe.background_scale, 1.0);
    assert_eq!(recipe.output_size, None);
    assert_eq!(recipe.force_output_size, None);
    recipe.validate().unwrap();
}

#[test]
fn empty_patch_is_identity() {
    let rule = GenerationRule::default();
    assert_eq!(rule.merged(&RulePatch::default()), rule);
}

#[test]
fn merge_only_touches_present_keys() {
    let base = GenerationRule::default().merged(&patch(
        "{label: icon, background: white, image_scale: 0.8}",
    ));
    let merged = base.merged(&patch("{background: black}"));

    assert_eq!(merged.recipe.background, Color::black());
    // untouched fields keep their prior values
    assert_eq!(merged.label.as_deref(), Some("icon"));
    assert_eq!(merged.recipe.image_scale, 0.8);
    assert_eq!(merged.recipe.image_type, ImageType::Png);
}

#[test]
fn merge_returns_a_new_value() {
    let base = GenerationRule::default().merged(&patch("{label: icon}"));
    let _ = base.merged(&patch("{label: other}"));
    assert_eq!(base.label.as_deref(), Some("icon"));
}

#[test]
fn effective_image_scale_is_the_product() {
    let rule = GenerationRule::default().merged(&patch("{image_scale: 0.5, border_scale: 0.9}"));
    assert!((rule.recipe.effective_image_scale() - 0.45).abs() < 1e-12);
}

#[test]
fn ico_with_output_size_is_rejected() {
    let rule = GenerationRule::default().merged(&patch("{image_type: ICO, output_size: 64}"));
    let err = rule.recipe.validate().unwrap_err();
    assert!(err.to_string().contains("ICO"));
}

#[test]
fn jpg_with_circle_shape_is_rejected() {
    let rule = GenerationRule::default().merged(&patch("{image_type: JPG, output_shape: circle}"));
    assert!(rule.recipe.validate().is_err());
}

#[test]
fn jpg_with_background_scale_is_rejected() {
    let rule =
        GenerationRule::default().merged(&patch("{image_type: JPG, background_scale: 0.9}"));
    assert!(rule.recipe.validate().is_err());
}

#[test]
fn jpg_background_must_be_opaque() {
    let transparent =
        GenerationRule::default().merged(&patch("{image_type: JPG, background: '#ffffff80'}"));
    assert!(transparent.recipe.validate().is_err());

    let opaque =
        GenerationRule::default().merged(&patch("{image_type: JPG, background: '#ffffffff'}"));
    opaque.recipe.validate().unwrap();

    let implicit = GenerationRule::default().merged(&patch("{image_type: JPG, background: white}"));
    implicit.recipe.validate().unwrap();
}

#[test]
fn effective_upscale_is_rejected() {
    let direct = GenerationRule::default().merged(&patch("{image_scale: 1.2}"));
    assert!(direct.recipe.validate().is_err());

    // each factor is fine on its own, the product is not
    let product = GenerationRule::default().merged(&patch("{image_scale: 0.9, border_scale: 1.2}"));
    assert!(product.recipe.validate().is_err());
}

#[test]
fn scale_factors_must_be_positive_and_finite() {
    for bad in [
        "{image_scale: 0.0}",
        "{border_scale: -1.0}",
        "{background_scale: .nan}",
        "{image_scale: .inf}",
    ] {
        let rule = GenerationRule::default().merged(&patch(bad));
        assert!(rule.recipe.validate().is_err(), "accepted {bad}");
    }
}

#[test]
fn zero_output_size_is_rejected() {
    let rule = GenerationRule::default().merged(&patch("{output_size: 0}"));
    assert!(rule.recipe.validate().is_err());
}

#[test]
fn unknown_patch_fields_are_rejected() {
    assert!(serde_yaml::from_str::<RulePatch>("{frobnicate: 1}").is_err());
    assert!(serde_yaml::from_str::<RulePatch>("{image_type: WEBP}").is_err());
    assert!(serde_yaml::from_str::<RulePatch>("{image_mask: hexagon}").is_err());
}

#[test]
fn image_type_extensions() {
    assert_eq!(ImageType::Png.ext(), "png");
    assert_eq!(ImageType::Jpg.ext(), "jpg");
    assert_eq!(ImageType::Ico.ext(), "ico");
}
