use super::*;
use serde_json::json;
use std::collections::BTreeMap;

fn spec(keys: serde_json::Value, descriptor: Option<&str>) -> StyleSpec {
    let keys: BTreeMap<String, Value> = match keys {
        Value::Object(m) => m.into_iter().collect(),
        _ => BTreeMap::new(),
    };
    StyleSpec {
        keys,
        descriptor: descriptor.map(str::to_owned),
    }
}

#[test]
fn fill_key_beats_descriptor_and_default() {
    let s = spec(json!({"fill": "#112233"}), Some("#ff0000 opacity 0.9"));
    let out = extract_style(&s, RoleCategory::ShadedRegion);
    assert_eq!(out.color.as_str(), "#112233");
    assert_eq!(out.opacity, 0.9);
    assert_eq!(out.font_size, DEFAULT_FONT_SIZE);
}

#[test]
fn color_keys_follow_fill_color_stroke_order() {
    let s = spec(json!({"stroke": "#00ff00", "color": "#0000ff"}), None);
    assert_eq!(extract_style(&s, RoleCategory::Outline).color.as_str(), "#0000ff");

    // An unreadable fill falls through to the next key.
    let s = spec(json!({"fill": "blue-ish", "stroke": "#abc"}), None);
    assert_eq!(extract_style(&s, RoleCategory::Outline).color.as_str(), "#abc");
}

#[test]
fn descriptor_hex_is_used_without_keys() {
    let s = spec(json!({}), Some("蓝色填充 #3366CC, 透明度0.25"));
    let out = extract_style(&s, RoleCategory::ShadedRegion);
    assert_eq!(out.color.as_str(), "#3366CC");
    assert_eq!(out.opacity, 0.25);
}

#[test]
fn descriptor_hex_may_touch_cjk_text() {
    let s = spec(json!({}), Some("填充#ff0000半透明"));
    assert_eq!(extract_style(&s, RoleCategory::ShadedRegion).color.as_str(), "#ff0000");

    let s = spec(json!({}), Some("描边#abc"));
    assert_eq!(extract_style(&s, RoleCategory::Outline).color.as_str(), "#abc");
}

#[test]
fn seven_hex_digits_are_not_a_color() {
    let s = spec(json!({}), Some("#1122334"));
    let (default_color, _) = category_defaults(RoleCategory::GenericPolygon);
    assert_eq!(extract_style(&s, RoleCategory::GenericPolygon).color, default_color);
}

#[test]
fn empty_style_yields_category_defaults() {
    let s = StyleSpec::default();
    for cat in [
        RoleCategory::ShadedRegion,
        RoleCategory::HighlightPolygon,
        RoleCategory::Unclassified,
    ] {
        let (color, opacity) = category_defaults(cat);
        let out = extract_style(&s, cat);
        assert_eq!(out.color, color);
        assert_eq!(out.opacity, opacity);
        assert_eq!(out.font_size, DEFAULT_FONT_SIZE);
    }
}

#[test]
fn out_of_range_opacity_falls_through() {
    let s = spec(json!({"opacity": 1.5}), Some("alpha: 0.4"));
    assert_eq!(extract_style(&s, RoleCategory::ShadedRegion).opacity, 0.4);

    let s = spec(json!({"opacity": "abc"}), Some("opacity 7"));
    assert_eq!(extract_style(&s, RoleCategory::ShadedRegion).opacity, 0.30);
}

#[test]
fn percent_opacity_is_scaled() {
    let s = spec(json!({"fill_opacity": "40%"}), None);
    assert_eq!(extract_style(&s, RoleCategory::ShadedRegion).opacity, 0.4);

    let s = spec(json!({}), Some("opacity: 60%"));
    assert_eq!(extract_style(&s, RoleCategory::ShadedRegion).opacity, 0.6);
}

#[test]
fn font_size_from_key_or_descriptor() {
    let s = spec(json!({"font_size": 30}), Some("font_size=18"));
    assert_eq!(extract_style(&s, RoleCategory::TextAnnotation).font_size, 30);

    let s = spec(json!({"font_size": "big"}), Some("font-size: 18"));
    assert_eq!(extract_style(&s, RoleCategory::TextAnnotation).font_size, 18);

    let s = spec(json!({"font_size": 0}), None);
    assert_eq!(
        extract_style(&s, RoleCategory::TextAnnotation).font_size,
        DEFAULT_FONT_SIZE
    );
}
