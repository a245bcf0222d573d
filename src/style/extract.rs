use crate::classify::role::RoleCategory;
use crate::foundation::core::HexColor;
use crate::storyboard::model::StyleSpec;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Font size used when neither a key nor the descriptor names one.
pub const DEFAULT_FONT_SIZE: u32 = 22;

/// Typed visual attributes of one element.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedStyle {
    pub color: HexColor,
    /// Fill opacity in `[0, 1]`.
    pub opacity: f64,
    pub font_size: u32,
}

/// Palette defaults per category: `(color, fill opacity)`.
pub fn category_defaults(cat: RoleCategory) -> (HexColor, f64) {
    let (color, opacity) = match cat {
        RoleCategory::ShadedRegion => ("#3b82f6", 0.30),
        RoleCategory::Outline => ("#ffffff", 0.0),
        RoleCategory::GenericPolygon => ("#60a5fa", 0.0),
        RoleCategory::VertexLabelSet => ("#e2e8f0", 1.0),
        RoleCategory::SpecialPointSet => ("#facc15", 1.0),
        RoleCategory::TextAnnotation => ("#93c5fd", 1.0),
        RoleCategory::HighlightPolygon => ("#f59e0b", 0.55),
        RoleCategory::LabelForHighlight => ("#fbbf24", 1.0),
        RoleCategory::BottomCaption => ("#fbbf24", 1.0),
        RoleCategory::Unclassified => ("#e2e8f0", 1.0),
    };
    (HexColor::from_static(color), opacity)
}

const COLOR_KEYS: &[&str] = &["fill", "color", "stroke"];
const OPACITY_KEYS: &[&str] = &["opacity", "fill_opacity"];

fn hex_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Terminated by any non-ASCII-alphanumeric so CJK text may follow directly.
        Regex::new(r"(#(?:[0-9a-fA-F]{8}|[0-9a-fA-F]{6}|[0-9a-fA-F]{3}))(?:[^0-9A-Za-z]|$)")
            .expect("hex color regex should compile")
    })
}

fn opacity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)(?:fill[_\- ]?opacity|opacity|alpha|不透明度|透明度)\s*[:=：]?\s*(\d+(?:\.\d+)?|\.\d+)\s*(%?)",
        )
        .expect("opacity regex should compile")
    })
}

fn font_size_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)font[_\- ]?size\s*[:=：]?\s*(\d+)").expect("font size regex should compile")
    })
}

/// Extract color, opacity and font size for an element of category `cat`.
///
/// Each attribute walks its own chain: structured key, then descriptor pattern, then default.
/// A value that is present but unreadable counts as a miss and falls through. This function
/// never fails.
pub fn extract_style(spec: &StyleSpec, cat: RoleCategory) -> ExtractedStyle {
    let (default_color, default_opacity) = category_defaults(cat);
    let descriptor = spec.descriptor.as_deref().unwrap_or_default();

    let color = COLOR_KEYS
        .iter()
        .find_map(|k| spec.keys.get(*k).and_then(color_value))
        .or_else(|| {
            hex_re()
                .captures(descriptor)
                .and_then(|c| c.get(1))
                .and_then(|m| HexColor::parse(m.as_str()))
        })
        .unwrap_or_else(|| {
            tracing::trace!(?cat, "color falls back to category default");
            default_color
        });

    let opacity = OPACITY_KEYS
        .iter()
        .find_map(|k| spec.keys.get(*k).and_then(opacity_value))
        .or_else(|| descriptor_opacity(descriptor))
        .unwrap_or_else(|| {
            tracing::trace!(?cat, "opacity falls back to category default");
            default_opacity
        });

    let font_size = spec
        .keys
        .get("font_size")
        .and_then(font_size_value)
        .or_else(|| {
            font_size_re()
                .captures(descriptor)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .filter(|&n| n > 0)
        })
        .unwrap_or(DEFAULT_FONT_SIZE);

    ExtractedStyle {
        color,
        opacity,
        font_size,
    }
}

fn color_value(v: &Value) -> Option<HexColor> {
    v.as_str().and_then(HexColor::parse)
}

/// Accepts `0.3`, `"0.3"` and `"30%"`. Values outside `[0, 1]` are a miss.
fn opacity_value(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => unit_interval(n.as_f64()?),
        Value::String(s) => {
            let s = s.trim();
            match s.strip_suffix('%') {
                Some(pct) => unit_interval(pct.trim().parse::<f64>().ok()? / 100.0),
                None => unit_interval(s.parse().ok()?),
            }
        }
        _ => None,
    }
}

fn descriptor_opacity(descriptor: &str) -> Option<f64> {
    let caps = opacity_re().captures(descriptor)?;
    let x: f64 = caps.get(1)?.as_str().parse().ok()?;
    let is_pct = caps.get(2).is_some_and(|m| !m.as_str().is_empty());
    unit_interval(if is_pct { x / 100.0 } else { x })
}

fn unit_interval(x: f64) -> Option<f64> {
    (x.is_finite() && (0.0..=1.0).contains(&x)).then_some(x)
}

fn font_size_value(v: &Value) -> Option<u32> {
    let n = match v {
        Value::Number(n) => match n.as_u64() {
            Some(u) => u,
            None => {
                let f = n.as_f64()?;
                if f.fract() != 0.0 || f <= 0.0 {
                    return None;
                }
                f as u64
            }
        },
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    u32::try_from(n).ok().filter(|&n| n > 0)
}

#[cfg(test)]
#[path = "../../tests/unit/style/extract.rs"]
mod tests;
