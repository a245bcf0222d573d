use crate::foundation::core::HexColor;
use crate::foundation::error::{StoryError, StoryResult};

/// Options controlling script generation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorOpts {
    /// Name of the generated scene class; the runtime instantiates it by this name.
    pub scene_name: String,
    /// Font family passed to every text object.
    pub font: String,
    /// Scene background color.
    pub background: String,
    /// Hold after a segment's reveals when its narration length is unknown.
    pub default_hold_secs: f64,
    /// Shortest hold when the narration is shorter than the animation.
    pub min_hold_secs: f64,
}

impl Default for GeneratorOpts {
    fn default() -> Self {
        Self {
            scene_name: "TutorScene".to_owned(),
            font: "PingFang SC".to_owned(),
            background: "#0f172a".to_owned(),
            default_hold_secs: 2.0,
            min_hold_secs: 0.5,
        }
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

impl GeneratorOpts {
    pub fn validate(&self) -> StoryResult<()> {
        if !is_identifier(&self.scene_name) {
            return Err(StoryError::validation(format!(
                "scene_name '{}' must be an ASCII identifier",
                self.scene_name
            )));
        }
        if self.font.trim().is_empty() {
            return Err(StoryError::validation("font must be non-empty"));
        }
        if HexColor::parse(&self.background).is_none() {
            return Err(StoryError::validation(format!(
                "background '{}' must be a hex color",
                self.background
            )));
        }
        if !self.default_hold_secs.is_finite() || self.default_hold_secs < 0.0 {
            return Err(StoryError::validation(
                "default_hold_secs must be finite and >= 0",
            ));
        }
        if !self.min_hold_secs.is_finite() || self.min_hold_secs < 0.0 {
            return Err(StoryError::validation(
                "min_hold_secs must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/opts.rs"]
mod tests;
