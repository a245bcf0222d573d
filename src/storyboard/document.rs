use crate::foundation::error::{StoryError, StoryResult};
use crate::normalize::pass::normalize_document;
use crate::normalize::schema::SchemaError;
use crate::storyboard::model::{NarrationItem, Storyboard};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

impl Storyboard {
    /// Parse and normalize a storyboard from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> StoryResult<Self> {
        let value: serde_json::Value =
            serde_json::from_reader(r).map_err(|e| SchemaError::unparseable(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Parse and normalize a storyboard from a JSON string.
    pub fn from_json_str(s: &str) -> StoryResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(s).map_err(|e| SchemaError::unparseable(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Parse and normalize a storyboard from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> StoryResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StoryError::validation(format!("open storyboard JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Normalize an already-parsed JSON document.
    pub fn from_value(value: &serde_json::Value) -> StoryResult<Self> {
        Ok(normalize_document(value)?)
    }

    /// Ordered narration inputs for the speech synthesizer.
    ///
    /// Segments without narration text are skipped; segments without an id get `seg<N>`
    /// (1-based position in the storyboard).
    pub fn narration_items(&self) -> Vec<NarrationItem> {
        self.segments
            .iter()
            .enumerate()
            .filter_map(|(i, seg)| {
                let text = seg.narration.as_deref()?.trim();
                if text.is_empty() {
                    return None;
                }
                let id = seg
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("seg{}", i + 1));
                Some(NarrationItem {
                    id,
                    text: text.to_owned(),
                })
            })
            .collect()
    }

    /// Copy measured narration durations onto segments with matching ids.
    ///
    /// Returns how many segments were updated.
    pub fn apply_durations<'a>(
        &mut self,
        durations: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> usize {
        let mut updated = 0;
        for (id, secs) in durations {
            if !secs.is_finite() || secs < 0.0 {
                continue;
            }
            for seg in self
                .segments
                .iter_mut()
                .filter(|s| s.id.as_deref() == Some(id))
            {
                seg.duration_secs = Some(secs);
                updated += 1;
            }
        }
        updated
    }
}

#[cfg(test)]
#[path = "../../tests/unit/storyboard/document.rs"]
mod tests;
