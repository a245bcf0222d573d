//! Narration for a whole storyboard: one audio file per item, plus an optional combined track.

use crate::foundation::error::{StoryError, StoryResult};
use crate::media::mux::{concat_audio_command, concat_list};
use crate::narrate::synth::{AudioArtifact, NarrationOpts, SpeechSynthesizer};
use crate::storyboard::model::{NarrationItem, Storyboard};
use anyhow::Context as _;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub const COMBINED_FILE: &str = "combined.mp3";

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct NarratedItem {
    pub id: String,
    pub audio: AudioArtifact,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct NarrationReport {
    pub items: Vec<NarratedItem>,
    pub combined: Option<PathBuf>,
}

impl NarrationReport {
    /// `(id, seconds)` pairs, ready for [`Storyboard::apply_durations`].
    pub fn durations(&self) -> impl Iterator<Item = (&str, f64)> {
        self.items
            .iter()
            .map(|i| (i.id.as_str(), i.audio.duration_secs))
    }

    pub fn total_secs(&self) -> f64 {
        self.items.iter().map(|i| i.audio.duration_secs).sum()
    }
}

/// Read narration items from either a `[{id, text}]` array or a storyboard document.
pub fn load_narration_items(path: impl AsRef<Path>) -> StoryResult<Vec<NarrationItem>> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| {
        StoryError::validation(format!("open narration JSON '{}': {e}", path.display()))
    })?;
    let value: serde_json::Value = serde_json::from_reader(BufReader::new(f))
        .map_err(|e| StoryError::serde(format!("narration JSON: {e}")))?;
    match value {
        serde_json::Value::Array(_) => serde_json::from_value(value)
            .map_err(|e| StoryError::serde(format!("narration items: {e}"))),
        other => Ok(Storyboard::from_value(&other)?.narration_items()),
    }
}

fn check_ids(items: &[NarrationItem]) -> StoryResult<()> {
    let mut seen = BTreeSet::new();
    for item in items {
        let id = item.id.as_str();
        let unsafe_id = id.trim().is_empty()
            || id == "."
            || id == ".."
            || id.contains(['/', '\\'])
            || id.chars().any(char::is_control);
        if unsafe_id {
            return Err(StoryError::validation(format!(
                "narration id '{id}' cannot be used as a file name"
            )));
        }
        if !seen.insert(id) {
            return Err(StoryError::validation(format!(
                "duplicate narration id '{id}'"
            )));
        }
    }
    Ok(())
}

fn combine(artifacts: &[NarratedItem], out_dir: &Path) -> StoryResult<PathBuf> {
    let combined = out_dir.join(COMBINED_FILE);
    if let [only] = artifacts {
        std::fs::copy(&only.audio.path, &combined)
            .with_context(|| format!("copy '{}'", only.audio.path.display()))?;
        return Ok(combined);
    }
    let paths = artifacts
        .iter()
        .map(|i| std::path::absolute(&i.audio.path))
        .collect::<Result<Vec<_>, _>>()
        .context("absolute narration paths")?;
    let list = tempfile::Builder::new()
        .prefix("storyreel-concat")
        .suffix(".txt")
        .tempfile_in(out_dir)
        .context("create concat list")?;
    std::fs::write(list.path(), concat_list(&paths)).context("write concat list")?;
    concat_audio_command(list.path(), &combined)
        .output()
        .map_err(StoryError::media)?;
    Ok(combined)
}

/// Synthesize `<id>.mp3` for each item in order. Any synthesis failure aborts the run.
#[tracing::instrument(skip(synth, items, opts), fields(items = items.len()))]
pub fn narrate(
    synth: &dyn SpeechSynthesizer,
    items: &[NarrationItem],
    out_dir: &Path,
    opts: &NarrationOpts,
) -> StoryResult<NarrationReport> {
    opts.validate()?;
    check_ids(items)?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create narration directory '{}'", out_dir.display()))?;

    tracing::info!(voice = %opts.voice, "synthesizing {} narration item(s)", items.len());
    let mut narrated = Vec::with_capacity(items.len());
    for item in items {
        let out = out_dir.join(format!("{}.mp3", item.id));
        let preview: String = item.text.chars().take(40).collect();
        tracing::debug!(id = %item.id, text = %preview, "synthesize");
        let audio = synth.synthesize(&item.text, opts, &out)?;
        tracing::info!(id = %item.id, secs = audio.duration_secs, "narrated");
        narrated.push(NarratedItem {
            id: item.id.clone(),
            audio,
        });
    }

    let combined = if opts.combined && !narrated.is_empty() {
        let path = combine(&narrated, out_dir)?;
        tracing::info!(path = %path.display(), "combined narration");
        Some(path)
    } else {
        None
    };

    Ok(NarrationReport {
        items: narrated,
        combined,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/narrate/batch.rs"]
mod tests;
