use crate::foundation::error::{StoryError, StoryResult};
use crate::media::probe::probe_duration;
use crate::media::tool::ToolCommand;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const DEFAULT_VOICE: &str = "zh-CN-XiaoxiaoNeural";
pub const DEFAULT_RATE: &str = "+0%";

/// One synthesized narration file.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AudioArtifact {
    pub path: PathBuf,
    pub duration_secs: f64,
}

/// Options for a narration run.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NarrationOpts {
    pub voice: String,
    /// Signed percentage such as `+0%` or `-15%`.
    pub rate: String,
    /// Also write all items, in order, to `combined.mp3`.
    pub combined: bool,
}

impl Default for NarrationOpts {
    fn default() -> Self {
        Self {
            voice: DEFAULT_VOICE.to_owned(),
            rate: DEFAULT_RATE.to_owned(),
            combined: true,
        }
    }
}

fn rate_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"^[+-]\d{1,3}%$").expect("static regex"))
}

impl NarrationOpts {
    pub fn validate(&self) -> StoryResult<()> {
        if self.voice.trim().is_empty() {
            return Err(StoryError::validation("narration voice must be non-empty"));
        }
        if !rate_re().is_match(&self.rate) {
            return Err(StoryError::validation(format!(
                "narration rate '{}' must look like +0% or -10%",
                self.rate
            )));
        }
        Ok(())
    }
}

/// Text-to-speech backend.
pub trait SpeechSynthesizer {
    /// Speak `text` into `out` and report the resulting audio.
    fn synthesize(&self, text: &str, opts: &NarrationOpts, out: &Path)
    -> StoryResult<AudioArtifact>;
}

/// The `edge-tts` command-line client.
#[derive(Clone, Debug, Default)]
pub struct EdgeTts {
    /// Executable to run; `edge-tts` when `None`.
    pub program: Option<String>,
}

impl EdgeTts {
    pub fn command(&self, text: &str, opts: &NarrationOpts, out: &Path) -> ToolCommand {
        ToolCommand::new(self.program.as_deref().unwrap_or("edge-tts"))
            .arg("--voice")
            .arg(opts.voice.as_str())
            .arg(format!("--rate={}", opts.rate))
            .arg("--text")
            .arg(text)
            .arg("--write-media")
            .path_arg(out)
    }
}

impl SpeechSynthesizer for EdgeTts {
    fn synthesize(
        &self,
        text: &str,
        opts: &NarrationOpts,
        out: &Path,
    ) -> StoryResult<AudioArtifact> {
        self.command(text, opts, out)
            .output()
            .map_err(|e| StoryError::media(format!("edge-tts for '{}': {e}", out.display())))?;
        let duration_secs = probe_duration(out)?;
        Ok(AudioArtifact {
            path: out.to_path_buf(),
            duration_secs,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/narrate/synth.rs"]
mod tests;
