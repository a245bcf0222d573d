//! Pair each rendered clip with its narration, then stitch the pairs into one video.
//!
//! Every ffmpeg invocation is built by a pure function so the argument vectors can be checked
//! without ffmpeg installed; [`mux`] only sequences and runs them.

use crate::foundation::error::{StoryError, StoryResult};
use crate::media::probe::probe_duration;
use crate::media::tool::{ToolCommand, ensure_parent_dir, is_on_path};
use anyhow::Context as _;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Background music gain relative to narration.
pub const BGM_VOLUME: f64 = 0.08;

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MuxManifest {
    pub segments: Vec<MuxPair>,
    #[serde(default)]
    pub background_music: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MuxPair {
    pub id: String,
    pub video: PathBuf,
    pub audio: PathBuf,
}

impl MuxManifest {
    /// Load a manifest; relative media paths resolve against the manifest's directory.
    pub fn from_path(path: impl AsRef<Path>) -> StoryResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StoryError::validation(format!("open mux manifest '{}': {e}", path.display()))
        })?;
        let mut manifest: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| StoryError::serde(format!("mux manifest: {e}")))?;
        if let Some(base) = path.parent() {
            manifest.resolve_relative_to(base);
        }
        manifest.validate()?;
        Ok(manifest)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        let fix = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        for pair in &mut self.segments {
            fix(&mut pair.video);
            fix(&mut pair.audio);
        }
        if let Some(m) = self.background_music.as_mut() {
            fix(m);
        }
    }

    pub fn validate(&self) -> StoryResult<()> {
        if self.segments.is_empty() {
            return Err(StoryError::validation(
                "mux manifest must list at least one segment",
            ));
        }
        if let Some(pair) = self.segments.iter().find(|p| p.id.trim().is_empty()) {
            return Err(StoryError::validation(format!(
                "mux segment with video '{}' has an empty id",
                pair.video.display()
            )));
        }
        Ok(())
    }
}

/// How one clip is fitted to its narration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FitPlan {
    /// Video is at least as long as the audio: cut it to `secs`.
    Trim { secs: f64 },
    /// Audio is longer: hold the last frame for `extra_secs`.
    Freeze { extra_secs: f64 },
}

pub fn plan_fit(video_secs: f64, audio_secs: f64) -> FitPlan {
    if video_secs >= audio_secs {
        FitPlan::Trim { secs: audio_secs }
    } else {
        FitPlan::Freeze {
            extra_secs: audio_secs - video_secs,
        }
    }
}

fn ffmpeg() -> ToolCommand {
    ToolCommand::new("ffmpeg").args(["-y", "-loglevel", "error"])
}

/// Attach `audio` to `video`, cutting at `secs` when given.
pub fn attach_audio_command(
    video: &Path,
    audio: &Path,
    secs: Option<f64>,
    out: &Path,
) -> ToolCommand {
    let mut cmd = ffmpeg()
        .arg("-i")
        .path_arg(video)
        .arg("-i")
        .path_arg(audio)
        .args(["-map", "0:v:0", "-map", "1:a:0"]);
    if let Some(secs) = secs {
        cmd = cmd.arg("-t").arg(format!("{secs:.3}"));
    }
    cmd.args(["-c:v", "libx264", "-c:a", "aac", "-shortest"])
        .path_arg(out)
}

pub fn freeze_command(video: &Path, extra_secs: f64, out: &Path) -> ToolCommand {
    ffmpeg()
        .arg("-i")
        .path_arg(video)
        .arg("-vf")
        .arg(format!(
            "tpad=stop_mode=clone:stop_duration={extra_secs:.3}"
        ))
        .args(["-c:v", "libx264"])
        .path_arg(out)
}

/// Body of an ffmpeg concat-demuxer list. Single quotes are escaped as `'\''`.
pub fn concat_list(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| {
            let s = p.to_string_lossy().replace('\'', r"'\''");
            format!("file '{s}'\n")
        })
        .collect()
}

pub fn concat_video_command(list: &Path, out: &Path) -> ToolCommand {
    ffmpeg()
        .args(["-f", "concat", "-safe", "0", "-i"])
        .path_arg(list)
        .args(["-c:v", "libx264", "-c:a", "aac"])
        .path_arg(out)
}

pub fn concat_audio_command(list: &Path, out: &Path) -> ToolCommand {
    ffmpeg()
        .args(["-f", "concat", "-safe", "0", "-i"])
        .path_arg(list)
        .args(["-acodec", "libmp3lame", "-q:a", "2"])
        .path_arg(out)
}

/// Loop `music` under the narration at [`BGM_VOLUME`], cut to `total_secs`.
pub fn background_music_command(
    video: &Path,
    music: &Path,
    total_secs: f64,
    out: &Path,
) -> ToolCommand {
    ffmpeg()
        .arg("-i")
        .path_arg(video)
        .args(["-stream_loop", "-1", "-i"])
        .path_arg(music)
        .arg("-filter_complex")
        .arg(format!(
            "[1:a]volume={BGM_VOLUME},atrim=duration={total_secs:.3}[bg];\
             [0:a][bg]amix=inputs=2:duration=first[aout]"
        ))
        .args(["-map", "0:v", "-map", "[aout]", "-c:v", "copy", "-c:a", "aac"])
        .path_arg(out)
}

/// `<stem>_final.<ext>` next to `out`.
pub fn final_output_path(out: &Path) -> PathBuf {
    let stem = out
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match out.extension() {
        Some(ext) => format!("{stem}_final.{}", ext.to_string_lossy()),
        None => format!("{stem}_final"),
    };
    out.with_file_name(name)
}

/// Outcome of a mux run.
#[derive(Clone, Debug, PartialEq)]
pub struct MuxReport {
    /// Concatenated video with narration.
    pub output: PathBuf,
    /// Same video with background music, when music was mixed.
    pub final_output: Option<PathBuf>,
    /// `(id, narration seconds)` per clip, in order.
    pub clips: Vec<(String, f64)>,
}

fn run(cmd: &ToolCommand) -> StoryResult<String> {
    cmd.output().map_err(StoryError::media)
}

fn fit_clip(pair: &MuxPair, workdir: &Path, idx: usize) -> StoryResult<(PathBuf, f64)> {
    let audio_secs = probe_duration(&pair.audio)?;
    let video_secs = probe_duration(&pair.video)?;
    let out = workdir.join(format!("{idx:02}_{}.mp4", sanitize(&pair.id)));
    match plan_fit(video_secs, audio_secs) {
        FitPlan::Trim { secs } => {
            run(&attach_audio_command(&pair.video, &pair.audio, Some(secs), &out))?;
        }
        FitPlan::Freeze { extra_secs } => {
            let frozen = workdir.join(format!("{idx:02}_frozen.mp4"));
            run(&freeze_command(&pair.video, extra_secs, &frozen))?;
            run(&attach_audio_command(&frozen, &pair.audio, None, &out))?;
        }
    }
    tracing::info!(id = %pair.id, audio_secs, video_secs, "fitted clip");
    Ok((out, audio_secs))
}

fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// Fit every pair, concatenate in order into `out`, then optionally mix background music.
#[tracing::instrument(skip(manifest), fields(segments = manifest.segments.len()))]
pub fn mux(manifest: &MuxManifest, out: &Path) -> StoryResult<MuxReport> {
    manifest.validate()?;
    if !is_on_path("ffmpeg") {
        return Err(StoryError::media(
            "ffmpeg is required for muxing, but was not found on PATH",
        ));
    }
    ensure_parent_dir(out)?;
    let parent = match out.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let workdir = tempfile::Builder::new()
        .prefix("storyreel-mux")
        .tempdir_in(parent)
        .context("create mux work directory")?;

    let mut clips = Vec::with_capacity(manifest.segments.len());
    let mut paths = Vec::with_capacity(manifest.segments.len());
    for (i, pair) in manifest.segments.iter().enumerate() {
        tracing::info!("[{}/{}] syncing '{}'", i + 1, manifest.segments.len(), pair.id);
        let (clip, secs) = fit_clip(pair, workdir.path(), i)?;
        paths.push(std::path::absolute(&clip).context("absolute clip path")?);
        clips.push((pair.id.clone(), secs));
    }

    let list = workdir.path().join("concat.txt");
    std::fs::write(&list, concat_list(&paths)).context("write concat list")?;
    run(&concat_video_command(&list, out))?;
    tracing::info!(out = %out.display(), clips = clips.len(), "concatenated");

    let final_output = match manifest.background_music.as_deref() {
        Some(music) if music.exists() => {
            let total = probe_duration(out)?;
            let final_out = final_output_path(out);
            run(&background_music_command(out, music, total, &final_out))?;
            tracing::info!(out = %final_out.display(), "mixed background music");
            Some(final_out)
        }
        Some(music) => {
            tracing::warn!(path = %music.display(), "background music not found, skipped");
            None
        }
        None => None,
    };

    Ok(MuxReport {
        output: out.to_path_buf(),
        final_output,
        clips,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/media/mux.rs"]
mod tests;
