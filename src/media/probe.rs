use crate::foundation::error::{StoryError, StoryResult};
use crate::media::tool::ToolCommand;
use std::path::Path;

pub fn probe_command(path: &Path) -> ToolCommand {
    ToolCommand::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .path_arg(path)
}

/// Parse ffprobe's bare duration output (seconds).
pub fn parse_duration(stdout: &str) -> StoryResult<f64> {
    let first = stdout.lines().next().unwrap_or_default().trim();
    match first.parse::<f64>() {
        Ok(d) if d.is_finite() && d >= 0.0 => Ok(d),
        _ => Err(StoryError::media(format!(
            "ffprobe returned no usable duration: '{first}'"
        ))),
    }
}

/// Container duration of a media file, in seconds.
pub fn probe_duration(path: &Path) -> StoryResult<f64> {
    let out = probe_command(path)
        .output()
        .map_err(|e| StoryError::media(format!("probe '{}': {e}", path.display())))?;
    parse_duration(&out)
}

#[cfg(test)]
#[path = "../../tests/unit/media/probe.rs"]
mod tests;
