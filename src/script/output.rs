use crate::foundation::error::{StoryError, StoryResult};
use anyhow::Context as _;
use std::io::Write as _;
use std::path::Path;

/// Write `source` to `path` atomically: a temp file in the destination directory is filled,
/// flushed and then renamed over the target. A failed run leaves no partial file.
pub fn write_script(path: impl AsRef<Path>, source: &str) -> StoryResult<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.is_dir() {
        return Err(StoryError::validation(format!(
            "output directory '{}' does not exist",
            parent.display()
        )));
    }
    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("create temp file in '{}'", parent.display()))?;
    tmp.write_all(source.as_bytes())
        .context("write generated script")?;
    tmp.as_file().sync_all().context("flush generated script")?;
    tmp.persist(path)
        .map_err(|e| anyhow::Error::new(e.error))
        .with_context(|| format!("persist '{}'", path.display()))?;
    tracing::info!(path = %path.display(), bytes = source.len(), "wrote script");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/script/output.rs"]
mod tests;
