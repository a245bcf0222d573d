use crate::foundation::error::{StoryError, StoryResult};
use std::path::{Path, PathBuf};

/// Persona sync settings, read from TOML.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Workspace the items are copied from. A leading `~` expands to `$HOME`.
    pub source_dir: PathBuf,
    /// Git checkout that receives the items.
    #[serde(default = "default_repo_dir")]
    pub repo_dir: PathBuf,
    /// Items land in `<repo_dir>/personas/<target_subdir>/`.
    pub target_subdir: String,
    /// File or directory names relative to `source_dir`.
    pub items: Vec<String>,
    #[serde(default)]
    pub git: GitConfig,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    pub default_branch: String,
    pub commit_prefix: String,
    pub pr_title: String,
    /// `{synced_items}` is replaced with a bullet list of synced items.
    pub pr_body_template: String,
    pub auto_merge: bool,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            default_branch: "main".to_owned(),
            commit_prefix: "[sync]".to_owned(),
            pr_title: "Sync: Update persona files".to_owned(),
            pr_body_template: "Synced items:\n{synced_items}".to_owned(),
            auto_merge: true,
        }
    }
}

fn default_repo_dir() -> PathBuf {
    PathBuf::from(".")
}

fn expand_home(p: &Path) -> PathBuf {
    let Ok(rest) = p.strip_prefix("~") else {
        return p.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => p.to_path_buf(),
    }
}

impl SyncConfig {
    pub fn from_toml_str(s: &str) -> StoryResult<Self> {
        let cfg: Self =
            toml::from_str(s).map_err(|e| StoryError::serde(format!("sync config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a file; relative directories resolve against the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> StoryResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            StoryError::validation(format!("read sync config '{}': {e}", path.display()))
        })?;
        let mut cfg = Self::from_toml_str(&text)?;
        cfg.source_dir = expand_home(&cfg.source_dir);
        cfg.repo_dir = expand_home(&cfg.repo_dir);
        if let Some(base) = path.parent() {
            if cfg.source_dir.is_relative() {
                cfg.source_dir = base.join(&cfg.source_dir);
            }
            if cfg.repo_dir.is_relative() {
                cfg.repo_dir = base.join(&cfg.repo_dir);
            }
        }
        Ok(cfg)
    }

    pub fn validate(&self) -> StoryResult<()> {
        if self.items.is_empty() {
            return Err(StoryError::validation("sync config lists no items"));
        }
        let escapes = |s: &str| {
            let p = Path::new(s);
            s.trim().is_empty()
                || p.is_absolute()
                || p.components()
                    .any(|c| matches!(c, std::path::Component::ParentDir))
        };
        if escapes(&self.target_subdir) {
            return Err(StoryError::validation(format!(
                "target_subdir '{}' must be a relative path inside personas/",
                self.target_subdir
            )));
        }
        if let Some(bad) = self.items.iter().find(|i| escapes(i)) {
            return Err(StoryError::validation(format!(
                "sync item '{bad}' must be a relative path inside source_dir"
            )));
        }
        if self.git.default_branch.trim().is_empty() {
            return Err(StoryError::validation("git.default_branch must be non-empty"));
        }
        Ok(())
    }

    pub fn target_dir(&self) -> PathBuf {
        self.repo_dir.join("personas").join(&self.target_subdir)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sync/config.rs"]
mod tests;
