use crate::foundation::error::{StoryError, StoryResult};
use crate::media::tool::ToolCommand;
use crate::sync::config::SyncConfig;
use crate::sync::git::{self, CommandRunner};
use crate::sync::hash::item_hash;
use anyhow::Context as _;
use chrono::NaiveDateTime;
use std::path::Path;
use walkdir::WalkDir;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncOpts {
    /// Log what would be copied; touch nothing.
    pub dry_run: bool,
    /// Open the pull request but never merge it.
    pub no_merge: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Every item was missing or already up to date.
    UpToDate,
    DryRun,
    /// Items were copied but git saw no difference; the branch was dropped.
    NoChanges { branch: String },
    PrOpened { branch: String, url: String },
    Merged { branch: String, url: String },
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SyncReport {
    pub synced: Vec<String>,
    pub outcome: SyncOutcome,
}

fn copy_tree(src: &Path, dst: &Path) -> anyhow::Result<()> {
    if dst.exists() {
        std::fs::remove_dir_all(dst).with_context(|| format!("remove '{}'", dst.display()))?;
    }
    for entry in WalkDir::new(src) {
        let entry = entry?;
        let rel = entry.path().strip_prefix(src)?;
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            std::fs::copy(entry.path(), &target)
                .with_context(|| format!("copy '{}'", entry.path().display()))?;
        }
    }
    Ok(())
}

fn copy_item(src: &Path, dst: &Path) -> anyhow::Result<()> {
    if src.is_dir() {
        copy_tree(src, dst)
    } else {
        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(src, dst).with_context(|| format!("copy '{}'", src.display()))?;
        Ok(())
    }
}

/// Copy each changed item into the target directory. Returns the items that changed.
///
/// Missing sources and failed copies are logged and skipped.
pub fn copy_changed_items(cfg: &SyncConfig, dry_run: bool) -> Vec<String> {
    let target_dir = cfg.target_dir();
    let mut synced = Vec::new();
    for item in &cfg.items {
        let src = cfg.source_dir.join(item);
        let dst = target_dir.join(item);
        let Some(src_hash) = item_hash(&src) else {
            tracing::warn!(path = %src.display(), "source item does not exist, skipping");
            continue;
        };
        if item_hash(&dst).as_deref() == Some(src_hash.as_str()) {
            tracing::debug!(item = %item, "unchanged");
            continue;
        }
        if dry_run {
            tracing::info!("[dry run] would copy {} -> {}", src.display(), dst.display());
            synced.push(item.clone());
            continue;
        }
        match copy_item(&src, &dst) {
            Ok(()) => {
                tracing::info!(item = %item, "synced");
                synced.push(item.clone());
            }
            Err(e) => tracing::error!(item = %item, "copy failed: {e:#}"),
        }
    }
    synced
}

fn step(runner: &dyn CommandRunner, cmd: ToolCommand) -> StoryResult<String> {
    tracing::debug!(cmd = %cmd.display(), "git step");
    runner.run(&cmd).map_err(StoryError::sync)
}

/// Branch, commit, push and open a pull request for already-copied items.
pub fn publish(
    cfg: &SyncConfig,
    synced: &[String],
    opts: SyncOpts,
    runner: &dyn CommandRunner,
    now: NaiveDateTime,
) -> StoryResult<SyncOutcome> {
    let repo = cfg.repo_dir.as_path();
    let base = cfg.git.default_branch.as_str();
    let branch = git::branch_name(now);

    step(runner, git::is_repo(repo))?;
    step(runner, git::checkout(repo, base))?;
    step(runner, git::pull(repo, base))?;
    step(runner, git::create_branch(repo, &branch))?;
    tracing::info!(%branch, "created sync branch");

    if step(runner, git::status_porcelain(repo))?.is_empty() {
        tracing::info!("no changes to commit after copy");
        step(runner, git::checkout(repo, base))?;
        if let Err(e) = runner.run(&git::delete_branch(repo, &branch)) {
            tracing::warn!(%branch, "could not delete local branch: {e}");
        }
        return Ok(SyncOutcome::NoChanges { branch });
    }

    step(runner, git::add_all(repo))?;
    let message = git::commit_message(&cfg.git.commit_prefix, now, synced);
    step(runner, git::commit(repo, &message))?;
    step(runner, git::push(repo, &branch))?;

    let body = git::pr_body(&cfg.git.pr_body_template, synced);
    let url = step(
        runner,
        git::pr_create(repo, &cfg.git.pr_title, &body, base, &branch),
    )?;
    tracing::info!(%url, "opened pull request");

    if !cfg.git.auto_merge || opts.no_merge {
        tracing::info!(%url, "auto-merge skipped");
        return Ok(SyncOutcome::PrOpened { branch, url });
    }
    match runner.run(&git::pr_merge(repo, &branch)) {
        Ok(_) => {
            step(runner, git::checkout(repo, base))?;
            step(runner, git::pull(repo, base))?;
            tracing::info!(%url, "merged pull request");
            Ok(SyncOutcome::Merged { branch, url })
        }
        Err(e) => {
            tracing::warn!(%url, "pull request created but not merged, merge manually: {e}");
            Ok(SyncOutcome::PrOpened { branch, url })
        }
    }
}

/// Copy changed items, then publish them through git and GitHub.
#[tracing::instrument(skip(cfg, runner), fields(items = cfg.items.len()))]
pub fn sync(
    cfg: &SyncConfig,
    opts: SyncOpts,
    runner: &dyn CommandRunner,
    now: NaiveDateTime,
) -> StoryResult<SyncReport> {
    cfg.validate()?;
    tracing::info!(dry_run = opts.dry_run, "persona sync started");

    let synced = copy_changed_items(cfg, opts.dry_run);
    let outcome = if synced.is_empty() {
        tracing::info!("no items needed syncing");
        SyncOutcome::UpToDate
    } else if opts.dry_run {
        tracing::info!("[dry run] would branch, commit, push and open a pull request");
        SyncOutcome::DryRun
    } else {
        tracing::info!("synced {} item(s): {}", synced.len(), synced.join(", "));
        publish(cfg, &synced, opts, runner, now)?
    };
    Ok(SyncReport { synced, outcome })
}

#[cfg(test)]
#[path = "../../tests/unit/sync/run.rs"]
mod tests;
