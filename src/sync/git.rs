//! Git and GitHub command builders for the sync flow, plus the seam that runs them.

use crate::media::tool::ToolCommand;
use chrono::NaiveDateTime;
use std::path::Path;

pub const BRANCH_PREFIX: &str = "sync/persona-update-";

/// Runs prepared commands. The system implementation shells out; tests record.
pub trait CommandRunner {
    /// Trimmed stdout on success, a readable failure otherwise.
    fn run(&self, cmd: &ToolCommand) -> Result<String, String>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, cmd: &ToolCommand) -> Result<String, String> {
        cmd.output()
    }
}

pub fn branch_name(now: NaiveDateTime) -> String {
    format!("{BRANCH_PREFIX}{}", now.format("%Y%m%d-%H%M%S"))
}

pub fn commit_message(prefix: &str, now: NaiveDateTime, items: &[String]) -> String {
    let mut msg = format!(
        "{prefix} Update persona files from workspace ({})\n\nSynced items:",
        now.format("%Y-%m-%d %H:%M")
    );
    for item in items {
        msg.push_str("\n- ");
        msg.push_str(item);
    }
    msg
}

pub fn pr_body(template: &str, items: &[String]) -> String {
    let list = items
        .iter()
        .map(|i| format!("- `{i}`"))
        .collect::<Vec<_>>()
        .join("\n");
    template.replace("{synced_items}", &list)
}

fn git(repo: &Path) -> ToolCommand {
    ToolCommand::new("git").current_dir(repo)
}

fn gh(repo: &Path) -> ToolCommand {
    ToolCommand::new("gh").current_dir(repo)
}

pub fn is_repo(repo: &Path) -> ToolCommand {
    git(repo).args(["rev-parse", "--git-dir"])
}

pub fn checkout(repo: &Path, branch: &str) -> ToolCommand {
    git(repo).arg("checkout").arg(branch)
}

pub fn pull(repo: &Path, branch: &str) -> ToolCommand {
    git(repo).args(["pull", "origin"]).arg(branch)
}

pub fn create_branch(repo: &Path, branch: &str) -> ToolCommand {
    git(repo).args(["checkout", "-b"]).arg(branch)
}

pub fn status_porcelain(repo: &Path) -> ToolCommand {
    git(repo).args(["status", "--porcelain"])
}

pub fn add_all(repo: &Path) -> ToolCommand {
    git(repo).args(["add", "-A"])
}

pub fn commit(repo: &Path, message: &str) -> ToolCommand {
    git(repo).args(["commit", "-m"]).arg(message)
}

pub fn push(repo: &Path, branch: &str) -> ToolCommand {
    git(repo).args(["push", "-u", "origin"]).arg(branch)
}

pub fn delete_branch(repo: &Path, branch: &str) -> ToolCommand {
    git(repo).args(["branch", "-D"]).arg(branch)
}

pub fn pr_create(repo: &Path, title: &str, body: &str, base: &str, head: &str) -> ToolCommand {
    gh(repo)
        .args(["pr", "create", "--title"])
        .arg(title)
        .arg("--body")
        .arg(body)
        .arg("--base")
        .arg(base)
        .arg("--head")
        .arg(head)
}

pub fn pr_merge(repo: &Path, branch: &str) -> ToolCommand {
    gh(repo)
        .args(["pr", "merge"])
        .arg(branch)
        .args(["--merge", "--delete-branch"])
}

#[cfg(test)]
#[path = "../../tests/unit/sync/git.rs"]
mod tests;
