use super::repo::WorktreeRecord;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Everything hive asks of git.
///
/// Queries degrade to empty/`None`/`false` when git fails; mutations report errors.
pub trait GitProvider: Send + Sync {
    /// `git rev-parse --show-toplevel` for `dir`.
    fn toplevel(&self, dir: &Path) -> Option<PathBuf>;
    /// `git rev-parse --git-common-dir` for `dir`, made absolute.
    fn common_dir(&self, dir: &Path) -> Option<PathBuf>;
    fn current_branch(&self, checkout: &Path) -> Option<String>;

    fn list_worktrees(&self, main_repo: &Path) -> Vec<WorktreeRecord>;
    fn list_branches(&self, repo_path: &Path) -> Vec<String>;
    /// Remote branches with the remote prefix stripped.
    fn list_remote_branches(&self, repo_path: &Path) -> Vec<String>;
    fn has_local_branch(&self, repo_path: &Path, branch: &str) -> bool;
    fn has_remote_branch(&self, repo_path: &Path, branch: &str) -> bool;
    /// Branch that `refs/remotes/origin/HEAD` points at.
    fn remote_head_branch(&self, repo_path: &Path) -> Option<String>;
    fn remote_url(&self, repo_path: &Path) -> Option<String>;

    fn is_dirty(&self, checkout: &Path) -> bool;
    /// Commits `(ahead, behind)` relative to the upstream branch.
    fn ahead_behind(&self, checkout: &Path) -> Option<(usize, usize)>;

    fn fetch_origin(&self, repo_path: &Path) -> Result<()>;
    fn fetch_branch(&self, repo_path: &Path, branch: &str) -> Result<()>;

    fn add_worktree(&self, repo_path: &Path, branch: &str, worktree_path: &Path) -> Result<()>;
    fn create_branch_and_worktree(
        &self,
        repo_path: &Path,
        new_branch: &str,
        base: &str,
        worktree_path: &Path,
    ) -> Result<()>;
    /// Point `branch` at the same-named branch on origin for push/pull.
    fn set_upstream(&self, worktree_path: &Path, branch: &str) -> Result<()>;
    fn remove_worktree(&self, repo_path: &Path, worktree_path: &Path, force: bool) -> Result<()>;
    fn prune_worktrees(&self, repo_path: &Path) -> Result<()>;
}
