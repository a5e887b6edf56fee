use super::{provider::GitProvider, repo::WorktreeRecord};
use anyhow::Result;
use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::Mutex,
};

/// In-memory [`GitProvider`] for tests.
///
/// `*_result` fields are consumed by the next matching call and default to
/// `Ok(())`; `*_calls` record what was asked.
#[derive(Default)]
pub struct MockGitProvider {
    pub toplevel: Option<PathBuf>,
    pub common_dir: Option<PathBuf>,
    pub current_branch: Option<String>,
    /// Linked worktrees; the main record is synthesised from the queried path.
    pub worktrees: Vec<WorktreeRecord>,
    pub branches: Vec<String>,
    pub remote_branches: Vec<String>,
    pub remote_head: Option<String>,
    pub remote_url: Option<String>,
    pub dirty: HashSet<PathBuf>,
    pub ahead_behind: HashMap<PathBuf, (usize, usize)>,

    pub fetch_result: Mutex<Option<Result<()>>>,
    pub fetch_calls: Mutex<Vec<Option<String>>>,
    pub add_worktree_result: Mutex<Option<Result<()>>>,
    pub add_worktree_calls: Mutex<Vec<(String, PathBuf)>>,
    pub create_branch_result: Mutex<Option<Result<()>>>,
    /// Failures for specific start points, checked before `create_branch_result`.
    pub create_branch_failures: Mutex<HashMap<String, String>>,
    pub create_branch_calls: Mutex<Vec<(String, String, PathBuf)>>,
    pub set_upstream_calls: Mutex<Vec<(PathBuf, String)>>,
    pub remove_worktree_result: Mutex<Option<Result<()>>>,
    pub remove_worktree_calls: Mutex<Vec<(PathBuf, bool)>>,
    pub prune_worktrees_calls: Mutex<Vec<PathBuf>>,
}

impl MockGitProvider {
    pub fn with_worktree(mut self, branch: &str, path: impl Into<PathBuf>) -> Self {
        self.worktrees.push(WorktreeRecord {
            branch: branch.to_string(),
            path: path.into(),
            is_main: false,
        });
        self
    }
}

impl GitProvider for MockGitProvider {
    fn toplevel(&self, _dir: &Path) -> Option<PathBuf> {
        self.toplevel.clone()
    }

    fn common_dir(&self, _dir: &Path) -> Option<PathBuf> {
        self.common_dir.clone()
    }

    fn current_branch(&self, _checkout: &Path) -> Option<String> {
        self.current_branch.clone()
    }

    fn list_worktrees(&self, main_repo: &Path) -> Vec<WorktreeRecord> {
        std::iter::once(WorktreeRecord::main(main_repo))
            .chain(self.worktrees.iter().cloned())
            .collect()
    }

    fn list_branches(&self, _repo_path: &Path) -> Vec<String> {
        self.branches.clone()
    }

    fn list_remote_branches(&self, _repo_path: &Path) -> Vec<String> {
        self.remote_branches.clone()
    }

    fn has_local_branch(&self, _repo_path: &Path, branch: &str) -> bool {
        self.branches.iter().any(|b| b == branch)
    }

    fn has_remote_branch(&self, _repo_path: &Path, branch: &str) -> bool {
        self.remote_branches.iter().any(|b| b == branch)
    }

    fn remote_head_branch(&self, _repo_path: &Path) -> Option<String> {
        self.remote_head.clone()
    }

    fn remote_url(&self, _repo_path: &Path) -> Option<String> {
        self.remote_url.clone()
    }

    fn is_dirty(&self, checkout: &Path) -> bool {
        self.dirty.contains(checkout)
    }

    fn ahead_behind(&self, checkout: &Path) -> Option<(usize, usize)> {
        self.ahead_behind.get(checkout).copied()
    }

    fn fetch_origin(&self, _repo_path: &Path) -> Result<()> {
        self.fetch_calls.lock().unwrap().push(None);
        self.fetch_result.lock().unwrap().take().unwrap_or(Ok(()))
    }

    fn fetch_branch(&self, _repo_path: &Path, branch: &str) -> Result<()> {
        self.fetch_calls
            .lock()
            .unwrap()
            .push(Some(branch.to_string()));
        self.fetch_result.lock().unwrap().take().unwrap_or(Ok(()))
    }

    fn add_worktree(&self, _repo_path: &Path, branch: &str, worktree_path: &Path) -> Result<()> {
        self.add_worktree_calls
            .lock()
            .unwrap()
            .push((branch.to_string(), worktree_path.to_path_buf()));
        self.add_worktree_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Ok(()))
    }

    fn create_branch_and_worktree(
        &self,
        _repo_path: &Path,
        new_branch: &str,
        base: &str,
        worktree_path: &Path,
    ) -> Result<()> {
        self.create_branch_calls.lock().unwrap().push((
            new_branch.to_string(),
            base.to_string(),
            worktree_path.to_path_buf(),
        ));
        if let Some(message) = self.create_branch_failures.lock().unwrap().remove(base) {
            anyhow::bail!(message);
        }
        self.create_branch_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Ok(()))
    }

    fn set_upstream(&self, worktree_path: &Path, branch: &str) -> Result<()> {
        self.set_upstream_calls
            .lock()
            .unwrap()
            .push((worktree_path.to_path_buf(), branch.to_string()));
        Ok(())
    }

    fn remove_worktree(&self, _repo_path: &Path, worktree_path: &Path, force: bool) -> Result<()> {
        self.remove_worktree_calls
            .lock()
            .unwrap()
            .push((worktree_path.to_path_buf(), force));
        self.remove_worktree_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Ok(()))
    }

    fn prune_worktrees(&self, repo_path: &Path) -> Result<()> {
        self.prune_worktrees_calls
            .lock()
            .unwrap()
            .push(repo_path.to_path_buf());
        Ok(())
    }
}
