use crate::{
    constants::{DEFAULT_BRANCH_CANDIDATES, FALLBACK_DEFAULT_BRANCH, ORIGIN, is_main_alias},
    error::{WorktreeError, WorktreeResult},
    git::{GitProvider, WorktreeRecord},
    handoff::{exclude_worktree_base, link_handoff},
    layout::WorktreeLayout,
};
use log::{debug, info, warn};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

/// Lifecycle of the worktrees belonging to one main repository.
///
/// Cheap to clone so background refreshers can own a copy.
#[derive(Clone)]
pub struct WorktreeStore {
    git: Arc<dyn GitProvider>,
    main_repo: PathBuf,
    layout: WorktreeLayout,
}

impl WorktreeStore {
    pub fn new(git: Arc<dyn GitProvider>, main_repo: impl Into<PathBuf>, layout: WorktreeLayout) -> Self {
        Self {
            git,
            main_repo: main_repo.into(),
            layout,
        }
    }

    pub fn git(&self) -> &dyn GitProvider {
        self.git.as_ref()
    }

    pub fn main_repo(&self) -> &Path {
        &self.main_repo
    }

    pub fn layout(&self) -> &WorktreeLayout {
        &self.layout
    }

    /// The registry, main checkout first. Git failures leave just the main record.
    pub fn list(&self) -> Vec<WorktreeRecord> {
        self.git.list_worktrees(&self.main_repo)
    }

    /// Path of the registered worktree for `branch`, the main checkout for main aliases.
    pub fn find(&self, branch: &str) -> Option<PathBuf> {
        if is_main_alias(branch) {
            return Some(self.main_repo.clone());
        }
        self.list()
            .into_iter()
            .find(|wt| !wt.is_main && wt.branch == branch)
            .map(|wt| wt.path)
    }

    pub fn exists(&self, branch: &str) -> bool {
        self.find(branch).is_some()
    }

    /// Where `branch` lives or would be created.
    pub fn path_for(&self, branch: &str) -> PathBuf {
        self.layout.resolve(branch, &self.main_repo, &self.list())
    }

    pub fn base_dir(&self) -> PathBuf {
        self.layout.base(&self.main_repo)
    }

    pub fn is_dirty(&self, path: &Path) -> bool {
        self.git.is_dirty(path)
    }

    /// Branch checked out in the main repository.
    pub fn main_branch(&self) -> Option<String> {
        self.git.current_branch(&self.main_repo)
    }

    /// Local `main`, then local `master`, then origin's HEAD, then `main`.
    pub fn default_branch(&self) -> String {
        DEFAULT_BRANCH_CANDIDATES
            .iter()
            .find(|candidate| self.git.has_local_branch(&self.main_repo, candidate))
            .map(ToString::to_string)
            .or_else(|| self.git.remote_head_branch(&self.main_repo))
            .unwrap_or_else(|| FALLBACK_DEFAULT_BRANCH.to_string())
    }

    /// `git fetch origin`; failures are logged and reported as `false`.
    pub fn fetch_origin(&self) -> bool {
        match self.git.fetch_origin(&self.main_repo) {
            Ok(()) => true,
            Err(e) => {
                debug!("fetch origin failed in {}: {e:#}", self.main_repo.display());
                false
            }
        }
    }

    /// Create a worktree for `branch` at its templated location.
    ///
    /// An existing local branch is checked out as is, a branch only on origin
    /// is created tracking it, and anything else becomes a new branch off the
    /// default branch (origin's copy when reachable) set up to push to a
    /// same-named branch on origin. The handoff note is linked afterwards.
    pub fn create(&self, branch: &str) -> WorktreeResult<PathBuf> {
        if is_main_alias(branch) {
            return Err(WorktreeError::ReservedName {
                branch: branch.to_string(),
            });
        }
        if self.main_branch().as_deref() == Some(branch) {
            return Err(WorktreeError::CheckedOutInMain {
                branch: branch.to_string(),
            });
        }

        let path = self.layout.compute(branch, &self.main_repo);
        if path.exists() {
            return Err(WorktreeError::AlreadyExists { path });
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| WorktreeError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        self.add_worktree(branch, &path)
            .map_err(|e| WorktreeError::Git {
                action: "create",
                branch: branch.to_string(),
                cause: format!("{e:#}"),
            })?;
        info!("created worktree for {branch} at {}", path.display());

        if let Err(e) = exclude_worktree_base(&self.main_repo, &self.base_dir()) {
            warn!("could not exclude worktree base from {}: {e}", self.main_repo.display());
        }
        if let Err(e) = link_handoff(&self.main_repo, &path, branch) {
            warn!("could not link handoff note for {branch}: {e}");
        }
        Ok(path)
    }

    fn add_worktree(&self, branch: &str, path: &Path) -> anyhow::Result<()> {
        let git = self.git.as_ref();
        let repo = self.main_repo.as_path();

        if git.has_local_branch(repo, branch) {
            return git.add_worktree(repo, branch, path);
        }
        if git.has_remote_branch(repo, branch) {
            return git.create_branch_and_worktree(repo, branch, &format!("{ORIGIN}/{branch}"), path);
        }

        let default = self.default_branch();
        if let Err(e) = git.fetch_branch(repo, &default) {
            debug!("fetch {ORIGIN} {default} failed: {e:#}");
        }
        let remote_default = format!("{ORIGIN}/{default}");
        if let Err(e) = git.create_branch_and_worktree(repo, branch, &remote_default, path) {
            debug!("branching {branch} from {remote_default} failed, using local {default}: {e:#}");
            git.create_branch_and_worktree(repo, branch, &default, path)?;
        }
        if let Err(e) = git.set_upstream(path, branch) {
            warn!("could not configure upstream for {branch}: {e:#}");
        }
        Ok(())
    }

    /// Remove the worktree at `path`.
    ///
    /// Dirty worktrees need `force`. When git refuses, the directory is
    /// deleted by hand and the registry pruned; that fallback never fails.
    pub fn delete(&self, path: &Path, force: bool) -> WorktreeResult<()> {
        if path == self.main_repo {
            return Err(WorktreeError::DeleteMain {
                path: path.to_path_buf(),
            });
        }
        if !force && self.git.is_dirty(path) {
            return Err(WorktreeError::Dirty {
                path: path.to_path_buf(),
            });
        }

        match self.git.remove_worktree(&self.main_repo, path, force) {
            Ok(()) => info!("removed worktree {}", path.display()),
            Err(e) => {
                warn!(
                    "git worktree remove failed for {}, removing by hand: {e:#}",
                    path.display()
                );
                if let Err(e) = fs::remove_dir_all(path) {
                    debug!("remove_dir_all {}: {e}", path.display());
                }
                if let Err(e) = self.git.prune_worktrees(&self.main_repo) {
                    debug!("worktree prune failed: {e:#}");
                }
            }
        }
        Ok(())
    }

    /// Remove the worktree registered for `branch`; returns the removed path.
    pub fn delete_branch(&self, branch: &str, force: bool) -> WorktreeResult<PathBuf> {
        if is_main_alias(branch) {
            return Err(WorktreeError::ReservedName {
                branch: branch.to_string(),
            });
        }
        let path = self.find(branch).ok_or_else(|| WorktreeError::NotFound {
            branch: branch.to_string(),
        })?;
        self.delete(&path, force)?;
        Ok(path)
    }
}
