use super::provider::GitProvider;
use crate::constants::MAIN_BRANCH_LABEL;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One entry of git's worktree registry, as seen from the main checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorktreeRecord {
    pub branch: String,
    pub path: PathBuf,
    pub is_main: bool,
}

impl WorktreeRecord {
    pub fn main(main_repo: &Path) -> Self {
        Self {
            branch: MAIN_BRANCH_LABEL.to_string(),
            path: main_repo.to_path_buf(),
            is_main: true,
        }
    }
}

/// Where the current directory sits within a repository and its worktrees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocation {
    /// The main checkout, even when started from inside a linked worktree.
    pub main_repo: PathBuf,
    /// Top level of the checkout containing the current directory.
    pub checkout_root: PathBuf,
}

impl RepoLocation {
    /// Find the repository containing `cwd`. `None` outside a git checkout.
    pub fn discover(git: &dyn GitProvider, cwd: &Path) -> Option<Self> {
        let checkout_root = git.toplevel(cwd)?;
        let common_dir = git.common_dir(cwd)?;
        let common_dir = dunce::canonicalize(&common_dir).unwrap_or(common_dir);
        // the common dir is `<main>/.git`
        let main_repo = common_dir.parent()?.to_path_buf();
        Some(Self {
            main_repo,
            checkout_root: dunce::canonicalize(&checkout_root).unwrap_or(checkout_root),
        })
    }

    pub fn in_linked_worktree(&self) -> bool {
        self.checkout_root != self.main_repo
    }
}
