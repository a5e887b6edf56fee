use std::path::PathBuf;
use thiserror::Error;

/// Hard failures of worktree lifecycle operations.
///
/// Read-only queries never produce these; they degrade to empty or `false` results.
#[derive(Debug, Error)]
pub enum WorktreeError {
    #[error("'{branch}' refers to the main checkout and cannot be used as a worktree")]
    ReservedName { branch: String },

    #[error("branch '{branch}' is checked out in the main repository")]
    CheckedOutInMain { branch: String },

    #[error("worktree path already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("worktree {} has uncommitted changes (use --force to delete anyway)", path.display())]
    Dirty { path: PathBuf },

    #[error("refusing to delete the main repository at {}", path.display())]
    DeleteMain { path: PathBuf },

    #[error("no worktree for branch '{branch}'")]
    NotFound { branch: String },

    #[error("git worktrees are disabled (set worktrees.enabled = true to use them)")]
    WorktreesDisabled,

    #[error("not inside a git repository: {}", path.display())]
    NotARepository { path: PathBuf },

    #[error("failed to {action} worktree for '{branch}': {cause}")]
    Git {
        action: &'static str,
        branch: String,
        cause: String,
    },

    #[error("failed to prepare {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type WorktreeResult<T> = Result<T, WorktreeError>;
