pub mod cli;
pub mod mock;
pub mod provider;
pub mod repo;

pub use cli::CliGitProvider;
pub use provider::GitProvider;
pub use repo::{RepoLocation, WorktreeRecord};

use std::path::{Path, PathBuf};

/// Parse `git worktree list --porcelain` output into the worktree registry.
///
/// The main checkout always comes first, labelled `main` and pointing at
/// `main_repo`. Git's own main entry, detached checkouts and anything located
/// at `main_repo` are left out of the remainder.
pub fn parse_worktree_porcelain(output: &str, main_repo: &Path) -> Vec<WorktreeRecord> {
    let mut records = vec![WorktreeRecord::main(main_repo)];
    let mut current_path: Option<PathBuf> = None;
    let mut current_branch: Option<String> = None;
    let mut is_first = true;

    let mut flush = |path: Option<PathBuf>, branch: Option<String>, is_first: &mut bool| {
        let Some(path) = path else {
            return;
        };
        let was_first = std::mem::replace(is_first, false);
        if was_first || path == main_repo {
            return;
        }
        if let Some(branch) = branch {
            records.push(WorktreeRecord {
                branch,
                path,
                is_main: false,
            });
        }
    };

    for line in output.lines() {
        if let Some(p) = line.strip_prefix("worktree ") {
            current_path = Some(PathBuf::from(p));
        } else if let Some(b) = line.strip_prefix("branch refs/heads/") {
            current_branch = Some(b.to_string());
        } else if line.is_empty() {
            flush(current_path.take(), current_branch.take(), &mut is_first);
        }
    }
    // last entry may lack the trailing blank line
    flush(current_path, current_branch, &mut is_first);

    records
}

/// Names from `git branch -r`, with the remote prefix stripped and the
/// remote HEAD pointer dropped.
pub fn strip_remote_prefixes<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<String> {
    lines
        .filter_map(|line| {
            let line = line.trim();
            if line.contains("->") {
                return None;
            }
            // newer git shortens `origin/HEAD` to just `origin`
            let (_, branch) = line.split_once('/')?;
            (branch != "HEAD" && !branch.is_empty()).then(|| branch.to_string())
        })
        .collect()
}
