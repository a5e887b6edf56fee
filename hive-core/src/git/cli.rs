use super::{
    parse_worktree_porcelain, provider::GitProvider, repo::WorktreeRecord, strip_remote_prefixes,
};
use crate::constants::ORIGIN;
use anyhow::{Context, Result};
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
};

pub struct CliGitProvider;

impl CliGitProvider {
    fn command<I, S>(dir: &Path, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new("git");
        // never prompt for credentials: the picker owns the terminal
        cmd.arg("-C")
            .arg(dir)
            .args(args)
            .stdin(Stdio::null())
            .env("GIT_TERMINAL_PROMPT", "0");
        cmd
    }

    /// Run a read-only query; `None` when git fails to start or exits non-zero.
    fn query<I, S>(dir: &Path, args: I) -> Option<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = Self::command(dir, args).output().ok()?;
        if !output.status.success() {
            return None;
        }
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn succeeds<I, S>(dir: &Path, args: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Self::command(dir, args)
            .output()
            .is_ok_and(|o| o.status.success())
    }

    /// Run a mutation, turning a non-zero exit into an error carrying git's stderr.
    fn run<I, S>(dir: &Path, args: I, what: &str) -> Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = Self::command(dir, args)
            .output()
            .with_context(|| format!("failed to run git {what}"))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("git {what} failed: {}", stderr.trim());
        }
        Ok(output)
    }
}

impl GitProvider for CliGitProvider {
    fn toplevel(&self, dir: &Path) -> Option<PathBuf> {
        Self::query(dir, ["rev-parse", "--show-toplevel"])
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    }

    fn common_dir(&self, dir: &Path) -> Option<PathBuf> {
        let raw = Self::query(dir, ["rev-parse", "--git-common-dir"]).filter(|s| !s.is_empty())?;
        let path = PathBuf::from(raw);
        Some(if path.is_relative() { dir.join(path) } else { path })
    }

    fn current_branch(&self, checkout: &Path) -> Option<String> {
        Self::query(checkout, ["branch", "--show-current"]).filter(|s| !s.is_empty())
    }

    fn list_worktrees(&self, main_repo: &Path) -> Vec<WorktreeRecord> {
        let stdout = Self::query(main_repo, ["worktree", "list", "--porcelain"]).unwrap_or_default();
        parse_worktree_porcelain(&stdout, main_repo)
    }

    fn list_branches(&self, repo_path: &Path) -> Vec<String> {
        Self::query(repo_path, ["branch", "--format=%(refname:short)"])
            .map(|out| out.lines().map(String::from).collect())
            .unwrap_or_default()
    }

    fn list_remote_branches(&self, repo_path: &Path) -> Vec<String> {
        Self::query(repo_path, ["branch", "-r", "--format=%(refname:short)"])
            .map(|out| strip_remote_prefixes(out.lines()))
            .unwrap_or_default()
    }

    fn has_local_branch(&self, repo_path: &Path, branch: &str) -> bool {
        Self::succeeds(
            repo_path,
            ["show-ref", "--verify", "--quiet", &format!("refs/heads/{branch}")],
        )
    }

    fn has_remote_branch(&self, repo_path: &Path, branch: &str) -> bool {
        Self::succeeds(
            repo_path,
            [
                "show-ref",
                "--verify",
                "--quiet",
                &format!("refs/remotes/{ORIGIN}/{branch}"),
            ],
        )
    }

    fn remote_head_branch(&self, repo_path: &Path) -> Option<String> {
        let target = Self::query(
            repo_path,
            ["symbolic-ref", &format!("refs/remotes/{ORIGIN}/HEAD")],
        )?;
        target
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .map(String::from)
    }

    fn remote_url(&self, repo_path: &Path) -> Option<String> {
        Self::query(repo_path, ["remote", "get-url", ORIGIN]).filter(|s| !s.is_empty())
    }

    fn is_dirty(&self, checkout: &Path) -> bool {
        Self::query(checkout, ["status", "--porcelain"]).is_some_and(|out| !out.is_empty())
    }

    fn ahead_behind(&self, checkout: &Path) -> Option<(usize, usize)> {
        let out = Self::query(
            checkout,
            ["rev-list", "--left-right", "--count", "@{upstream}...HEAD"],
        )?;
        let mut counts = out.split_whitespace().map(str::parse::<usize>);
        let behind = counts.next()?.ok()?;
        let ahead = counts.next()?.ok()?;
        Some((ahead, behind))
    }

    fn fetch_origin(&self, repo_path: &Path) -> Result<()> {
        Self::run(repo_path, ["fetch", ORIGIN], "fetch").map(|_| ())
    }

    fn fetch_branch(&self, repo_path: &Path, branch: &str) -> Result<()> {
        Self::run(repo_path, ["fetch", ORIGIN, branch], "fetch").map(|_| ())
    }

    fn add_worktree(&self, repo_path: &Path, branch: &str, worktree_path: &Path) -> Result<()> {
        Self::run(
            repo_path,
            [
                OsStr::new("worktree"),
                OsStr::new("add"),
                worktree_path.as_os_str(),
                OsStr::new(branch),
            ],
            "worktree add",
        )
        .map(|_| ())
    }

    fn create_branch_and_worktree(
        &self,
        repo_path: &Path,
        new_branch: &str,
        base: &str,
        worktree_path: &Path,
    ) -> Result<()> {
        Self::run(
            repo_path,
            [
                OsStr::new("worktree"),
                OsStr::new("add"),
                worktree_path.as_os_str(),
                OsStr::new("-b"),
                OsStr::new(new_branch),
                OsStr::new(base),
            ],
            "worktree add -b",
        )
        .map(|_| ())
    }

    fn set_upstream(&self, worktree_path: &Path, branch: &str) -> Result<()> {
        Self::run(
            worktree_path,
            ["config", &format!("branch.{branch}.remote"), ORIGIN],
            "config",
        )?;
        Self::run(
            worktree_path,
            [
                "config",
                &format!("branch.{branch}.merge"),
                &format!("refs/heads/{branch}"),
            ],
            "config",
        )
        .map(|_| ())
    }

    fn remove_worktree(&self, repo_path: &Path, worktree_path: &Path, force: bool) -> Result<()> {
        let mut args = vec![
            OsStr::new("worktree"),
            OsStr::new("remove"),
            worktree_path.as_os_str(),
        ];
        if force {
            args.push(OsStr::new("--force"));
        }
        Self::run(repo_path, args, "worktree remove").map(|_| ())
    }

    fn prune_worktrees(&self, repo_path: &Path) -> Result<()> {
        Self::run(repo_path, ["worktree", "prune"], "worktree prune").map(|_| ())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;

    pub(crate) fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        assert!(
            status.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&status.stderr)
        );
    }

    pub(crate) fn init_test_repo(dir: &Path) {
        git(dir, &["init", "-b", "main"]);
        git(dir, &["config", "user.email", "test@test.com"]);
        git(dir, &["config", "user.name", "Test"]);
        fs::write(dir.join("README.md"), "# test").unwrap();
        git(dir, &["add", "."]);
        git(dir, &["commit", "-m", "init"]);
    }

    fn canonical_tempdir() -> (tempfile::TempDir, PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let path = dunce::canonicalize(tmp.path()).unwrap();
        (tmp, path)
    }

    #[test]
    fn test_commands_never_prompt() {
        let cmd = CliGitProvider::command(Path::new("/repo"), ["fetch", "origin"]);
        let prompt = cmd
            .get_envs()
            .find(|(key, _)| *key == "GIT_TERMINAL_PROMPT")
            .and_then(|(_, value)| value);
        assert_eq!(prompt, Some(OsStr::new("0")));
        let args: Vec<&OsStr> = cmd.get_args().collect();
        assert_eq!(args, ["-C", "/repo", "fetch", "origin"]);
    }

    #[test]
    fn test_list_branches() {
        let (_tmp, repo) = canonical_tempdir();
        init_test_repo(&repo);
        git(&repo, &["branch", "feat/test"]);

        let branches = CliGitProvider.list_branches(&repo);
        assert!(branches.contains(&"main".to_string()));
        assert!(branches.contains(&"feat/test".to_string()));
    }

    #[test]
    fn test_add_worktree_and_list() {
        let (_tmp, root) = canonical_tempdir();
        let repo = root.join("repo");
        fs::create_dir_all(&repo).unwrap();
        init_test_repo(&repo);
        git(&repo, &["branch", "feat/wt-test"]);

        let wt_path = root.join("wt");
        CliGitProvider
            .add_worktree(&repo, "feat/wt-test", &wt_path)
            .unwrap();
        assert!(wt_path.join("README.md").exists());

        let worktrees = CliGitProvider.list_worktrees(&repo);
        assert_eq!(worktrees.len(), 2);
        assert_eq!(worktrees[0], WorktreeRecord::main(&repo));
        assert_eq!(worktrees[1].branch, "feat/wt-test");
        assert_eq!(worktrees[1].path, wt_path);
    }

    #[test]
    fn test_create_branch_and_worktree() {
        let (_tmp, root) = canonical_tempdir();
        let repo = root.join("repo");
        fs::create_dir_all(&repo).unwrap();
        init_test_repo(&repo);

        let wt_path = root.join("repo-new-branch");
        CliGitProvider
            .create_branch_and_worktree(&repo, "new-branch", "main", &wt_path)
            .unwrap();

        assert!(wt_path.exists());
        assert!(CliGitProvider.has_local_branch(&repo, "new-branch"));
        assert_eq!(
            CliGitProvider.current_branch(&wt_path).as_deref(),
            Some("new-branch")
        );
    }

    #[test]
    fn test_add_worktree_fails_for_nonexistent_branch() {
        let (_tmp, repo) = canonical_tempdir();
        init_test_repo(&repo);

        let result = CliGitProvider.add_worktree(&repo, "nonexistent-branch", &repo.join("wt"));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("worktree add"), "unexpected error: {err}");
    }

    #[test]
    fn test_dirty_detection() {
        let (_tmp, repo) = canonical_tempdir();
        init_test_repo(&repo);
        assert!(!CliGitProvider.is_dirty(&repo));

        fs::write(repo.join("scratch.txt"), "wip").unwrap();
        assert!(CliGitProvider.is_dirty(&repo));
    }

    #[test]
    fn test_dirty_is_false_for_missing_path() {
        let (_tmp, root) = canonical_tempdir();
        assert!(!CliGitProvider.is_dirty(&root.join("nope")));
    }

    #[test]
    fn test_remove_worktree_force() {
        let (_tmp, root) = canonical_tempdir();
        let repo = root.join("repo");
        fs::create_dir_all(&repo).unwrap();
        init_test_repo(&repo);
        let wt_path = root.join("wt");
        CliGitProvider
            .create_branch_and_worktree(&repo, "scratch", "main", &wt_path)
            .unwrap();
        fs::write(wt_path.join("wip.txt"), "x").unwrap();

        assert!(CliGitProvider.remove_worktree(&repo, &wt_path, false).is_err());
        CliGitProvider.remove_worktree(&repo, &wt_path, true).unwrap();
        assert!(!wt_path.exists());
        assert_eq!(CliGitProvider.list_worktrees(&repo).len(), 1);
    }

    #[test]
    fn test_common_dir_from_linked_worktree() {
        let (_tmp, root) = canonical_tempdir();
        let repo = root.join("repo");
        fs::create_dir_all(&repo).unwrap();
        init_test_repo(&repo);
        let wt_path = root.join("wt");
        CliGitProvider
            .create_branch_and_worktree(&repo, "side", "main", &wt_path)
            .unwrap();

        let common = CliGitProvider.common_dir(&wt_path).unwrap();
        assert_eq!(dunce::canonicalize(common).unwrap(), repo.join(".git"));
        assert_eq!(CliGitProvider.toplevel(&wt_path), Some(wt_path));
    }

    #[test]
    fn test_no_remote_means_no_head_or_url() {
        let (_tmp, repo) = canonical_tempdir();
        init_test_repo(&repo);
        assert_eq!(CliGitProvider.remote_head_branch(&repo), None);
        assert_eq!(CliGitProvider.remote_url(&repo), None);
        assert!(CliGitProvider.list_remote_branches(&repo).is_empty());
        assert!(CliGitProvider.fetch_origin(&repo).is_err());
    }
}
