use crate::{
    constants::{AGENT_DIR, HANDOFF_LINK, HANDOFFS_DIR, TASK_NOTE_FILE, WORKTREE_CONTEXT_FILE},
    sanitize::sanitize_branch,
};
use chrono::{DateTime, Local};
use std::{
    fmt::Write,
    fs::{self, OpenOptions},
    io,
    path::{Path, PathBuf},
};

/// Shared handoff note for `branch`, kept in the main checkout.
pub fn handoff_file(main_repo: &Path, branch: &str) -> PathBuf {
    main_repo
        .join(AGENT_DIR)
        .join(HANDOFFS_DIR)
        .join(format!("{}.md", sanitize_branch(branch)))
}

/// Make sure the handoff note exists and `<worktree>/.claude/HANDOFF.md` links to it.
///
/// The link is relative so the pair survives moving the whole tree. Anything
/// already at the link location is replaced. Returns the link path.
pub fn link_handoff(main_repo: &Path, worktree: &Path, branch: &str) -> io::Result<PathBuf> {
    let target = handoff_file(main_repo, branch);
    if let Some(dir) = target.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(&target)?;

    let link_dir = worktree.join(AGENT_DIR);
    fs::create_dir_all(&link_dir)?;
    let link = link_dir.join(HANDOFF_LINK);
    if link.symlink_metadata().is_ok() {
        fs::remove_file(&link)?;
    }

    let relative = pathdiff::diff_paths(&target, &link_dir).unwrap_or(target);
    symlink(&relative, &link)?;
    exclude_local_notes(main_repo)?;
    Ok(link)
}

/// Write `<worktree>/.claude/worktree-context.md` describing which agent owns
/// the worktree. Returns the file path.
pub fn write_agent_context(
    main_repo: &Path,
    worktree: &Path,
    agent_number: u32,
    branch: &str,
    created: DateTime<Local>,
) -> io::Result<PathBuf> {
    let dir = worktree.join(AGENT_DIR);
    fs::create_dir_all(&dir)?;
    let file = dir.join(WORKTREE_CONTEXT_FILE);
    fs::write(
        &file,
        render_agent_context(worktree, agent_number, branch, created),
    )?;
    exclude_local_notes(main_repo)?;
    Ok(file)
}

fn render_agent_context(
    worktree: &Path,
    agent_number: u32,
    branch: &str,
    created: DateTime<Local>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Agent {agent_number} Worktree Context\n");
    let _ = writeln!(out, "- **Agent**: {agent_number}");
    let _ = writeln!(out, "- **Branch**: {branch}");
    let _ = writeln!(out, "- **Worktree**: {}", worktree.display());
    let _ = writeln!(out, "- **Created**: {}\n", created.format("%Y-%m-%dT%H:%M:%S"));
    out.push_str("## Guidelines\n\n");
    out.push_str("- Work only within this worktree directory\n");
    out.push_str("- Commit frequently to preserve work\n");
    out.push_str("- This worktree is isolated from other agents\n");
    out
}

/// Keep the per-worktree agent notes out of `git status`.
fn exclude_local_notes(main_repo: &Path) -> io::Result<()> {
    let patterns: Vec<String> = [HANDOFFS_DIR, HANDOFF_LINK, TASK_NOTE_FILE, WORKTREE_CONTEXT_FILE]
        .iter()
        .map(|name| format!("/{AGENT_DIR}/{name}"))
        .collect();
    add_excludes(main_repo, &patterns)
}

/// Hide the worktree base from the main checkout when it lives inside it.
pub fn exclude_worktree_base(main_repo: &Path, base: &Path) -> io::Result<()> {
    let Ok(relative) = base.strip_prefix(main_repo) else {
        return Ok(());
    };
    if relative.as_os_str().is_empty() {
        return Ok(());
    }
    let pattern = format!("/{}/", relative.to_string_lossy().replace('\\', "/"));
    add_excludes(main_repo, &[pattern])
}

/// Append `patterns` to the repository's `info/exclude` unless already
/// listed. Repositories without a `.git` directory are left alone.
fn add_excludes(main_repo: &Path, patterns: &[String]) -> io::Result<()> {
    let git_dir = main_repo.join(".git");
    if !git_dir.is_dir() {
        return Ok(());
    }
    let exclude = git_dir.join("info").join("exclude");
    let existing = fs::read_to_string(&exclude).unwrap_or_default();
    let missing: Vec<&String> = patterns
        .iter()
        .filter(|pattern| !existing.lines().any(|line| line.trim() == pattern.as_str()))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }

    fs::create_dir_all(git_dir.join("info"))?;
    let mut contents = existing;
    if !contents.is_empty() && !contents.ends_with('\n') {
        contents.push('\n');
    }
    for pattern in missing {
        contents.push_str(pattern);
        contents.push('\n');
    }
    fs::write(exclude, contents)
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn creates_note_and_relative_link() {
        let tmp = tempfile::tempdir().unwrap();
        let main = tmp.path().join("repo");
        let wt = main.join(".worktrees").join("feat--x");
        fs::create_dir_all(&wt).unwrap();

        let link = link_handoff(&main, &wt, "feat/x").unwrap();

        let note = main.join(".claude/handoffs/feat--x.md");
        assert!(note.is_file());
        assert_eq!(link, wt.join(".claude/HANDOFF.md"));
        let target = fs::read_link(&link).unwrap();
        assert!(target.is_relative());
        assert_eq!(
            fs::canonicalize(&link).unwrap(),
            fs::canonicalize(&note).unwrap()
        );
    }

    #[test]
    fn notes_are_excluded_once() {
        let tmp = tempfile::tempdir().unwrap();
        let main = tmp.path().join("repo");
        fs::create_dir_all(main.join(".git/info")).unwrap();
        fs::write(main.join(".git/info/exclude"), "# local\n*.swp").unwrap();

        link_handoff(&main, &tmp.path().join("a"), "a").unwrap();
        link_handoff(&main, &tmp.path().join("b"), "b").unwrap();

        let exclude = fs::read_to_string(main.join(".git/info/exclude")).unwrap();
        assert_eq!(
            exclude,
            "# local\n*.swp\n/.claude/handoffs\n/.claude/HANDOFF.md\n/.claude/task.local.md\n/.claude/worktree-context.md\n"
        );
    }

    #[test]
    fn keeps_existing_note_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let main = tmp.path().join("repo");
        let wt = tmp.path().join("wt");
        fs::create_dir_all(main.join(".claude/handoffs")).unwrap();
        fs::write(main.join(".claude/handoffs/fix.md"), "left off here").unwrap();

        let link = link_handoff(&main, &wt, "fix").unwrap();
        assert_eq!(fs::read_to_string(link).unwrap(), "left off here");
    }

    #[test]
    fn replaces_existing_link_target() {
        let tmp = tempfile::tempdir().unwrap();
        let main = tmp.path().join("repo");
        let wt = tmp.path().join("wt");
        fs::create_dir_all(wt.join(".claude")).unwrap();
        fs::write(wt.join(".claude/HANDOFF.md"), "stale copy").unwrap();

        let link = link_handoff(&main, &wt, "fix").unwrap();
        assert!(link.symlink_metadata().unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(link).unwrap(), "");
    }

    #[test]
    fn agent_context_describes_the_worktree() {
        use chrono::TimeZone;
        let tmp = tempfile::tempdir().unwrap();
        let main = tmp.path().join("repo");
        fs::create_dir_all(main.join(".git")).unwrap();
        let wt = main.join(".worktrees").join("feat--x");
        let created = Local.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();

        let file = write_agent_context(&main, &wt, 3, "feat/x", created).unwrap();

        assert_eq!(file, wt.join(".claude/worktree-context.md"));
        let expected = format!(
            "# Agent 3 Worktree Context\n\n\
             - **Agent**: 3\n\
             - **Branch**: feat/x\n\
             - **Worktree**: {}\n\
             - **Created**: 2026-03-14T09:26:53\n\n\
             ## Guidelines\n\n\
             - Work only within this worktree directory\n\
             - Commit frequently to preserve work\n\
             - This worktree is isolated from other agents\n",
            wt.display()
        );
        assert_eq!(fs::read_to_string(&file).unwrap(), expected);
        let exclude = fs::read_to_string(main.join(".git/info/exclude")).unwrap();
        assert!(exclude.lines().any(|l| l == "/.claude/worktree-context.md"));
    }

    #[test]
    fn in_repo_worktree_base_is_excluded() {
        let tmp = tempfile::tempdir().unwrap();
        let main = tmp.path().join("repo");
        fs::create_dir_all(main.join(".git")).unwrap();

        exclude_worktree_base(&main, &main.join(".worktrees")).unwrap();
        exclude_worktree_base(&main, &main.join(".worktrees")).unwrap();
        exclude_worktree_base(&main, &tmp.path().join("elsewhere")).unwrap();

        let exclude = fs::read_to_string(main.join(".git/info/exclude")).unwrap();
        assert_eq!(exclude, "/.worktrees/\n");
    }
}
