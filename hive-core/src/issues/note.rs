use super::IssueDetails;
use crate::constants::{AGENT_DIR, TASK_NOTE_FILE};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

pub fn render_task_note(issue: &IssueDetails) -> String {
    let body = issue
        .body
        .as_deref()
        .filter(|b| !b.trim().is_empty())
        .unwrap_or("_No description provided._");
    format!(
        "# Task: {}\n\n**Issue:** [#{}]({})\n\n## Description\n\n{body}\n",
        issue.title, issue.number, issue.url
    )
}

/// Write the issue into `<worktree>/.claude/task.local.md`.
pub fn write_task_note(worktree: &Path, issue: &IssueDetails) -> io::Result<PathBuf> {
    let dir = worktree.join(AGENT_DIR);
    fs::create_dir_all(&dir)?;
    let path = dir.join(TASK_NOTE_FILE);
    fs::write(&path, render_task_note(issue))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(body: Option<&str>) -> IssueDetails {
        IssueDetails {
            number: 12,
            title: "Login fails".into(),
            url: "https://github.com/acme/app/issues/12".into(),
            body: body.map(String::from),
        }
    }

    #[test]
    fn renders_body() {
        assert_eq!(
            render_task_note(&details(Some("Steps:\n1. open"))),
            "# Task: Login fails\n\n**Issue:** [#12](https://github.com/acme/app/issues/12)\n\n## Description\n\nSteps:\n1. open\n"
        );
    }

    #[test]
    fn placeholder_for_missing_body() {
        for body in [None, Some(""), Some("  ")] {
            assert!(render_task_note(&details(body)).ends_with("_No description provided._\n"));
        }
    }

    #[test]
    fn writes_into_agent_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_task_note(tmp.path(), &details(None)).unwrap();
        assert_eq!(path, tmp.path().join(".claude/task.local.md"));
        assert!(fs::read_to_string(path).unwrap().starts_with("# Task: Login fails"));
    }
}
