pub mod cache;
pub mod gh;
pub mod mock;
pub mod note;

pub use cache::IssueCache;
pub use gh::GhIssueTracker;

use crate::constants::{ISSUE_TITLE_MAX_CHARS, ISSUE_VALUE_PREFIX};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{path::Path, sync::LazyLock};

const ISSUE_ICON: &str = "🎫";

static GITHUB_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:git@|ssh://git@|https?://(?:[^@/]+@)?)github\.com[:/]([^/]+)/([^/]+?)(?:\.git)?/?$")
        .expect("GitHub remote pattern is valid")
});

/// An open issue assigned to the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
}

impl Issue {
    /// Picker value standing for this issue.
    pub fn value(&self) -> String {
        format!("{ISSUE_VALUE_PREFIX}{}:{}", self.number, self.title)
    }

    /// Inverse of [`Issue::value`].
    pub fn from_value(value: &str) -> Option<Self> {
        let rest = value.strip_prefix(ISSUE_VALUE_PREFIX)?;
        let (number, title) = rest.split_once(':').unwrap_or((rest, ""));
        Some(Self {
            number: number.parse().ok()?,
            title: title.to_string(),
        })
    }

    /// Row text: `🎫 #12: title`, long titles cut to 50 characters plus `...`.
    pub fn display_text(&self) -> String {
        let title = if self.title.chars().count() > ISSUE_TITLE_MAX_CHARS {
            let cut: String = self.title.chars().take(ISSUE_TITLE_MAX_CHARS).collect();
            format!("{cut}...")
        } else {
            self.title.clone()
        };
        format!("{ISSUE_ICON} #{}: {title}", self.number)
    }

    /// Prefix suggested for branches working on this issue.
    pub fn branch_prefix(&self) -> String {
        format!("gh-{}-", self.number)
    }

    /// Whether some branch already works on this issue (`gh-<n>-…` or `gh-issue-<n>`).
    pub fn has_branch<'a>(&self, branches: impl IntoIterator<Item = &'a str>) -> bool {
        let prefix = self.branch_prefix();
        let legacy = format!("gh-issue-{}", self.number);
        branches
            .into_iter()
            .any(|b| b.starts_with(&prefix) || b == legacy)
    }
}

/// Full issue, for the task note.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueDetails {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub body: Option<String>,
}

/// Source of issues assigned to the current user.
///
/// Both calls are best effort: `None` means the integration is unavailable
/// right now (not installed, not authenticated, timed out).
pub trait IssueTracker: Send + Sync {
    fn assigned_issues(&self, repo_path: &Path, limit: usize) -> Option<Vec<Issue>>;
    fn issue_details(&self, repo_path: &Path, number: u64) -> Option<IssueDetails>;
}

/// `(org, repo)` for a GitHub remote URL, SSH or HTTPS.
pub fn github_slug(remote_url: &str) -> Option<(String, String)> {
    let caps = GITHUB_REMOTE.captures(remote_url.trim())?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(number: u64, title: &str) -> Issue {
        Issue {
            number,
            title: title.to_string(),
        }
    }

    #[test]
    fn value_round_trips_titles_with_colons() {
        let original = issue(42, "Fix: the thing");
        assert_eq!(original.value(), "issue:42:Fix: the thing");
        assert_eq!(Issue::from_value(&original.value()), Some(original));
    }

    #[test]
    fn from_value_rejects_branches() {
        assert_eq!(Issue::from_value("feature/x"), None);
        assert_eq!(Issue::from_value("issue:abc:title"), None);
    }

    #[test]
    fn display_text_truncates_long_titles() {
        let long = "x".repeat(60);
        let text = issue(7, &long).display_text();
        assert_eq!(text, format!("🎫 #7: {}...", "x".repeat(50)));
        assert_eq!(issue(7, "short").display_text(), "🎫 #7: short");
        let exact = "y".repeat(50);
        assert_eq!(issue(7, &exact).display_text(), format!("🎫 #7: {exact}"));
    }

    #[test]
    fn branch_detection() {
        let i = issue(12, "t");
        assert!(i.has_branch(["main", "gh-12-login"]));
        assert!(i.has_branch(["gh-issue-12"]));
        assert!(!i.has_branch(["gh-123-other", "gh-1-x", "gh-issue-120"]));
    }

    #[test]
    fn github_slugs() {
        for url in [
            "git@github.com:acme/widgets.git",
            "https://github.com/acme/widgets.git",
            "https://github.com/acme/widgets",
            "ssh://git@github.com/acme/widgets.git",
            "https://token@github.com/acme/widgets/",
        ] {
            assert_eq!(
                github_slug(url),
                Some(("acme".to_string(), "widgets".to_string())),
                "{url}"
            );
        }
        assert_eq!(github_slug("git@gitlab.com:acme/widgets.git"), None);
        assert_eq!(github_slug("/srv/git/widgets.git"), None);
    }
}
