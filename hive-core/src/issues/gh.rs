use super::{Issue, IssueDetails, IssueTracker};
use crate::{
    constants::{GH_LIST_TIMEOUT_SECS, GH_VIEW_TIMEOUT_SECS},
    process::output_with_timeout,
};
use log::debug;
use serde::de::DeserializeOwned;
use std::{path::Path, process::Command, time::Duration};

/// Issues from the GitHub CLI (`gh`).
pub struct GhIssueTracker {
    program: String,
    leading_args: Vec<String>,
    list_timeout: Duration,
    view_timeout: Duration,
}

impl Default for GhIssueTracker {
    fn default() -> Self {
        Self {
            program: "gh".to_string(),
            leading_args: Vec::new(),
            list_timeout: Duration::from_secs(GH_LIST_TIMEOUT_SECS),
            view_timeout: Duration::from_secs(GH_VIEW_TIMEOUT_SECS),
        }
    }
}

impl GhIssueTracker {
    /// Run `program` with `leading_args` in place of `gh`.
    pub fn with_command<I, S>(mut self, program: impl Into<String>, leading_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.program = program.into();
        self.leading_args = leading_args.into_iter().map(Into::into).collect();
        self
    }

    fn run_json<T: DeserializeOwned>(
        &self,
        repo_path: &Path,
        args: &[&str],
        timeout: Duration,
    ) -> Option<T> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args)
            .args(args)
            .current_dir(repo_path);
        let output = match output_with_timeout(&mut cmd, timeout) {
            Ok(output) => output,
            Err(e) => {
                debug!("{} {args:?} failed: {e}", self.program);
                return None;
            }
        };
        if !output.status.success() {
            debug!(
                "{} {args:?} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }
        serde_json::from_slice(&output.stdout)
            .map_err(|e| debug!("{} {args:?} returned unparsable JSON: {e}", self.program))
            .ok()
    }
}

impl IssueTracker for GhIssueTracker {
    fn assigned_issues(&self, repo_path: &Path, limit: usize) -> Option<Vec<Issue>> {
        let limit = limit.to_string();
        self.run_json(
            repo_path,
            &[
                "issue", "list", "--assignee", "@me", "--state", "open", "--json",
                "number,title", "--limit", &limit,
            ],
            self.list_timeout,
        )
    }

    fn issue_details(&self, repo_path: &Path, number: u64) -> Option<IssueDetails> {
        let number = number.to_string();
        self.run_json(
            repo_path,
            &["issue", "view", &number, "--json", "number,title,url,body"],
            self.view_timeout,
        )
    }
}
