use super::{Issue, IssueDetails, IssueTracker};
use std::{collections::HashMap, path::Path, sync::Mutex};

/// Canned [`IssueTracker`] for tests. `issues: None` behaves like an unavailable `gh`.
#[derive(Default)]
pub struct MockIssueTracker {
    pub issues: Option<Vec<Issue>>,
    pub details: HashMap<u64, IssueDetails>,
    pub list_calls: Mutex<Vec<usize>>,
}

impl IssueTracker for MockIssueTracker {
    fn assigned_issues(&self, _repo_path: &Path, limit: usize) -> Option<Vec<Issue>> {
        self.list_calls.lock().unwrap().push(limit);
        self.issues
            .as_ref()
            .map(|issues| issues.iter().take(limit).cloned().collect())
    }

    fn issue_details(&self, _repo_path: &Path, number: u64) -> Option<IssueDetails> {
        self.details.get(&number).cloned()
    }
}
