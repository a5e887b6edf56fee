use crate::{
    git::GitProvider,
    issues::{Issue, IssueCache, IssueDetails, IssueTracker},
};
use log::debug;
use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
    sync::Arc,
};

/// Branch and issue candidates for the picker.
#[derive(Clone)]
pub struct BranchCatalog {
    git: Arc<dyn GitProvider>,
    main_repo: PathBuf,
    issues: Option<IssueSource>,
}

#[derive(Clone)]
struct IssueSource {
    tracker: Arc<dyn IssueTracker>,
    cache: IssueCache,
    limit: usize,
}

impl BranchCatalog {
    /// A catalog with the issue integration turned off.
    pub fn new(git: Arc<dyn GitProvider>, main_repo: impl Into<PathBuf>) -> Self {
        Self {
            git,
            main_repo: main_repo.into(),
            issues: None,
        }
    }

    pub fn with_issues(mut self, tracker: Arc<dyn IssueTracker>, cache: IssueCache, limit: usize) -> Self {
        self.issues = Some(IssueSource {
            tracker,
            cache,
            limit,
        });
        self
    }

    pub fn main_repo(&self) -> &Path {
        &self.main_repo
    }

    /// Local and remote branch names, deduplicated and sorted.
    pub fn all_branches(&self) -> Vec<String> {
        let mut names: BTreeSet<String> = self.git.list_branches(&self.main_repo).into_iter().collect();
        names.extend(self.git.list_remote_branches(&self.main_repo));
        names.into_iter().collect()
    }

    pub fn issues_enabled(&self) -> bool {
        self.issues.is_some()
    }

    /// Issues from the last successful listing, for showing before the live one lands.
    pub fn cached_issues(&self) -> Vec<Issue> {
        self.issues
            .as_ref()
            .map(|source| source.cache.load())
            .unwrap_or_default()
    }

    /// Live listing of assigned issues. `None` when turned off or unavailable;
    /// a successful listing replaces the cache.
    pub fn assigned_issues(&self) -> Option<Vec<Issue>> {
        let source = self.issues.as_ref()?;
        let issues = source.tracker.assigned_issues(&self.main_repo, source.limit);
        match &issues {
            Some(issues) => source.cache.store(issues),
            None => debug!("issue listing unavailable for {}", self.main_repo.display()),
        }
        issues
    }

    pub fn issue_details(&self, number: u64) -> Option<IssueDetails> {
        let source = self.issues.as_ref()?;
        source.tracker.issue_details(&self.main_repo, number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{git::mock::MockGitProvider, issues::mock::MockIssueTracker};

    fn catalog(git: MockGitProvider) -> BranchCatalog {
        BranchCatalog::new(Arc::new(git), "/repo")
    }

    fn issue(number: u64) -> Issue {
        Issue {
            number,
            title: format!("issue {number}"),
        }
    }

    #[test]
    fn all_branches_merges_local_and_remote() {
        let c = catalog(MockGitProvider {
            branches: vec!["main".into(), "zeta".into(), "feat/a".into()],
            remote_branches: vec!["main".into(), "alpha".into(), "feat/a".into()],
            ..Default::default()
        });
        assert_eq!(c.all_branches(), ["alpha", "feat/a", "main", "zeta"]);
    }

    #[test]
    fn disabled_issues() {
        let c = catalog(MockGitProvider::default());
        assert!(!c.issues_enabled());
        assert_eq!(c.assigned_issues(), None);
        assert!(c.cached_issues().is_empty());
        assert_eq!(c.issue_details(1), None);
    }

    #[test]
    fn successful_listing_refreshes_cache() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = IssueCache::at(tmp.path().join("issues.json"));
        let tracker = Arc::new(MockIssueTracker {
            issues: Some(vec![issue(1), issue(2), issue(3)]),
            ..Default::default()
        });
        let c = catalog(MockGitProvider::default()).with_issues(tracker.clone(), cache, 2);

        assert!(c.cached_issues().is_empty());
        assert_eq!(c.assigned_issues(), Some(vec![issue(1), issue(2)]));
        assert_eq!(c.cached_issues(), vec![issue(1), issue(2)]);
        assert_eq!(tracker.list_calls.lock().unwrap().as_slice(), [2]);
    }

    #[test]
    fn failed_listing_keeps_cache() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = IssueCache::at(tmp.path().join("issues.json"));
        cache.store(&[issue(9)]);
        let c = catalog(MockGitProvider::default()).with_issues(
            Arc::new(MockIssueTracker::default()),
            cache,
            20,
        );

        assert_eq!(c.assigned_issues(), None);
        assert_eq!(c.cached_issues(), vec![issue(9)]);
    }
}
