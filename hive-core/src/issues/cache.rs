use super::{Issue, github_slug};
use log::debug;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Last successful issue listing for one GitHub repository.
///
/// Advisory only: read failures look like an empty cache and write failures
/// are logged and dropped.
#[derive(Debug, Clone, Default)]
pub struct IssueCache {
    path: Option<PathBuf>,
}

impl IssueCache {
    /// Cache file `gh-<org>--<repo>-issues.json` under `cache_dir`.
    /// Remotes that are not on GitHub get no cache.
    pub fn for_remote(cache_dir: &Path, remote_url: Option<&str>) -> Self {
        let path = remote_url
            .and_then(github_slug)
            .map(|(org, repo)| cache_dir.join(format!("gh-{org}--{repo}-issues.json")));
        Self { path }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn load(&self) -> Vec<Issue> {
        let Some(path) = &self.path else {
            return Vec::new();
        };
        let Ok(contents) = fs::read_to_string(path) else {
            return Vec::new();
        };
        serde_json::from_str(&contents).unwrap_or_else(|e| {
            debug!("ignoring unreadable issue cache {}: {e}", path.display());
            Vec::new()
        })
    }

    /// Overwrite the cache, even with an empty list so closed issues disappear.
    pub fn store(&self, issues: &[Issue]) {
        let Some(path) = &self.path else {
            return;
        };
        let result = path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|()| {
                let json = serde_json::to_string_pretty(issues)?;
                fs::write(path, json)
            });
        if let Err(e) = result {
            debug!("could not write issue cache {}: {e}", path.display());
        }
    }
}
