use crate::{
    constants::is_main_alias,
    git::WorktreeRecord,
    paths::{expand_path, path_to_name},
    sanitize::sanitize_branch,
};
use std::path::{Path, PathBuf};

const REPO_PLACEHOLDER: &str = "{repo}";
const BRANCH_PLACEHOLDER: &str = "{branch}";

/// Where worktrees live on disk, derived from the `worktrees.parent_dir` template.
///
/// The template may contain `{repo}` (the main repository flattened relative
/// to the home directory) and `{branch}` (the sanitized branch name):
/// - `{branch}` present: both placeholders are substituted and the result is the path.
/// - only `{repo}`: the sanitized branch is a subdirectory of the expanded template.
/// - no placeholders, relative: a per-repository directory, branch as subdirectory.
/// - no placeholders, absolute or `~`: a shared base, entries named `<repo>--<branch>`.
#[derive(Debug, Clone)]
pub struct WorktreeLayout {
    template: String,
    home: Option<PathBuf>,
}

impl WorktreeLayout {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            home: dirs::home_dir(),
        }
    }

    /// Use `home` in place of the user's home directory.
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Path for `branch`: the main checkout for main aliases, an already
    /// registered worktree when one exists, otherwise the templated location.
    pub fn resolve(&self, branch: &str, main_repo: &Path, registry: &[WorktreeRecord]) -> PathBuf {
        if is_main_alias(branch) {
            return main_repo.to_path_buf();
        }
        if let Some(existing) = registry.iter().find(|wt| !wt.is_main && wt.branch == branch) {
            return existing.path.clone();
        }
        self.compute(branch, main_repo)
    }

    /// Where a new worktree for `branch` would be created.
    pub fn compute(&self, branch: &str, main_repo: &Path) -> PathBuf {
        let mut segment = sanitize_branch(branch);
        if segment.is_empty() {
            segment.push('_');
        }
        let repo_name = self.repo_name(main_repo);

        let path = if self.template.contains(BRANCH_PLACEHOLDER) {
            let filled = self
                .template
                .replace(REPO_PLACEHOLDER, &repo_name)
                .replace(BRANCH_PLACEHOLDER, &segment);
            self.expand(&filled, main_repo)
        } else if self.template.contains(REPO_PLACEHOLDER) || !self.is_shared_base(main_repo) {
            self.base(main_repo).join(&segment)
        } else {
            self.base(main_repo).join(format!("{repo_name}--{segment}"))
        };

        // a template that collapses onto the main checkout must not hand it out
        if path == main_repo {
            main_repo.join(segment)
        } else {
            path
        }
    }

    /// Directory that contains this repository's worktrees.
    ///
    /// For templates with `{branch}`, everything before the placeholder.
    pub fn base(&self, main_repo: &Path) -> PathBuf {
        let prefix = match self.template.split_once(BRANCH_PLACEHOLDER) {
            Some((before, _)) => before.trim_end_matches('/'),
            None => self.template.as_str(),
        };
        let filled = prefix.replace(REPO_PLACEHOLDER, &self.repo_name(main_repo));
        self.expand(&filled, main_repo)
    }

    pub fn repo_name(&self, main_repo: &Path) -> String {
        path_to_name(main_repo, self.home.as_deref())
    }

    fn is_shared_base(&self, main_repo: &Path) -> bool {
        !self.expand(&self.template, main_repo).starts_with(main_repo)
    }

    fn expand(&self, raw: &str, main_repo: &Path) -> PathBuf {
        expand_path(raw, main_repo, self.home.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(template: &str) -> WorktreeLayout {
        WorktreeLayout::new(template).with_home("/home/me")
    }

    fn record(branch: &str, path: &str, is_main: bool) -> WorktreeRecord {
        WorktreeRecord {
            branch: branch.to_string(),
            path: PathBuf::from(path),
            is_main,
        }
    }

    #[test]
    fn relative_template_nests_branch_under_repo() {
        assert_eq!(
            layout(".worktrees").resolve("feature-1", Path::new("/repo"), &[]),
            PathBuf::from("/repo/.worktrees/feature-1")
        );
    }

    #[test]
    fn main_aliases_resolve_to_main_repo() {
        let l = layout("~/wt/{branch}");
        let registry = [record("main", "/elsewhere", false)];
        assert_eq!(l.resolve("main", Path::new("/repo"), &registry), PathBuf::from("/repo"));
        assert_eq!(l.resolve("1", Path::new("/repo"), &registry), PathBuf::from("/repo"));
    }

    #[test]
    fn registry_wins_over_template() {
        let registry = [
            record("main", "/repo", true),
            record("feat/x", "/old/place/feat-x", false),
        ];
        assert_eq!(
            layout(".worktrees").resolve("feat/x", Path::new("/repo"), &registry),
            PathBuf::from("/old/place/feat-x")
        );
    }

    #[test]
    fn branch_placeholder_substitutes_both() {
        let l = layout("~/worktrees/{repo}/{branch}");
        assert_eq!(
            l.compute("user/feat", Path::new("/home/me/Projects/app")),
            PathBuf::from("/home/me/worktrees/Projects--app/user--feat")
        );
    }

    #[test]
    fn repo_placeholder_only_appends_branch() {
        let l = layout("/srv/wt/{repo}");
        assert_eq!(
            l.compute("fix", Path::new("/home/me/app")),
            PathBuf::from("/srv/wt/app/fix")
        );
    }

    #[test]
    fn shared_base_prefixes_repo_name() {
        let l = layout("~/worktrees");
        assert_eq!(
            l.compute("fix", Path::new("/home/me/code/app")),
            PathBuf::from("/home/me/worktrees/code--app--fix")
        );
    }

    #[test]
    fn base_strips_branch_suffix() {
        let l = layout("~/worktrees/{repo}/{branch}");
        assert_eq!(
            l.base(Path::new("/home/me/app")),
            PathBuf::from("/home/me/worktrees/app")
        );
        assert_eq!(
            layout(".worktrees").base(Path::new("/repo")),
            PathBuf::from("/repo/.worktrees")
        );
    }

    #[test]
    fn never_resolves_non_main_branch_to_main_repo() {
        let main = Path::new("/repo");
        for template in ["", ".", "{branch}", ".worktrees", "~/wt"] {
            for branch in ["x", "//", "feat/a", "@"] {
                assert_ne!(
                    layout(template).resolve(branch, main, &[]),
                    main,
                    "template {template:?} branch {branch:?}"
                );
            }
        }
    }
}
