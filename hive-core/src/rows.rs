use crate::{
    catalog::BranchCatalog,
    constants::{DEFAULT_BRANCH_CANDIDATES, MAIN_BRANCH_LABEL, is_main_alias},
    git::WorktreeRecord,
    issues::Issue,
    picker::{ItemStyle, PickerItem, RefreshSnapshot, StatusChange},
    refresh::Refresher,
    store::WorktreeStore,
};
use rayon::prelude::*;
use std::collections::HashSet;

/// Live state of one linked worktree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorktreeStatus {
    pub dirty: bool,
    pub ahead_behind: Option<(usize, usize)>,
}

/// `↑2 ↓1`, zero counts left out
pub fn format_ahead_behind(ahead: usize, behind: usize) -> String {
    let mut parts = Vec::new();
    if ahead > 0 {
        parts.push(format!("↑{ahead}"));
    }
    if behind > 0 {
        parts.push(format!("↓{behind}"));
    }
    parts.join(" ")
}

/// Builds picker rows for one repository.
///
/// The fast rows only read local refs; the branch and issue snapshots do the
/// slow work and are meant to run inside a [`Refresher`].
#[derive(Clone)]
pub struct RowBuilder {
    store: WorktreeStore,
    catalog: BranchCatalog,
    current: Option<String>,
}

impl RowBuilder {
    /// `current` is the branch of the worktree the command was started from
    pub fn new(store: WorktreeStore, catalog: BranchCatalog, current: Option<String>) -> Self {
        Self {
            store,
            catalog,
            current,
        }
    }

    /// Worktrees, other branches and cached issues, without any status checks
    pub fn fast_rows(&self) -> Vec<PickerItem> {
        let worktrees = self.store.list();
        let (mut rows, taken) = self.branch_layer(&worktrees, None);
        let known = self.known_branches(&worktrees, &taken);
        rows.extend(Self::issue_layer(&self.catalog.cached_issues(), &known));
        rows
    }

    /// Branch rows with dirty and ahead/behind status, checked in parallel
    pub fn branch_rows(&self) -> Vec<PickerItem> {
        let worktrees = self.store.list();
        let statuses: Vec<WorktreeStatus> = worktrees
            .par_iter()
            .map(|wt| self.status_of(wt))
            .collect();
        self.branch_layer(&worktrees, Some(&statuses)).0
    }

    /// Rows for `issues`, leaving out issues that already have a branch
    pub fn issue_rows(&self, issues: &[Issue]) -> Vec<PickerItem> {
        let worktrees = self.store.list();
        let taken: HashSet<String> = worktrees.iter().map(|wt| wt.branch.clone()).collect();
        Self::issue_layer(issues, &self.known_branches(&worktrees, &taken))
    }

    /// Value to highlight first: the preselected branch, else the current worktree
    pub fn initial_selection(&self, preselect: Option<&str>) -> Option<String> {
        let wanted = preselect.or(self.current.as_deref())?;
        if is_main_alias(wanted) {
            Some(MAIN_BRANCH_LABEL.to_string())
        } else {
            Some(wanted.to_string())
        }
    }

    /// `git fetch origin`, then the full branch snapshot
    pub fn branch_refresher(&self) -> Refresher {
        let rows = self.clone();
        Refresher::new("branches", move |ready| {
            rows.store.fetch_origin();
            let Some(sink) = ready.sink() else { return };
            sink.status(StatusChange::FetchDone);
            sink.merge(RefreshSnapshot::branches(rows.branch_rows()));
        })
    }

    /// Live issue listing; keeps the cached rows when it fails
    pub fn issue_refresher(&self) -> Refresher {
        let rows = self.clone();
        Refresher::new("issues", move |ready| {
            let issues = rows.catalog.assigned_issues();
            let Some(sink) = ready.sink() else { return };
            match issues {
                Some(issues) => sink.merge(RefreshSnapshot::issues(rows.issue_rows(&issues))),
                None => sink.status(StatusChange::IssuesFailed),
            }
        })
    }

    fn status_of(&self, wt: &WorktreeRecord) -> WorktreeStatus {
        if wt.is_main {
            return WorktreeStatus::default();
        }
        WorktreeStatus {
            dirty: self.store.is_dirty(&wt.path),
            ahead_behind: self.store.git().ahead_behind(&wt.path),
        }
    }

    /// Worktree rows then plain branch rows, plus every branch name used so far
    fn branch_layer(
        &self,
        worktrees: &[WorktreeRecord],
        statuses: Option<&[WorktreeStatus]>,
    ) -> (Vec<PickerItem>, HashSet<String>) {
        let mut rows = Vec::new();
        let mut taken = HashSet::new();
        let main_branch = self.store.main_branch();

        for (idx, wt) in worktrees.iter().enumerate() {
            taken.insert(wt.branch.clone());
            if wt.is_main {
                rows.push(Self::main_row(main_branch.as_deref()));
                continue;
            }
            let status = statuses.and_then(|s| s.get(idx)).copied();
            rows.push(self.worktree_row(wt, status));
        }
        if let Some(branch) = &main_branch {
            taken.insert(branch.clone());
        }

        for branch in self.catalog.all_branches() {
            if taken.insert(branch.clone()) {
                rows.push(PickerItem::plain(branch).with_style(ItemStyle::Branch));
            }
        }
        (rows, taken)
    }

    fn main_row(main_branch: Option<&str>) -> PickerItem {
        let meta = match main_branch {
            Some(branch) if !DEFAULT_BRANCH_CANDIDATES.contains(&branch) => format!("[repo @ {branch}]"),
            _ => "[repo]".to_string(),
        };
        PickerItem::plain(MAIN_BRANCH_LABEL)
            .with_meta(meta)
            .with_style(ItemStyle::Main)
    }

    fn worktree_row(&self, wt: &WorktreeRecord, status: Option<WorktreeStatus>) -> PickerItem {
        let status = status.unwrap_or_default();
        let mut meta = Vec::new();
        if self.current.as_deref() == Some(wt.branch.as_str()) {
            meta.push("← current".to_string());
        }
        if status.dirty {
            meta.push("(dirty)".to_string());
        }
        if let Some((ahead, behind)) = status.ahead_behind {
            let counts = format_ahead_behind(ahead, behind);
            if !counts.is_empty() {
                meta.push(counts);
            }
        }
        let style = if status.dirty {
            ItemStyle::Dirty
        } else {
            ItemStyle::Clean
        };
        PickerItem::plain(wt.branch.clone())
            .with_meta(meta.join(" "))
            .with_style(style)
    }

    fn known_branches(&self, worktrees: &[WorktreeRecord], taken: &HashSet<String>) -> HashSet<String> {
        let mut known = taken.clone();
        known.extend(worktrees.iter().map(|wt| wt.branch.clone()));
        known.extend(self.catalog.all_branches());
        known
    }

    fn issue_layer(issues: &[Issue], known: &HashSet<String>) -> Vec<PickerItem> {
        issues
            .iter()
            .filter(|issue| !issue.has_branch(known.iter().map(String::as_str)))
            .map(PickerItem::from)
            .collect()
    }
}
