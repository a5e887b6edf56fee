pub const APP_NAME: &str = "hive";

/// Branch names that always refer to the main checkout.
pub const MAIN_ALIASES: [&str; 2] = ["main", "1"];

/// Candidate default branches, probed in order.
pub const DEFAULT_BRANCH_CANDIDATES: [&str; 2] = ["main", "master"];

/// Branches the prompts refuse as new worktree names.
pub const PROTECTED_BRANCHES: [&str; 2] = ["main", "master"];

pub const FALLBACK_DEFAULT_BRANCH: &str = "main";
pub const ORIGIN: &str = "origin";

/// Branch value shown for the main checkout row.
pub const MAIN_BRANCH_LABEL: &str = "main";

/// Value prefix marking picker rows that stand for a GitHub issue.
pub const ISSUE_VALUE_PREFIX: &str = "issue:";

/// Auto-select target meaning "the repository's default branch".
pub const DEFAULT_BRANCH_SENTINEL: &str = "-";

pub const AGENT_DIR: &str = ".claude";
pub const HANDOFFS_DIR: &str = "handoffs";
pub const HANDOFF_LINK: &str = "HANDOFF.md";
pub const TASK_NOTE_FILE: &str = "task.local.md";
pub const WORKTREE_CONTEXT_FILE: &str = "worktree-context.md";

pub const ISSUE_TITLE_MAX_CHARS: usize = 50;

/// Interval between auto-select countdown updates.
pub const COUNTDOWN_TICK_MS: u64 = 500;

pub const GH_LIST_TIMEOUT_SECS: u64 = 2;
pub const GH_VIEW_TIMEOUT_SECS: u64 = 5;

pub const DEFAULT_AGENT_ORDER: [&str; 5] = ["claude", "gemini", "codex", "agent", "copilot"];

pub const ENV_AGENT: &str = "HIVE_AGENT";
pub const ENV_SKIP_PERMISSIONS: &str = "HIVE_SKIP_PERMISSIONS";

/// Whether `branch` names the main checkout.
pub fn is_main_alias(branch: &str) -> bool {
    MAIN_ALIASES.contains(&branch)
}
