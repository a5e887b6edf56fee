use super::Config;
use anyhow::{Result, bail};

pub const ENV_WORKTREES_ENABLED: &str = "HIVE_WORKTREES_ENABLED";
pub const ENV_WORKTREES_PARENT_DIR: &str = "HIVE_WORKTREES_PARENT_DIR";
pub const ENV_GITHUB_FETCH_ISSUES: &str = "HIVE_GITHUB_FETCH_ISSUES";
pub const ENV_GITHUB_ISSUE_LIMIT: &str = "HIVE_GITHUB_ISSUE_LIMIT";
pub const ENV_AGENTS_ORDER: &str = "HIVE_AGENTS_ORDER";

pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Overlay `HIVE_*` variables from `lookup` onto `config`. Empty values are ignored.
pub fn apply_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
    let get_bool = |key: &str| -> Result<Option<bool>> {
        match get(key) {
            Some(raw) => match parse_bool(&raw) {
                Some(value) => Ok(Some(value)),
                None => bail!("{key} must be a boolean (1/0/true/false/yes/no/on/off), got '{raw}'"),
            },
            None => Ok(None),
        }
    };

    if let Some(enabled) = get_bool(ENV_WORKTREES_ENABLED)? {
        config.worktrees.enabled = enabled;
    }
    if let Some(parent_dir) = get(ENV_WORKTREES_PARENT_DIR) {
        config.worktrees.parent_dir = parent_dir;
    }
    if let Some(fetch) = get_bool(ENV_GITHUB_FETCH_ISSUES)? {
        config.github.fetch_issues = fetch;
    }
    if let Some(raw) = get(ENV_GITHUB_ISSUE_LIMIT) {
        let Ok(limit) = raw.trim().parse() else {
            bail!("{ENV_GITHUB_ISSUE_LIMIT} must be a non-negative integer, got '{raw}'");
        };
        config.github.issue_limit = limit;
    }
    if let Some(raw) = get(ENV_AGENTS_ORDER) {
        config.agents.order = raw
            .split(',')
            .map(str::trim)
            .filter(|agent| !agent.is_empty())
            .map(ToString::to_string)
            .collect();
    }
    Ok(())
}
