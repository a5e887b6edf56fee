pub mod env;
pub mod theme;

use crate::constants::{APP_NAME, DEFAULT_AGENT_ORDER, DEFAULT_BRANCH_SENTINEL};
use anyhow::{Context as _, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub use theme::{NamedColor, ThemeColor, ThemeConfig};

pub fn config_dir() -> PathBuf {
    // ~/.config on both Linux and macOS (not ~/Library/Application Support)
    #[cfg(unix)]
    {
        if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME")
            && !xdg_config_home.is_empty()
        {
            return PathBuf::from(xdg_config_home).join(APP_NAME);
        }
        dirs::home_dir()
            .unwrap_or_default()
            .join(".config")
            .join(APP_NAME)
    }
    #[cfg(windows)]
    {
        dirs::config_dir().unwrap_or_default().join(APP_NAME)
    }
}

pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Everything in `config.toml`. Every section and key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub worktrees: WorktreesConfig,
    pub github: GithubConfig,
    pub agents: AgentsConfig,
    /// Picker colours.
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct WorktreesConfig {
    /// Turns every worktree command off when false.
    pub enabled: bool,
    /// Where worktrees go. Relative paths are taken from the main repository;
    /// `~`, `$VAR`, `{repo}` and `{branch}` are expanded. For example:
    /// ```toml
    /// [worktrees]
    /// parent_dir = "~/worktrees/{repo}/{branch}"
    /// ```
    pub parent_dir: String,
    /// Commands run inside each new worktree, in order.
    /// ```toml
    /// post_create = [{ command = "npm install", if_exists = "package.json" }]
    /// ```
    pub post_create: Vec<PostCreateHook>,
    pub auto_select: AutoSelectConfig,
}

impl Default for WorktreesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            parent_dir: ".worktrees".to_string(),
            post_create: Vec::new(),
            auto_select: AutoSelectConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostCreateHook {
    /// Shell command, run with `sh -c` in the new worktree.
    pub command: String,
    /// Only run when this path exists inside the worktree.
    #[serde(default)]
    pub if_exists: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AutoSelectConfig {
    pub enabled: bool,
    /// Branch picked when the countdown runs out; `-` is the default branch.
    pub branch: String,
    /// Seconds before picking; 0 picks without showing the picker.
    pub timeout: f64,
}

impl Default for AutoSelectConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            branch: DEFAULT_BRANCH_SENTINEL.to_string(),
            timeout: 3.0,
        }
    }
}

impl AutoSelectConfig {
    /// Negative or non-finite timeouts count as zero
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout).unwrap_or(Duration::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct GithubConfig {
    /// List issues assigned to you in the picker (needs the `gh` CLI).
    pub fetch_issues: bool,
    pub issue_limit: usize,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            fetch_issues: true,
            issue_limit: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AgentsConfig {
    /// Agent commands in order of preference.
    pub order: Vec<String>,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            order: DEFAULT_AGENT_ORDER.iter().map(ToString::to_string).collect(),
        }
    }
}

pub fn load_config_from_str(s: &str) -> Result<Config> {
    let config: Config = toml::from_str(s)?;
    Ok(config)
}

/// Read the config file and apply environment overrides.
///
/// A missing default config file means defaults; an explicit path must exist.
pub fn load_config(config_override: Option<&Path>) -> Result<Config> {
    let mut config = match config_override {
        Some(path) => read_config_file(path)?,
        None => {
            let path = config_file();
            if path.exists() {
                read_config_file(&path)?
            } else {
                Config::default()
            }
        }
    };
    env::apply_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    load_config_from_str(&contents).with_context(|| format!("Invalid config file {}", path.display()))
}
