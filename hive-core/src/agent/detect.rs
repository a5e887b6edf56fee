use super::DetectedAgent;
use crate::{constants::ENV_AGENT, paths::find_program};
use std::ffi::OsString;

/// Looks agents up on `PATH` (or an explicit search path), honouring the
/// configured order of preference.
#[derive(Debug, Clone, Default)]
pub struct AgentFinder {
    order: Vec<String>,
    search_path: Option<OsString>,
}

impl AgentFinder {
    pub fn new(order: Vec<String>) -> Self {
        Self {
            order,
            search_path: None,
        }
    }

    #[must_use]
    pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    fn locate(&self, name: &str) -> Option<DetectedAgent> {
        let command = find_program(name, self.search_path.as_deref())?;
        Some(DetectedAgent {
            name: name.to_string(),
            command,
        })
    }

    /// `preferred` when installed (and nothing otherwise), else the first
    /// installed agent of the configured order.
    pub fn detect(&self, preferred: Option<&str>) -> Option<DetectedAgent> {
        match preferred.filter(|name| !name.is_empty()) {
            Some(name) => self.locate(name),
            None => self.order.iter().find_map(|name| self.locate(name)),
        }
    }

    /// [`Self::detect`] with the preference taken from `HIVE_AGENT`
    pub fn detect_from_env(&self) -> Option<DetectedAgent> {
        let preferred = std::env::var(ENV_AGENT).ok();
        self.detect(preferred.as_deref())
    }

    /// Installed agents, in configured order
    pub fn available(&self) -> Vec<String> {
        self.order
            .iter()
            .filter(|name| self.locate(name).is_some())
            .cloned()
            .collect()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::paths::tests::fake_program;

    fn finder(installed: &[&str], order: &[&str]) -> (tempfile::TempDir, AgentFinder) {
        let dir = tempfile::tempdir().unwrap();
        for name in installed {
            fake_program(dir.path(), name);
        }
        let finder = AgentFinder::new(order.iter().map(ToString::to_string).collect())
            .with_search_path(dir.path().as_os_str());
        (dir, finder)
    }

    #[test]
    fn first_installed_agent_in_order_wins() {
        let (_dir, finder) = finder(&["codex", "gemini"], &["claude", "gemini", "codex"]);
        assert_eq!(finder.detect(None).unwrap().name, "gemini");
        assert_eq!(finder.available(), ["gemini", "codex"]);
    }

    #[test]
    fn preferred_agent_must_be_installed() {
        let (_dir, finder) = finder(&["codex", "gemini"], &["gemini", "codex"]);
        assert_eq!(finder.detect(Some("codex")).unwrap().name, "codex");
        assert_eq!(finder.detect(Some("claude")), None);
        assert_eq!(finder.detect(Some("")).unwrap().name, "gemini");
    }

    #[test]
    fn nothing_installed() {
        let (_dir, finder) = finder(&[], &["claude"]);
        assert_eq!(finder.detect(None), None);
        assert!(finder.available().is_empty());
    }

    #[test]
    fn detected_agent_carries_its_command() {
        let (dir, finder) = finder(&["claude"], &["claude"]);
        let agent = finder.detect(None).unwrap();
        assert!(agent.command.starts_with(dir.path()) || agent.command.ends_with("claude"));
        assert_eq!(agent.to_string(), "claude");
    }
}
