use crate::config::{self, Config};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Per-invocation state shared by the commands: where the config lives and
/// the config itself, loaded on first use.
#[derive(Debug, Default)]
pub struct Context {
    config_path: Option<PathBuf>,
    config: Option<Config>,
}

impl Context {
    /// `config_path` overrides the default config file location
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self {
            config_path,
            config: None,
        }
    }

    /// Context around an already-built config. `reset` forgets it.
    pub fn with_config(config: Config) -> Self {
        Self {
            config_path: None,
            config: Some(config),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_path.clone().unwrap_or_else(config::config_file)
    }

    pub fn config(&mut self) -> Result<&Config> {
        if self.config.is_none() {
            self.config = Some(config::load_config(self.config_path.as_deref())?);
        }
        Ok(self.config.get_or_insert_with(Config::default))
    }

    /// Re-read the config file and environment
    pub fn reload(&mut self) -> Result<&Config> {
        self.reset();
        self.config()
    }

    /// Drop the loaded config; the next `config()` reads it again
    pub fn reset(&mut self) {
        self.config = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.config.is_some()
    }

    pub fn override_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}
