use std::{fmt, path::PathBuf};

/// An agent CLI found on the search path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedAgent {
    pub name: String,
    pub command: PathBuf,
}

impl fmt::Display for DetectedAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

pub mod detect;

pub use detect::AgentFinder;
