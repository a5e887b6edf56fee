pub mod agent;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod context;
pub mod editor;
pub mod error;
pub mod event;
pub mod git;
pub mod handoff;
pub mod hooks;
pub mod issues;
pub mod layout;
pub mod orchestrator;
pub mod paths;
pub mod picker;
pub mod process;
pub mod refresh;
pub mod rows;
pub mod sanitize;
pub mod store;
pub mod timer;

// Re-export commonly used types at crate root
pub use catalog::BranchCatalog;
pub use config::Config;
pub use context::Context;
pub use error::{WorktreeError, WorktreeResult};
pub use event::PickerEvent;
pub use git::{GitProvider, RepoLocation, WorktreeRecord};
pub use layout::WorktreeLayout;
pub use orchestrator::{EnsureResult, Interaction, Orchestrator, PromptReply, Session};
pub use picker::{PickerModel, PickerOutcome, PickerRequest};
pub use store::WorktreeStore;
