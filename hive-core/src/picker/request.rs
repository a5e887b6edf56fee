use super::{Header, PickerItem, PickerOutcome};
use crate::{refresh::Refresher, timer::AutoSelect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// One-line message shown to the user between picker rounds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Everything a front end needs to run one picker invocation
#[derive(Debug)]
pub struct PickerRequest {
    pub items: Vec<PickerItem>,
    pub header: Header,
    pub hint: String,
    /// Value to highlight initially
    pub initial_selection: Option<String>,
    /// Result of Esc; `None` makes Esc cancel the picker
    pub on_escape: Option<PickerOutcome>,
    /// Whether the row actions (delete, editor, agent, skip-perms) are bound
    pub item_actions: bool,
    pub refreshers: Vec<Refresher>,
    pub auto_select: Option<AutoSelect>,
    pub notice: Option<Notice>,
}

impl PickerRequest {
    /// Plain list with no background work and no row actions
    pub fn simple(title: impl Into<String>, items: Vec<PickerItem>) -> Self {
        Self {
            items,
            header: Header::new(title),
            hint: "↑↓ nav  Enter select  ^C cancel".to_string(),
            initial_selection: None,
            on_escape: None,
            item_actions: false,
            refreshers: Vec::new(),
            auto_select: None,
            notice: None,
        }
    }
}
