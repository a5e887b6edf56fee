use crate::picker::{RefreshSnapshot, StatusChange};

/// Events that arrive asynchronously from background threads.
/// These get merged into the picker loop alongside keyboard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    /// A refresher produced a complete snapshot of its rows
    Refreshed(RefreshSnapshot),

    /// A refresher finished a phase or failed
    Status(StatusChange),

    /// Auto-select countdown tick
    Countdown { target: String, seconds: u64 },

    /// The auto-select timer expired and won the race to resolve the picker
    AutoSelected(String),
}
