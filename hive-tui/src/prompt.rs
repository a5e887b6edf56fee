use crate::{app::actions::apply_edit, keymap::Action};
use hive_core::{orchestrator::PromptReply, picker::SearchInput};

/// State of a branch-name prompt.
///
/// The issue prompt starts out holding its `gh-<n>-` prefix; Esc first resets
/// to the prefix and only goes back to the picker once nothing else is left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptState {
    pub title: String,
    pub context: Option<String>,
    input: SearchInput,
    prefix: String,
}

impl PromptState {
    pub fn branch() -> Self {
        Self {
            title: "New branch".to_string(),
            context: None,
            input: SearchInput::new(),
            prefix: String::new(),
        }
    }

    pub fn issue(number: u64, title: &str) -> Self {
        let prefix = format!("gh-{number}-");
        Self {
            title: format!("Branch for issue #{number}"),
            context: Some(title.to_string()),
            input: SearchInput::with_text(prefix.clone()),
            prefix,
        }
    }

    pub fn input(&self) -> &SearchInput {
        &self.input
    }

    pub fn hint(&self) -> &'static str {
        "Enter create  Esc back  ^C quit"
    }

    /// Feed one action; `Some` ends the prompt
    pub fn handle(&mut self, action: Action) -> Option<PromptReply> {
        match action {
            Action::Cancel => Some(PromptReply::Cancelled),
            Action::Escape => {
                if self.is_bare() {
                    Some(PromptReply::Back)
                } else {
                    self.input.set(self.prefix.clone());
                    None
                }
            }
            Action::Select => {
                let value = self.input.text().trim();
                if value.is_empty() || value == self.prefix {
                    Some(PromptReply::Back)
                } else {
                    Some(PromptReply::Value(value.to_string()))
                }
            }
            action => {
                apply_edit(&mut self.input, action);
                None
            }
        }
    }

    fn is_bare(&self) -> bool {
        self.input.text() == self.prefix || self.input.is_empty()
    }
}
