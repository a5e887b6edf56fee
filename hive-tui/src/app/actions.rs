use crate::keymap::Action;
use hive_core::picker::SearchInput;

/// Apply a line-editing action to `input`. Returns false for actions that
/// are not edits, leaving `input` untouched.
pub(crate) fn apply_edit(input: &mut SearchInput, action: Action) -> bool {
    match action {
        Action::SearchPush(c) => input.insert_char(c),
        Action::SearchPop => {
            input.backspace();
        }
        Action::SearchDeleteForward => {
            input.delete_forward();
        }
        Action::SearchDeleteWord => input.delete_word(),
        Action::SearchDeleteToStart => input.delete_to_start(),
        Action::SearchDeleteToEnd => input.delete_to_end(),
        Action::CursorLeft => input.cursor_left(),
        Action::CursorRight => input.cursor_right(),
        Action::CursorWordLeft => input.cursor_word_left(),
        Action::CursorWordRight => input.cursor_word_right(),
        Action::CursorStart => input.cursor_start(),
        Action::CursorEnd => input.cursor_end(),
        Action::Cancel
        | Action::Escape
        | Action::Select
        | Action::MoveSelection(_)
        | Action::Delete
        | Action::OpenEditor
        | Action::ChangeAgent
        | Action::ToggleSkipPermissions => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edits_are_applied() {
        let mut input = SearchInput::with_text("feature login");
        assert!(apply_edit(&mut input, Action::SearchDeleteWord));
        assert_eq!(input.text(), "feature ");
        assert!(apply_edit(&mut input, Action::CursorStart));
        assert!(apply_edit(&mut input, Action::SearchPush('x')));
        assert_eq!(input.text(), "xfeature ");
        assert!(apply_edit(&mut input, Action::SearchDeleteToEnd));
        assert_eq!(input.text(), "x");
    }

    #[test]
    fn test_non_edits_are_ignored() {
        let mut input = SearchInput::with_text("abc");
        assert!(!apply_edit(&mut input, Action::Select));
        assert!(!apply_edit(&mut input, Action::MoveSelection(1)));
        assert_eq!(input, SearchInput::with_text("abc"));
    }
}
