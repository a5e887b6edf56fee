use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks the picker to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Cancel,
    Escape,
    Select,
    MoveSelection(i32),
    Delete,
    OpenEditor,
    ChangeAgent,
    ToggleSkipPermissions,
    SearchPush(char),
    SearchPop,
    SearchDeleteForward,
    SearchDeleteWord,
    SearchDeleteToStart,
    SearchDeleteToEnd,
    CursorLeft,
    CursorRight,
    CursorWordLeft,
    CursorWordRight,
    CursorStart,
    CursorEnd,
}

/// Resolve a key event into an Action.
///
/// With `item_actions` off the row shortcuts fall back to their line-editing
/// meaning (Ctrl+A start of line, Ctrl+D delete forward).
pub fn resolve_action(key: KeyEvent, item_actions: bool) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    if ctrl {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Cancel),
            KeyCode::Char('p') => Some(Action::MoveSelection(-1)),
            KeyCode::Char('n') => Some(Action::MoveSelection(1)),
            KeyCode::Char('d') if item_actions => Some(Action::Delete),
            KeyCode::Char('d') => Some(Action::SearchDeleteForward),
            KeyCode::Char('o') if item_actions => Some(Action::OpenEditor),
            KeyCode::Char('a') if item_actions => Some(Action::ChangeAgent),
            KeyCode::Char('a') => Some(Action::CursorStart),
            KeyCode::Char('s') if item_actions => Some(Action::ToggleSkipPermissions),
            KeyCode::Char('e') => Some(Action::CursorEnd),
            KeyCode::Char('u') => Some(Action::SearchDeleteToStart),
            KeyCode::Char('k') => Some(Action::SearchDeleteToEnd),
            KeyCode::Char('w') | KeyCode::Backspace => Some(Action::SearchDeleteWord),
            KeyCode::Left => Some(Action::CursorWordLeft),
            KeyCode::Right => Some(Action::CursorWordRight),
            _ => None,
        };
    }

    if alt {
        return match key.code {
            KeyCode::Char('b') | KeyCode::Left => Some(Action::CursorWordLeft),
            KeyCode::Char('f') | KeyCode::Right => Some(Action::CursorWordRight),
            KeyCode::Backspace => Some(Action::SearchDeleteWord),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc => Some(Action::Escape),
        KeyCode::Enter => Some(Action::Select),
        KeyCode::Up => Some(Action::MoveSelection(-1)),
        KeyCode::Down => Some(Action::MoveSelection(1)),
        KeyCode::Left => Some(Action::CursorLeft),
        KeyCode::Right => Some(Action::CursorRight),
        KeyCode::Home => Some(Action::CursorStart),
        KeyCode::End => Some(Action::CursorEnd),
        KeyCode::Backspace => Some(Action::SearchPop),
        KeyCode::Delete => Some(Action::SearchDeleteForward),
        KeyCode::Char(c) => Some(Action::SearchPush(c)),
        _ => None,
    }
}
