use ratatui::layout::{Constraint, Layout, Rect};

pub mod dialog;
pub mod header;
pub mod hint_bar;
pub mod item_list;
pub mod notice_bar;
pub mod prompt;
pub mod search_bar;

const DIALOG_MIN_WIDTH: u16 = 40;
const DIALOG_MAX_WIDTH: u16 = 72;

/// Width for popups: most of a narrow terminal, capped on wide ones
pub fn dialog_width(terminal_width: u16) -> u16 {
    (terminal_width * 3 / 5)
        .clamp(DIALOG_MIN_WIDTH, DIALOG_MAX_WIDTH)
        .min(terminal_width)
}

/// Center a `width` x `height` rect within `r`, shrinking it to fit
pub fn centered_fixed_rect(width: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(r.height)),
        Constraint::Fill(1),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(r.width)),
        Constraint::Fill(1),
    ])
    .split(popup_layout[1])[1]
}
