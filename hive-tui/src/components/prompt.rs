use super::{centered_fixed_rect, dialog_width, hint_bar};
use crate::theme::Theme;
use hive_core::picker::SearchInput;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph},
};
use unicode_width::UnicodeWidthStr;

const PROMPT_HEIGHT: u16 = 5;

/// Single-line text prompt in a titled popup, hint underneath
pub fn draw(f: &mut Frame, area: Rect, title: &str, input: &SearchInput, hint: &str, theme: &Theme) {
    let rect = centered_fixed_rect(dialog_width(area.width), PROMPT_HEIGHT, area);
    f.render_widget(Clear, rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "))
        .border_style(Style::default().fg(theme.accent));
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(inner);

    f.render_widget(Paragraph::new(input.text()), rows[0]);
    hint_bar::draw(f, rows[2], hint, theme);

    let before_cursor = &input.text()[..input.cursor()];
    let col = u16::try_from(before_cursor.width()).unwrap_or(u16::MAX);
    if rows[0].width > 0 {
        f.set_cursor_position((rows[0].x + col.min(rows[0].width - 1), rows[0].y));
    }
}
