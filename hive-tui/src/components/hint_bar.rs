use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Hint entries are separated by two spaces; the first word of each is the key.
pub fn hint_line<'a>(hint: &'a str, theme: &Theme) -> Line<'a> {
    let mut spans = Vec::new();
    for (i, entry) in hint.split("  ").filter(|e| !e.is_empty()).enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let (key, rest) = entry.split_once(' ').unwrap_or((entry, ""));
        spans.push(Span::styled(
            key,
            Style::default().fg(theme.hint).add_modifier(Modifier::BOLD),
        ));
        if !rest.is_empty() {
            spans.push(Span::styled(
                format!(" {rest}"),
                Style::default().fg(theme.muted),
            ));
        }
    }
    Line::from(spans)
}

pub fn draw(f: &mut Frame, area: Rect, hint: &str, theme: &Theme) {
    f.render_widget(Paragraph::new(hint_line(hint, theme)), area);
}
