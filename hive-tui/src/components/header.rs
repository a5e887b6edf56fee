use crate::theme::Theme;
use hive_core::picker::Header;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

pub fn header_line<'a>(header: &'a Header, theme: &Theme) -> Line<'a> {
    let mut spans = vec![Span::styled(
        header.title.as_str(),
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )];
    for part in header.status() {
        let color = if header.countdown.is_some() && part.starts_with("(auto-selecting") {
            theme.warning
        } else {
            theme.muted
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(part, Style::default().fg(color)));
    }
    Line::from(spans)
}

pub fn draw(f: &mut Frame, area: Rect, header: &Header, theme: &Theme) {
    f.render_widget(Paragraph::new(header_line(header, theme)), area);
}
