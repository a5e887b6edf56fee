use crate::theme::Theme;
use hive_core::picker::Notice;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::Paragraph,
};

pub fn draw(f: &mut Frame, area: Rect, notice: &Notice, theme: &Theme) {
    let line = Paragraph::new(Span::styled(
        format!(" {}", notice.message),
        Style::default()
            .fg(theme.notice_color(notice.level))
            .add_modifier(Modifier::BOLD),
    ));
    f.render_widget(line, area);
}
