use super::{centered_fixed_rect, dialog_width};
use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

/// A centered popup sized to its wrapped content
pub struct Dialog<'a> {
    lines: Vec<Line<'a>>,
    border_color: Color,
    title: Option<&'a str>,
    padding: Padding,
}

impl<'a> Dialog<'a> {
    #[must_use]
    pub fn new(lines: Vec<Line<'a>>) -> Self {
        Self {
            lines,
            border_color: Color::White,
            title: None,
            padding: Padding::horizontal(1),
        }
    }

    #[must_use]
    pub fn border_color(mut self, color: Color) -> Self {
        self.border_color = color;
        self
    }

    #[must_use]
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    /// `(width, height)` for a terminal `terminal_width` columns wide
    pub fn size(&self, terminal_width: u16) -> (u16, u16) {
        let width = dialog_width(terminal_width);
        let chrome_x = 2 + self.padding.left + self.padding.right;
        let chrome_y = 2 + self.padding.top + self.padding.bottom;
        let text_width = width.saturating_sub(chrome_x).max(1);
        let content: u16 = self
            .lines
            .iter()
            .map(|line| wrapped_line_count(line, text_width))
            .sum();
        (width, content + chrome_y)
    }

    /// Render centered on `area`, clearing what is underneath
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let (width, height) = self.size(area.width);
        let rect = centered_fixed_rect(width, height, area);
        f.render_widget(Clear, rect);

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border_color))
            .padding(self.padding);
        if let Some(title) = self.title {
            block = block.title(format!(" {title} "));
        }
        let paragraph = Paragraph::new(self.lines.clone())
            .block(block)
            .wrap(Wrap { trim: false })
            .alignment(Alignment::Left);
        f.render_widget(paragraph, rect);
    }
}

/// Rows `line` takes when word-wrapped to `max_width` columns
pub fn wrapped_line_count(line: &Line, max_width: u16) -> u16 {
    let max_width = usize::from(max_width);
    if max_width == 0 {
        return 1;
    }
    let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();

    let mut rows: u16 = 1;
    let mut col = 0;
    for word in text.split(' ') {
        let width = word.width();
        let needed = if col == 0 { width } else { width + 1 };
        if col + needed <= max_width {
            col += needed;
            continue;
        }
        if col > 0 {
            rows += 1;
        }
        col = width;
        while col > max_width {
            rows += 1;
            col -= max_width;
        }
    }
    rows
}

/// Body of the yes/no confirmation popup
pub fn confirm_lines<'a>(message: &'a str, warning: Option<&'a str>, theme: &Theme) -> Vec<Line<'a>> {
    let mut lines = vec![Line::from(Span::styled(
        message,
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if let Some(warning) = warning {
        lines.push(Line::from(Span::styled(
            warning,
            Style::default().fg(theme.warning),
        )));
    }
    lines.push(Line::raw(""));
    let key = Style::default().fg(theme.hint).add_modifier(Modifier::BOLD);
    lines.push(Line::from(vec![
        Span::styled("y", key),
        Span::raw(" confirm  "),
        Span::styled("n/Esc", key),
        Span::raw(" cancel"),
    ]));
    lines
}
