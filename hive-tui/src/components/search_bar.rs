use crate::theme::Theme;
use hive_core::picker::SearchInput;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const PROMPT: &str = "> ";

/// Byte range of the query that fits in `max_width` columns, and the cursor
/// column inside it. Scrolls just far enough to keep the cursor visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct VisibleSlice {
    start: usize,
    end: usize,
    cursor_col: u16,
}

fn visible_slice(text: &str, cursor: usize, max_width: u16) -> VisibleSlice {
    let max_width = usize::from(max_width);
    if max_width == 0 || text.is_empty() {
        return VisibleSlice {
            start: 0,
            end: 0,
            cursor_col: 0,
        };
    }
    let cursor = cursor.min(text.len());
    let graphemes: Vec<(usize, usize)> = text
        .grapheme_indices(true)
        .map(|(i, g)| (i, g.width()))
        .collect();

    // drop graphemes from the left until the cursor fits on the last column
    let before_cursor = graphemes.iter().take_while(|(i, _)| *i < cursor).count();
    let mut first = 0;
    let mut cursor_col: usize = graphemes[..before_cursor].iter().map(|(_, w)| w).sum();
    while cursor_col > max_width - 1 && first < before_cursor {
        cursor_col -= graphemes[first].1;
        first += 1;
    }

    let mut last = first;
    let mut used = 0;
    while let Some(&(_, w)) = graphemes.get(last) {
        if used + w > max_width {
            break;
        }
        used += w;
        last += 1;
    }

    let byte_at = |idx: usize| graphemes.get(idx).map_or(text.len(), |(i, _)| *i);
    VisibleSlice {
        start: byte_at(first),
        end: byte_at(last),
        cursor_col: u16::try_from(cursor_col.min(max_width - 1)).unwrap_or(u16::MAX),
    }
}

/// Render the query with a terminal cursor
pub fn draw(f: &mut Frame, area: Rect, input: &SearchInput, placeholder: &str, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    let prompt_width = u16::try_from(PROMPT.len()).unwrap_or(0);
    let text_width = inner.width.saturating_sub(prompt_width);

    let prompt = Span::styled(
        PROMPT,
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    );
    let (line, cursor_col) = if input.is_empty() {
        let placeholder = Span::styled(placeholder, Style::default().fg(theme.muted));
        (Line::from(vec![prompt, placeholder]), 0)
    } else {
        let slice = visible_slice(input.text(), input.cursor(), text_width);
        let shown = Span::raw(&input.text()[slice.start..slice.end]);
        (Line::from(vec![prompt, shown]), slice.cursor_col)
    };
    f.render_widget(Paragraph::new(line).block(block), area);

    if inner.width > prompt_width && inner.height > 0 {
        let x = inner.x + prompt_width + cursor_col;
        f.set_cursor_position((x, inner.y));
    }
}
