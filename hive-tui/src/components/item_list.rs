use crate::theme::Theme;
use hive_core::picker::{PickerItem, PickerModel};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

const NO_MATCHES: &str = "(no matches)";

fn item_line<'a>(item: &'a PickerItem, theme: &Theme) -> Line<'a> {
    let mut spans = vec![Span::styled(item.text.as_str(), theme.item_style(item.style))];
    if !item.meta.is_empty() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            item.meta.as_str(),
            Style::default()
                .fg(theme.muted)
                .add_modifier(Modifier::DIM),
        ));
    }
    Line::from(spans)
}

/// Filtered rows with the highlighted one marked. Keeps the model's scroll
/// offset in step with the area it was given.
pub fn draw(f: &mut Frame, area: Rect, model: &mut PickerModel, theme: &Theme) {
    if model.visible_len() == 0 {
        let empty = Paragraph::new(Span::styled(NO_MATCHES, Style::default().fg(theme.muted)));
        f.render_widget(empty, area);
        return;
    }

    model.update_scroll_offset(usize::from(area.height));
    let items: Vec<ListItem> = model
        .visible()
        .map(|item| ListItem::new(item_line(item, theme)))
        .collect();

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .fg(theme.highlight_fg)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )
        .highlight_symbol("▸ ");

    let mut list_state = ListState::default();
    list_state.select(model.selected_index());
    *list_state.offset_mut() = model.scroll_offset();
    f.render_stateful_widget(list, area, &mut list_state);
}
