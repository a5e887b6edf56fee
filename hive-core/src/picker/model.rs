use super::{
    fuzzy,
    header::{Header, StatusChange},
    input::SearchInput,
    item::{PickerItem, RefreshSnapshot},
};
use std::collections::{HashMap, HashSet};

/// Rows, query and selection of one picker invocation.
///
/// `filtered` holds indices into `items` in display order; `selected` indexes
/// into `filtered`.
#[derive(Debug, Clone, Default)]
pub struct PickerModel {
    items: Vec<PickerItem>,
    filtered: Vec<usize>,
    selected: Option<usize>,
    scroll_offset: usize,
    input: SearchInput,
    pub header: Header,
}

impl PickerModel {
    /// Build from the initial rows, dropping repeated values (first wins)
    pub fn new(items: Vec<PickerItem>, header: Header) -> Self {
        let mut seen = HashSet::new();
        let items: Vec<PickerItem> = items
            .into_iter()
            .filter(|item| seen.insert(item.value.clone()))
            .collect();
        Self {
            filtered: (0..items.len()).collect(),
            selected: (!items.is_empty()).then_some(0),
            items,
            header,
            ..Self::default()
        }
    }

    pub fn items(&self) -> &[PickerItem] {
        &self.items
    }

    /// Rows passing the current query, best first
    pub fn visible(&self) -> impl Iterator<Item = &PickerItem> {
        self.filtered.iter().map(|&idx| &self.items[idx])
    }

    pub fn visible_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&PickerItem> {
        let idx = *self.filtered.get(self.selected?)?;
        self.items.get(idx)
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.selected_item().map(|item| item.value.as_str())
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn input(&self) -> &SearchInput {
        &self.input
    }

    pub fn query(&self) -> &str {
        self.input.text()
    }

    /// Highlight the visible row carrying `value`; false when it is filtered out or absent
    pub fn select_value(&mut self, value: &str) -> bool {
        match self.position_of(value) {
            Some(pos) => {
                self.selected = Some(pos);
                true
            }
            None => false,
        }
    }

    fn position_of(&self, value: &str) -> Option<usize> {
        self.filtered
            .iter()
            .position(|&idx| self.items[idx].value == value)
    }

    /// Move the highlight by `delta` rows, wrapping at both ends
    pub fn move_selection(&mut self, delta: i32) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        let current = self.selected.unwrap_or(0).min(len - 1);
        let step = delta.unsigned_abs() as usize % len;
        self.selected = Some(if delta >= 0 {
            (current + step) % len
        } else {
            (current + len - step) % len
        });
    }

    /// Apply an edit to the query. A changed query re-filters and highlights the best match.
    pub fn edit_query(&mut self, edit: impl FnOnce(&mut SearchInput)) {
        let before = self.input.text().to_owned();
        edit(&mut self.input);
        if self.input.text() != before {
            self.apply_query();
            self.selected = (!self.filtered.is_empty()).then_some(0);
        }
    }

    pub fn set_query(&mut self, query: &str) {
        self.edit_query(|input| input.set(query));
    }

    fn apply_query(&mut self) {
        self.filtered = fuzzy::rank(
            self.input.text(),
            self.items.iter().map(|item| item.text.as_str()),
        );
    }

    pub fn apply_status(&mut self, change: StatusChange) {
        self.header.apply(change);
    }

    /// Fold a background snapshot into the rows without reordering survivors.
    ///
    /// Only rows of the snapshot's source are touched: those missing from the
    /// snapshot are dropped, those present get the snapshot's meta and style,
    /// and values new to the model are appended after the existing rows of
    /// that source. The previous selection is kept by value when it survives,
    /// otherwise its index is clamped into range.
    pub fn merge(&mut self, snapshot: RefreshSnapshot) {
        let RefreshSnapshot { source, items } = snapshot;
        let previous_value = self.selected_value().map(str::to_owned);
        let previous_index = self.selected;

        let mut incoming: HashMap<&str, &PickerItem> = HashMap::with_capacity(items.len());
        for item in &items {
            incoming.entry(item.value.as_str()).or_insert(item);
        }

        self.items
            .retain(|item| item.source != source || incoming.contains_key(item.value.as_str()));

        let mut present = HashSet::new();
        for item in self.items.iter_mut().filter(|item| item.source == source) {
            if let Some(fresh) = incoming.get(item.value.as_str()) {
                item.meta.clone_from(&fresh.meta);
                item.style = fresh.style;
            }
            present.insert(item.value.clone());
        }

        let mut appended = Vec::new();
        for item in &items {
            if present.insert(item.value.clone()) {
                appended.push(item.clone().with_source(source));
            }
        }
        self.items.extend(appended);
        self.items.sort_by_key(|item| item.source);

        self.apply_query();
        self.selected = match previous_value.and_then(|value| self.position_of(&value)) {
            Some(pos) => Some(pos),
            None if self.filtered.is_empty() => None,
            None => Some(previous_index.unwrap_or(0).min(self.filtered.len() - 1)),
        };
    }

    /// Keep the highlighted row inside a viewport of `viewport_rows`, with one
    /// row of context above and below when there is room.
    pub fn update_scroll_offset(&mut self, viewport_rows: usize) {
        let len = self.filtered.len();
        if len == 0 {
            self.scroll_offset = 0;
            return;
        }
        let viewport_rows = viewport_rows.max(1);
        let selected = self.selected.unwrap_or(0).min(len - 1);
        let margin_top = usize::from(viewport_rows > 2);
        let margin_bottom = viewport_rows.saturating_sub(2);

        if selected < self.scroll_offset + margin_top {
            self.scroll_offset = selected.saturating_sub(margin_top);
        } else if selected > self.scroll_offset + margin_bottom {
            self.scroll_offset = selected.saturating_sub(margin_bottom);
        }
        self.scroll_offset = self.scroll_offset.min(len.saturating_sub(viewport_rows));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::item::{ItemSource, ItemStyle};

    fn branch(value: &str) -> PickerItem {
        PickerItem::plain(value)
    }

    fn branch_meta(value: &str, meta: &str) -> PickerItem {
        PickerItem::plain(value).with_meta(meta)
    }

    fn issue(value: &str) -> PickerItem {
        PickerItem::plain(value).with_source(ItemSource::Issues)
    }

    fn values(model: &PickerModel) -> Vec<&str> {
        model.items().iter().map(|i| i.value.as_str()).collect()
    }

    fn visible(model: &PickerModel) -> Vec<&str> {
        model.visible().map(|i| i.value.as_str()).collect()
    }

    fn model(items: Vec<PickerItem>) -> PickerModel {
        PickerModel::new(items, Header::new("test"))
    }

    #[test]
    fn new_drops_duplicate_values() {
        let m = model(vec![branch("a"), branch_meta("a", "x"), branch("b")]);
        assert_eq!(values(&m), ["a", "b"]);
        assert_eq!(m.items()[0].meta, "");
        assert_eq!(m.selected_value(), Some("a"));
    }

    #[test]
    fn empty_model_has_no_selection() {
        let mut m = model(vec![]);
        assert_eq!(m.selected_index(), None);
        m.move_selection(1);
        assert_eq!(m.selected_index(), None);
    }

    #[test]
    fn move_selection_wraps() {
        let mut m = model(vec![branch("a"), branch("b"), branch("c")]);
        m.move_selection(-1);
        assert_eq!(m.selected_value(), Some("c"));
        m.move_selection(1);
        assert_eq!(m.selected_value(), Some("a"));
        m.move_selection(4);
        assert_eq!(m.selected_value(), Some("b"));
    }

    #[test]
    fn query_filters_and_highlights_best_match() {
        let mut m = model(vec![branch("main"), branch("feature-x"), branch("fix-y")]);
        m.move_selection(2);
        m.set_query("fx");
        assert_eq!(visible(&m), ["fix-y", "feature-x"]);
        assert_eq!(m.selected_value(), Some("fix-y"));
        m.set_query("");
        assert_eq!(visible(&m), ["main", "feature-x", "fix-y"]);
    }

    #[test]
    fn cursor_motion_keeps_selection() {
        let mut m = model(vec![branch("a"), branch("b")]);
        m.set_query("");
        m.move_selection(1);
        m.edit_query(SearchInput::cursor_left);
        assert_eq!(m.selected_value(), Some("b"));
    }

    #[test]
    fn no_matches_clears_selection() {
        let mut m = model(vec![branch("a")]);
        m.set_query("zzz");
        assert_eq!(m.visible_len(), 0);
        assert_eq!(m.selected_value(), None);
    }

    #[test]
    fn merge_updates_meta_in_place() {
        let mut m = model(vec![branch("main"), branch("x").with_style(ItemStyle::Clean)]);
        let mut renamed = branch_meta("x", "(dirty)").with_style(ItemStyle::Dirty);
        renamed.text = "other text".into();
        m.merge(RefreshSnapshot::branches(vec![branch("main"), renamed]));

        assert_eq!(values(&m), ["main", "x"]);
        assert_eq!(m.items()[1].text, "x");
        assert_eq!(m.items()[1].meta, "(dirty)");
        assert_eq!(m.items()[1].style, ItemStyle::Dirty);
    }

    #[test]
    fn merge_removes_absent_values() {
        let mut m = model(vec![branch("a"), branch("b"), branch("c")]);
        m.merge(RefreshSnapshot::branches(vec![branch("a"), branch("c")]));
        assert_eq!(values(&m), ["a", "c"]);
    }

    #[test]
    fn merge_appends_new_values_after_existing_ones() {
        let mut m = model(vec![branch("b"), branch("a")]);
        m.merge(RefreshSnapshot::branches(vec![
            branch("new1"),
            branch("a"),
            branch("new2"),
            branch("b"),
            branch("new1"),
        ]));
        assert_eq!(values(&m), ["b", "a", "new1", "new2"]);
    }

    #[test]
    fn merge_is_idempotent() {
        let initial = vec![branch("a"), branch("b"), branch("c"), issue("i1")];
        let snapshot = RefreshSnapshot::branches(vec![branch_meta("c", "dirty"), branch("a"), branch("d")]);

        let mut once = model(initial.clone());
        once.move_selection(1);
        once.merge(snapshot.clone());

        let mut twice = model(initial);
        twice.move_selection(1);
        twice.merge(snapshot.clone());
        twice.merge(snapshot);

        assert_eq!(once.items(), twice.items());
        assert_eq!(once.selected_value(), twice.selected_value());
    }

    #[test]
    fn merge_preserves_selection_by_value() {
        let mut m = model(vec![branch("a"), branch("b"), branch("c")]);
        m.select_value("c");
        m.merge(RefreshSnapshot::branches(vec![branch("b"), branch("c")]));
        assert_eq!(m.selected_value(), Some("c"));
        assert_eq!(m.selected_index(), Some(1));
    }

    #[test]
    fn merge_clamps_selection_when_value_disappears() {
        let mut m = model(vec![branch("a"), branch("b"), branch("c")]);
        m.select_value("c");
        m.merge(RefreshSnapshot::branches(vec![branch("a")]));
        assert_eq!(m.selected_value(), Some("a"));

        m.merge(RefreshSnapshot::branches(vec![]));
        assert_eq!(m.selected_index(), None);
    }

    #[test]
    fn merge_reapplies_the_query() {
        let mut m = model(vec![branch("main")]);
        m.set_query("feat");
        assert_eq!(m.visible_len(), 0);
        m.merge(RefreshSnapshot::branches(vec![branch("main"), branch("feature")]));
        assert_eq!(visible(&m), ["feature"]);
        assert_eq!(m.selected_value(), Some("feature"));
    }

    #[test]
    fn merge_only_touches_its_own_source() {
        let mut m = model(vec![branch("a"), issue("i1"), issue("i2")]);
        m.merge(RefreshSnapshot::branches(vec![branch("a"), branch("b")]));
        assert_eq!(values(&m), ["a", "b", "i1", "i2"]);

        m.merge(RefreshSnapshot::issues(vec![issue("i2"), issue("i3")]));
        assert_eq!(values(&m), ["a", "b", "i2", "i3"]);
        assert!(m.items()[3].source == ItemSource::Issues);
    }

    #[test]
    fn snapshots_commute() {
        let initial = vec![branch("main"), branch("old"), issue("i1"), issue("i2")];
        let branches = RefreshSnapshot::branches(vec![
            branch("main"),
            branch_meta("feature", "(dirty)"),
        ]);
        let issues = RefreshSnapshot::issues(vec![issue("i2"), issue("i9")]);

        let mut issues_first = model(initial.clone());
        issues_first.merge(issues.clone());
        issues_first.merge(branches.clone());

        let mut branches_first = model(initial);
        branches_first.merge(branches);
        branches_first.merge(issues);

        assert_eq!(issues_first.items(), branches_first.items());
        assert_eq!(values(&issues_first), ["main", "feature", "i2", "i9"]);
        assert_eq!(issues_first.selected_value(), Some("main"));
        assert_eq!(branches_first.selected_value(), Some("main"));
    }

    #[test]
    fn scroll_keeps_selection_visible() {
        let items = (0..20).map(|i| branch(&format!("b{i}"))).collect();
        let mut m = model(items);
        m.update_scroll_offset(5);
        assert_eq!(m.scroll_offset(), 0);

        m.move_selection(10);
        m.update_scroll_offset(5);
        assert_eq!(m.scroll_offset(), 7);

        m.move_selection(-10);
        m.update_scroll_offset(5);
        assert_eq!(m.scroll_offset(), 0);

        m.move_selection(-1);
        m.update_scroll_offset(5);
        assert_eq!(m.scroll_offset(), 15);
    }
}
