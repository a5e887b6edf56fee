use crate::issues::Issue;

/// Which background source owns a row. Branch rows always sort before issue rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemSource {
    Branches,
    Issues,
}

/// Presentation tag; the front end maps it onto theme colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemStyle {
    #[default]
    Plain,
    Main,
    Clean,
    Dirty,
    Branch,
    Issue,
}

/// One row of the picker. `value` is the identity; everything else is display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerItem {
    pub text: String,
    pub value: String,
    pub meta: String,
    pub style: ItemStyle,
    pub source: ItemSource,
}

impl PickerItem {
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
            meta: String::new(),
            style: ItemStyle::Plain,
            source: ItemSource::Branches,
        }
    }

    /// Row whose text doubles as its value
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(text.clone(), text)
    }

    #[must_use]
    pub fn with_meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = meta.into();
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: ItemStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: ItemSource) -> Self {
        self.source = source;
        self
    }
}

impl From<&Issue> for PickerItem {
    fn from(issue: &Issue) -> Self {
        Self::new(issue.display_text(), issue.value())
            .with_style(ItemStyle::Issue)
            .with_source(ItemSource::Issues)
    }
}

/// Complete set of rows produced by one background source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSnapshot {
    pub source: ItemSource,
    pub items: Vec<PickerItem>,
}

impl RefreshSnapshot {
    pub fn branches(items: Vec<PickerItem>) -> Self {
        Self {
            source: ItemSource::Branches,
            items,
        }
    }

    pub fn issues(items: Vec<PickerItem>) -> Self {
        Self {
            source: ItemSource::Issues,
            items,
        }
    }
}
