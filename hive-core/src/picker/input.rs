use unicode_segmentation::UnicodeSegmentation;

/// Single-line text buffer with a grapheme-aware cursor.
///
/// `cursor` is a byte offset that always sits on a grapheme boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchInput {
    text: String,
    cursor: usize,
}

impl SearchInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replace the contents and park the cursor at the end
    pub fn set(&mut self, text: impl Into<String>) {
        *self = Self::with_text(text);
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Start offsets of every grapheme plus the end of the text
    fn boundaries(&self) -> Vec<usize> {
        self.text
            .grapheme_indices(true)
            .map(|(i, _)| i)
            .chain(std::iter::once(self.text.len()))
            .collect()
    }

    /// Snap the cursor onto a boundary and return that boundary's index
    fn snap(&mut self, boundaries: &[usize]) -> usize {
        let cursor = self.cursor.min(self.text.len());
        let idx = match boundaries.binary_search(&cursor) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        self.cursor = boundaries.get(idx).copied().unwrap_or(0);
        idx
    }

    fn is_space(grapheme: &str) -> bool {
        grapheme.chars().all(char::is_whitespace)
    }

    fn word_start_before(&self, from: usize) -> usize {
        let graphemes: Vec<(usize, &str)> = self.text[..from].grapheme_indices(true).collect();
        let mut iter = graphemes.iter().rev().peekable();
        while iter.next_if(|(_, g)| Self::is_space(g)).is_some() {}
        let mut start = 0;
        while let Some((i, _)) = iter.next_if(|(_, g)| !Self::is_space(g)) {
            start = *i;
        }
        start
    }

    fn word_end_after(&self, from: usize) -> usize {
        let mut iter = self.text[from..].grapheme_indices(true).peekable();
        while iter.next_if(|(_, g)| Self::is_space(g)).is_some() {}
        while iter.next_if(|(_, g)| !Self::is_space(g)).is_some() {}
        iter.peek().map_or(self.text.len(), |(i, _)| from + i)
    }

    pub fn cursor_left(&mut self) {
        let boundaries = self.boundaries();
        let idx = self.snap(&boundaries);
        if idx > 0 {
            self.cursor = boundaries[idx - 1];
        }
    }

    pub fn cursor_right(&mut self) {
        let boundaries = self.boundaries();
        let idx = self.snap(&boundaries);
        if let Some(&next) = boundaries.get(idx + 1) {
            self.cursor = next;
        }
    }

    pub fn cursor_start(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn cursor_word_left(&mut self) {
        let boundaries = self.boundaries();
        self.snap(&boundaries);
        self.cursor = self.word_start_before(self.cursor);
    }

    pub fn cursor_word_right(&mut self) {
        let boundaries = self.boundaries();
        self.snap(&boundaries);
        self.cursor = self.word_end_after(self.cursor);
    }

    pub fn insert_char(&mut self, c: char) {
        let boundaries = self.boundaries();
        self.snap(&boundaries);
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Remove the grapheme before the cursor; false when there is none
    pub fn backspace(&mut self) -> bool {
        let boundaries = self.boundaries();
        let idx = self.snap(&boundaries);
        if idx == 0 {
            return false;
        }
        let prev = boundaries[idx - 1];
        self.text.drain(prev..self.cursor);
        self.cursor = prev;
        true
    }

    /// Remove the grapheme under the cursor; false at the end of the text
    pub fn delete_forward(&mut self) -> bool {
        let boundaries = self.boundaries();
        let idx = self.snap(&boundaries);
        match boundaries.get(idx + 1) {
            Some(&end) => {
                self.text.drain(self.cursor..end);
                true
            }
            None => false,
        }
    }

    pub fn delete_word(&mut self) {
        let boundaries = self.boundaries();
        self.snap(&boundaries);
        let start = self.word_start_before(self.cursor);
        self.text.drain(start..self.cursor);
        self.cursor = start;
    }

    pub fn delete_to_start(&mut self) {
        let boundaries = self.boundaries();
        self.snap(&boundaries);
        self.text.drain(..self.cursor);
        self.cursor = 0;
    }

    pub fn delete_to_end(&mut self) {
        let boundaries = self.boundaries();
        self.snap(&boundaries);
        self.text.truncate(self.cursor);
    }
}
