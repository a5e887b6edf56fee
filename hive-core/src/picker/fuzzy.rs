/// Score `text` against `query`; lower is better, `None` means no match.
///
/// Matching is case-insensitive. An empty query matches everything with 0. A
/// contiguous occurrence scores its starting character offset. Otherwise every
/// query character must appear in order: each matched character adds its
/// offset and every other character of `text` adds 1.
pub fn fuzzy_score(query: &str, text: &str) -> Option<usize> {
    if query.is_empty() {
        return Some(0);
    }
    let query = query.to_lowercase();
    let text = text.to_lowercase();

    if let Some(byte_idx) = text.find(&query) {
        return Some(text[..byte_idx].chars().count());
    }

    let mut wanted = query.chars().peekable();
    let mut score = 0;
    for (i, c) in text.chars().enumerate() {
        if wanted.peek() == Some(&c) {
            wanted.next();
            score += i;
        } else {
            score += 1;
        }
    }
    wanted.peek().is_none().then_some(score)
}

/// Indices of `texts` matching `query`, best first; ties keep their order.
pub fn rank<'a>(query: &str, texts: impl IntoIterator<Item = &'a str>) -> Vec<usize> {
    let mut scored: Vec<(usize, usize)> = texts
        .into_iter()
        .enumerate()
        .filter_map(|(idx, text)| fuzzy_score(query, text).map(|score| (idx, score)))
        .collect();
    scored.sort_by_key(|&(_, score)| score);
    scored.into_iter().map(|(idx, _)| idx).collect()
}
