//! Whole-word keyword lookup shared by the classifier and the extractors.

/// True if `keyword` occurs in `text` with no alphanumeric character
/// directly before or after it. Both inputs are expected lower-cased.
pub fn contains_keyword(text: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }
    let mut search_from = 0;
    while let Some(pos) = text[search_from..].find(keyword) {
        let start = search_from + pos;
        let end = start + keyword.len();
        let before_ok = text[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = text[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        // Advance past the first char of this occurrence.
        search_from = start
            + text[start..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
    }
    false
}

/// True if any keyword in `keywords` occurs in `text`.
pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| contains_keyword(text, kw))
}

/// A fixed, ordered keyword table: the first category with a matching
/// keyword wins.
pub type KeywordTable<T> = &'static [(T, &'static [&'static str])];

/// Resolve a category from `text`, falling back to `default` when no
/// keyword matches. Total over every input.
pub fn first_match<T: Copy>(text: &str, table: KeywordTable<T>, default: T) -> T {
    table
        .iter()
        .find(|(_, keywords)| contains_any(text, keywords))
        .map(|(value, _)| *value)
        .unwrap_or(default)
}
