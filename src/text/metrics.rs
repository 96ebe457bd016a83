//! Word counts, reading time, and length ratios.

use serde::{Deserialize, Serialize};

/// Average silent reading speed used for the reading-time estimate.
pub const WORDS_PER_MINUTE: usize = 200;

/// Count whitespace-delimited words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Count sentences by terminal punctuation. A trailing fragment without
/// punctuation still counts as one sentence.
pub fn sentence_count(text: &str) -> usize {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0;
    }
    let terminals = trimmed
        .split(|c| matches!(c, '.' | '!' | '?'))
        .filter(|s| !s.trim().is_empty())
        .count();
    terminals.max(1)
}

/// Minutes needed to read `text`, rounded up. Non-empty text is at least 1 minute.
pub fn reading_time_minutes(text: &str) -> usize {
    let words = word_count(text);
    if words == 0 {
        return 0;
    }
    words.div_ceil(WORDS_PER_MINUTE)
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `result / original` rounded to two decimals. Zero when `original` is zero.
pub fn length_ratio(result: usize, original: usize) -> f64 {
    if original == 0 {
        return 0.0;
    }
    round2(result as f64 / original as f64)
}

/// Statistics attached to every successful tool result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStatistics {
    pub original_words: usize,
    pub result_words: usize,
    pub original_characters: usize,
    pub result_characters: usize,
    pub result_sentences: usize,
    pub reading_time_minutes: usize,
}

impl TextStatistics {
    /// Compare the text a tool received with the text it produced.
    pub fn compare(original: &str, result: &str) -> Self {
        Self {
            original_words: word_count(original),
            result_words: word_count(result),
            original_characters: original.chars().count(),
            result_characters: result.chars().count(),
            result_sentences: sentence_count(result),
            reading_time_minutes: reading_time_minutes(result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_words_across_whitespace() {
        assert_eq!(word_count("A B C D E F G H I J"), 10);
        assert_eq!(word_count("  spaced\tout\nwords  "), 3);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn reading_time_rounds_up() {
        assert_eq!(reading_time_minutes(""), 0);
        assert_eq!(reading_time_minutes("one"), 1);
        let long = "word ".repeat(201);
        assert_eq!(reading_time_minutes(&long), 2);
    }

    #[test]
    fn ratio_is_rounded_and_safe_on_zero() {
        assert_eq!(length_ratio(3, 10), 0.3);
        assert_eq!(length_ratio(1, 3), 0.33);
        assert_eq!(length_ratio(5, 0), 0.0);
    }

    #[test]
    fn sentences_include_unterminated_tail() {
        assert_eq!(sentence_count("One. Two! Three"), 3);
        assert_eq!(sentence_count("no punctuation"), 1);
        assert_eq!(sentence_count("   "), 0);
    }
}
