//! Subject text resolution — which text a tool operates on.
//!
//! Precedence, highest first:
//!   1. quoted literal in the instruction (`"..."` or `“...”`)
//!   2. "what is / what does X" phrasing       (explain only)
//!   3. active selection
//!   4. "explain X" keyword extraction          (explain only)
//!   5. full document content
//!
//! Quoting is the user's explicit override and always wins.

use super::params::only_explain_options;
use crate::document::DocumentContext;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)"|“([^”]+)”"#).expect("valid regex"));

static QUESTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bwhat\s+(?:is|are|does|do)\s+(?:an?\s+|the\s+)?(.+?)(?:\s+mean)?\s*[?.!]*\s*$")
        .expect("valid regex")
});

static KEYWORD_SUBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:explain|define|clarify)\s+(?:to me\s+)?(?:what\s+)?(?:an?\s+|the\s+)?(.+?)\s*[?.!]*\s*$")
        .expect("valid regex")
});

static TRAILING_MODIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+(?:in|with|for|like|using|to)\s+.*$").expect("valid regex")
});

/// Words that point at the document instead of naming a subject.
const DEICTIC: &[&str] = &[
    "this", "that", "it", "these", "those", "here", "above", "below",
    "selected", "selection", "text", "document", "paragraph", "passage",
];

/// Where the subject text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectSource {
    Quoted,
    Question,
    Selection,
    Keyword,
    Document,
}

/// Which precedence chain to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectStrategy {
    /// quoted > selection > document
    Document,
    /// quoted > question > selection > keyword > document
    Explain,
    /// As `Explain`, for `/explain <term>`: the bare tail also counts as
    /// the keyword subject.
    ExplainTerm,
}

impl SubjectStrategy {
    fn is_explain(self) -> bool {
        matches!(self, SubjectStrategy::Explain | SubjectStrategy::ExplainTerm)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub text: String,
    pub source: SubjectSource,
}

impl Subject {
    fn new(text: impl Into<String>, source: SubjectSource) -> Self {
        Self { text: text.into(), source }
    }
}

/// First quoted segment in `text`, if any non-blank one exists.
pub fn quoted_text(text: &str) -> Option<String> {
    QUOTED.captures_iter(text).find_map(|c| {
        c.get(1)
            .or_else(|| c.get(2))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

/// `text` with every quoted segment replaced by a single space.
pub fn strip_quoted(text: &str) -> String {
    QUOTED.replace_all(text, " ").into_owned()
}

fn names_a_subject(candidate: &str) -> bool {
    let first = candidate
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_lowercase();
    !first.is_empty() && !DEICTIC.contains(&first.as_str())
}

fn question_subject(tail: &str) -> Option<String> {
    let caps = QUESTION.captures(tail.trim())?;
    let candidate = caps.get(1)?.as_str().trim();
    names_a_subject(candidate).then(|| candidate.to_string())
}

fn keyword_subject(tail: &str) -> Option<String> {
    let caps = KEYWORD_SUBJECT.captures(tail.trim())?;
    term_subject(caps.get(1)?.as_str())
}

fn term_subject(candidate: &str) -> Option<String> {
    // Leading space so a tail that starts with a modifier strips to nothing.
    let padded = format!(" {}", candidate.trim());
    let candidate = TRAILING_MODIFIER.replace(&padded, "");
    let candidate = candidate.trim().trim_end_matches(['?', '.', '!']).trim_end();
    names_a_subject(candidate).then(|| candidate.to_string())
}

/// The whole tail of `/explain <term>`, unless it only carries options.
fn bare_term_subject(tail: &str) -> Option<String> {
    if only_explain_options(&strip_quoted(tail)) {
        return None;
    }
    term_subject(tail)
}

fn non_blank(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Resolve the subject text for a request. `None` means there is nothing
/// to operate on.
pub fn resolve_subject(
    tail: &str,
    context: &DocumentContext,
    strategy: SubjectStrategy,
) -> Option<Subject> {
    if let Some(quoted) = quoted_text(tail) {
        return Some(Subject::new(quoted, SubjectSource::Quoted));
    }

    if strategy.is_explain() {
        if let Some(term) = question_subject(tail) {
            return Some(Subject::new(term, SubjectSource::Question));
        }
    }

    if let Some(selection) = non_blank(&context.selection) {
        return Some(Subject::new(selection, SubjectSource::Selection));
    }

    let keyword = match strategy {
        SubjectStrategy::Document => None,
        SubjectStrategy::Explain => keyword_subject(tail),
        SubjectStrategy::ExplainTerm => keyword_subject(tail).or_else(|| bare_term_subject(tail)),
    };
    if let Some(term) = keyword {
        return Some(Subject::new(term, SubjectSource::Keyword));
    }

    non_blank(&context.full_content).map(|doc| Subject::new(doc, SubjectSource::Document))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(selection: &str, full: &str) -> DocumentContext {
        DocumentContext {
            selection: selection.to_string(),
            full_content: full.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn quoted_beats_selection_and_document() {
        let s = resolve_subject(r#"summarize "The Quick Fox""#, &ctx("sel", "doc"), SubjectStrategy::Document)
            .unwrap();
        assert_eq!(s.text, "The Quick Fox");
        assert_eq!(s.source, SubjectSource::Quoted);
    }

    #[test]
    fn smart_quotes_are_recognised() {
        assert_eq!(quoted_text("explain “monads”").as_deref(), Some("monads"));
    }

    #[test]
    fn selection_beats_document() {
        let s = resolve_subject("summarize", &ctx("  picked  ", "whole doc"), SubjectStrategy::Document).unwrap();
        assert_eq!(s.text, "picked");
        assert_eq!(s.source, SubjectSource::Selection);
    }

    #[test]
    fn document_when_no_selection() {
        let s = resolve_subject("summarize", &ctx("", "whole doc"), SubjectStrategy::Document).unwrap();
        assert_eq!(s.source, SubjectSource::Document);
    }

    #[test]
    fn nothing_available() {
        assert!(resolve_subject("summarize", &ctx(" ", ""), SubjectStrategy::Document).is_none());
    }

    #[test]
    fn question_beats_selection_for_explain() {
        let s = resolve_subject("What does idempotent mean?", &ctx("sel", ""), SubjectStrategy::Explain).unwrap();
        assert_eq!(s.text, "idempotent");
        assert_eq!(s.source, SubjectSource::Question);
    }

    #[test]
    fn deictic_question_defers_to_selection() {
        let s = resolve_subject("what does this mean?", &ctx("sel", ""), SubjectStrategy::Explain).unwrap();
        assert_eq!(s.source, SubjectSource::Selection);
    }

    #[test]
    fn keyword_fallback_after_selection() {
        let s = resolve_subject("explain recursion in simple terms", &ctx("", "doc"), SubjectStrategy::Explain)
            .unwrap();
        assert_eq!(s.text, "recursion");
        assert_eq!(s.source, SubjectSource::Keyword);

        let s = resolve_subject("explain recursion", &ctx("sel", ""), SubjectStrategy::Explain).unwrap();
        assert_eq!(s.source, SubjectSource::Selection);
    }

    #[test]
    fn explicit_explain_tail_names_the_term() {
        let s = resolve_subject("recursion", &ctx("", ""), SubjectStrategy::ExplainTerm).unwrap();
        assert_eq!(s.text, "recursion");
        assert_eq!(s.source, SubjectSource::Keyword);

        let s = resolve_subject("closures with examples", &ctx("", "doc"), SubjectStrategy::ExplainTerm)
            .unwrap();
        assert_eq!(s.text, "closures");
        assert_eq!(s.source, SubjectSource::Keyword);

        // Selection still outranks the keyword.
        let s = resolve_subject("recursion", &ctx("sel", "doc"), SubjectStrategy::ExplainTerm).unwrap();
        assert_eq!(s.source, SubjectSource::Selection);

        // Plain "explain" requests keep needing the keyword.
        let s = resolve_subject("recursion", &ctx("", "doc"), SubjectStrategy::Explain).unwrap();
        assert_eq!(s.source, SubjectSource::Document);
    }

    #[test]
    fn option_only_tail_is_not_a_term() {
        for tail in ["briefly", "step by step with examples", "this", "in simple terms", ""] {
            let s = resolve_subject(tail, &ctx("", "doc"), SubjectStrategy::ExplainTerm).unwrap();
            assert_eq!(s.source, SubjectSource::Document, "tail {:?}", tail);
        }
    }

    #[test]
    fn question_phrasing_ignored_for_document_strategy() {
        let s = resolve_subject("what is a monad", &ctx("", "doc"), SubjectStrategy::Document).unwrap();
        assert_eq!(s.source, SubjectSource::Document);
    }

    #[test]
    fn strip_quoted_removes_segments() {
        assert_eq!(strip_quoted(r#"a "b c" d"#), "a   d");
    }
}
