//! Intent classification — free-text instruction → command name.
//!
//! Two paths:
//!   - `/command rest...` — explicit command, taken verbatim, no matching
//!   - anything else      — ordered pattern table, first command to match wins
//!
//! Table order is the tie-break. "summarize and rewrite this" resolves to
//! `summarize` because summarize is listed first.

use crate::tools::ToolKind;
use regex::Regex;
use std::sync::LazyLock;

/// Escape prefix for explicit commands.
pub const COMMAND_PREFIX: char = '/';

/// Command returned when no pattern matches.
pub const DEFAULT_COMMAND: &str = "general";

/// Ordered pattern table for the built-in tool set.
const DEFAULT_RULES: &[(ToolKind, &[&str])] = &[
    (
        ToolKind::Summarize,
        &[
            r"\bsummar(?:y|ies|ize|ise|ized|ised|izing|ising)\b",
            r"\btl;?dr\b",
            r"\b(?:key|main) points\b",
            r"\bcondense\b",
            r"\bgist\b",
            r"\brecap\b",
        ],
    ),
    (
        ToolKind::Rewrite,
        &[
            r"\bre-?write\b",
            r"\brephrase\b",
            r"\bparaphrase\b",
            r"\breword\b",
            r"\bimprove\b",
            r"\bpolish\b",
            r"\bproofread\b",
            r"\bmake (?:it|this) (?:more |less )?(?:formal|casual|professional|concise|shorter|longer|clearer|simpler|friendly|friendlier)\b",
        ],
    ),
    (
        ToolKind::Explain,
        &[
            r"\bexplain\b",
            r"\bwhat (?:is|are|does|do)\b",
            r"\bwhy (?:is|are|does|do)\b",
            r"\bhow (?:does|do)\b",
            r"\bclarify\b",
            r"\bdefine\b",
            r"\bmeaning of\b",
            r"\bhelp me understand\b",
        ],
    ),
    (
        ToolKind::Translate,
        &[
            r"\btranslat(?:e|ion|ed)\b",
            r"\b(?:in|into|to) (?:english|spanish|french|german|italian|portuguese|chinese|mandarin|japanese|korean|russian|arabic|hindi|dutch)\b",
        ],
    ),
    (
        ToolKind::Format,
        &[
            r"\bformat(?:ting)?\b",
            r"\bbullet(?:s| points?| list)?\b",
            r"\bnumbered list\b",
            r"\btable\b",
            r"\bheadings?\b",
            r"\brestructure\b",
            r"\borgani[sz]e\b",
        ],
    ),
    (
        ToolKind::Generate,
        &[
            r"\bwrite\b",
            r"\bgenerate\b",
            r"\bcreate\b",
            r"\bdraft\b",
            r"\bcompose\b",
            r"\bbrainstorm\b",
            r"\boutline\b",
            r"\bcontinue\b",
        ],
    ),
];

/// One row of a classification table.
#[derive(Debug, Clone)]
pub struct IntentRule {
    pub command: String,
    pub patterns: Vec<Regex>,
}

impl IntentRule {
    fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }
}

static BUILTIN_RULES: LazyLock<Vec<IntentRule>> = LazyLock::new(|| {
    DEFAULT_RULES
        .iter()
        .map(|(kind, patterns)| IntentRule {
            command: kind.name().to_string(),
            patterns: patterns
                .iter()
                .map(|p| Regex::new(p).expect("built-in intent pattern must compile"))
                .collect(),
        })
        .collect()
});

/// A classified user submission. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The trimmed input exactly as typed.
    pub raw_text: String,
    /// The resolved command name (may be unknown to the registry).
    pub command: String,
    /// Set when the user typed `/command`.
    pub explicit_command: Option<String>,
    /// Text the extractors read: everything after `/command`, or the whole input.
    pub parameter_tail: String,
}

/// Maps raw user text to a command name. Never fails.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
    default_command: String,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Classifier over the built-in tool table.
    pub fn new() -> Self {
        Self {
            rules: BUILTIN_RULES.clone(),
            default_command: DEFAULT_COMMAND.to_string(),
        }
    }

    /// Classifier over a custom ordered table (for alternative tool sets).
    pub fn with_rules(rules: Vec<IntentRule>, default_command: impl Into<String>) -> Self {
        Self {
            rules,
            default_command: default_command.into(),
        }
    }

    /// Return the command name for `raw_text`.
    pub fn classify(&self, raw_text: &str) -> String {
        self.parse(raw_text).command
    }

    /// Classify and split `raw_text` into a [`Request`].
    pub fn parse(&self, raw_text: &str) -> Request {
        let trimmed = raw_text.trim();

        if let Some(rest) = trimmed.strip_prefix(COMMAND_PREFIX) {
            let rest = rest.trim_start();
            let (token, tail) = match rest.split_once(char::is_whitespace) {
                Some((token, tail)) => (token, tail.trim()),
                None => (rest, ""),
            };
            let command = token.to_lowercase();
            log::info!("[CLASSIFY] Explicit command: /{}", command);
            return Request {
                raw_text: trimmed.to_string(),
                command: command.clone(),
                explicit_command: Some(command),
                parameter_tail: tail.to_string(),
            };
        }

        let lower = trimmed.to_lowercase();
        let command = self
            .rules
            .iter()
            .find(|rule| rule.matches(&lower))
            .map(|rule| rule.command.clone())
            .unwrap_or_else(|| self.default_command.clone());

        log::info!("[CLASSIFY] Heuristic command: {} ({} chars)", command, trimmed.len());

        Request {
            raw_text: trimmed.to_string(),
            command,
            explicit_command: None,
            parameter_tail: trimmed.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_prefix_passes_token_through() {
        let c = IntentClassifier::new();
        let req = c.parse("/foo bar baz");
        assert_eq!(req.command, "foo");
        assert_eq!(req.explicit_command.as_deref(), Some("foo"));
        assert_eq!(req.parameter_tail, "bar baz");
    }

    #[test]
    fn space_after_prefix_is_skipped() {
        let c = IntentClassifier::new();
        let req = c.parse("/  summarize now");
        assert_eq!(req.command, "summarize");
        assert_eq!(req.explicit_command.as_deref(), Some("summarize"));
        assert_eq!(req.parameter_tail, "now");

        let bare = c.parse("/");
        assert_eq!(bare.command, "");
        assert_eq!(bare.parameter_tail, "");
    }

    #[test]
    fn explicit_prefix_bypasses_keywords() {
        let c = IntentClassifier::new();
        assert_eq!(c.classify("/translate summarize this"), "translate");
        assert_eq!(c.classify("  /Rewrite"), "rewrite");
    }

    #[test]
    fn single_keyword_selects_its_command() {
        let c = IntentClassifier::new();
        assert_eq!(c.classify("Summarize this text"), "summarize");
        assert_eq!(c.classify("Please rephrase the paragraph"), "rewrite");
        assert_eq!(c.classify("What does idempotent mean?"), "explain");
        assert_eq!(c.classify("Translate to German"), "translate");
        assert_eq!(c.classify("Turn this into a numbered list"), "format");
        assert_eq!(c.classify("Draft an email to the team"), "generate");
    }

    #[test]
    fn table_order_breaks_ties() {
        let c = IntentClassifier::new();
        assert_eq!(c.classify("summarize and rewrite this"), "summarize");
        assert_eq!(c.classify("explain then summarize"), "summarize");
        assert_eq!(c.classify("rewrite it and explain why"), "rewrite");
    }

    #[test]
    fn rewrite_is_not_mistaken_for_write() {
        let c = IntentClassifier::new();
        assert_eq!(c.classify("rewrite the intro"), "rewrite");
        assert_eq!(c.classify("write an intro"), "generate");
    }

    #[test]
    fn no_match_falls_back_to_general() {
        let c = IntentClassifier::new();
        assert_eq!(c.classify("hello there"), DEFAULT_COMMAND);
        assert_eq!(c.classify(""), DEFAULT_COMMAND);
    }

    #[test]
    fn custom_table_and_default() {
        let rules = vec![IntentRule {
            command: "shout".to_string(),
            patterns: vec![Regex::new(r"\bloud\b").unwrap()],
        }];
        let c = IntentClassifier::with_rules(rules, "content_creation");
        assert_eq!(c.classify("say it LOUD"), "shout");
        assert_eq!(c.classify("summarize"), "content_creation");
    }
}
