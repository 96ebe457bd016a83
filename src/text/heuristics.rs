//! Content shape heuristics for subject text.
//!
//! Detects code snippets, technical vocabulary, and long complex sentences.
//! These are prompt-enrichment hints only; a false positive costs one extra
//! sentence in the prompt.

use regex::Regex;
use std::sync::LazyLock;

/// Returns true if the text appears to contain source code.
///
/// Looks for language keywords, bracket/semicolon line endings, indented
/// blocks, code comments, and fenced blocks. Requires at least 2 indicators.
pub fn has_code_snippet(text: &str) -> bool {
    let indicators: Vec<&dyn Fn(&str) -> bool> = vec![
        // Language keywords at line start
        &|t: &str| {
            t.lines().any(|l| {
                let trimmed = l.trim();
                ["import ", "from ", "const ", "let ", "var ", "function ",
                 "def ", "class ", "fn ", "pub ", "return ", "#include"]
                    .iter()
                    .any(|kw| trimmed.starts_with(kw))
            })
        },
        // Lines ending with brackets/semicolons
        &|t: &str| {
            t.lines().any(|l| {
                let trimmed = l.trim();
                ['{', '}', ')', ';'].iter().any(|c| trimmed.ends_with(*c))
            })
        },
        // Indented block
        &|t: &str| {
            t.lines().filter(|l| l.starts_with("    ") || l.starts_with('\t')).count() > 1
        },
        // Comments
        &|t: &str| {
            t.lines().any(|l| {
                let trimmed = l.trim();
                trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with("# ")
            })
        },
        // Markdown fence or inline call syntax like foo(bar)
        &|t: &str| t.contains("```") || CALL_SYNTAX.is_match(t),
    ];

    let match_count = indicators.iter().filter(|check| check(text)).count();
    match_count >= 2
}

static CALL_SYNTAX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z_][A-Za-z0-9_]*\([^()\n]*\)").expect("valid regex"));

static TECHNICAL_TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\b(?:",
        r"[a-z]+[A-Z][A-Za-z]*",           // camelCase
        r"|[a-z]+_[a-z_]+",                // snake_case
        r"|[A-Z]{2,}[0-9]*s?",             // acronyms: API, HTTP2, GPUs
        r"|[a-z]+-(?:based|driven|aware)", // jargon compounds
        r"|(?:[a-z]+(?:tion|ism|ology|ization|ometry))",
        r")\b",
    ))
    .expect("valid regex")
});

/// Returns true if the text uses vocabulary that likely needs defining:
/// at least two camelCase / snake_case identifiers, acronyms, or long
/// Latinate nouns.
pub fn has_technical_terms(text: &str) -> bool {
    TECHNICAL_TERM.find_iter(text).take(2).count() >= 2
}

/// Words above which a sentence counts as long.
const LONG_SENTENCE_WORDS: usize = 25;

const SUBORDINATORS: &[&str] = &[
    "although", "because", "whereas", "which", "whereby", "notwithstanding",
    "consequently", "nevertheless", "furthermore", "therefore",
];

/// Returns true if any sentence is long, or packs three or more commas
/// together with a subordinating connective.
pub fn has_complex_sentences(text: &str) -> bool {
    text.split(|c| matches!(c, '.' | '!' | '?'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .any(|sentence| {
            if sentence.split_whitespace().count() > LONG_SENTENCE_WORDS {
                return true;
            }
            let commas = sentence.matches(',').count();
            let lower = sentence.to_lowercase();
            commas >= 3
                && lower
                    .split(|c: char| !c.is_alphanumeric())
                    .any(|w| SUBORDINATORS.contains(&w))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_code_snippets() {
        let code = "fn main() {\n    println!(\"hi\");\n}";
        assert!(has_code_snippet(code));
        assert!(!has_code_snippet("The meeting moved to Tuesday."));
    }

    #[test]
    fn detects_technical_terms() {
        assert!(has_technical_terms("The API returns a JSON payload."));
        assert!(has_technical_terms("Call getUserName with the user_id field."));
        assert!(!has_technical_terms("The cat sat on the mat."));
    }

    #[test]
    fn detects_complex_sentences() {
        let long = "This sentence keeps going and going with many many words so that \
                    it clearly exceeds the threshold that we set for a very long sentence today.";
        assert!(has_complex_sentences(long));
        let dense = "The plan, which was late, failed, although nobody, it seems, noticed.";
        assert!(has_complex_sentences(dense));
        assert!(!has_complex_sentences("Short one. Another short one."));
    }
}
