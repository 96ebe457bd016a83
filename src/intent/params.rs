//! Parameter extraction — per-tool option resolution from the request tail.
//!
//! Every field is an independent lookup against a fixed keyword table on the
//! lower-cased tail. The first category in table order wins; no match yields
//! the field's default. All extractors are total: any string in, a value out.
//!
//! Quoted segments are removed before extraction so that keywords inside the
//! user's own text ("summarize \"a short list\"") never become options.

use super::keywords::{contains_any, first_match, KeywordTable};
use super::subject::strip_quoted;
use crate::tools::ToolKind;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

// ── Shared option enums ─────────────────────────────────────────────

/// Requested output length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Length {
    Short,
    #[default]
    Medium,
    Long,
}

const LENGTH_TABLE: KeywordTable<Length> = &[
    (Length::Short, &["brief", "briefly", "short", "shorter", "quick", "concise", "one sentence"]),
    (Length::Long, &["detailed", "long", "longer", "comprehensive", "thorough", "in-depth", "in depth"]),
];

/// Voice the result should carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Neutral,
    Friendly,
    Professional,
    Confident,
    Persuasive,
    Empathetic,
    Humorous,
}

const TONE_TABLE: KeywordTable<Tone> = &[
    (Tone::Friendly, &["friendly", "friendlier", "warm", "warmer", "approachable"]),
    (Tone::Professional, &["professional", "businesslike", "polished"]),
    (Tone::Confident, &["confident", "assertive", "bold"]),
    (Tone::Persuasive, &["persuasive", "convincing", "compelling"]),
    (Tone::Empathetic, &["empathetic", "compassionate", "kind", "gentle"]),
    (Tone::Humorous, &["funny", "humorous", "witty", "playful"]),
];

/// Who the result is written for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    #[default]
    General,
    Beginner,
    Technical,
    Business,
    Academic,
}

// Beginner first so "non-technical" is not read as Technical.
const AUDIENCE_TABLE: KeywordTable<Audience> = &[
    (
        Audience::Beginner,
        &["beginner", "beginners", "student", "students", "kid", "kids", "child", "children",
          "layperson", "non-technical", "newcomer", "newcomers"],
    ),
    (Audience::Technical, &["technical", "developer", "developers", "engineer", "engineers", "expert", "experts"]),
    (Audience::Business, &["business", "executive", "executives", "stakeholder", "stakeholders", "client", "clients"]),
    (Audience::Academic, &["academic", "researcher", "researchers", "scholar", "scholars"]),
];

// ── Summarize ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStyle {
    #[default]
    Concise,
    BulletPoints,
    Executive,
    Academic,
    Detailed,
}

const SUMMARY_STYLE_TABLE: KeywordTable<SummaryStyle> = &[
    (SummaryStyle::BulletPoints, &["bullet", "bullets", "bullet points", "key points", "points", "list"]),
    (SummaryStyle::Executive, &["executive", "exec", "management", "leadership"]),
    (SummaryStyle::Academic, &["academic", "abstract", "scholarly"]),
    (SummaryStyle::Detailed, &["detailed", "comprehensive", "thorough"]),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeParams {
    pub style: SummaryStyle,
    pub length: Length,
    pub specific_instructions: Vec<String>,
}

// ── Rewrite ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteStyle {
    #[default]
    Improve,
    Formal,
    Casual,
    Simplify,
    Shorten,
    Expand,
    Creative,
}

const REWRITE_STYLE_TABLE: KeywordTable<RewriteStyle> = &[
    (RewriteStyle::Formal, &["formal", "formally"]),
    (RewriteStyle::Casual, &["casual", "informal", "relaxed", "conversational"]),
    (RewriteStyle::Simplify, &["simplify", "simpler", "simple", "plain", "easier"]),
    (RewriteStyle::Shorten, &["shorten", "shorter", "concise", "tighten", "trim"]),
    (RewriteStyle::Expand, &["expand", "elaborate", "longer", "lengthen"]),
    (RewriteStyle::Creative, &["creative", "vivid", "engaging", "colorful"]),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteParams {
    pub style: RewriteStyle,
    pub tone: Tone,
    pub audience: Audience,
    pub specific_instructions: Vec<String>,
}

// ── Explain ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplainStyle {
    #[default]
    Clear,
    Simple,
    Analogy,
    StepByStep,
    Technical,
}

const EXPLAIN_STYLE_TABLE: KeywordTable<ExplainStyle> = &[
    (ExplainStyle::Simple, &["simple", "simply", "eli5", "like i'm five", "plain english", "layman", "layman's terms"]),
    (ExplainStyle::Analogy, &["analogy", "analogies", "metaphor"]),
    (ExplainStyle::StepByStep, &["step by step", "step-by-step", "walk me through"]),
    (ExplainStyle::Technical, &["technical", "technically", "precise", "precisely"]),
];

/// How deep an explanation goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Depth {
    Brief,
    #[default]
    Standard,
    InDepth,
}

const DEPTH_TABLE: KeywordTable<Depth> = &[
    (Depth::Brief, &["brief", "briefly", "quick", "quickly", "short", "one sentence", "tl;dr"]),
    (Depth::InDepth, &["detailed", "in-depth", "in depth", "thorough", "thoroughly", "deep dive", "comprehensive"]),
];

const EXAMPLE_KEYWORDS: &[&str] = &["example", "examples", "for instance", "show me"];

/// True when `phrase` only restates explain options ("briefly",
/// "step by step with examples") and names no term of its own.
pub fn only_explain_options(phrase: &str) -> bool {
    const FILLER: &[&str] = &["a", "an", "the", "it", "me", "please", "and", "way", "terms", "with", "in", "for", "like", "using"];
    let lower = phrase.to_lowercase();
    let option_words: Vec<&str> = EXPLAIN_STYLE_TABLE
        .iter()
        .map(|(_, k)| *k)
        .chain(DEPTH_TABLE.iter().map(|(_, k)| *k))
        .chain(AUDIENCE_TABLE.iter().map(|(_, k)| *k))
        .chain(std::iter::once(EXAMPLE_KEYWORDS))
        .flat_map(|keywords| keywords.iter().flat_map(|k| k.split_whitespace()))
        .collect();

    let mut words = lower
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .peekable();
    words.peek().is_some() && words.all(|w| FILLER.contains(&w) || option_words.contains(&w))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainParams {
    pub style: ExplainStyle,
    pub depth: Depth,
    pub audience: Audience,
    pub include_examples: bool,
    pub specific_instructions: Vec<String>,
}

// ── Translate ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    English,
    Spanish,
    French,
    German,
    Italian,
    Portuguese,
    Chinese,
    Japanese,
    Korean,
    Russian,
    Arabic,
    Hindi,
    Dutch,
}

const LANGUAGE_TABLE: KeywordTable<Language> = &[
    (Language::English, &["english"]),
    (Language::Spanish, &["spanish", "español", "espanol", "castellano"]),
    (Language::French, &["french", "français", "francais"]),
    (Language::German, &["german", "deutsch"]),
    (Language::Italian, &["italian", "italiano"]),
    (Language::Portuguese, &["portuguese", "português", "portugues"]),
    (Language::Chinese, &["chinese", "mandarin"]),
    (Language::Japanese, &["japanese"]),
    (Language::Korean, &["korean"]),
    (Language::Russian, &["russian"]),
    (Language::Arabic, &["arabic"]),
    (Language::Hindi, &["hindi"]),
    (Language::Dutch, &["dutch"]),
];

impl Language {
    /// Display name used in prompts.
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Italian => "Italian",
            Language::Portuguese => "Portuguese",
            Language::Chinese => "Chinese (Simplified)",
            Language::Japanese => "Japanese",
            Language::Korean => "Korean",
            Language::Russian => "Russian",
            Language::Arabic => "Arabic",
            Language::Hindi => "Hindi",
            Language::Dutch => "Dutch",
        }
    }

    /// Resolve a single word (any alias) to a language.
    pub fn from_word(word: &str) -> Option<Self> {
        LANGUAGE_TABLE
            .iter()
            .find(|(_, aliases)| aliases.contains(&word))
            .map(|(lang, _)| *lang)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formality {
    #[default]
    Preserve,
    Formal,
    Informal,
}

const FORMALITY_TABLE: KeywordTable<Formality> = &[
    (Formality::Informal, &["informal", "casual", "colloquial"]),
    (Formality::Formal, &["formal", "polite", "formally"]),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateParams {
    pub target_language: Language,
    pub source_language: Option<Language>,
    pub formality: Formality,
    pub specific_instructions: Vec<String>,
}

static TARGET_LANGUAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:to|into|in)\s+(\p{L}+)").expect("valid regex"));
static SOURCE_LANGUAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bfrom\s+(\p{L}+)").expect("valid regex"));

/// Target language precedence: "to/into/in <language>" first, then the
/// first language in table order that is not the source, then English.
fn extract_languages(lower: &str) -> (Language, Option<Language>) {
    let source = SOURCE_LANGUAGE
        .captures_iter(lower)
        .find_map(|c| Language::from_word(&c[1]));

    let explicit = TARGET_LANGUAGE
        .captures_iter(lower)
        .find_map(|c| Language::from_word(&c[1]));

    let target = explicit.unwrap_or_else(|| {
        LANGUAGE_TABLE
            .iter()
            .filter(|(lang, _)| Some(*lang) != source)
            .find(|(_, aliases)| contains_any(lower, aliases))
            .map(|(lang, _)| *lang)
            .unwrap_or_default()
    });

    (target, source)
}

// ── Format ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatType {
    #[default]
    Structure,
    Table,
    NumberedList,
    BulletList,
    Headings,
    Paragraphs,
    CleanUp,
}

const FORMAT_TYPE_TABLE: KeywordTable<FormatType> = &[
    (FormatType::Table, &["table", "tabular", "columns"]),
    (FormatType::NumberedList, &["numbered", "numbers", "steps", "step-by-step", "ordered list"]),
    (FormatType::BulletList, &["bullet", "bullets", "bullet points", "list"]),
    (FormatType::Headings, &["heading", "headings", "sections", "headers"]),
    (FormatType::Paragraphs, &["paragraph", "paragraphs", "prose"]),
    (FormatType::CleanUp, &["clean", "cleanup", "clean up", "tidy", "fix formatting", "spacing"]),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatParams {
    pub format_type: FormatType,
    pub specific_instructions: Vec<String>,
}

// ── Generate ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    #[default]
    Paragraph,
    Email,
    Outline,
    Introduction,
    Conclusion,
    Title,
    List,
}

const CONTENT_TYPE_TABLE: KeywordTable<ContentType> = &[
    (ContentType::Email, &["email", "e-mail", "letter", "message"]),
    (ContentType::Outline, &["outline", "structure", "plan"]),
    (ContentType::Introduction, &["introduction", "intro", "opening"]),
    (ContentType::Conclusion, &["conclusion", "closing", "wrap-up", "ending"]),
    (ContentType::Title, &["title", "titles", "headline", "headlines"]),
    (ContentType::List, &["list", "ideas", "brainstorm"]),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateParams {
    pub content_type: ContentType,
    pub tone: Tone,
    pub audience: Audience,
    pub length: Length,
    pub specific_instructions: Vec<String>,
}

// ── General ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralParams {
    pub specific_instructions: Vec<String>,
}

// ── Specific instructions ───────────────────────────────────────────

static INSTRUCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:focus on|make sure|ensure|avoid|emphasi[sz]e|mention|keep|don't|do not)\b[^.;!?\n"]*"#)
        .expect("valid regex")
});

/// Pull directive clauses ("focus on costs", "avoid jargon") out of the
/// tail, in order of appearance. Quoted text is never scanned.
pub fn extract_specific_instructions(tail: &str) -> Vec<String> {
    let unquoted = strip_quoted(tail);
    INSTRUCTION
        .find_iter(&unquoted)
        .map(|m| m.as_str().trim().trim_end_matches(',').trim().to_string())
        .filter(|s| s.split_whitespace().count() >= 2)
        .collect()
}

// ── Extraction entry point ──────────────────────────────────────────

/// Resolved options for one request, tagged by tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ExtractedParameters {
    Summarize(SummarizeParams),
    Rewrite(RewriteParams),
    Explain(ExplainParams),
    Translate(TranslateParams),
    Format(FormatParams),
    Generate(GenerateParams),
    General(GeneralParams),
}

impl SummarizeParams {
    pub fn extract(tail: &str) -> Self {
        let lower = normalize(tail);
        Self {
            style: first_match(&lower, SUMMARY_STYLE_TABLE, SummaryStyle::default()),
            length: first_match(&lower, LENGTH_TABLE, Length::default()),
            specific_instructions: extract_specific_instructions(tail),
        }
    }
}

impl RewriteParams {
    pub fn extract(tail: &str) -> Self {
        let lower = normalize(tail);
        Self {
            style: first_match(&lower, REWRITE_STYLE_TABLE, RewriteStyle::default()),
            tone: first_match(&lower, TONE_TABLE, Tone::default()),
            audience: first_match(&lower, AUDIENCE_TABLE, Audience::default()),
            specific_instructions: extract_specific_instructions(tail),
        }
    }
}

impl ExplainParams {
    pub fn extract(tail: &str) -> Self {
        let lower = normalize(tail);
        Self {
            style: first_match(&lower, EXPLAIN_STYLE_TABLE, ExplainStyle::default()),
            depth: first_match(&lower, DEPTH_TABLE, Depth::default()),
            audience: first_match(&lower, AUDIENCE_TABLE, Audience::default()),
            include_examples: contains_any(&lower, EXAMPLE_KEYWORDS),
            specific_instructions: extract_specific_instructions(tail),
        }
    }
}

impl TranslateParams {
    pub fn extract(tail: &str) -> Self {
        let lower = normalize(tail);
        let (target_language, source_language) = extract_languages(&lower);
        Self {
            target_language,
            source_language,
            formality: first_match(&lower, FORMALITY_TABLE, Formality::default()),
            specific_instructions: extract_specific_instructions(tail),
        }
    }
}

impl FormatParams {
    pub fn extract(tail: &str) -> Self {
        let lower = normalize(tail);
        Self {
            format_type: first_match(&lower, FORMAT_TYPE_TABLE, FormatType::default()),
            specific_instructions: extract_specific_instructions(tail),
        }
    }
}

impl GenerateParams {
    pub fn extract(tail: &str) -> Self {
        let lower = normalize(tail);
        Self {
            content_type: first_match(&lower, CONTENT_TYPE_TABLE, ContentType::default()),
            tone: first_match(&lower, TONE_TABLE, Tone::default()),
            audience: first_match(&lower, AUDIENCE_TABLE, Audience::default()),
            length: first_match(&lower, LENGTH_TABLE, Length::default()),
            specific_instructions: extract_specific_instructions(tail),
        }
    }
}

impl GeneralParams {
    pub fn extract(tail: &str) -> Self {
        Self {
            specific_instructions: extract_specific_instructions(tail),
        }
    }
}

/// Quoted text removed, lower-cased.
fn normalize(tail: &str) -> String {
    strip_quoted(tail).to_lowercase()
}

impl ExtractedParameters {
    /// Run the extractor for `kind` over the request tail.
    pub fn extract(kind: ToolKind, tail: &str) -> Self {
        let params = match kind {
            ToolKind::Summarize => Self::Summarize(SummarizeParams::extract(tail)),
            ToolKind::Rewrite => Self::Rewrite(RewriteParams::extract(tail)),
            ToolKind::Explain => Self::Explain(ExplainParams::extract(tail)),
            ToolKind::Translate => Self::Translate(TranslateParams::extract(tail)),
            ToolKind::Format => Self::Format(FormatParams::extract(tail)),
            ToolKind::Generate => Self::Generate(GenerateParams::extract(tail)),
            ToolKind::General => Self::General(GeneralParams::extract(tail)),
        };

        log::debug!("[PARAMS] {:?}", params);
        params
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            Self::Summarize(_) => ToolKind::Summarize,
            Self::Rewrite(_) => ToolKind::Rewrite,
            Self::Explain(_) => ToolKind::Explain,
            Self::Translate(_) => ToolKind::Translate,
            Self::Format(_) => ToolKind::Format,
            Self::Generate(_) => ToolKind::Generate,
            Self::General(_) => ToolKind::General,
        }
    }

    pub fn specific_instructions(&self) -> &[String] {
        match self {
            Self::Summarize(p) => &p.specific_instructions,
            Self::Rewrite(p) => &p.specific_instructions,
            Self::Explain(p) => &p.specific_instructions,
            Self::Translate(p) => &p.specific_instructions,
            Self::Format(p) => &p.specific_instructions,
            Self::Generate(p) => &p.specific_instructions,
            Self::General(p) => &p.specific_instructions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summarize(tail: &str) -> SummarizeParams {
        match ExtractedParameters::extract(ToolKind::Summarize, tail) {
            ExtractedParameters::Summarize(p) => p,
            other => panic!("unexpected {:?}", other),
        }
    }

    fn rewrite(tail: &str) -> RewriteParams {
        match ExtractedParameters::extract(ToolKind::Rewrite, tail) {
            ExtractedParameters::Rewrite(p) => p,
            other => panic!("unexpected {:?}", other),
        }
    }

    fn translate(tail: &str) -> TranslateParams {
        match ExtractedParameters::extract(ToolKind::Translate, tail) {
            ExtractedParameters::Translate(p) => p,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn defaults_when_nothing_matches() {
        let p = summarize("summarize this");
        assert_eq!(p.style, SummaryStyle::Concise);
        assert_eq!(p.length, Length::Medium);
        assert!(p.specific_instructions.is_empty());

        let r = rewrite("rewrite");
        assert_eq!(r.style, RewriteStyle::Improve);
        assert_eq!(r.tone, Tone::Neutral);
        assert_eq!(r.audience, Audience::General);
    }

    #[test]
    fn independent_fields_resolve_together() {
        let r = rewrite("Rewrite this to be more formal and persuasive for executives");
        assert_eq!(r.style, RewriteStyle::Formal);
        assert_eq!(r.tone, Tone::Persuasive);
        assert_eq!(r.audience, Audience::Business);
    }

    #[test]
    fn informal_is_not_formal() {
        assert_eq!(rewrite("make it informal").style, RewriteStyle::Casual);
    }

    #[test]
    fn non_technical_reads_as_beginner() {
        assert_eq!(rewrite("rewrite for a non-technical reader").audience, Audience::Beginner);
    }

    #[test]
    fn summary_style_and_length() {
        let p = summarize("Give me a short bullet summary");
        assert_eq!(p.style, SummaryStyle::BulletPoints);
        assert_eq!(p.length, Length::Short);
    }

    #[test]
    fn quoted_text_does_not_drive_options() {
        let p = summarize(r#"summarize "a detailed list of points""#);
        assert_eq!(p.style, SummaryStyle::Concise);
        assert_eq!(p.length, Length::Medium);
    }

    #[test]
    fn explain_flags() {
        match ExtractedParameters::extract(ToolKind::Explain, "explain step by step with examples, in depth") {
            ExtractedParameters::Explain(p) => {
                assert_eq!(p.style, ExplainStyle::StepByStep);
                assert_eq!(p.depth, Depth::InDepth);
                assert!(p.include_examples);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn translate_target_prefers_to_phrase() {
        let p = translate("translate from French to Spanish");
        assert_eq!(p.target_language, Language::Spanish);
        assert_eq!(p.source_language, Some(Language::French));

        let p = translate("translate this into German, keep it formal");
        assert_eq!(p.target_language, Language::German);
        assert_eq!(p.formality, Formality::Formal);
    }

    #[test]
    fn translate_falls_back_to_table_then_english() {
        assert_eq!(translate("japanese translation please").target_language, Language::Japanese);
        assert_eq!(translate("translate this").target_language, Language::English);
        assert_eq!(translate("translate to español").target_language, Language::Spanish);
    }

    #[test]
    fn format_type_order() {
        match ExtractedParameters::extract(ToolKind::Format, "make a numbered list") {
            ExtractedParameters::Format(p) => assert_eq!(p.format_type, FormatType::NumberedList),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn specific_instructions_in_order() {
        let found = extract_specific_instructions(
            "Summarize this. Focus on the budget numbers; avoid jargon. Make sure to mention \"Q3\"",
        );
        assert_eq!(
            found,
            vec![
                "Focus on the budget numbers".to_string(),
                "avoid jargon".to_string(),
                "Make sure to mention".to_string(),
            ]
        );
    }

    #[test]
    fn extractors_are_total_and_idempotent() {
        for tail in ["", "???", "ÄÖÜ ñ", "/x", "\"\"", "translate into klingon"] {
            for kind in ToolKind::ALL {
                let a = ExtractedParameters::extract(kind, tail);
                let b = ExtractedParameters::extract(kind, tail);
                assert_eq!(a, b);
                assert_eq!(a.kind(), kind);
            }
        }
    }
}
