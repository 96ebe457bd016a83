//! Prompt assembly — one template per tool.
//!
//! Every prompt has the same skeleton, in this order:
//!   1. role/task preamble
//!   2. one sentence per resolved option (style → tone/audience → length/depth)
//!   3. one line per specific instruction
//!   4. subject text inside `<document_text>` tags (`<request>` for tools
//!      whose subject is the user's own request)
//!   5. structural hints derived from the subject text
//!   6. closing instruction naming the bare output expected
//!
//! An optional conversation transcript is placed ahead of the preamble.
//! When a token budget is set the subject (and any reference text) is cut
//! with [`truncate_to_tokens`] so the whole prompt fits.

use super::provider::{estimate_token_count, truncate_to_tokens};
use crate::intent::params::*;
use crate::text::heuristics;
use crate::tools::ToolKind;

pub const SUBJECT_TAG: &str = "document_text";
pub const REQUEST_TAG: &str = "request";

/// Tokens held back for separators when budgeting the subject.
const LAYOUT_OVERHEAD_TOKENS: usize = 8;

/// A finished prompt. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    text: String,
    subject_truncated: bool,
}

impl Prompt {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// True when the subject or reference text was cut to fit the budget.
    pub fn subject_truncated(&self) -> bool {
        self.subject_truncated
    }

    pub fn estimated_tokens(&self) -> usize {
        estimate_token_count(&self.text)
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

pub struct PromptBuilder<'a> {
    params: &'a ExtractedParameters,
    conversation: Option<&'a str>,
    reference: Option<&'a str>,
    token_budget: Option<usize>,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(params: &'a ExtractedParameters) -> Self {
        Self {
            params,
            conversation: None,
            reference: None,
            token_budget: None,
        }
    }

    /// Prior "User:/AI:" transcript to put at the head of the prompt.
    pub fn with_conversation(mut self, transcript: &'a str) -> Self {
        if !transcript.trim().is_empty() {
            self.conversation = Some(transcript);
        }
        self
    }

    /// Document text shown after the request for request-driven tools.
    pub fn with_reference(mut self, text: &'a str) -> Self {
        if !text.trim().is_empty() {
            self.reference = Some(text);
        }
        self
    }

    /// Upper bound on prompt tokens. The subject is truncated to fit.
    pub fn with_token_budget(mut self, tokens: usize) -> Self {
        self.token_budget = Some(tokens);
        self
    }

    pub fn build(&self, subject: &str) -> Prompt {
        let kind = self.params.kind();
        let subject_tag = match kind {
            ToolKind::Generate | ToolKind::General => REQUEST_TAG,
            _ => SUBJECT_TAG,
        };

        let mut head = String::new();
        if let Some(transcript) = self.conversation {
            head.push_str("Previous conversation:\n");
            head.push_str(transcript.trim_end());
            head.push_str("\n\n");
        }
        head.push_str(preamble(self.params));
        for sentence in option_sentences(self.params) {
            head.push(' ');
            head.push_str(&sentence);
        }
        for instruction in self.params.specific_instructions() {
            head.push_str("\nAdditional instruction: ");
            head.push_str(&capitalize(instruction));
            head.push('.');
        }

        // Hints come from the text as the user wrote it; truncation only
        // ever removes a tail.
        let hint_source = self.reference.unwrap_or(subject);
        let hints = structural_hints(kind, hint_source);
        let closing = closing_instruction(self.params);

        let (subject, reference, truncated) = self.fit_to_budget(subject, &head, &hints, closing);

        let mut text = head;
        text.push_str(&format!("\n\n<{tag}>\n{}\n</{tag}>", subject, tag = subject_tag));
        if let Some(reference) = reference {
            text.push_str(&format!("\n\n<{tag}>\n{}\n</{tag}>", reference, tag = SUBJECT_TAG));
        }
        for hint in &hints {
            text.push_str("\n\n");
            text.push_str(hint);
        }
        text.push_str("\n\n");
        text.push_str(closing);

        if truncated {
            log::info!("[PROMPT] Subject truncated to fit {:?} tokens", self.token_budget);
        }
        log::debug!("[PROMPT] {:?} prompt: ~{} tokens", kind, estimate_token_count(&text));

        Prompt {
            text,
            subject_truncated: truncated,
        }
    }

    fn fit_to_budget(
        &self,
        subject: &str,
        head: &str,
        hints: &[&str],
        closing: &str,
    ) -> (String, Option<String>, bool) {
        let Some(budget) = self.token_budget else {
            return (subject.to_string(), self.reference.map(str::to_string), false);
        };

        let fixed = estimate_token_count(head)
            + hints.iter().map(|h| estimate_token_count(h)).sum::<usize>()
            + estimate_token_count(closing)
            + LAYOUT_OVERHEAD_TOKENS * 2;
        let mut remaining = budget.saturating_sub(fixed);

        let (subject, subject_cut) = truncate_to_tokens(subject, remaining);
        remaining = remaining.saturating_sub(estimate_token_count(&subject));

        match self.reference {
            Some(reference) => {
                let (reference, reference_cut) =
                    truncate_to_tokens(reference, remaining.saturating_sub(LAYOUT_OVERHEAD_TOKENS));
                (subject, Some(reference), subject_cut || reference_cut)
            }
            None => (subject, None, subject_cut),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ── Preambles ───────────────────────────────────────────────────────

fn preamble(params: &ExtractedParameters) -> &'static str {
    match params {
        ExtractedParameters::Summarize(_) => {
            "You are an expert editor. Summarize the text in the document_text block."
        }
        ExtractedParameters::Rewrite(_) => {
            "You are a skilled writer. Rewrite the text in the document_text block."
        }
        ExtractedParameters::Explain(_) => {
            "You are a patient teacher. Explain the text or concept in the document_text block."
        }
        ExtractedParameters::Translate(_) => {
            "You are a professional translator. Translate the text in the document_text block."
        }
        ExtractedParameters::Format(_) => {
            "You are a document formatting assistant. Reformat the text in the document_text block without changing its meaning."
        }
        ExtractedParameters::Generate(_) => {
            "You are a versatile content writer. Write new document content as described in the request block."
        }
        ExtractedParameters::General(_) => {
            "You are a helpful writing assistant working inside a document editor. Respond to the request block."
        }
    }
}

// ── Option sentences ────────────────────────────────────────────────

fn option_sentences(params: &ExtractedParameters) -> Vec<String> {
    match params {
        ExtractedParameters::Summarize(p) => vec![
            summary_style_sentence(p.style).to_string(),
            length_sentence(p.length).to_string(),
        ],
        ExtractedParameters::Rewrite(p) => vec![
            rewrite_style_sentence(p.style).to_string(),
            tone_sentence(p.tone).to_string(),
            audience_sentence(p.audience).to_string(),
        ],
        ExtractedParameters::Explain(p) => {
            let mut out = vec![
                explain_style_sentence(p.style).to_string(),
                audience_sentence(p.audience).to_string(),
                depth_sentence(p.depth).to_string(),
            ];
            if p.include_examples {
                out.push("Include one or two concrete examples.".to_string());
            }
            out
        }
        ExtractedParameters::Translate(p) => {
            let mut out = vec![format!("Translate into {}.", p.target_language.name())];
            if let Some(source) = p.source_language {
                out.push(format!("The source text is written in {}.", source.name()));
            }
            out.push(formality_sentence(p.formality).to_string());
            out
        }
        ExtractedParameters::Format(p) => vec![format_type_sentence(p.format_type).to_string()],
        ExtractedParameters::Generate(p) => vec![
            content_type_sentence(p.content_type).to_string(),
            tone_sentence(p.tone).to_string(),
            audience_sentence(p.audience).to_string(),
            length_sentence(p.length).to_string(),
        ],
        ExtractedParameters::General(_) => Vec::new(),
    }
}

fn length_sentence(length: Length) -> &'static str {
    match length {
        Length::Short => "Keep it short: a few sentences at most.",
        Length::Medium => "Use a moderate length: about one paragraph.",
        Length::Long => "Be thorough and cover every important point.",
    }
}

fn tone_sentence(tone: Tone) -> &'static str {
    match tone {
        Tone::Neutral => "Use a neutral, even tone.",
        Tone::Friendly => "Use a warm, friendly tone.",
        Tone::Professional => "Use a polished, professional tone.",
        Tone::Confident => "Use a confident, assertive tone.",
        Tone::Persuasive => "Use a persuasive tone that argues for the main point.",
        Tone::Empathetic => "Use an empathetic, understanding tone.",
        Tone::Humorous => "Use a light, humorous tone.",
    }
}

fn audience_sentence(audience: Audience) -> &'static str {
    match audience {
        Audience::General => "Write for a general audience.",
        Audience::Beginner => "Write for a beginner with no background in the subject.",
        Audience::Technical => "Write for a technical audience comfortable with jargon.",
        Audience::Business => "Write for business readers who care about outcomes.",
        Audience::Academic => "Write for an academic audience.",
    }
}

fn summary_style_sentence(style: SummaryStyle) -> &'static str {
    match style {
        SummaryStyle::Concise => "Write a concise summary of the main points.",
        SummaryStyle::BulletPoints => "Write the summary as a bulleted list of key points.",
        SummaryStyle::Executive => "Write an executive summary focused on decisions and outcomes.",
        SummaryStyle::Academic => "Write an academic abstract-style summary.",
        SummaryStyle::Detailed => "Write a detailed summary that keeps supporting points.",
    }
}

fn rewrite_style_sentence(style: RewriteStyle) -> &'static str {
    match style {
        RewriteStyle::Improve => "Improve clarity, flow and grammar while keeping the meaning.",
        RewriteStyle::Formal => "Make the writing more formal.",
        RewriteStyle::Casual => "Make the writing more casual and conversational.",
        RewriteStyle::Simplify => "Simplify the wording so it is easy to read.",
        RewriteStyle::Shorten => "Make the text shorter without losing key information.",
        RewriteStyle::Expand => "Expand the text with more detail.",
        RewriteStyle::Creative => "Rewrite it creatively with vivid language.",
    }
}

fn explain_style_sentence(style: ExplainStyle) -> &'static str {
    match style {
        ExplainStyle::Clear => "Give a clear, well-organised explanation.",
        ExplainStyle::Simple => "Explain it in simple, everyday language.",
        ExplainStyle::Analogy => "Explain it using an analogy.",
        ExplainStyle::StepByStep => "Explain it step by step.",
        ExplainStyle::Technical => "Give a precise technical explanation.",
    }
}

fn depth_sentence(depth: Depth) -> &'static str {
    match depth {
        Depth::Brief => "Keep the explanation brief.",
        Depth::Standard => "Cover the essentials without going into every detail.",
        Depth::InDepth => "Go in depth and cover nuances and edge cases.",
    }
}

fn formality_sentence(formality: Formality) -> &'static str {
    match formality {
        Formality::Preserve => "Preserve the formality of the original.",
        Formality::Formal => "Use a formal register.",
        Formality::Informal => "Use an informal register.",
    }
}

fn format_type_sentence(format_type: FormatType) -> &'static str {
    match format_type {
        FormatType::Structure => "Give the text a clear structure with headings and paragraphs where useful.",
        FormatType::Table => "Present the content as a Markdown table.",
        FormatType::NumberedList => "Present the content as a numbered list.",
        FormatType::BulletList => "Present the content as a bulleted list.",
        FormatType::Headings => "Organise the content under descriptive headings.",
        FormatType::Paragraphs => "Reflow the content into well-formed paragraphs.",
        FormatType::CleanUp => "Clean up spacing, punctuation and inconsistent formatting.",
    }
}

fn content_type_sentence(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Paragraph => "Write it as one or more prose paragraphs.",
        ContentType::Email => "Write it as an email with a greeting and sign-off.",
        ContentType::Outline => "Write it as a hierarchical outline.",
        ContentType::Introduction => "Write it as an introduction.",
        ContentType::Conclusion => "Write it as a conclusion.",
        ContentType::Title => "Write a single title.",
        ContentType::List => "Write it as a list.",
    }
}

// ── Structural hints ────────────────────────────────────────────────

const CODE_EXPLAIN_HINT: &str =
    "The text contains source code. Explain what the code does and walk through the important lines.";
const CODE_VERBATIM_HINT: &str =
    "The text contains source code. Keep the code exactly as written.";
const TECHNICAL_TERMS_HINT: &str =
    "The text uses technical terms. Define each one briefly the first time it appears.";
const COMPLEX_EXPLAIN_HINT: &str =
    "The text has long, complex sentences. Break them down into simpler parts.";
const COMPLEX_REWRITE_HINT: &str =
    "Some sentences are long or complex. Split them where that improves clarity.";

/// Extra sentences triggered by the shape of the subject text.
pub fn structural_hints(kind: ToolKind, subject: &str) -> Vec<&'static str> {
    let mut hints = Vec::new();
    match kind {
        ToolKind::Explain => {
            if heuristics::has_code_snippet(subject) {
                hints.push(CODE_EXPLAIN_HINT);
            }
            if heuristics::has_technical_terms(subject) {
                hints.push(TECHNICAL_TERMS_HINT);
            }
            if heuristics::has_complex_sentences(subject) {
                hints.push(COMPLEX_EXPLAIN_HINT);
            }
        }
        ToolKind::Rewrite => {
            if heuristics::has_complex_sentences(subject) {
                hints.push(COMPLEX_REWRITE_HINT);
            }
        }
        ToolKind::Translate | ToolKind::Format => {
            if heuristics::has_code_snippet(subject) {
                hints.push(CODE_VERBATIM_HINT);
            }
        }
        ToolKind::Summarize | ToolKind::Generate | ToolKind::General => {}
    }
    hints
}

// ── Closing instructions ────────────────────────────────────────────

fn closing_instruction(params: &ExtractedParameters) -> &'static str {
    match params {
        ExtractedParameters::Summarize(_) => {
            "Return only the summary, with no introduction or commentary."
        }
        ExtractedParameters::Rewrite(_) => {
            "Return only the rewritten text, with no explanation or commentary."
        }
        ExtractedParameters::Explain(_) => "Return only the explanation, with no preamble.",
        ExtractedParameters::Translate(_) => {
            "Return only the translated text, with no notes or commentary."
        }
        ExtractedParameters::Format(_) => {
            "Return only the reformatted text as plain text or Markdown, with no commentary."
        }
        ExtractedParameters::Generate(_) => {
            "Return only the requested content, with no commentary."
        }
        ExtractedParameters::General(_) => {
            "Answer directly. Return only the response text, with no preamble."
        }
    }
}
