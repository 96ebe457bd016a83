//! Tools — one stateless handler per intent.
//!
//! A tool receives the classified request, the document snapshot and the
//! session's provider, and returns a [`ToolOutput`]. The dispatcher wraps
//! that (or the error) into a [`ToolResult`].
//!
//!   - summarize.rs, rewrite.rs, explain.rs, translate.rs, format.rs,
//!     generate.rs, general.rs — the built-in tools
//!   - registry.rs — name → tool lookup, the dispatcher

mod explain;
mod format;
mod general;
mod generate;
pub mod registry;
mod rewrite;
mod summarize;
mod translate;

pub use explain::ExplainTool;
pub use format::FormatTool;
pub use general::GeneralTool;
pub use generate::GenerateTool;
pub use registry::{Dispatcher, ToolRegistry};
pub use rewrite::RewriteTool;
pub use summarize::SummarizeTool;
pub use translate::TranslateTool;

use crate::document::DocumentContext;
use crate::error::AssistantError;
use crate::intent::params::*;
use crate::intent::{Request, SubjectSource};
use crate::llm::{GenerationOptions, Prompt, PromptBuilder, ProviderClient};
use crate::text::TextStatistics;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ── Tool identity ───────────────────────────────────────────────────

/// The built-in intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    Summarize,
    Rewrite,
    Explain,
    Translate,
    Format,
    Generate,
    General,
}

impl ToolKind {
    pub const ALL: [ToolKind; 7] = [
        ToolKind::Summarize,
        ToolKind::Rewrite,
        ToolKind::Explain,
        ToolKind::Translate,
        ToolKind::Format,
        ToolKind::Generate,
        ToolKind::General,
    ];

    /// Registry name, also the `/command` the user can type.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Summarize => "summarize",
            ToolKind::Rewrite => "rewrite",
            ToolKind::Explain => "explain",
            ToolKind::Translate => "translate",
            ToolKind::Format => "format",
            ToolKind::Generate => "generate",
            ToolKind::General => "general",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

/// Construct the built-in tool for `kind`.
pub fn builtin_tool(kind: ToolKind) -> Box<dyn Tool> {
    match kind {
        ToolKind::Summarize => Box::new(SummarizeTool),
        ToolKind::Rewrite => Box::new(RewriteTool),
        ToolKind::Explain => Box::new(ExplainTool),
        ToolKind::Translate => Box::new(TranslateTool),
        ToolKind::Format => Box::new(FormatTool),
        ToolKind::Generate => Box::new(GenerateTool),
        ToolKind::General => Box::new(GeneralTool),
    }
}

// ── The tool contract ───────────────────────────────────────────────

/// Everything a tool may read while it runs.
pub struct ToolInput<'a> {
    pub request: &'a Request,
    pub context: &'a DocumentContext,
    pub provider: &'a dyn ProviderClient,
    /// Recent "User:/AI:" transcript, already formatted.
    pub conversation: Option<&'a str>,
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn kind(&self) -> ToolKind;

    fn description(&self) -> &'static str;

    async fn execute(&self, input: ToolInput<'_>) -> Result<ToolOutput, AssistantError>;
}

// ── Results ─────────────────────────────────────────────────────────

/// Where the editor should put the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Placement {
    Insert,
    Replace,
}

impl Placement {
    /// Replace the selection when the subject came from it, else insert.
    pub fn for_subject(source: SubjectSource) -> Self {
        match source {
            SubjectSource::Selection => Placement::Replace,
            _ => Placement::Insert,
        }
    }
}

/// Tool-specific fields of a successful result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum OutputDetails {
    Summary {
        summary: String,
        style: SummaryStyle,
        length: Length,
    },
    Rewrite {
        rewritten: String,
        style: RewriteStyle,
        tone: Tone,
        audience: Audience,
    },
    Explanation {
        explanation: String,
        subject: String,
        style: ExplainStyle,
        depth: Depth,
    },
    Translation {
        translation: String,
        target_language: Language,
        source_language: Option<Language>,
    },
    Formatted {
        formatted: String,
        format_type: FormatType,
    },
    Generated {
        content: String,
        content_type: ContentType,
    },
    Reply {
        response: String,
    },
}

/// A successful tool run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOutput {
    /// Text handed to the editor.
    pub text: String,
    pub statistics: TextStatistics,
    pub placement: Placement,
    #[serde(flatten)]
    pub details: OutputDetails,
    /// Moved into `ToolResult::metadata` by the dispatcher.
    #[serde(skip)]
    pub metadata: ResultMetadata,
}

impl ToolOutput {
    pub fn summary(&self) -> Option<&str> {
        match &self.details {
            OutputDetails::Summary { summary, .. } => Some(summary),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMetadata {
    /// Unix epoch milliseconds. Always set on a `ToolResult`.
    pub timestamp: u64,
    pub tool: String,
    pub duration_ms: u64,
    /// Characters in the subject text.
    pub original_length: usize,
    pub result_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_source: Option<SubjectSource>,
    pub prompt_tokens: usize,
    /// The subject was cut to fit the provider's context ceiling.
    pub truncated: bool,
}

/// What the dispatcher returns for every request.
/// Exactly one of `result` / `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ToolOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub metadata: ResultMetadata,
}

impl ToolResult {
    pub fn succeeded(mut output: ToolOutput, mut metadata: ResultMetadata) -> Self {
        let tool_metadata = std::mem::take(&mut output.metadata);
        metadata.original_length = tool_metadata.original_length;
        metadata.result_length = tool_metadata.result_length;
        metadata.compression_ratio = tool_metadata.compression_ratio;
        metadata.style = tool_metadata.style;
        metadata.tone = tool_metadata.tone;
        metadata.subject_source = tool_metadata.subject_source;
        metadata.prompt_tokens = tool_metadata.prompt_tokens;
        metadata.truncated = tool_metadata.truncated;
        Self {
            success: true,
            result: Some(output),
            error: None,
            metadata,
        }
    }

    pub fn failed(message: impl Into<String>, metadata: ResultMetadata) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(message.into()),
            metadata,
        }
    }

    /// The produced text on success, the error message on failure.
    pub fn summary_text(&self) -> &str {
        match (&self.result, &self.error) {
            (Some(output), _) => &output.text,
            (None, Some(error)) => error,
            (None, None) => "",
        }
    }
}

// ── Shared tool plumbing ────────────────────────────────────────────

/// Build the prompt within the provider's budget and run it.
pub(crate) async fn run_prompt<'a>(
    input: &ToolInput<'a>,
    builder: PromptBuilder<'a>,
    subject: &str,
    options: &GenerationOptions,
) -> Result<(String, Prompt), AssistantError> {
    let mut builder = builder.with_token_budget(input.provider.prompt_budget(options));
    if let Some(conversation) = input.conversation {
        builder = builder.with_conversation(conversation);
    }
    let prompt = builder.build(subject);

    log::info!(
        "[PROMPT] ~{} tokens for {}{}",
        prompt.estimated_tokens(),
        input.provider.kind(),
        if prompt.subject_truncated() { " (subject truncated)" } else { "" }
    );

    let text = input
        .provider
        .generate_response(prompt.as_str(), options)
        .await?;
    Ok((text, prompt))
}

/// Metadata every tool fills in the same way.
pub(crate) fn base_metadata(subject: &str, result: &str, prompt: &Prompt) -> ResultMetadata {
    ResultMetadata {
        original_length: subject.chars().count(),
        result_length: result.chars().count(),
        prompt_tokens: prompt.estimated_tokens(),
        truncated: prompt.subject_truncated(),
        ..Default::default()
    }
}

/// Lower-case serde name of an option enum, for metadata.
pub(crate) fn option_name<T: Serialize>(value: &T) -> Option<String> {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
            assert_eq!(builtin_tool(kind).kind(), kind);
        }
        assert_eq!(ToolKind::from_name("unknown"), None);
    }

    #[test]
    fn option_names_use_serde_casing() {
        assert_eq!(option_name(&SummaryStyle::BulletPoints).as_deref(), Some("bullet_points"));
        assert_eq!(option_name(&Tone::Friendly).as_deref(), Some("friendly"));
    }

    #[test]
    fn failed_result_has_no_output() {
        let result = ToolResult::failed("boom", ResultMetadata { timestamp: 1, ..Default::default() });
        assert!(!result.success);
        assert!(result.result.is_none());
        assert_eq!(result.summary_text(), "boom");
    }

    #[test]
    fn output_serializes_flat_details() {
        let output = ToolOutput {
            text: "A B C.".to_string(),
            statistics: TextStatistics::compare("A B C D", "A B C."),
            placement: Placement::Insert,
            details: OutputDetails::Summary {
                summary: "A B C.".to_string(),
                style: SummaryStyle::Concise,
                length: Length::Medium,
            },
            metadata: ResultMetadata::default(),
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["summary"], "A B C.");
        assert_eq!(json["type"], "summary");
        assert_eq!(json["placement"], "insert");
        assert_eq!(output.summary(), Some("A B C."));
    }
}
