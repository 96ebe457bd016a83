use super::{base_metadata, option_name, run_prompt, OutputDetails, Placement, Tool, ToolInput, ToolKind, ToolOutput};
use crate::error::AssistantError;
use crate::intent::params::{ExplainParams, ExtractedParameters};
use crate::intent::{resolve_subject, SubjectStrategy};
use crate::llm::PromptBuilder;
use crate::text::TextStatistics;
use async_trait::async_trait;

const EXPLAIN_TEMPERATURE: f32 = 0.5;

/// Explains the selection, a quoted phrase, or the term in a
/// "what is X" / "explain X" request.
pub struct ExplainTool;

#[async_trait]
impl Tool for ExplainTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Explain
    }

    fn description(&self) -> &'static str {
        "Explain a passage, term or concept"
    }

    async fn execute(&self, input: ToolInput<'_>) -> Result<ToolOutput, AssistantError> {
        // After "/explain" the tail itself is the term.
        let strategy = match input.request.explicit_command {
            Some(_) => SubjectStrategy::ExplainTerm,
            None => SubjectStrategy::Explain,
        };
        let subject = resolve_subject(&input.request.parameter_tail, input.context, strategy)
            .ok_or_else(AssistantError::no_text)?;
        log::info!("[DISPATCH] Explain subject from {:?}", subject.source);

        let p = ExplainParams::extract(&input.request.parameter_tail);
        let params = ExtractedParameters::Explain(p.clone());

        let options = input.provider.default_options().with_temperature(EXPLAIN_TEMPERATURE);
        let (explanation, prompt) =
            run_prompt(&input, PromptBuilder::new(&params), &subject.text, &options).await?;

        let mut metadata = base_metadata(&subject.text, &explanation, &prompt);
        metadata.style = option_name(&p.style);
        metadata.subject_source = Some(subject.source);

        Ok(ToolOutput {
            statistics: TextStatistics::compare(&subject.text, &explanation),
            placement: Placement::Insert,
            details: OutputDetails::Explanation {
                explanation: explanation.clone(),
                subject: subject.text,
                style: p.style,
                depth: p.depth,
            },
            text: explanation,
            metadata,
        })
    }
}
