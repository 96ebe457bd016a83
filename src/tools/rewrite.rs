use super::{base_metadata, option_name, run_prompt, OutputDetails, Placement, Tool, ToolInput, ToolKind, ToolOutput};
use crate::error::AssistantError;
use crate::intent::params::{ExtractedParameters, RewriteParams};
use crate::intent::{resolve_subject, SubjectStrategy};
use crate::llm::PromptBuilder;
use crate::text::TextStatistics;
use async_trait::async_trait;

pub struct RewriteTool;

#[async_trait]
impl Tool for RewriteTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Rewrite
    }

    fn description(&self) -> &'static str {
        "Rewrite text in a different style, tone or for another audience"
    }

    async fn execute(&self, input: ToolInput<'_>) -> Result<ToolOutput, AssistantError> {
        let subject = resolve_subject(&input.request.parameter_tail, input.context, SubjectStrategy::Document)
            .ok_or_else(AssistantError::no_text)?;

        let p = RewriteParams::extract(&input.request.parameter_tail);
        let params = ExtractedParameters::Rewrite(p.clone());

        // Rewrites keep the configured temperature.
        let options = input.provider.default_options();
        let (rewritten, prompt) =
            run_prompt(&input, PromptBuilder::new(&params), &subject.text, &options).await?;

        let mut metadata = base_metadata(&subject.text, &rewritten, &prompt);
        metadata.style = option_name(&p.style);
        metadata.tone = option_name(&p.tone);
        metadata.subject_source = Some(subject.source);

        Ok(ToolOutput {
            statistics: TextStatistics::compare(&subject.text, &rewritten),
            placement: Placement::for_subject(subject.source),
            details: OutputDetails::Rewrite {
                rewritten: rewritten.clone(),
                style: p.style,
                tone: p.tone,
                audience: p.audience,
            },
            text: rewritten,
            metadata,
        })
    }
}
