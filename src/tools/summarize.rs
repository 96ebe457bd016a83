use super::{base_metadata, option_name, run_prompt, OutputDetails, Placement, Tool, ToolInput, ToolKind, ToolOutput};
use crate::error::AssistantError;
use crate::intent::params::{ExtractedParameters, SummarizeParams};
use crate::intent::{resolve_subject, SubjectStrategy};
use crate::llm::PromptBuilder;
use crate::text::{length_ratio, word_count, TextStatistics};
use async_trait::async_trait;

/// Summaries favour faithfulness over variety.
const SUMMARIZE_TEMPERATURE: f32 = 0.3;

pub struct SummarizeTool;

#[async_trait]
impl Tool for SummarizeTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Summarize
    }

    fn description(&self) -> &'static str {
        "Summarize the selection or document"
    }

    async fn execute(&self, input: ToolInput<'_>) -> Result<ToolOutput, AssistantError> {
        let subject = resolve_subject(&input.request.parameter_tail, input.context, SubjectStrategy::Document)
            .ok_or_else(AssistantError::no_text)?;

        let p = SummarizeParams::extract(&input.request.parameter_tail);
        let params = ExtractedParameters::Summarize(p.clone());

        let options = input.provider.default_options().with_temperature(SUMMARIZE_TEMPERATURE);
        let (summary, prompt) =
            run_prompt(&input, PromptBuilder::new(&params), &subject.text, &options).await?;

        let mut metadata = base_metadata(&subject.text, &summary, &prompt);
        metadata.compression_ratio = Some(length_ratio(word_count(&summary), word_count(&subject.text)));
        metadata.style = option_name(&p.style);
        metadata.subject_source = Some(subject.source);

        log::info!(
            "[DISPATCH] Summary: {} → {} words (ratio {:?})",
            word_count(&subject.text),
            word_count(&summary),
            metadata.compression_ratio
        );

        Ok(ToolOutput {
            statistics: TextStatistics::compare(&subject.text, &summary),
            placement: Placement::Insert,
            details: OutputDetails::Summary {
                summary: summary.clone(),
                style: p.style,
                length: p.length,
            },
            text: summary,
            metadata,
        })
    }
}
