use super::{base_metadata, option_name, run_prompt, OutputDetails, Placement, Tool, ToolInput, ToolKind, ToolOutput};
use crate::error::AssistantError;
use crate::intent::params::{ExtractedParameters, FormatParams};
use crate::intent::{resolve_subject, SubjectStrategy};
use crate::llm::PromptBuilder;
use crate::text::TextStatistics;
use async_trait::async_trait;

const FORMAT_TEMPERATURE: f32 = 0.1;

pub struct FormatTool;

#[async_trait]
impl Tool for FormatTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Format
    }

    fn description(&self) -> &'static str {
        "Restructure text as a list, table, headings or clean paragraphs"
    }

    async fn execute(&self, input: ToolInput<'_>) -> Result<ToolOutput, AssistantError> {
        let subject = resolve_subject(&input.request.parameter_tail, input.context, SubjectStrategy::Document)
            .ok_or_else(AssistantError::no_text)?;

        let p = FormatParams::extract(&input.request.parameter_tail);
        let params = ExtractedParameters::Format(p.clone());

        let options = input.provider.default_options().with_temperature(FORMAT_TEMPERATURE);
        let (formatted, prompt) =
            run_prompt(&input, PromptBuilder::new(&params), &subject.text, &options).await?;

        let mut metadata = base_metadata(&subject.text, &formatted, &prompt);
        metadata.style = option_name(&p.format_type);
        metadata.subject_source = Some(subject.source);

        Ok(ToolOutput {
            statistics: TextStatistics::compare(&subject.text, &formatted),
            placement: Placement::for_subject(subject.source),
            details: OutputDetails::Formatted {
                formatted: formatted.clone(),
                format_type: p.format_type,
            },
            text: formatted,
            metadata,
        })
    }
}
