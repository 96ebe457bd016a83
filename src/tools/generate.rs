use super::{base_metadata, option_name, run_prompt, OutputDetails, Placement, Tool, ToolInput, ToolKind, ToolOutput};
use crate::error::AssistantError;
use crate::intent::params::{ExtractedParameters, GenerateParams};
use crate::llm::PromptBuilder;
use crate::text::TextStatistics;
use async_trait::async_trait;

/// Writes new content from a description. The request itself is the
/// subject; the selection (or document) is passed along as reference.
pub struct GenerateTool;

#[async_trait]
impl Tool for GenerateTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Generate
    }

    fn description(&self) -> &'static str {
        "Write new content such as paragraphs, emails, outlines or titles"
    }

    async fn execute(&self, input: ToolInput<'_>) -> Result<ToolOutput, AssistantError> {
        let request_text = input.request.parameter_tail.trim();
        if request_text.is_empty() {
            return Err(AssistantError::Validation(
                "Describe what you would like me to write.".to_string(),
            ));
        }

        let p = GenerateParams::extract(request_text);
        let params = ExtractedParameters::Generate(p.clone());

        let options = input.provider.default_options();
        let builder = PromptBuilder::new(&params).with_reference(input.context.reference_text());
        let (content, prompt) = run_prompt(&input, builder, request_text, &options).await?;

        let mut metadata = base_metadata(request_text, &content, &prompt);
        metadata.style = option_name(&p.content_type);
        metadata.tone = option_name(&p.tone);

        Ok(ToolOutput {
            statistics: TextStatistics::compare(request_text, &content),
            placement: Placement::Insert,
            details: OutputDetails::Generated {
                content: content.clone(),
                content_type: p.content_type,
            },
            text: content,
            metadata,
        })
    }
}
