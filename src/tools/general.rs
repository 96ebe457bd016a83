use super::{base_metadata, run_prompt, OutputDetails, Placement, Tool, ToolInput, ToolKind, ToolOutput};
use crate::error::AssistantError;
use crate::intent::params::{ExtractedParameters, GeneralParams};
use crate::llm::PromptBuilder;
use crate::text::TextStatistics;
use async_trait::async_trait;

/// Catch-all for requests no other tool claims. Also the registry's
/// fallback for unknown commands.
pub struct GeneralTool;

#[async_trait]
impl Tool for GeneralTool {
    fn kind(&self) -> ToolKind {
        ToolKind::General
    }

    fn description(&self) -> &'static str {
        "Answer a free-form request about the document"
    }

    async fn execute(&self, input: ToolInput<'_>) -> Result<ToolOutput, AssistantError> {
        // "/unknown" with no tail still carries an instruction in raw_text.
        let request_text = match input.request.parameter_tail.trim() {
            "" => input.request.raw_text.trim(),
            tail => tail,
        };
        if request_text.is_empty() {
            return Err(AssistantError::Validation("Type an instruction first.".to_string()));
        }

        let params = ExtractedParameters::General(GeneralParams::extract(request_text));

        let options = input.provider.default_options();
        let builder = PromptBuilder::new(&params).with_reference(input.context.reference_text());
        let (response, prompt) = run_prompt(&input, builder, request_text, &options).await?;

        Ok(ToolOutput {
            statistics: TextStatistics::compare(request_text, &response),
            placement: Placement::Insert,
            metadata: base_metadata(request_text, &response, &prompt),
            details: OutputDetails::Reply {
                response: response.clone(),
            },
            text: response,
        })
    }
}
