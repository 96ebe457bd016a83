use super::{base_metadata, run_prompt, OutputDetails, Placement, Tool, ToolInput, ToolKind, ToolOutput};
use crate::error::AssistantError;
use crate::intent::params::{ExtractedParameters, TranslateParams};
use crate::intent::{resolve_subject, SubjectStrategy};
use crate::llm::PromptBuilder;
use crate::text::TextStatistics;
use async_trait::async_trait;

const TRANSLATE_TEMPERATURE: f32 = 0.2;

pub struct TranslateTool;

#[async_trait]
impl Tool for TranslateTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Translate
    }

    fn description(&self) -> &'static str {
        "Translate text into another language"
    }

    async fn execute(&self, input: ToolInput<'_>) -> Result<ToolOutput, AssistantError> {
        let subject = resolve_subject(&input.request.parameter_tail, input.context, SubjectStrategy::Document)
            .ok_or_else(AssistantError::no_text)?;

        let p = TranslateParams::extract(&input.request.parameter_tail);
        let params = ExtractedParameters::Translate(p.clone());
        log::info!(
            "[DISPATCH] Translate {:?} → {:?}",
            p.source_language,
            p.target_language
        );

        let options = input.provider.default_options().with_temperature(TRANSLATE_TEMPERATURE);
        let (translation, prompt) =
            run_prompt(&input, PromptBuilder::new(&params), &subject.text, &options).await?;

        let mut metadata = base_metadata(&subject.text, &translation, &prompt);
        metadata.style = Some(p.target_language.name().to_string());
        metadata.subject_source = Some(subject.source);

        Ok(ToolOutput {
            statistics: TextStatistics::compare(&subject.text, &translation),
            placement: Placement::for_subject(subject.source),
            details: OutputDetails::Translation {
                translation: translation.clone(),
                target_language: p.target_language,
                source_language: p.source_language,
            },
            text: translation,
            metadata,
        })
    }
}
