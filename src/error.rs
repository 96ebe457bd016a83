//! Crate-level error type.
//!
//! Tools return `AssistantError`; the dispatcher turns every one of them
//! into a failed `ToolResult`. Only `Registration` and `Settings` surface
//! to callers directly, at setup time.

use crate::llm::ProviderError;
use thiserror::Error;

/// Shown when a tool has neither a selection nor document content to use.
pub const NO_TEXT_MESSAGE: &str =
    "No text available. Select some text or add content to the document.";

#[derive(Debug, Error)]
pub enum AssistantError {
    /// Bad input caught before any provider call.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Tool registration failed: {0}")]
    Registration(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

impl AssistantError {
    pub fn no_text() -> Self {
        AssistantError::Validation(NO_TEXT_MESSAGE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_display_transparently() {
        let err: AssistantError = ProviderError::Timeout.into();
        assert_eq!(err.to_string(), "API request timed out");
    }

    #[test]
    fn validation_message_is_verbatim() {
        assert_eq!(AssistantError::no_text().to_string(), NO_TEXT_MESSAGE);
    }
}
