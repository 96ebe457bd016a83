//! LLM domain — provider clients and prompt assembly.
//!
//! External code should only use the items exported here.
//!
//! Providers:
//!   - OpenAI chat completions (openai.rs)
//!   - Google Gemini generateContent (gemini.rs)
//!
//! Shared:
//!   - provider.rs — the `ProviderClient` trait, config, token budgeting
//!   - retry.rs    — bounded exponential backoff
//!   - http.rs     — response decoding + usage/cost logging
//!   - prompts.rs  — per-tool prompt templates

pub mod error;
pub mod gemini;
mod http;
pub mod openai;
pub mod prompts;
pub mod provider;
pub mod retry;

pub use error::ProviderError;
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use prompts::{Prompt, PromptBuilder};
pub use provider::{
    all_providers, estimate_token_count, is_provider_configured, truncate_to_tokens, ConfigUpdate,
    ContextLimits, GenerationOptions, ProviderClient, ProviderConfig, ProviderInfo, ProviderKind,
    RedactedConfig, RetryPolicy, TRUNCATION_MARKER,
};

/// Build the client for `config.kind`. Fails when the key is missing or
/// malformed; no network call is made.
pub fn make_provider(config: ProviderConfig) -> Result<Box<dyn ProviderClient>, ProviderError> {
    match config.kind {
        ProviderKind::OpenAi => Ok(Box::new(OpenAiClient::new(config)?)),
        ProviderKind::Gemini => Ok(Box::new(GeminiClient::new(config)?)),
    }
}
