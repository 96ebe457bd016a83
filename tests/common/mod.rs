//! Shared test helpers: a scripted provider and document builders.

#![allow(dead_code)]

use async_trait::async_trait;
use docs_assistant_lib::config::AssistantConfig;
use docs_assistant_lib::document::{DocumentContext, InMemoryDocument};
use docs_assistant_lib::llm::error::redact_secret;
use docs_assistant_lib::llm::{
    ConfigUpdate, GenerationOptions, ProviderClient, ProviderConfig, ProviderError, ProviderKind,
    RedactedConfig,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_KEY: &str = "sk-test-0123456789abcdefghij";

/// What the stub does with each prompt.
#[derive(Debug, Clone)]
pub enum Reply {
    Fixed(String),
    Echo,
    Http { status: u16, body: String },
}

/// In-process provider. Counts calls and keeps the last prompt.
pub struct StubProvider {
    config: ProviderConfig,
    reply: Reply,
    calls: Arc<AtomicUsize>,
    last_prompt: Arc<Mutex<Option<String>>>,
}

impl StubProvider {
    pub fn new(reply: Reply) -> Self {
        Self {
            config: ProviderConfig::new(ProviderKind::OpenAi, TEST_KEY),
            reply,
            calls: Arc::new(AtomicUsize::new(0)),
            last_prompt: Arc::new(Mutex::new(None)),
        }
    }

    pub fn fixed(text: &str) -> Self {
        Self::new(Reply::Fixed(text.to_string()))
    }

    /// Handle that still reads the count after the stub is boxed away.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    pub fn prompt_slot(&self) -> Arc<Mutex<Option<String>>> {
        Arc::clone(&self.last_prompt)
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

#[async_trait]
impl ProviderClient for StubProvider {
    fn kind(&self) -> ProviderKind {
        self.config.kind
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn context_limit(&self) -> usize {
        self.config.resolved_context_limit()
    }

    fn default_options(&self) -> GenerationOptions {
        GenerationOptions {
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system_instruction: None,
        }
    }

    fn redacted_config(&self) -> RedactedConfig {
        self.config.redacted()
    }

    fn update_api_key(&mut self, api_key: &str) -> Result<(), ProviderError> {
        self.config.api_key = api_key.to_string();
        Ok(())
    }

    fn update_config(&mut self, update: ConfigUpdate) -> Result<(), ProviderError> {
        update.apply_to(&mut self.config);
        Ok(())
    }

    async fn generate_response(
        &self,
        prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        match &self.reply {
            Reply::Fixed(text) => Ok(text.clone()),
            Reply::Echo => Ok(prompt.to_string()),
            Reply::Http { status, body } => Err(ProviderError::Http {
                status: *status,
                body: body.clone(),
            }),
        }
    }

    fn redact(&self, message: &str) -> String {
        redact_secret(message, &self.config.api_key)
    }
}

pub fn test_config() -> AssistantConfig {
    let mut config = AssistantConfig::new(ProviderConfig::new(ProviderKind::OpenAi, TEST_KEY));
    config.history.persist = false;
    config
}

/// Snapshot of a document with `selection` selected inside `body`.
/// An empty selection leaves nothing selected.
pub fn context_with(body: &str, selection: &str) -> DocumentContext {
    let mut doc = InMemoryDocument::new("doc-1", "Test doc", body);
    if !selection.is_empty() {
        assert!(doc.select(selection), "selection must occur in body");
    }
    DocumentContext::capture(&doc, 50_000)
}
