//! Tool registry and dispatcher.
//!
//! The registry maps command names to tools. Unknown commands fall back to
//! the tool registered as `general`; if nothing is registered under that
//! name a minimal pass-through tool is used so a request always has a
//! handler.
//!
//! The dispatcher owns the session's provider, configuration and
//! interaction log. `dispatch` never fails: tool errors and panics become a
//! failed `ToolResult`, and every call appends exactly one record.

use super::{builtin_tool, OutputDetails, Placement, ResultMetadata, Tool, ToolInput, ToolKind, ToolOutput, ToolResult};
use crate::config::AssistantConfig;
use crate::document::DocumentContext;
use crate::error::AssistantError;
use crate::history::{unix_millis, InteractionLog};
use crate::intent::{IntentClassifier, Request, COMMAND_PREFIX, DEFAULT_COMMAND};
use crate::llm::{ProviderClient, ProviderError};
use crate::text::TextStatistics;
use async_trait::async_trait;
use futures::FutureExt;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use tokio::sync::{Mutex, MutexGuard};

/// Shown when a tool panics.
const UNEXPECTED_ERROR: &str = "Something went wrong while processing your request. Please try again.";

/// Characters of a provider error body written to the log.
const LOGGED_BODY_CHARS: usize = 200;

// ── Registry ────────────────────────────────────────────────────────

/// Forwards the request text to the provider as-is. Used only when no
/// `general` tool is registered.
struct PassThroughTool;

#[async_trait]
impl Tool for PassThroughTool {
    fn kind(&self) -> ToolKind {
        ToolKind::General
    }

    fn description(&self) -> &'static str {
        "Send the request to the model unchanged"
    }

    async fn execute(&self, input: ToolInput<'_>) -> Result<ToolOutput, AssistantError> {
        let prompt = input.request.raw_text.trim();
        if prompt.is_empty() {
            return Err(AssistantError::Validation("Type an instruction first.".to_string()));
        }
        let options = input.provider.default_options();
        let response = input.provider.generate_response(prompt, &options).await?;
        Ok(ToolOutput {
            statistics: TextStatistics::compare(prompt, &response),
            placement: Placement::Insert,
            metadata: ResultMetadata {
                original_length: prompt.chars().count(),
                result_length: response.chars().count(),
                prompt_tokens: input.provider.estimate_token_count(prompt),
                ..Default::default()
            },
            details: OutputDetails::Reply {
                response: response.clone(),
            },
            text: response,
        })
    }
}

pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
    pass_through: PassThroughTool,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Empty registry. Every command resolves to the pass-through tool.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            pass_through: PassThroughTool,
        }
    }

    /// Registry holding every built-in tool under its own name.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for kind in ToolKind::ALL {
            registry.tools.insert(kind.name().to_string(), builtin_tool(kind));
        }
        log::info!("[DISPATCH] Registered {} built-in tools", registry.tools.len());
        registry
    }

    /// Register `tool` under `name`. Names must be non-blank, contain no
    /// whitespace, not start with the command prefix, and be unused.
    pub fn register_tool(&mut self, name: &str, tool: Box<dyn Tool>) -> Result<(), AssistantError> {
        let key = name.trim().to_lowercase();
        if key.is_empty() {
            return Err(AssistantError::Registration("tool name is empty".to_string()));
        }
        if key.chars().any(char::is_whitespace) {
            return Err(AssistantError::Registration(format!(
                "tool name '{}' contains whitespace",
                name.trim()
            )));
        }
        if key.starts_with(COMMAND_PREFIX) {
            return Err(AssistantError::Registration(format!(
                "tool name '{}' must not start with '{}'",
                key, COMMAND_PREFIX
            )));
        }
        if self.tools.contains_key(&key) {
            return Err(AssistantError::Registration(format!(
                "a tool named '{}' is already registered",
                key
            )));
        }
        log::info!("[DISPATCH] Registered tool '{}' ({})", key, tool.description());
        self.tools.insert(key, tool);
        Ok(())
    }

    /// Exact-name lookup, then `general`, then the pass-through tool.
    /// Returns the name the tool was found under alongside it.
    pub fn select_tool(&self, command: &str) -> (&str, &dyn Tool) {
        if let Some((name, tool)) = self.tools.get_key_value(command) {
            return (name.as_str(), tool.as_ref());
        }
        if let Some((name, tool)) = self.tools.get_key_value(DEFAULT_COMMAND) {
            log::info!("[DISPATCH] Unknown command '{}', using '{}'", command, name);
            return (name.as_str(), tool.as_ref());
        }
        log::warn!("[DISPATCH] No '{}' tool registered, using pass-through", DEFAULT_COMMAND);
        (DEFAULT_COMMAND, &self.pass_through)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

// ── Dispatcher ──────────────────────────────────────────────────────

pub struct Dispatcher {
    registry: ToolRegistry,
    classifier: IntentClassifier,
    provider: Box<dyn ProviderClient>,
    config: AssistantConfig,
    /// Single writer: only `dispatch` appends, after the tool finishes.
    history: Mutex<InteractionLog>,
}

impl Dispatcher {
    pub fn new(registry: ToolRegistry, provider: Box<dyn ProviderClient>, config: AssistantConfig) -> Self {
        let history = InteractionLog::new(config.history.clone());
        Self {
            registry,
            classifier: IntentClassifier::new(),
            provider,
            config,
            history: Mutex::new(history),
        }
    }

    pub fn with_classifier(mut self, classifier: IntentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Start from a previously saved log.
    pub fn with_history(mut self, history: InteractionLog) -> Self {
        self.history = Mutex::new(history);
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    pub fn provider(&self) -> &dyn ProviderClient {
        self.provider.as_ref()
    }

    /// Mutable provider access for key and config updates.
    pub fn provider_mut(&mut self) -> &mut dyn ProviderClient {
        self.provider.as_mut()
    }

    pub async fn history(&self) -> MutexGuard<'_, InteractionLog> {
        self.history.lock().await
    }

    /// Classify `user_input` and dispatch it.
    pub async fn process_instruction(&self, user_input: &str, context: &DocumentContext) -> ToolResult {
        let request = self.classifier.parse(user_input);
        self.dispatch(&request, context).await
    }

    /// Run the tool for `request`. Always returns a result and always
    /// records one interaction.
    pub async fn dispatch(&self, request: &Request, context: &DocumentContext) -> ToolResult {
        let start = std::time::Instant::now();
        let (name, tool) = self.registry.select_tool(&request.command);
        log::info!("[DISPATCH] '{}' → {}", request.command, name);

        let conversation = {
            let history = self.history.lock().await;
            history.as_prompt_context(self.config.history.context_items)
        };

        let input = ToolInput {
            request,
            context,
            provider: self.provider.as_ref(),
            conversation: (!conversation.is_empty()).then_some(conversation.as_str()),
        };

        let outcome = AssertUnwindSafe(tool.execute(input)).catch_unwind().await;

        let metadata = ResultMetadata {
            timestamp: unix_millis(),
            tool: name.to_string(),
            duration_ms: start.elapsed().as_millis() as u64,
            ..Default::default()
        };

        let result = match outcome {
            Ok(Ok(output)) => {
                log::info!(
                    "[DISPATCH] {} succeeded in {}ms ({} chars)",
                    name,
                    metadata.duration_ms,
                    output.text.len()
                );
                ToolResult::succeeded(output, metadata)
            }
            Ok(Err(err)) => {
                let message = self.user_message(&err);
                log::error!("[DISPATCH] {} failed: {}", name, message);
                ToolResult::failed(message, metadata)
            }
            Err(_) => {
                log::error!("[DISPATCH] {} panicked", name);
                ToolResult::failed(UNEXPECTED_ERROR, metadata)
            }
        };

        self.history
            .lock()
            .await
            .record(&request.raw_text, name, &result, context);

        result
    }

    /// Human-readable message with any secret removed.
    fn user_message(&self, err: &AssistantError) -> String {
        if let AssistantError::Provider(ProviderError::Http { status, body }) = err {
            let body: String = body.chars().take(LOGGED_BODY_CHARS).collect();
            log::error!("[LLM] HTTP {} body: {}", status, self.provider.redact(&body));
        }
        self.provider.redact(&err.to_string())
    }
}
