//! Typed runtime configuration, derived from `Settings` at start-up.

use crate::document::DEFAULT_MAX_DOCUMENT_CHARS;
use crate::llm::ProviderConfig;
use serde::{Deserialize, Serialize};

/// Interaction-log limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryConfig {
    /// Write the log to disk between runs.
    pub persist: bool,
    pub max_items: usize,
    pub max_age_secs: u64,
    /// Records included as conversation context in new prompts.
    pub context_items: usize,
    /// Character cap on each AI reply in the conversation context.
    pub summary_chars: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            persist: true,
            max_items: 50,
            max_age_secs: 24 * 60 * 60,
            context_items: 3,
            summary_chars: 200,
        }
    }
}

impl HistoryConfig {
    pub fn max_age_ms(&self) -> u64 {
        self.max_age_secs.saturating_mul(1000)
    }
}

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub provider: ProviderConfig,
    pub history: HistoryConfig,
    /// Cap applied to full document content when capturing a snapshot.
    pub max_document_chars: usize,
}

impl AssistantConfig {
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            provider,
            history: HistoryConfig::default(),
            max_document_chars: DEFAULT_MAX_DOCUMENT_CHARS,
        }
    }
}
