//! LLM provider trait — common interface for all completion providers.
//!
//! Each provider implements this trait. The dispatcher holds exactly one
//! provider for the session and every tool talks to it through here.
//!
//! Token accounting is a soft cost-control heuristic: 4 characters ≈ 1
//! token, rounded up. No tokenizer is involved.

use super::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

// ── Provider catalogue ───────────────────────────────────────────────

/// The supported hosted providers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Gemini,
}

impl ProviderKind {
    pub fn id(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "gemini",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Gemini => "Gemini",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn env_key(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => super::openai::OPENAI_DEFAULT_MODEL,
            ProviderKind::Gemini => super::gemini::GEMINI_DEFAULT_MODEL,
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => super::openai::OPENAI_BASE_URL,
            ProviderKind::Gemini => super::gemini::GEMINI_BASE_URL,
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_lowercase().as_str() {
            "openai" => Some(ProviderKind::OpenAi),
            "gemini" | "google" => Some(ProviderKind::Gemini),
            _ => None,
        }
    }

    pub const ALL: [ProviderKind; 2] = [ProviderKind::OpenAi, ProviderKind::Gemini];
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Provider metadata exposed to settings surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
    pub env_key: String,
    pub default_model: String,
    pub context_limit: usize,
}

/// All known providers and their display info.
pub fn all_providers() -> Vec<ProviderInfo> {
    let limits = ContextLimits::default();
    ProviderKind::ALL
        .iter()
        .map(|kind| ProviderInfo {
            id: kind.id().to_string(),
            name: format!("{} ({})", kind.display_name(), kind.default_model()),
            env_key: kind.env_key().to_string(),
            default_model: kind.default_model().to_string(),
            context_limit: limits.for_model(*kind, kind.default_model()),
        })
        .collect()
}

/// Check if a provider has an API key in the environment.
pub fn is_provider_configured(provider_id: &str) -> bool {
    let Some(kind) = ProviderKind::from_id(provider_id) else {
        return false;
    };
    std::env::var(kind.env_key())
        .map(|k| !k.trim().is_empty())
        .unwrap_or(false)
}

// ── Limits and budgets ───────────────────────────────────────────────

pub const CHARS_PER_TOKEN: usize = 4;

/// Appended once to any truncated subject text.
pub const TRUNCATION_MARKER: &str = "...\n[truncated]";

/// Per-model-family context ceilings in tokens (prompt + response).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextLimits {
    pub openai_large: usize,
    pub openai_small: usize,
    pub gemini_flash: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            openai_large: 8192,
            openai_small: 4096,
            gemini_flash: 30720,
        }
    }
}

impl ContextLimits {
    /// `gpt-4*` models use the large tier, other OpenAI models the small tier.
    pub fn for_model(&self, kind: ProviderKind, model: &str) -> usize {
        match kind {
            ProviderKind::OpenAi if model.starts_with("gpt-4") => self.openai_large,
            ProviderKind::OpenAi => self.openai_small,
            ProviderKind::Gemini => self.gemini_flash,
        }
    }
}

/// Characters / 4, rounded up.
pub fn estimate_token_count(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Cut `text` so its estimate falls below `max_tokens`, appending
/// [`TRUNCATION_MARKER`] once. Text already within budget is returned
/// unchanged. A ceiling too small to hold the marker yields an empty
/// string. Returns the text and whether it was cut.
pub fn truncate_to_tokens(text: &str, max_tokens: usize) -> (String, bool) {
    if estimate_token_count(text) <= max_tokens {
        return (text.to_string(), false);
    }

    let marker_chars = TRUNCATION_MARKER.chars().count();
    // One token of headroom keeps the result strictly under the ceiling.
    let Some(budget) = (max_tokens * CHARS_PER_TOKEN).checked_sub(marker_chars + CHARS_PER_TOKEN) else {
        // Not even the marker fits.
        return (String::new(), true);
    };

    let cut = text.char_indices().nth(budget).map_or(text.len(), |(i, _)| i);
    let mut prefix = &text[..cut];

    // Prefer a word boundary when one is close to the cut.
    if let Some(ws) = prefix.rfind(char::is_whitespace) {
        if ws >= prefix.len() * 4 / 5 {
            prefix = &prefix[..ws];
        }
    }

    (format!("{}{}", prefix.trim_end(), TRUNCATION_MARKER), true)
}

// ── Configuration ────────────────────────────────────────────────────

/// Bounded retry for transient provider failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 500,
        }
    }
}

/// Everything a provider client needs. `Debug` never prints the key.
#[derive(Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_ms: u64,
    /// Overrides the per-model ceiling from `limits`.
    pub context_limit: Option<usize>,
    pub limits: ContextLimits,
    pub retry: RetryPolicy,
}

impl ProviderConfig {
    /// Defaults for `kind` with the given key.
    pub fn new(kind: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            kind,
            api_key: api_key.into(),
            model: kind.default_model().to_string(),
            base_url: kind.default_base_url().to_string(),
            max_tokens: 1000,
            temperature: 0.7,
            timeout_ms: 30_000,
            context_limit: None,
            limits: ContextLimits::default(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn resolved_context_limit(&self) -> usize {
        self.context_limit
            .unwrap_or_else(|| self.limits.for_model(self.kind, &self.model))
    }

    /// The view that may leave the process: no key, only whether one is set.
    pub fn redacted(&self) -> RedactedConfig {
        RedactedConfig {
            provider: self.kind,
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout_ms: self.timeout_ms,
            context_limit: self.resolved_context_limit(),
            has_api_key: !self.api_key.trim().is_empty(),
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_ms", &self.timeout_ms)
            .field("context_limit", &self.context_limit)
            .finish()
    }
}

/// Provider configuration safe to show in a UI or log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactedConfig {
    pub provider: ProviderKind,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_ms: u64,
    pub context_limit: usize,
    pub has_api_key: bool,
}

/// Partial update for [`ProviderClient::update_config`].
#[derive(Debug, Clone, Default)]
pub struct ConfigUpdate {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_ms: Option<u64>,
    pub context_limit: Option<usize>,
}

impl ConfigUpdate {
    pub fn apply_to(&self, config: &mut ProviderConfig) {
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(max_tokens) = self.max_tokens {
            config.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.temperature = temperature;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(limit) = self.context_limit {
            config.context_limit = Some(limit);
        }
    }
}

/// Per-call generation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub max_tokens: u32,
    pub temperature: f32,
    pub system_instruction: Option<String>,
}

impl GenerationOptions {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }
}

// ── The trait ────────────────────────────────────────────────────────

#[async_trait]
pub trait ProviderClient: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Model the client sends requests to.
    fn model(&self) -> &str;

    /// Context ceiling (prompt + response tokens) for the configured model.
    fn context_limit(&self) -> usize;

    /// Generation options seeded from the client's configuration.
    fn default_options(&self) -> GenerationOptions;

    /// Configuration with the API key removed.
    fn redacted_config(&self) -> RedactedConfig;

    /// Replace the API key. The new key is validated first; on failure the
    /// old key stays in place.
    fn update_api_key(&mut self, api_key: &str) -> Result<(), ProviderError>;

    /// Apply a partial configuration change, validated before it takes effect.
    fn update_config(&mut self, update: ConfigUpdate) -> Result<(), ProviderError>;

    /// Send `prompt` and return the generated text.
    async fn generate_response(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, ProviderError>;

    /// Strip anything secret from a message before it leaves the client.
    fn redact(&self, message: &str) -> String {
        message.to_string()
    }

    fn estimate_token_count(&self, text: &str) -> usize {
        estimate_token_count(text)
    }

    /// Estimated prompt tokens plus the response allowance fit the ceiling.
    fn is_within_limit(&self, prompt: &str, options: &GenerationOptions) -> bool {
        self.estimate_token_count(prompt) + options.max_tokens as usize <= self.context_limit()
    }

    /// Tokens left for the prompt once the response allowance is reserved.
    fn prompt_budget(&self, options: &GenerationOptions) -> usize {
        self.context_limit().saturating_sub(options.max_tokens as usize)
    }

    /// Send a minimal prompt and report whether a completion came back.
    async fn test_connection(&self) -> Result<bool, ProviderError> {
        let options = self.default_options().with_max_tokens(10).with_temperature(0.0);
        let reply = self.generate_response("Reply with just: ok", &options).await?;
        log::info!("[LLM] Test {} — reply: {}", self.kind(), reply.trim());
        Ok(!reply.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimates_round_up() {
        assert_eq!(estimate_token_count(""), 0);
        assert_eq!(estimate_token_count("abc"), 1);
        assert_eq!(estimate_token_count("abcd"), 1);
        assert_eq!(estimate_token_count("abcde"), 2);
        assert_eq!(estimate_token_count("ññññ"), 1);
    }

    #[test]
    fn tiny_ceiling_never_grows_text() {
        for max in 0..8 {
            let text = "abcdefghijklmnopqrstuvwxyz0123456789";
            let (cut, truncated) = truncate_to_tokens(text, max);
            assert!(truncated, "max {}", max);
            assert!(estimate_token_count(&cut) < estimate_token_count(text));
            assert!(cut.is_empty() || estimate_token_count(&cut) < max, "max {}: {:?}", max, cut);
            assert_eq!(truncate_to_tokens(&cut, max).0, cut);
        }
        assert_eq!(truncate_to_tokens("abcdefghijkl", 2), (String::new(), true));
    }

    #[test]
    fn truncation_is_noop_under_ceiling() {
        let (text, cut) = truncate_to_tokens("short text", 100);
        assert_eq!(text, "short text");
        assert!(!cut);
    }

    #[test]
    fn truncation_lands_below_ceiling_with_one_marker() {
        let long = "word ".repeat(1000);
        let (text, cut) = truncate_to_tokens(&long, 100);
        assert!(cut);
        assert!(estimate_token_count(&text) < 100);
        assert!(estimate_token_count(&text) < estimate_token_count(&long));
        assert_eq!(text.matches(TRUNCATION_MARKER).count(), 1);
        assert!(text.ends_with("[truncated]"));
    }

    #[test]
    fn truncation_is_char_safe() {
        let long = "ñ".repeat(500);
        let (text, cut) = truncate_to_tokens(&long, 20);
        assert!(cut);
        assert!(estimate_token_count(&text) < 20);
    }

    #[test]
    fn context_limits_by_model_family() {
        let limits = ContextLimits::default();
        assert_eq!(limits.for_model(ProviderKind::OpenAi, "gpt-4o-mini"), 8192);
        assert_eq!(limits.for_model(ProviderKind::OpenAi, "gpt-3.5-turbo"), 4096);
        assert_eq!(limits.for_model(ProviderKind::Gemini, "gemini-1.5-flash"), 30720);
    }

    #[test]
    fn override_beats_model_tier() {
        let mut config = ProviderConfig::new(ProviderKind::OpenAi, "sk-test");
        config.context_limit = Some(2000);
        assert_eq!(config.resolved_context_limit(), 2000);
    }

    #[test]
    fn redacted_config_and_debug_hide_key() {
        let config = ProviderConfig::new(ProviderKind::Gemini, "AIza-super-secret");
        let redacted = config.redacted();
        assert!(redacted.has_api_key);
        let json = serde_json::to_string(&redacted).unwrap();
        assert!(!json.contains("super-secret"));
        assert!(!format!("{:?}", config).contains("super-secret"));
    }

    #[test]
    fn provider_ids_round_trip() {
        for kind in ProviderKind::ALL {
            assert_eq!(ProviderKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(ProviderKind::from_id("nope"), None);
        assert_eq!(all_providers().len(), 2);
    }
}
