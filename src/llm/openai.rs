//! OpenAI chat-completions client.
//!
//! Single non-streaming request per call:
//! - Bearer auth header
//! - Text in `choices[0].message.content`
//! - Token usage in `usage.prompt_tokens` / `usage.completion_tokens`

use super::error::{redact_secret, ProviderError};
use super::http;
use super::provider::{
    ConfigUpdate, GenerationOptions, ProviderClient, ProviderConfig, ProviderKind, RedactedConfig,
};
use super::retry::with_retry;
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// gpt-4o-mini pricing per 1M tokens.
const INPUT_COST_PER_MILLION: f64 = 0.15;
const OUTPUT_COST_PER_MILLION: f64 = 0.60;

static KEY_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^sk-[A-Za-z0-9_\-]{16,}$").expect("valid regex"));

/// OpenAI keys must be present and look like `sk-…`.
pub fn validate_openai_key(api_key: &str) -> Result<(), ProviderError> {
    let key = api_key.trim();
    if key.is_empty() {
        return Err(ProviderError::MissingApiKey { provider: "OpenAI" });
    }
    if !KEY_FORMAT.is_match(key) {
        return Err(ProviderError::MalformedApiKey { provider: "OpenAI" });
    }
    Ok(())
}

/// Pull the first choice's message text out of a chat-completions response.
fn extract_openai_text(json: &serde_json::Value) -> Result<String, ProviderError> {
    if let Some(reason) = json["choices"][0]["message"]["refusal"].as_str() {
        return Err(ProviderError::MalformedResponse(format!("model refused ({})", reason)));
    }

    let text = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str());

    http::non_empty_completion(text)
}

pub struct OpenAiClient {
    config: ProviderConfig,
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(mut config: ProviderConfig) -> Result<Self, ProviderError> {
        config.kind = ProviderKind::OpenAi;
        config.api_key = config.api_key.trim().to_string();
        validate_openai_key(&config.api_key)?;
        let http = http::build_client(config.timeout_ms)?;
        log::info!(
            "[LLM] OpenAI client ready (model {}, key length {})",
            config.model,
            config.api_key.len()
        );
        Ok(Self { config, http })
    }

    async fn send_once(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, ProviderError> {
        let mut messages = Vec::new();
        if let Some(system) = &options.system_instruction {
            messages.push(serde_json::json!({ "role": "system", "content": system }));
        }
        messages.push(serde_json::json!({ "role": "user", "content": prompt }));

        let response = self
            .http
            .post(format!("{}/chat/completions", self.config.base_url.trim_end_matches('/')))
            .bearer_auth(&self.config.api_key)
            .header("content-type", "application/json")
            .json(&serde_json::json!({
                "model": self.config.model,
                "messages": messages,
                "max_tokens": options.max_tokens,
                "temperature": options.temperature,
            }))
            .send()
            .await?;

        let json = http::read_json(response, "OpenAI").await?;

        let input_tokens = json["usage"]["prompt_tokens"].as_u64().unwrap_or(0);
        let output_tokens = json["usage"]["completion_tokens"].as_u64().unwrap_or(0);
        http::log_usage(input_tokens, output_tokens, INPUT_COST_PER_MILLION, OUTPUT_COST_PER_MILLION);

        extract_openai_text(&json)
    }
}

#[async_trait]
impl ProviderClient for OpenAiClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
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
        validate_openai_key(api_key)?;
        self.config.api_key = api_key.trim().to_string();
        log::info!("[LLM] OpenAI key updated (length {})", self.config.api_key.len());
        Ok(())
    }

    fn update_config(&mut self, update: ConfigUpdate) -> Result<(), ProviderError> {
        let mut next = self.config.clone();
        update.apply_to(&mut next);
        validate_openai_key(&next.api_key)?;
        if next.timeout_ms != self.config.timeout_ms {
            self.http = http::build_client(next.timeout_ms)?;
        }
        self.config = next;
        log::info!("[LLM] OpenAI config updated: {:?}", self.config);
        Ok(())
    }

    fn redact(&self, message: &str) -> String {
        redact_secret(message, &self.config.api_key)
    }

    async fn generate_response(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, ProviderError> {
        validate_openai_key(&self.config.api_key)?;
        if !self.is_within_limit(prompt, options) {
            return Err(ProviderError::TokenLimitExceeded {
                estimated: self.estimate_token_count(prompt) + options.max_tokens as usize,
                limit: self.context_limit(),
            });
        }

        log::info!("[LLM] Provider: openai");
        log::info!("[LLM] Model: {}", self.config.model);
        let start = std::time::Instant::now();

        let text = with_retry(&self.config.retry, "OpenAI", || self.send_once(prompt, options)).await?;

        log::info!("[LLM] API latency: {}ms", start.elapsed().as_millis());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "sk-test0123456789abcdef";

    #[test]
    fn key_format() {
        assert!(validate_openai_key(KEY).is_ok());
        assert!(matches!(validate_openai_key(""), Err(ProviderError::MissingApiKey { .. })));
        assert!(matches!(
            validate_openai_key("AIza-not-openai"),
            Err(ProviderError::MalformedApiKey { .. })
        ));
    }

    #[test]
    fn extracts_first_choice() {
        let json = serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": "  Hello.\n" } },
                { "message": { "role": "assistant", "content": "Ignored." } }
            ],
            "usage": { "prompt_tokens": 12, "completion_tokens": 3 }
        });
        assert_eq!(extract_openai_text(&json).unwrap(), "Hello.");
    }

    #[test]
    fn missing_choices_is_malformed() {
        let json = serde_json::json!({ "id": "chatcmpl-1", "choices": [] });
        assert!(matches!(
            extract_openai_text(&json),
            Err(ProviderError::MalformedResponse(_))
        ));
        let json = serde_json::json!({ "error": { "message": "bad" } });
        assert!(matches!(
            extract_openai_text(&json),
            Err(ProviderError::MalformedResponse(_))
        ));
    }

    #[test]
    fn empty_or_null_content_is_malformed() {
        let empty = serde_json::json!({ "choices": [{ "message": { "content": "   " } }] });
        assert!(matches!(
            extract_openai_text(&empty),
            Err(ProviderError::MalformedResponse(_))
        ));
        let null = serde_json::json!({ "choices": [{ "message": { "content": null } }] });
        assert!(extract_openai_text(&null).is_err());
        let refused = serde_json::json!({
            "choices": [{ "message": { "content": null, "refusal": "cannot help" } }]
        });
        let err = extract_openai_text(&refused).unwrap_err();
        assert!(err.to_string().contains("cannot help"));
    }

    #[test]
    fn construction_rejects_bad_key() {
        let config = ProviderConfig::new(ProviderKind::OpenAi, "nope");
        assert!(OpenAiClient::new(config).is_err());
    }

    #[test]
    fn failed_key_update_keeps_old_key() {
        let mut client = OpenAiClient::new(ProviderConfig::new(ProviderKind::OpenAi, KEY)).unwrap();
        assert!(client.update_api_key("bad").is_err());
        assert_eq!(client.config.api_key, KEY);
        assert!(client.redacted_config().has_api_key);
    }

    #[test]
    fn redact_strips_key() {
        let client = OpenAiClient::new(ProviderConfig::new(ProviderKind::OpenAi, KEY)).unwrap();
        assert_eq!(client.redact(&format!("bad key {}", KEY)), "bad key ***");
    }

    #[tokio::test]
    async fn oversized_prompt_fails_before_network() {
        let mut config = ProviderConfig::new(ProviderKind::OpenAi, KEY);
        config.base_url = "http://127.0.0.1:9".to_string();
        let client = OpenAiClient::new(config).unwrap();
        let prompt = "x".repeat(40_000);
        let err = client
            .generate_response(&prompt, &client.default_options())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::TokenLimitExceeded { limit: 8192, .. }));
    }

    #[tokio::test]
    async fn round_trip_against_local_server() {
        let url = http::test_server::serve_once(
            200,
            r#"{"choices":[{"message":{"content":"Short summary."}}],"usage":{"prompt_tokens":20,"completion_tokens":2}}"#,
        )
        .await;
        let mut config = ProviderConfig::new(ProviderKind::OpenAi, KEY);
        config.base_url = url;
        let client = OpenAiClient::new(config).unwrap();

        let text = client
            .generate_response("Summarize: hello", &client.default_options())
            .await
            .unwrap();
        assert_eq!(text, "Short summary.");
    }

    #[tokio::test]
    async fn server_error_surfaces_status_without_key() {
        let url = http::test_server::serve_once(500, r#"{"error":{"message":"boom"}}"#).await;
        let mut config = ProviderConfig::new(ProviderKind::OpenAi, KEY);
        config.base_url = url;
        config.retry.max_retries = 0;
        let client = OpenAiClient::new(config).unwrap();

        let err = client
            .generate_response("hello", &client.default_options())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Http { status: 500, .. }));
        assert_eq!(err.to_string(), "API error (500)");
        assert!(!client.redact(&err.to_string()).contains(KEY));
    }

    #[test]
    fn config_update_applies() {
        let mut client = OpenAiClient::new(ProviderConfig::new(ProviderKind::OpenAi, KEY)).unwrap();
        client
            .update_config(ConfigUpdate {
                model: Some("gpt-3.5-turbo".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(client.model(), "gpt-3.5-turbo");
        assert_eq!(client.context_limit(), 4096);
    }
}
