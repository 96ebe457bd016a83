//! Gemini generateContent client — Google AI API.
//!
//! Differences from the OpenAI client:
//! - API key in the `x-goog-api-key` header, never in the URL
//! - System instruction goes in `systemInstruction`, not a message
//! - Text in `candidates[0].content.parts[0].text`
//! - Token usage in `usageMetadata`
//! - Key check is presence only; Google keys have no stable prefix

use super::error::{redact_secret, ProviderError};
use super::http;
use super::provider::{
    ConfigUpdate, GenerationOptions, ProviderClient, ProviderConfig, ProviderKind, RedactedConfig,
};
use super::retry::with_retry;
use async_trait::async_trait;

pub const GEMINI_DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini Flash pricing per 1M tokens (under 128k context).
const INPUT_COST_PER_MILLION: f64 = 0.075;
const OUTPUT_COST_PER_MILLION: f64 = 0.30;

pub fn validate_gemini_key(api_key: &str) -> Result<(), ProviderError> {
    if api_key.trim().is_empty() {
        return Err(ProviderError::MissingApiKey { provider: "Gemini" });
    }
    Ok(())
}

/// Pull the first candidate's text out of a generateContent response.
fn extract_gemini_text(json: &serde_json::Value) -> Result<String, ProviderError> {
    if let Some(reason) = json["promptFeedback"]["blockReason"].as_str() {
        return Err(ProviderError::MalformedResponse(format!(
            "prompt was blocked ({})",
            reason
        )));
    }

    let text = json
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str());

    http::non_empty_completion(text)
}

pub struct GeminiClient {
    config: ProviderConfig,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(mut config: ProviderConfig) -> Result<Self, ProviderError> {
        config.kind = ProviderKind::Gemini;
        config.api_key = config.api_key.trim().to_string();
        validate_gemini_key(&config.api_key)?;
        let http = http::build_client(config.timeout_ms)?;
        log::info!(
            "[LLM] Gemini client ready (model {}, key length {})",
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
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );

        let mut body = serde_json::json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": prompt }]
                }
            ],
            "generationConfig": {
                "maxOutputTokens": options.max_tokens,
                "temperature": options.temperature
            }
        });
        if let Some(system) = &options.system_instruction {
            body["systemInstruction"] = serde_json::json!({ "parts": [{ "text": system }] });
        }

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let json = http::read_json(response, "Gemini").await?;

        let input_tokens = json["usageMetadata"]["promptTokenCount"].as_u64().unwrap_or(0);
        let output_tokens = json["usageMetadata"]["candidatesTokenCount"].as_u64().unwrap_or(0);
        http::log_usage(input_tokens, output_tokens, INPUT_COST_PER_MILLION, OUTPUT_COST_PER_MILLION);

        extract_gemini_text(&json)
    }
}

#[async_trait]
impl ProviderClient for GeminiClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
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
        validate_gemini_key(api_key)?;
        self.config.api_key = api_key.trim().to_string();
        log::info!("[LLM] Gemini key updated (length {})", self.config.api_key.len());
        Ok(())
    }

    fn update_config(&mut self, update: ConfigUpdate) -> Result<(), ProviderError> {
        let mut next = self.config.clone();
        update.apply_to(&mut next);
        validate_gemini_key(&next.api_key)?;
        if next.timeout_ms != self.config.timeout_ms {
            self.http = http::build_client(next.timeout_ms)?;
        }
        self.config = next;
        log::info!("[LLM] Gemini config updated: {:?}", self.config);
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
        validate_gemini_key(&self.config.api_key)?;
        if !self.is_within_limit(prompt, options) {
            return Err(ProviderError::TokenLimitExceeded {
                estimated: self.estimate_token_count(prompt) + options.max_tokens as usize,
                limit: self.context_limit(),
            });
        }

        log::info!("[LLM] Provider: gemini");
        log::info!("[LLM] Model: {}", self.config.model);
        let start = std::time::Instant::now();

        let text = with_retry(&self.config.retry, "Gemini", || self.send_once(prompt, options)).await?;

        log::info!("[LLM] API latency: {}ms", start.elapsed().as_millis());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_only_key_check() {
        assert!(validate_gemini_key("anything").is_ok());
        assert!(matches!(validate_gemini_key("  "), Err(ProviderError::MissingApiKey { .. })));
    }

    #[test]
    fn extracts_first_candidate() {
        let json = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": " Hello. " }] } }]
        });
        assert_eq!(extract_gemini_text(&json).unwrap(), "Hello.");
    }

    #[test]
    fn blocked_prompt_is_malformed() {
        let json = serde_json::json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let err = extract_gemini_text(&json).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn missing_candidates_is_malformed() {
        let err = extract_gemini_text(&serde_json::json!({})).unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[test]
    fn flash_ceiling() {
        let client = GeminiClient::new(ProviderConfig::new(ProviderKind::Gemini, "AIza-key")).unwrap();
        assert_eq!(client.context_limit(), 30720);
        assert_eq!(client.model(), GEMINI_DEFAULT_MODEL);
    }
}
