//! Provider errors.
//!
//! Display strings are what the user eventually sees. None of them carry
//! the API key; reqwest errors are stripped of their URL before conversion
//! because some endpoints accept the key as a query parameter.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("No API key configured. Add your {provider} API key in Settings.")]
    MissingApiKey { provider: &'static str },

    #[error("The configured {provider} API key is not in the expected format.")]
    MalformedApiKey { provider: &'static str },

    /// Non-2xx response. `body` is the raw response body.
    #[error("API error ({status})")]
    Http { status: u16, body: String },

    #[error("API request failed: {0}")]
    Transport(String),

    #[error("API request timed out")]
    Timeout,

    #[error("Could not parse the model response: {0}")]
    MalformedResponse(String),

    #[error("Request is too large for the model: ~{estimated} tokens, limit {limit}")]
    TokenLimitExceeded { estimated: usize, limit: usize },
}

impl ProviderError {
    /// Transient failures worth another attempt: 5xx, 429, timeouts,
    /// connection failures.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Http { status, .. } => *status >= 500 || *status == 429,
            ProviderError::Timeout | ProviderError::Transport(_) => true,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ProviderError::Timeout;
        }
        ProviderError::Transport(err.without_url().to_string())
    }
}

/// Replace every occurrence of `secret` in `message` with `***`.
pub fn redact_secret(message: &str, secret: &str) -> String {
    if secret.is_empty() {
        return message.to_string();
    }
    message.replace(secret, "***")
}
