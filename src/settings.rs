//! User settings and provider resolution.
//!
//! Handles:
//! - Settings persistence (JSON under the user config dir, never the key)
//! - API key storage (OS keychain via keyring crate + env var)
//! - Environment overrides
//! - Conversion into the typed `AssistantConfig`
//!
//! Precedence, highest first: environment → keychain (keys only) →
//! settings file → defaults.

use crate::config::{AssistantConfig, HistoryConfig};
use crate::document::DEFAULT_MAX_DOCUMENT_CHARS;
use crate::error::AssistantError;
use crate::llm::gemini::validate_gemini_key;
use crate::llm::openai::validate_openai_key;
use crate::llm::{ProviderConfig, ProviderKind, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Keychain service name; the account is the provider id.
pub const KEYRING_SERVICE: &str = "docs-assistant";

pub const ENV_PROVIDER: &str = "LLM_PROVIDER";
pub const ENV_MODEL: &str = "DOCS_ASSISTANT_MODEL";
pub const ENV_MAX_TOKENS: &str = "DOCS_ASSISTANT_MAX_TOKENS";
pub const ENV_TEMPERATURE: &str = "DOCS_ASSISTANT_TEMPERATURE";
pub const ENV_TIMEOUT_MS: &str = "DOCS_ASSISTANT_TIMEOUT_MS";

// ── Settings ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub provider: ProviderKind,
    /// `None` means the provider's default model.
    pub model: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub save_history: bool,
    pub timeout_ms: u64,
    pub max_retries: u32,
    /// Overrides the per-model context ceiling.
    pub context_limit: Option<usize>,
    pub max_history_items: usize,
    pub max_history_age_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let history = HistoryConfig::default();
        Self {
            provider: ProviderKind::OpenAi,
            model: None,
            max_tokens: 1000,
            temperature: 0.7,
            save_history: true,
            timeout_ms: 30_000,
            max_retries: RetryPolicy::default().max_retries,
            context_limit: None,
            max_history_items: history.max_items,
            max_history_age_secs: history.max_age_secs,
        }
    }
}

impl Settings {
    pub fn model_or_default(&self) -> String {
        self.model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_model().to_string())
    }

    /// Typed runtime config for these settings and key.
    pub fn to_assistant_config(&self, api_key: &str) -> AssistantConfig {
        let mut provider = ProviderConfig::new(self.provider, api_key);
        provider.model = self.model_or_default();
        provider.max_tokens = self.max_tokens;
        provider.temperature = self.temperature;
        provider.timeout_ms = self.timeout_ms;
        provider.context_limit = self.context_limit;
        provider.retry.max_retries = self.max_retries;

        AssistantConfig {
            provider,
            history: HistoryConfig {
                persist: self.save_history,
                max_items: self.max_history_items,
                max_age_secs: self.max_history_age_secs,
                ..HistoryConfig::default()
            },
            max_document_chars: DEFAULT_MAX_DOCUMENT_CHARS,
        }
    }
}

// ── Settings persistence ─────────────────────────────────────────────

/// The settings collaborator.
pub trait SettingsStore {
    fn load_settings(&self) -> Result<Settings, AssistantError>;
    fn save_settings(&self, settings: &Settings) -> Result<(), AssistantError>;
}

/// Settings as pretty JSON in a single file.
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/docs-assistant/settings.json`
    pub fn default_location() -> Self {
        let dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(dir.join("docs-assistant").join("settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    /// A missing file yields defaults; an unreadable one is an error.
    fn load_settings(&self) -> Result<Settings, AssistantError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| AssistantError::Settings(format!("Invalid settings file: {}", e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Settings::default()),
            Err(e) => Err(AssistantError::Settings(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn save_settings(&self, settings: &Settings) -> Result<(), AssistantError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AssistantError::Settings(format!("Failed to create config dir: {}", e)))?;
        }
        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| AssistantError::Settings(format!("Failed to serialize settings: {}", e)))?;
        std::fs::write(&self.path, json)
            .map_err(|e| AssistantError::Settings(format!("Failed to write settings: {}", e)))?;
        log::info!("[SETTINGS] Saved settings to {}", self.path.display());
        Ok(())
    }
}

// ── API keys ─────────────────────────────────────────────────────────

/// Secret storage for provider API keys.
pub trait KeyStore {
    fn get_key(&self, kind: ProviderKind) -> Option<String>;
    fn set_key(&self, kind: ProviderKind, api_key: &str) -> Result<(), AssistantError>;
}

/// OS keychain via the keyring crate.
pub struct KeyringStore;

impl KeyStore for KeyringStore {
    fn get_key(&self, kind: ProviderKind) -> Option<String> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, kind.id()).ok()?;
        entry.get_password().ok().filter(|k| !k.trim().is_empty())
    }

    fn set_key(&self, kind: ProviderKind, api_key: &str) -> Result<(), AssistantError> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, kind.id())
            .map_err(|e| AssistantError::Settings(format!("Keyring error: {}", e)))?;
        entry
            .set_password(api_key)
            .map_err(|e| AssistantError::Settings(format!("Failed to save key: {}", e)))
    }
}

/// Where the resolved key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeySource {
    Environment,
    Keychain,
    Missing,
}

/// Validate `api_key` for `provider_id` and store it in `keys`.
pub fn save_api_key(keys: &dyn KeyStore, provider_id: &str, api_key: &str) -> Result<ProviderKind, AssistantError> {
    let kind = ProviderKind::from_id(provider_id)
        .ok_or_else(|| AssistantError::Settings(format!("Unknown provider: {}", provider_id)))?;
    let api_key = api_key.trim();
    match kind {
        ProviderKind::OpenAi => validate_openai_key(api_key)?,
        ProviderKind::Gemini => validate_gemini_key(api_key)?,
    }
    keys.set_key(kind, api_key)?;
    log::info!("[SETTINGS] API key saved for provider: {} ({} chars)", kind, api_key.len());
    Ok(kind)
}

fn lookup_key(
    kind: ProviderKind,
    env: &dyn Fn(&str) -> Option<String>,
    keys: &dyn KeyStore,
) -> (Option<String>, KeySource) {
    if let Some(key) = env(kind.env_key()).filter(|k| !k.trim().is_empty()) {
        return (Some(key), KeySource::Environment);
    }
    if let Some(key) = keys.get_key(kind) {
        return (Some(key), KeySource::Keychain);
    }
    (None, KeySource::Missing)
}

// ── Resolution ───────────────────────────────────────────────────────

/// Settings after every override has been applied, plus the key.
pub struct ResolvedSettings {
    pub settings: Settings,
    pub api_key: String,
    pub key_source: KeySource,
}

impl ResolvedSettings {
    pub fn to_assistant_config(&self) -> AssistantConfig {
        self.settings.to_assistant_config(&self.api_key)
    }
}

impl std::fmt::Debug for ResolvedSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSettings")
            .field("settings", &self.settings)
            .field("key_source", &self.key_source)
            .finish()
    }
}

fn parse_env<T: std::str::FromStr>(env: &dyn Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    let raw = env(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("[SETTINGS] Ignoring invalid {}={}", name, raw);
            None
        }
    }
}

/// Apply environment overrides and find an API key.
///
/// Provider priority:
/// 1. LLM_PROVIDER env var
/// 2. The settings file's provider, if it has a key
/// 3. First provider with a key (env var or keychain)
/// 4. The settings file's provider
pub fn resolve_with(
    file: Settings,
    env: &dyn Fn(&str) -> Option<String>,
    keys: &dyn KeyStore,
) -> ResolvedSettings {
    let mut settings = file;

    let explicit = env(ENV_PROVIDER).and_then(|p| ProviderKind::from_id(&p));
    if let Some(kind) = explicit {
        log::info!("[SETTINGS] Provider override: {}", kind);
        if kind != settings.provider {
            settings.model = None;
        }
        settings.provider = kind;
    }

    let (mut api_key, mut key_source) = lookup_key(settings.provider, env, keys);
    if api_key.is_none() && explicit.is_none() {
        for kind in ProviderKind::ALL {
            if kind == settings.provider {
                continue;
            }
            let (key, source) = lookup_key(kind, env, keys);
            if key.is_some() {
                log::info!("[SETTINGS] No {} key; using configured provider {}", settings.provider, kind);
                settings.provider = kind;
                settings.model = None;
                api_key = key;
                key_source = source;
                break;
            }
        }
    }

    if let Some(model) = env(ENV_MODEL).filter(|m| !m.trim().is_empty()) {
        settings.model = Some(model.trim().to_string());
    }
    if let Some(max_tokens) = parse_env(env, ENV_MAX_TOKENS) {
        settings.max_tokens = max_tokens;
    }
    if let Some(temperature) = parse_env(env, ENV_TEMPERATURE) {
        settings.temperature = temperature;
    }
    if let Some(timeout_ms) = parse_env(env, ENV_TIMEOUT_MS) {
        settings.timeout_ms = timeout_ms;
    }

    let api_key = api_key.unwrap_or_default();
    match key_source {
        KeySource::Missing => log::warn!("[SETTINGS] No API key found for {}", settings.provider),
        source => log::info!("[SETTINGS] API key found ({} chars, {:?})", api_key.len(), source),
    }

    ResolvedSettings {
        settings,
        api_key,
        key_source,
    }
}

/// Resolve against the real environment, keychain and settings file.
pub fn resolve(store: &dyn SettingsStore) -> Result<ResolvedSettings, AssistantError> {
    let file = store.load_settings()?;
    Ok(resolve_with(file, &|name| std::env::var(name).ok(), &KeyringStore))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryKeys(RefCell<HashMap<ProviderKind, String>>);

    impl KeyStore for MemoryKeys {
        fn get_key(&self, kind: ProviderKind) -> Option<String> {
            self.0.borrow().get(&kind).cloned()
        }

        fn set_key(&self, kind: ProviderKind, api_key: &str) -> Result<(), AssistantError> {
            self.0.borrow_mut().insert(kind, api_key.to_string());
            Ok(())
        }
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let s = Settings::default();
        assert_eq!(s.provider, ProviderKind::OpenAi);
        assert_eq!(s.max_tokens, 1000);
        assert_eq!(s.temperature, 0.7);
        assert!(s.save_history);
        assert_eq!(s.timeout_ms, 30_000);
        assert_eq!(s.max_history_items, 50);
        assert_eq!(s.max_history_age_secs, 86_400);
        assert_eq!(s.model_or_default(), "gpt-4o-mini");
    }

    #[test]
    fn env_key_beats_keychain() {
        let keys = MemoryKeys::default();
        keys.set_key(ProviderKind::OpenAi, "sk-from-keychain-000000").unwrap();
        let env = env_of(&[("OPENAI_API_KEY", "sk-from-env-0000000000")]);
        let resolved = resolve_with(Settings::default(), &env, &keys);
        assert_eq!(resolved.api_key, "sk-from-env-0000000000");
        assert_eq!(resolved.key_source, KeySource::Environment);
    }

    #[test]
    fn keychain_used_when_env_empty() {
        let keys = MemoryKeys::default();
        keys.set_key(ProviderKind::OpenAi, "sk-from-keychain-000000").unwrap();
        let resolved = resolve_with(Settings::default(), &env_of(&[("OPENAI_API_KEY", "")]), &keys);
        assert_eq!(resolved.key_source, KeySource::Keychain);
    }

    #[test]
    fn falls_back_to_provider_with_key() {
        let env = env_of(&[("GEMINI_API_KEY", "AIza-test")]);
        let resolved = resolve_with(Settings::default(), &env, &MemoryKeys::default());
        assert_eq!(resolved.settings.provider, ProviderKind::Gemini);
        assert_eq!(resolved.settings.model_or_default(), "gemini-1.5-flash");
    }

    #[test]
    fn explicit_provider_is_kept_without_key() {
        let env = env_of(&[("LLM_PROVIDER", "gemini"), ("OPENAI_API_KEY", "sk-0000000000000000")]);
        let resolved = resolve_with(Settings::default(), &env, &MemoryKeys::default());
        assert_eq!(resolved.settings.provider, ProviderKind::Gemini);
        assert_eq!(resolved.key_source, KeySource::Missing);
        assert!(resolved.api_key.is_empty());
    }

    #[test]
    fn numeric_overrides_and_bad_values() {
        let env = env_of(&[
            ("DOCS_ASSISTANT_MAX_TOKENS", "250"),
            ("DOCS_ASSISTANT_TEMPERATURE", "warm"),
            ("DOCS_ASSISTANT_MODEL", "gpt-3.5-turbo"),
        ]);
        let resolved = resolve_with(Settings::default(), &env, &MemoryKeys::default());
        assert_eq!(resolved.settings.max_tokens, 250);
        assert_eq!(resolved.settings.temperature, 0.7);
        let config = resolved.to_assistant_config();
        assert_eq!(config.provider.model, "gpt-3.5-turbo");
        assert_eq!(config.provider.resolved_context_limit(), 4096);
    }

    #[test]
    fn file_store_roundtrip_never_writes_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::new(dir.path().join("docs-assistant").join("settings.json"));
        assert_eq!(store.load_settings().unwrap(), Settings::default());

        let settings = Settings {
            provider: ProviderKind::Gemini,
            max_tokens: 321,
            ..Default::default()
        };
        store.save_settings(&settings).unwrap();
        assert_eq!(store.load_settings().unwrap(), settings);

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(!raw.to_lowercase().contains("apikey"));
    }

    #[test]
    fn save_api_key_validates_format() {
        let keys = MemoryKeys::default();
        assert!(save_api_key(&keys, "openai", "not-a-key").is_err());
        assert!(save_api_key(&keys, "nope", "sk-0000000000000000").is_err());
        assert_eq!(save_api_key(&keys, "openai", "sk-0000000000000000").unwrap(), ProviderKind::OpenAi);
        assert_eq!(keys.get_key(ProviderKind::OpenAi).as_deref(), Some("sk-0000000000000000"));
    }

    #[test]
    fn history_settings_flow_into_config() {
        let settings = Settings {
            save_history: false,
            max_history_items: 5,
            ..Default::default()
        };
        let config = settings.to_assistant_config("sk-x");
        assert!(!config.history.persist);
        assert_eq!(config.history.max_items, 5);
    }
}
