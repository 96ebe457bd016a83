//! Interaction log — bounded, append-only history of past requests.
//!
//! Two ceilings hold after every write: no record older than
//! `max_age_secs`, no more than `max_items` records. Oldest go first.
//! Records are never edited once appended.
//!
//! Persisted as pretty JSON when the user keeps history on; loading
//! re-applies both ceilings.

use crate::config::HistoryConfig;
use crate::document::DocumentContext;
use crate::error::AssistantError;
use crate::tools::ToolResult;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Characters of a result kept on the record itself.
const STORED_SUMMARY_CHARS: usize = 1000;

/// Unix epoch milliseconds.
pub fn unix_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Default on-disk location: `<config dir>/docs-assistant/history.json`.
pub fn default_history_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("docs-assistant").join("history.json"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    /// `int_<unix-ms>_<8 hex of sha256(input)>`
    pub id: String,
    pub timestamp: u64,
    pub user_input: String,
    pub command: String,
    pub success: bool,
    /// Produced text on success, error message on failure (capped).
    pub result_summary: String,
    pub document_id: String,
}

fn record_id(timestamp: u64, input: &str) -> String {
    let hash = Sha256::digest(input.as_bytes());
    let short: String = hash.iter().take(4).map(|b| format!("{:02x}", b)).collect();
    format!("int_{}_{}", timestamp, short)
}

fn cap_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, Default)]
pub struct InteractionLog {
    records: VecDeque<InteractionRecord>,
    config: HistoryConfig,
}

impl InteractionLog {
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            records: VecDeque::new(),
            config,
        }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record for a finished request, then trim.
    pub fn record(
        &mut self,
        input: &str,
        command: &str,
        result: &ToolResult,
        context: &DocumentContext,
    ) -> InteractionRecord {
        self.record_at(input, command, result, context, unix_millis())
    }

    /// [`record`](Self::record) with an explicit clock.
    pub fn record_at(
        &mut self,
        input: &str,
        command: &str,
        result: &ToolResult,
        context: &DocumentContext,
        now_ms: u64,
    ) -> InteractionRecord {
        let record = InteractionRecord {
            id: record_id(now_ms, input),
            timestamp: now_ms,
            user_input: input.to_string(),
            command: command.to_string(),
            success: result.success,
            result_summary: cap_chars(result.summary_text(), STORED_SUMMARY_CHARS),
            document_id: context.metadata.id.clone(),
        };
        log::debug!("[HISTORY] Recording {} ({})", record.id, command);
        self.records.push_back(record.clone());
        self.trim_at(now_ms);
        record
    }

    /// Enforce both ceilings against the current time.
    pub fn trim(&mut self) {
        self.trim_at(unix_millis());
    }

    pub fn trim_at(&mut self, now_ms: u64) {
        let before = self.records.len();
        let cutoff = now_ms.saturating_sub(self.config.max_age_ms());
        while self
            .records
            .front()
            .is_some_and(|r| r.timestamp < cutoff)
        {
            self.records.pop_front();
        }
        while self.records.len() > self.config.max_items {
            self.records.pop_front();
        }
        let dropped = before - self.records.len();
        if dropped > 0 {
            log::debug!("[HISTORY] Trimmed {} record(s)", dropped);
        }
    }

    /// Up to `n` records, most recent first.
    pub fn recent(&self, n: usize) -> Vec<&InteractionRecord> {
        self.records.iter().rev().take(n).collect()
    }

    /// The last `n` records as a numbered transcript, oldest first, each AI
    /// reply capped at `summary_chars`. Empty when there is no history.
    pub fn as_prompt_context(&self, n: usize) -> String {
        let mut recent = self.recent(n);
        recent.reverse();
        recent
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let reply = cap_chars(&single_line(&r.result_summary), self.config.summary_chars);
                let reply = if r.success { reply } else { format!("[error] {}", reply) };
                format!("{}. User: {}\n   AI: {}", i + 1, single_line(&r.user_input), reply)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Write every record to `path` as JSON, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), AssistantError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AssistantError::Settings(format!("Failed to create history dir: {}", e)))?;
        }
        let json = serde_json::to_string_pretty(&self.records)
            .map_err(|e| AssistantError::Settings(format!("Failed to serialize history: {}", e)))?;
        std::fs::write(path, json)
            .map_err(|e| AssistantError::Settings(format!("Failed to write {}: {}", path.display(), e)))?;
        log::info!("[HISTORY] Saved {} record(s) to {}", self.records.len(), path.display());
        Ok(())
    }

    /// Load records from `path` and trim them. A missing file is an empty log.
    pub fn load_from(path: &Path, config: HistoryConfig) -> Result<Self, AssistantError> {
        let mut log = Self::new(config);
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(log),
            Err(e) => {
                return Err(AssistantError::Settings(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        let mut records: Vec<InteractionRecord> = serde_json::from_str(&raw)
            .map_err(|e| AssistantError::Settings(format!("Invalid history file: {}", e)))?;
        records.sort_by_key(|r| r.timestamp);
        log.records = records.into();
        log.trim();
        log::info!("[HISTORY] Loaded {} record(s)", log.records.len());
        Ok(log)
    }
}
