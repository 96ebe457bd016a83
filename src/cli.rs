//! Command-line front end.
//!
//! The CLI plays the editor's part: it loads a text file as the document,
//! optionally selects a passage in it, dispatches the instruction and can
//! write the result back.

use crate::document::{apply_result, DocumentContext, InMemoryDocument};
use crate::error::AssistantError;
use crate::history::{default_history_path, InteractionLog};
use crate::intent::params::ExtractedParameters;
use crate::intent::{resolve_subject, IntentClassifier, SubjectStrategy};
use crate::llm::{self, PromptBuilder, ProviderKind};
use crate::settings::{self, FileSettingsStore, KeyStore, KeyringStore, SettingsStore};
use crate::tools::{Dispatcher, ToolKind, ToolRegistry};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "docs-assistant")]
#[command(author, version, about = "Classify a writing instruction and run it against an LLM provider")]
#[command(long_about = r#"
Docs Assistant turns a plain-language instruction ("summarize this in bullet
points", "/translate to French") into a prompt for OpenAI or Gemini and
returns the result.

Settings are resolved in this order:
1. Environment (LLM_PROVIDER, OPENAI_API_KEY, GEMINI_API_KEY, DOCS_ASSISTANT_*)
2. OS keychain (API keys only; see `save-key`)
3. ~/.config/docs-assistant/settings.json

Example:
  docs-assistant ask "Summarize this briefly" --document notes.txt
  docs-assistant ask "/rewrite more formal" --document memo.txt --selection "hey team" --apply
  docs-assistant classify "explain recursion with examples"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run an instruction against the configured provider
    Ask {
        instruction: String,

        /// Text file to use as the document
        #[arg(short, long, value_name = "FILE")]
        document: Option<PathBuf>,

        /// Passage to select (must occur in the document, or stands alone)
        #[arg(short, long, value_name = "TEXT")]
        selection: Option<String>,

        /// Write the result back into the document file
        #[arg(long, requires = "document")]
        apply: bool,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the command, options and prompt for an instruction (no network)
    Classify {
        instruction: String,

        #[arg(short, long, value_name = "FILE")]
        document: Option<PathBuf>,

        #[arg(short, long, value_name = "TEXT")]
        selection: Option<String>,
    },

    /// List supported providers and whether each has a key
    Providers,

    /// Send a minimal request to a provider
    TestProvider { provider: String },

    /// Store a provider API key in the OS keychain
    SaveKey { provider: String, api_key: String },

    /// Show recent interactions
    History {
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
    },
}

/// Parse arguments and run. Returns the process exit code.
pub async fn main() -> i32 {
    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            2
        }
    }
}

async fn run(command: Command) -> Result<i32, AssistantError> {
    match command {
        Command::Ask {
            instruction,
            document,
            selection,
            apply,
            json,
        } => ask(&instruction, document, selection.as_deref(), apply, json).await,
        Command::Classify {
            instruction,
            document,
            selection,
        } => classify(&instruction, document, selection.as_deref()),
        Command::Providers => providers(),
        Command::TestProvider { provider } => test_provider(&provider).await,
        Command::SaveKey { provider, api_key } => {
            let kind = settings::save_api_key(&KeyringStore, &provider, &api_key)?;
            println!("Saved {} key to the OS keychain.", kind.display_name());
            Ok(0)
        }
        Command::History { count } => history(count),
    }
}

fn load_document(path: Option<&PathBuf>, selection: Option<&str>) -> Result<InMemoryDocument, AssistantError> {
    let mut doc = match path {
        Some(path) => {
            let body = std::fs::read_to_string(path)
                .map_err(|e| AssistantError::Validation(format!("Cannot read {}: {}", path.display(), e)))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            InMemoryDocument::new(path.display().to_string(), name, body)
        }
        None => InMemoryDocument::new("cli", "Untitled", ""),
    };

    if let Some(selection) = selection.filter(|s| !s.is_empty()) {
        if doc.body().is_empty() {
            doc = InMemoryDocument::new(doc.id.clone(), doc.name.clone(), selection);
        }
        if !doc.select(selection) {
            return Err(AssistantError::Validation(
                "The selection does not occur in the document.".to_string(),
            ));
        }
    }
    Ok(doc)
}

async fn ask(
    instruction: &str,
    document: Option<PathBuf>,
    selection: Option<&str>,
    apply: bool,
    json: bool,
) -> Result<i32, AssistantError> {
    let resolved = settings::resolve(&FileSettingsStore::default_location())?;
    let config = resolved.to_assistant_config();

    let mut doc = load_document(document.as_ref(), selection)?;
    let context = DocumentContext::capture(&doc, config.max_document_chars);

    let provider = llm::make_provider(config.provider.clone())?;
    let history_path = default_history_path().filter(|_| config.history.persist);
    let history = match &history_path {
        Some(path) => InteractionLog::load_from(path, config.history.clone()).unwrap_or_else(|e| {
            log::warn!("[HISTORY] Starting fresh: {}", e);
            InteractionLog::new(config.history.clone())
        }),
        None => InteractionLog::new(config.history.clone()),
    };

    let dispatcher = Dispatcher::new(ToolRegistry::with_builtins(), provider, config).with_history(history);
    let result = dispatcher.process_instruction(instruction, &context).await;

    if let Some(path) = &history_path {
        if let Err(e) = dispatcher.history().await.save_to(path) {
            log::warn!("[HISTORY] {}", e);
        }
    }

    if json {
        let out = serde_json::to_string_pretty(&result)
            .map_err(|e| AssistantError::Validation(format!("Cannot encode result: {}", e)))?;
        println!("{}", out);
    } else if let Some(output) = &result.result {
        println!("{}", output.text);
    } else if let Some(error) = &result.error {
        eprintln!("{}", error);
    }

    if apply && result.success {
        let edit = apply_result(&mut doc, &result);
        if let Some(err) = edit.error {
            eprintln!("Could not apply result: {}", err);
            return Ok(1);
        }
        if let Some(path) = &document {
            std::fs::write(path, doc.body())
                .map_err(|e| AssistantError::Validation(format!("Cannot write {}: {}", path.display(), e)))?;
            eprintln!("Updated {}", path.display());
        }
    }

    Ok(if result.success { 0 } else { 1 })
}

fn classify(instruction: &str, document: Option<PathBuf>, selection: Option<&str>) -> Result<i32, AssistantError> {
    let doc = load_document(document.as_ref(), selection)?;
    let context = DocumentContext::capture(&doc, crate::document::DEFAULT_MAX_DOCUMENT_CHARS);

    let request = IntentClassifier::new().parse(instruction);
    let kind = ToolKind::from_name(&request.command).unwrap_or(ToolKind::General);
    let params = ExtractedParameters::extract(kind, &request.parameter_tail);

    let builder = PromptBuilder::new(&params);
    let (subject, source) = match kind {
        ToolKind::Generate | ToolKind::General => {
            let tail = match request.parameter_tail.trim() {
                "" => request.raw_text.clone(),
                tail => tail.to_string(),
            };
            (Some(tail), None)
        }
        _ => {
            let strategy = match (kind, &request.explicit_command) {
                (ToolKind::Explain, Some(_)) => SubjectStrategy::ExplainTerm,
                (ToolKind::Explain, None) => SubjectStrategy::Explain,
                _ => SubjectStrategy::Document,
            };
            match resolve_subject(&request.parameter_tail, &context, strategy) {
                Some(s) => (Some(s.text), Some(s.source)),
                None => (None, None),
            }
        }
    };
    let builder = match kind {
        ToolKind::Generate | ToolKind::General => builder.with_reference(context.reference_text()),
        _ => builder,
    };
    let prompt = subject.as_deref().map(|s| builder.build(s).into_string());

    let report = serde_json::json!({
        "command": request.command,
        "explicit": request.explicit_command.is_some(),
        "tool": kind.name(),
        "parameters": params,
        "subjectSource": source,
        "prompt": prompt,
    });
    let out = serde_json::to_string_pretty(&report)
        .map_err(|e| AssistantError::Validation(format!("Cannot encode report: {}", e)))?;
    println!("{}", out);
    Ok(0)
}

fn providers() -> Result<i32, AssistantError> {
    for info in llm::all_providers() {
        let configured = llm::is_provider_configured(&info.id)
            || ProviderKind::from_id(&info.id).is_some_and(|k| KeyringStore.get_key(k).is_some());
        println!(
            "{:<8} {:<28} context {:>6} tokens  {}",
            info.id,
            info.name,
            info.context_limit,
            if configured { "key set" } else { "no key" }
        );
    }
    Ok(0)
}

async fn test_provider(provider_id: &str) -> Result<i32, AssistantError> {
    let kind = ProviderKind::from_id(provider_id)
        .ok_or_else(|| AssistantError::Settings(format!("Unknown provider: {}", provider_id)))?;

    let store = FileSettingsStore::default_location();
    let file = store.load_settings()?;
    let env = |name: &str| {
        if name == settings::ENV_PROVIDER {
            Some(kind.id().to_string())
        } else {
            std::env::var(name).ok()
        }
    };
    let resolved = settings::resolve_with(file, &env, &KeyringStore);
    let provider = llm::make_provider(resolved.to_assistant_config().provider)?;

    let ok = provider.test_connection().await?;
    log::info!("[SETTINGS] Test {} — success: {}", kind, ok);
    println!("{}: {}", kind.display_name(), if ok { "ok" } else { "no reply" });
    Ok(if ok { 0 } else { 1 })
}

fn history(count: usize) -> Result<i32, AssistantError> {
    let Some(path) = default_history_path() else {
        println!("No history location available.");
        return Ok(0);
    };
    let settings = FileSettingsStore::default_location().load_settings()?;
    let log = InteractionLog::load_from(&path, settings.to_assistant_config("").history)?;
    if log.is_empty() {
        println!("No interactions recorded.");
    }
    for record in log.recent(count) {
        let status = if record.success { "ok " } else { "err" };
        println!("[{}] {} {:<10} {}", status, record.timestamp, record.command, record.user_input);
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Editor;

    #[test]
    fn parses_ask_flags() {
        let cli = Cli::try_parse_from([
            "docs-assistant", "ask", "summarize", "--document", "notes.txt", "--apply", "--json",
        ])
        .unwrap();
        match cli.command {
            Command::Ask { instruction, apply, json, document, .. } => {
                assert_eq!(instruction, "summarize");
                assert!(apply && json);
                assert_eq!(document, Some(PathBuf::from("notes.txt")));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn apply_requires_document() {
        assert!(Cli::try_parse_from(["docs-assistant", "ask", "x", "--apply"]).is_err());
    }

    #[test]
    fn standalone_selection_becomes_document() {
        let doc = load_document(None, Some("A B C")).unwrap();
        assert_eq!(doc.selection(), "A B C");
        assert_eq!(doc.body(), "A B C");
    }

    #[test]
    fn selection_must_exist_in_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, "Hello world").unwrap();
        assert!(load_document(Some(&path), Some("world")).is_ok());
        assert!(load_document(Some(&path), Some("absent")).is_err());
    }
}
