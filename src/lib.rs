//! Docs Assistant — instruction classification and prompt dispatch for a
//! document editor.
//!
//! A typed instruction is classified into a tool, the tool resolves its
//! options and subject text, builds a prompt, calls the configured LLM
//! provider and returns a `ToolResult` for the editor to apply.
//!
//! Domains:
//!   - intent/    — command classification, option extraction, subject text
//!   - llm/       — provider clients, token budgeting, prompt templates
//!   - tools/     — built-in tools, registry, dispatcher
//!   - text/      — word counts and content-shape heuristics
//!   - document   — editor trait and snapshots
//!   - history    — bounded interaction log
//!   - settings   — settings file, keychain, env overrides
//!   - cli        — command-line front end

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod history;
pub mod intent;
pub mod llm;
pub mod settings;
pub mod text;
pub mod tools;

pub use config::{AssistantConfig, HistoryConfig};
pub use document::{apply_result, DocumentContext, Editor, InMemoryDocument};
pub use error::AssistantError;
pub use tools::{Dispatcher, ToolRegistry, ToolResult};

use history::unix_millis;
use tools::ResultMetadata;

/// One-shot entry point: build a provider from `config`, dispatch
/// `user_input` with the built-in tools and return the result. Never fails;
/// configuration problems come back as a failed `ToolResult`.
pub async fn process_instruction(
    user_input: &str,
    context: &DocumentContext,
    config: &AssistantConfig,
) -> ToolResult {
    let provider = match llm::make_provider(config.provider.clone()) {
        Ok(provider) => provider,
        Err(e) => {
            log::warn!("[DISPATCH] Provider not ready: {}", e);
            return ToolResult::failed(
                e.to_string(),
                ResultMetadata {
                    timestamp: unix_millis(),
                    ..Default::default()
                },
            );
        }
    };

    Dispatcher::new(ToolRegistry::with_builtins(), provider, config.clone())
        .process_instruction(user_input, context)
        .await
}

/// Entry point — called by the binary.
pub fn run() {
    // Load .env.local → .env from the working directory, falling back to
    // the crate root.
    let manifest_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    'env_load: for root in [std::path::Path::new("."), manifest_dir] {
        for env_file in [".env.local", ".env"] {
            let path = root.join(env_file);
            if path.exists() {
                match dotenvy::from_path(&path) {
                    Ok(_) => eprintln!("[STARTUP] Loaded {}", path.display()),
                    Err(e) => eprintln!("[STARTUP] Failed to load {}: {}", path.display(), e),
                }
                break 'env_load;
            }
        }
    }

    env_logger::init();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("[STARTUP] Failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    let code = runtime.block_on(cli::main());
    std::process::exit(code);
}
