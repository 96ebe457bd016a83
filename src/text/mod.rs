//! Text domain — counting and shape heuristics over plain document text.
//!
//! Nothing here talks to a provider. Every tool uses `metrics` for its
//! statistics; a few tools use `heuristics` to enrich their prompts.

pub mod heuristics;
pub mod metrics;

pub use metrics::{length_ratio, reading_time_minutes, word_count, TextStatistics};
