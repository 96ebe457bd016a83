//! Intent domain — turning a typed instruction into a command, options,
//! and the text to operate on.
//!
//!   - classify.rs — command name from free text (ordered pattern table)
//!   - params.rs   — per-tool options (style, tone, audience, language, ...)
//!   - subject.rs  — quoted override / question / selection / document
//!   - keywords.rs — whole-word keyword lookup shared by the above

pub mod classify;
pub mod keywords;
pub mod params;
pub mod subject;

pub use classify::{IntentClassifier, IntentRule, Request, COMMAND_PREFIX, DEFAULT_COMMAND};
pub use params::ExtractedParameters;
pub use subject::{resolve_subject, Subject, SubjectSource, SubjectStrategy};
