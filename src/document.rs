//! Editor collaborator — document snapshots in, edits out.
//!
//! The host editor (sidebar add-on, CLI, test harness) implements [`Editor`].
//! The core only ever reads a [`DocumentContext`] snapshot and hands a
//! finished [`ToolResult`] back through [`apply_result`].

use crate::text;
use crate::tools::{Placement, ToolResult};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Full-content cap used when no configuration says otherwise.
pub const DEFAULT_MAX_DOCUMENT_CHARS: usize = 50_000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub id: String,
    pub name: String,
    pub word_count: usize,
}

/// Read-only snapshot of the document taken before a request runs.
/// Empty strings mean "no selection" / "empty document".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentContext {
    pub selection: String,
    pub full_content: String,
    /// True when `full_content` was cut to the configured character cap.
    pub truncated: bool,
    pub metadata: DocumentMetadata,
}

impl DocumentContext {
    /// Snapshot an editor, keeping at most `max_chars` of the full text.
    pub fn capture(editor: &dyn Editor, max_chars: usize) -> Self {
        let full = editor.full_text();
        let (full_content, truncated) = match full.char_indices().nth(max_chars) {
            Some((cut, _)) => (full[..cut].to_string(), true),
            None => (full, false),
        };
        if truncated {
            log::info!("[EDITOR] Document content capped at {} chars", max_chars);
        }
        Self {
            selection: editor.selection(),
            full_content,
            truncated,
            metadata: editor.metadata(),
        }
    }

    /// Selection if there is one, else the full content. Trimmed.
    pub fn reference_text(&self) -> &str {
        match self.selection.trim() {
            "" => self.full_content.trim(),
            selection => selection,
        }
    }
}

/// Outcome of an edit on the host document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EditResult {
    pub fn ok() -> Self {
        Self { success: true, error: None }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, error: Some(message.into()) }
    }
}

/// The host document editor.
pub trait Editor {
    fn selection(&self) -> String;
    fn full_text(&self) -> String;
    fn metadata(&self) -> DocumentMetadata;
    fn insert_at_cursor(&mut self, text: &str) -> EditResult;
    fn replace_selection(&mut self, text: &str) -> EditResult;
}

/// A plain-text document held in memory, with an optional selection and a
/// cursor. Used by the CLI and by tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocument {
    pub id: String,
    pub name: String,
    body: String,
    /// Byte range into `body`.
    selection: Option<Range<usize>>,
    /// Byte offset into `body`.
    cursor: usize,
}

impl InMemoryDocument {
    /// New document with the cursor at the end and nothing selected.
    pub fn new(id: impl Into<String>, name: impl Into<String>, body: impl Into<String>) -> Self {
        let body = body.into();
        let cursor = body.len();
        Self {
            id: id.into(),
            name: name.into(),
            body,
            selection: None,
            cursor,
        }
    }

    /// Select the first occurrence of `needle`. Returns false if absent.
    pub fn select(&mut self, needle: &str) -> bool {
        match self.body.find(needle) {
            Some(start) if !needle.is_empty() => {
                let end = start + needle.len();
                self.selection = Some(start..end);
                self.cursor = end;
                true
            }
            _ => false,
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

impl Editor for InMemoryDocument {
    fn selection(&self) -> String {
        self.selection
            .as_ref()
            .map(|r| self.body[r.clone()].to_string())
            .unwrap_or_default()
    }

    fn full_text(&self) -> String {
        self.body.clone()
    }

    fn metadata(&self) -> DocumentMetadata {
        DocumentMetadata {
            id: self.id.clone(),
            name: self.name.clone(),
            word_count: text::word_count(&self.body),
        }
    }

    fn insert_at_cursor(&mut self, text: &str) -> EditResult {
        if !self.body.is_char_boundary(self.cursor) {
            return EditResult::failed("Cursor is not on a character boundary");
        }
        let insertion = if self.body.is_empty() || self.cursor == 0 {
            text.to_string()
        } else {
            format!("\n\n{}", text)
        };
        self.body.insert_str(self.cursor, &insertion);
        self.cursor += insertion.len();
        self.selection = None;
        EditResult::ok()
    }

    fn replace_selection(&mut self, text: &str) -> EditResult {
        let Some(range) = self.selection.take() else {
            return EditResult::failed("No text selected");
        };
        self.body.replace_range(range.clone(), text);
        self.cursor = range.start + text.len();
        EditResult::ok()
    }
}

/// Hand a finished result to the editor. Failed results are never applied.
/// `Replace` falls back to an insert when nothing is selected.
pub fn apply_result(editor: &mut dyn Editor, result: &ToolResult) -> EditResult {
    let Some(output) = result.result.as_ref().filter(|_| result.success) else {
        return EditResult::failed(
            result
                .error
                .clone()
                .unwrap_or_else(|| "Nothing to insert".to_string()),
        );
    };

    let edit = match output.placement {
        Placement::Replace if !editor.selection().trim().is_empty() => {
            editor.replace_selection(&output.text)
        }
        _ => editor.insert_at_cursor(&output.text),
    };

    if let Some(err) = &edit.error {
        log::warn!("[EDITOR] Edit failed: {}", err);
    } else {
        log::info!("[EDITOR] Applied {} chars ({:?})", output.text.len(), output.placement);
    }
    edit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_caps_full_content() {
        let doc = InMemoryDocument::new("d1", "Notes", "abcdef");
        let ctx = DocumentContext::capture(&doc, 3);
        assert_eq!(ctx.full_content, "abc");
        assert!(ctx.truncated);
        assert_eq!(ctx.metadata.word_count, 1);

        let ctx = DocumentContext::capture(&doc, 10);
        assert_eq!(ctx.full_content, "abcdef");
        assert!(!ctx.truncated);
    }

    #[test]
    fn capture_respects_char_boundaries() {
        let doc = InMemoryDocument::new("d1", "Notes", "ñññ");
        let ctx = DocumentContext::capture(&doc, 2);
        assert_eq!(ctx.full_content, "ññ");
    }

    #[test]
    fn replace_selection_edits_in_place() {
        let mut doc = InMemoryDocument::new("d1", "Notes", "Hello world, bye.");
        assert!(doc.select("world"));
        assert_eq!(doc.selection(), "world");
        assert!(doc.replace_selection("there").success);
        assert_eq!(doc.body(), "Hello there, bye.");
        assert_eq!(doc.selection(), "");
    }

    #[test]
    fn replace_without_selection_fails() {
        let mut doc = InMemoryDocument::new("d1", "Notes", "Hello");
        let res = doc.replace_selection("x");
        assert!(!res.success);
        assert_eq!(res.error.as_deref(), Some("No text selected"));
    }

    #[test]
    fn insert_appends_after_cursor() {
        let mut doc = InMemoryDocument::new("d1", "Notes", "First.");
        assert!(doc.insert_at_cursor("Second.").success);
        assert_eq!(doc.body(), "First.\n\nSecond.");

        let mut empty = InMemoryDocument::new("d2", "Empty", "");
        empty.insert_at_cursor("Only.");
        assert_eq!(empty.body(), "Only.");
    }
}
