//! [`EditorHost`] for one command invocation over LSP.
//!
//! Notices and insertions are collected while the command runs and sent to
//! the client afterwards: every insertion is rendered against the snapshot
//! the command started from and delivered as one `workspace/applyEdit`, so
//! ranges never need to be shifted for earlier insertions.

use std::collections::HashMap;
use std::sync::Mutex;

use tower_lsp_server::Client;
use tower_lsp_server::ls_types::{MessageType, Range, TextEdit, Uri, WorkspaceEdit};

use super::snippet::{SnippetContext, line_indent, render_snippet};
use crate::document::TextDocument;
use crate::editor::{EditorHost, Notice, NoticeLevel};
use crate::error::LockResultExt;

#[derive(Default, Debug)]
struct Pending {
    notices: Vec<Notice>,
    edits: Vec<TextEdit>,
}

pub struct LspEditor {
    uri: Uri,
    document: TextDocument,
    pending: Mutex<Pending>,
}

impl std::fmt::Debug for LspEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LspEditor")
            .field("uri", &self.uri.as_str())
            .finish_non_exhaustive()
    }
}

impl LspEditor {
    pub fn new(uri: Uri, document: TextDocument) -> Self {
        Self {
            uri,
            document,
            pending: Mutex::new(Pending::default()),
        }
    }

    /// Notices collected so far, leaving none behind.
    pub fn take_notices(&self) -> Vec<Notice> {
        match self.pending.lock().recover_poison("LspEditor::take_notices") {
            Ok(mut pending) => std::mem::take(&mut pending.notices),
            Err(_) => Vec::new(),
        }
    }

    /// The collected insertions as a single workspace edit, leaving none behind.
    pub fn take_workspace_edit(&self) -> Option<WorkspaceEdit> {
        let edits = match self.pending.lock().recover_poison("LspEditor::take_workspace_edit") {
            Ok(mut pending) => std::mem::take(&mut pending.edits),
            Err(_) => return None,
        };
        if edits.is_empty() {
            return None;
        }

        let mut changes = HashMap::new();
        changes.insert(self.uri.clone(), edits);
        Some(WorkspaceEdit::new(changes))
    }

    /// Send everything collected to the client.
    ///
    /// Returns whether the client applied the edit; `false` when there was
    /// nothing to apply.
    pub async fn flush(&self, client: &Client) -> bool {
        for notice in self.take_notices() {
            let message_type = match notice.level {
                NoticeLevel::Info => MessageType::INFO,
                NoticeLevel::Error => MessageType::ERROR,
            };
            client.show_message(message_type, notice.message).await;
        }

        let Some(edit) = self.take_workspace_edit() else {
            return false;
        };

        match client.apply_edit(edit).await {
            Ok(response) => {
                if !response.applied {
                    log::warn!(
                        "Client rejected edit for {}: {}",
                        self.uri.as_str(),
                        response.failure_reason.as_deref().unwrap_or("no reason given")
                    );
                }
                response.applied
            }
            Err(err) => {
                log::warn!("workspace/applyEdit failed for {}: {}", self.uri.as_str(), err);
                false
            }
        }
    }

    fn render_for(&self, snippet: &str, range: Range) -> String {
        let selected_text = self.document.text_in(range).unwrap_or_default();
        let indent = self
            .document
            .line_text(range.start.line)
            .map(line_indent)
            .unwrap_or_default();
        render_snippet(
            snippet,
            SnippetContext {
                selected_text,
                indent,
            },
        )
    }
}

impl EditorHost for LspEditor {
    fn notify(&self, notice: Notice) {
        if let Ok(mut pending) = self.pending.lock().recover_poison("LspEditor::notify") {
            pending.notices.push(notice);
        }
    }

    /// There is no request for free-form user input in LSP.
    async fn prompt_abbreviation(&self) -> Option<String> {
        log::debug!("Abbreviation prompt is unavailable; pass an abbreviation argument");
        None
    }

    async fn insert_snippet(&self, snippet: String, ranges: Vec<Range>) -> bool {
        let edits: Vec<TextEdit> = ranges
            .into_iter()
            .map(|range| TextEdit::new(range, self.render_for(&snippet, range)))
            .collect();

        match self.pending.lock().recover_poison("LspEditor::insert_snippet") {
            Ok(mut pending) => {
                pending.edits.extend(edits);
                true
            }
            Err(_) => false,
        }
    }
}
