//! The editor platform as seen by the commands.
//!
//! Commands never talk to a concrete editor. They report user-visible notices,
//! ask for an abbreviation when wrapping, and insert snippets through an
//! [`EditorHost`]. The language server provides one implementation; tests
//! provide recording ones.

use std::future::Future;

use tower_lsp_server::ls_types::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A non-blocking, user-visible message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

pub const NO_ACTIVE_EDITOR: &str = "No editor is active.";
pub const INVALID_ABBREVIATION: &str = "Emmet: Invalid abbreviation";
pub const EXPANSION_FAILED: &str = "Failed to expand abbreviation";

/// Editor operations the commands depend on.
///
/// Insertion futures must be `Send` because independent insertions run
/// concurrently on a tokio `JoinSet`.
pub trait EditorHost: Send + Sync + 'static {
    /// Show a notice to the user. Must not block.
    fn notify(&self, notice: Notice);

    /// Ask the user for an abbreviation; `None` when the prompt is dismissed.
    fn prompt_abbreviation(&self) -> impl Future<Output = Option<String>> + Send;

    /// Replace every range with `snippet`.
    ///
    /// The snippet uses TextMate syntax (`$1`, `${1:default}`, `$TM_SELECTED_TEXT`).
    /// All ranges are in the coordinates of the snapshot the command started
    /// from. Returns whether the edit was applied.
    fn insert_snippet(
        &self,
        snippet: String,
        ranges: Vec<Range>,
    ) -> impl Future<Output = bool> + Send;
}
