//! Document snapshots, cursors and the structural tree used by the commands.

pub mod parser;
pub mod selection;
pub mod store;
pub mod syntax_tree;

pub use parser::{DocumentParser, TreeSitterParser};
pub use selection::Selection;
pub use store::DocumentStore;
pub use syntax_tree::{NodeId, NodeKind, ParsedNode, SyntaxTree};

use tower_lsp_server::ls_types::Range;

use crate::text::PositionMapper;

/// An immutable snapshot of a document's text and language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    text: String,
    language_id: String,
}

impl TextDocument {
    pub fn new(text: impl Into<String>, language_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language_id: language_id.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    pub fn mapper(&self) -> PositionMapper<'_> {
        PositionMapper::new(&self.text)
    }

    /// Text of a line without its terminator
    pub fn line_text(&self, line: u32) -> Option<&str> {
        self.mapper().line_text(line)
    }

    /// Text covered by `range`
    pub fn text_in(&self, range: Range) -> Option<&str> {
        self.mapper().range_text(range)
    }
}

/// Everything a command needs to know about the editor at invocation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSnapshot {
    pub document: TextDocument,
    pub selections: Vec<Selection>,
}

impl EditorSnapshot {
    pub fn new(document: TextDocument, selections: Vec<Selection>) -> Self {
        Self {
            document,
            selections,
        }
    }
}
