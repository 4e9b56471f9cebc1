use serde::{Deserialize, Serialize};
use tower_lsp_server::ls_types::{Position, Range};

/// One cursor or selection of the editor.
///
/// `anchor` is where the selection started and `active` is where the caret
/// is; the selection is reversed when the caret sits before the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Position,
    pub active: Position,
}

impl Selection {
    pub fn new(anchor: Position, active: Position) -> Self {
        Self { anchor, active }
    }

    /// A collapsed selection (plain cursor)
    pub fn cursor(position: Position) -> Self {
        Self::new(position, position)
    }

    pub fn is_reversed(&self) -> bool {
        self.active < self.anchor
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    /// The selected range in document order
    pub fn range(&self) -> Range {
        if self.is_reversed() {
            Range::new(self.active, self.anchor)
        } else {
            Range::new(self.anchor, self.active)
        }
    }

    /// Position an abbreviation is looked up at: the later end of the selection
    pub fn position(&self) -> Position {
        if self.is_reversed() {
            self.anchor
        } else {
            self.active
        }
    }
}
