//! Applying didChange content changes to the stored text.
//!
//! The server advertises incremental sync, but clients may still send a
//! full-document change (no range), which replaces everything before it.

use tower_lsp_server::ls_types::TextDocumentContentChangeEvent;

use crate::text::PositionMapper;

/// Apply content changes in order and return the resulting text.
///
/// Each ranged change is resolved against the text produced by the previous
/// change. Positions past the end of a line or of the document are clamped.
pub(crate) fn apply_content_changes(
    old_text: &str,
    content_changes: Vec<TextDocumentContentChangeEvent>,
) -> String {
    let mut text = old_text.to_string();

    for change in content_changes {
        match change.range {
            Some(range) => {
                let mapper = PositionMapper::new(&text);
                let start = mapper.position_to_byte(range.start).unwrap_or(text.len());
                let end = mapper
                    .position_to_byte(range.end)
                    .unwrap_or(text.len())
                    .max(start);
                text.replace_range(start..end, &change.text);
            }
            None => text = change.text,
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_lsp_server::ls_types::{Position, Range};

    fn ranged(sl: u32, sc: u32, el: u32, ec: u32, text: &str) -> TextDocumentContentChangeEvent {
        TextDocumentContentChangeEvent {
            range: Some(Range::new(Position::new(sl, sc), Position::new(el, ec))),
            range_length: None,
            text: text.to_string(),
        }
    }

    fn full(text: &str) -> TextDocumentContentChangeEvent {
        TextDocumentContentChangeEvent {
            range: None,
            range_length: None,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_incremental_change() {
        let new_text = apply_content_changes("hello world", vec![ranged(0, 6, 0, 11, "rust")]);
        assert_eq!(new_text, "hello rust");
    }

    #[test]
    fn test_full_sync_replaces_text() {
        let new_text = apply_content_changes("hello world", vec![full("completely new content")]);
        assert_eq!(new_text, "completely new content");
    }

    #[test]
    fn test_full_sync_after_incremental_wins() {
        let new_text = apply_content_changes(
            "hello world",
            vec![ranged(0, 0, 0, 5, "hi"), full("final content")],
        );
        assert_eq!(new_text, "final content");
    }

    #[test]
    fn test_changes_apply_against_running_text() {
        let new_text = apply_content_changes(
            "aaa bbb ccc",
            vec![ranged(0, 0, 0, 3, "AAA"), ranged(0, 8, 0, 11, "CCC")],
        );
        assert_eq!(new_text, "AAA bbb CCC");
    }

    #[test]
    fn test_multiline_insertion_and_utf16_columns() {
        let new_text = apply_content_changes("<p>é</p>", vec![ranged(0, 4, 0, 4, "\n  ul\n")]);
        assert_eq!(new_text, "<p>é\n  ul\n</p>");
    }
}
