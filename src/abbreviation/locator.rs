//! Finding the abbreviation text and the range it replaces for one cursor.

use regex::Regex;
use std::sync::LazyLock;
use tower_lsp_server::ls_types::{Position, Range};

use crate::document::{Selection, TextDocument};
use crate::text::{convert_utf16_to_byte_in_line, utf16_len};

/// `<` followed by a tag name right before the cursor
static UNCLOSED_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(\w+)$").expect("valid regex"));

/// Determine the abbreviation for one cursor.
///
/// A non-empty selection is taken literally. Otherwise, in tag-based markup,
/// a typed `<name` is treated as the abbreviation `name` replacing the `<` as
/// well, so the expansion does not end up with a doubled `<`. Everything else
/// goes through [`extract_abbreviation`]. When nothing can be extracted the
/// result is an empty abbreviation at the cursor, which the validity check
/// rejects later.
pub fn locate_abbreviation(
    document: &TextDocument,
    selection: &Selection,
    position: Position,
    is_markup: bool,
) -> (Range, String) {
    if !selection.is_empty() {
        let range = selection.range();
        let text = document.text_in(range).unwrap_or_default().to_string();
        return (range, text);
    }

    if is_markup && let Some(found) = unclosed_tag_before(document, position) {
        return found;
    }

    extract_abbreviation(document, position)
        .unwrap_or_else(|| (Range::new(position, position), String::new()))
}

/// The line text up to the cursor, with the cursor column clamped to the line
fn line_prefix(document: &TextDocument, position: Position) -> Option<&str> {
    let line = document.line_text(position.line)?;
    let end = convert_utf16_to_byte_in_line(line, position.character as usize).unwrap_or(line.len());
    Some(&line[..end])
}

fn unclosed_tag_before(document: &TextDocument, position: Position) -> Option<(Range, String)> {
    let prefix = line_prefix(document, position)?;
    let captures = UNCLOSED_TAG.captures(prefix)?;
    let whole = captures.get(0)?;
    let name = captures.get(1)?.as_str();

    let range = Range::new(
        Position::new(position.line, utf16_len(&prefix[..whole.start()])),
        Position::new(position.line, utf16_len(prefix)),
    );
    Some((range, name.to_string()))
}

/// Extract the abbreviation ending at the cursor from the current line.
///
/// Scans backward from the cursor and stops at whitespace, an unbalanced
/// opening bracket, or the end of a preceding tag. Whitespace inside `{}`,
/// `[]`, `()` and inside quoted attribute values belongs to the abbreviation.
pub fn extract_abbreviation(document: &TextDocument, position: Position) -> Option<(Range, String)> {
    let prefix = line_prefix(document, position)?;
    let start = abbreviation_start(prefix);
    if start == prefix.len() {
        return None;
    }

    let range = Range::new(
        Position::new(position.line, utf16_len(&prefix[..start])),
        Position::new(position.line, utf16_len(prefix)),
    );
    Some((range, prefix[start..].to_string()))
}

fn abbreviation_start(prefix: &str) -> usize {
    let mut braces = 0usize;
    let mut brackets = 0usize;
    let mut parens = 0usize;
    let mut quote: Option<char> = None;
    let mut start = prefix.len();

    for (i, ch) in prefix.char_indices().rev() {
        if let Some(open) = quote {
            if ch == open {
                quote = None;
            }
            start = i;
            continue;
        }

        let nested = braces + brackets > 0;
        match ch {
            '"' | '\'' if nested => quote = Some(ch),
            '}' => braces += 1,
            ']' => brackets += 1,
            ')' => parens += 1,
            '{' if braces == 0 => break,
            '[' if brackets == 0 => break,
            '(' if parens == 0 => break,
            '{' => braces -= 1,
            '[' => brackets -= 1,
            '(' => parens -= 1,
            c if c.is_whitespace() && !nested && parens == 0 => break,
            '<' if !nested => break,
            '>' if !nested && closes_tag(&prefix[..i]) => break,
            _ => {}
        }
        start = i;
    }

    start
}

/// Whether a `>` following `before` ends a tag such as `<div` or `</p`
fn closes_tag(before: &str) -> bool {
    match before.rfind('<') {
        Some(lt) => {
            let tag = &before[lt + 1..];
            !tag.contains('>')
                && tag
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_alphabetic() || c == '/' || c == '!')
        }
        None => false,
    }
}
