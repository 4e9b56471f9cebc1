use tower_lsp_server::ls_types::{Position, Range};

/// Maps between LSP positions (line + UTF-16 column) and byte offsets.
///
/// Line starts are computed once on construction so repeated lookups on the
/// same snapshot stay cheap.
pub struct PositionMapper<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> PositionMapper<'a> {
    pub fn new(text: &'a str) -> Self {
        let line_starts = compute_line_starts(text);
        Self { text, line_starts }
    }

    /// Number of lines in the text (a trailing newline opens an empty last line)
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte range of a line, excluding its line terminator
    fn line_bounds(&self, line: usize) -> Option<(usize, usize)> {
        let start = *self.line_starts.get(line)?;
        let mut end = match self.line_starts.get(line + 1) {
            Some(next) => next - 1,
            None => self.text.len(),
        };
        if end > start && self.text.as_bytes()[end - 1] == b'\r' {
            end -= 1;
        }
        Some((start, end))
    }

    /// Text of a line without its line terminator
    pub fn line_text(&self, line: u32) -> Option<&'a str> {
        let (start, end) = self.line_bounds(line as usize)?;
        Some(&self.text[start..end])
    }

    /// Convert LSP Position to byte offset in the document.
    ///
    /// Columns past the end of the line clamp to the line end.
    pub fn position_to_byte(&self, position: Position) -> Option<usize> {
        let (line_start, line_end) = self.line_bounds(position.line as usize)?;
        let line_text = &self.text[line_start..line_end];

        match convert_utf16_to_byte_in_line(line_text, position.character as usize) {
            Some(byte_offset) => Some(line_start + byte_offset),
            None => Some(line_end),
        }
    }

    /// Convert byte offset to LSP Position
    pub fn byte_to_position(&self, offset: usize) -> Option<Position> {
        if offset > self.text.len() {
            return None;
        }
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        let (line_start, line_end) = self.line_bounds(line)?;
        let line_text = &self.text[line_start..line_end];
        let line_offset = offset.saturating_sub(line_start).min(line_text.len());

        // Offsets inside a multi-byte character snap back to its start
        let mut valid_offset = line_offset;
        let character = loop {
            if let Some(utf16) = convert_byte_to_utf16_in_line(line_text, valid_offset) {
                break utf16;
            }
            if valid_offset == 0 {
                break 0;
            }
            valid_offset -= 1;
        };

        Some(Position::new(line as u32, character as u32))
    }

    /// Convert byte range to LSP Range
    pub fn byte_range_to_range(&self, start: usize, end: usize) -> Option<Range> {
        let start = self.byte_to_position(start)?;
        let end = self.byte_to_position(end)?;
        Some(Range::new(start, end))
    }

    /// Text covered by an LSP range, or None when either end is out of bounds
    pub fn range_text(&self, range: Range) -> Option<&'a str> {
        let start = self.position_to_byte(range.start)?;
        let end = self.position_to_byte(range.end)?;
        self.text.get(start.min(end)..end.max(start))
    }
}

/// Compute line start offsets for efficient position mapping
pub fn compute_line_starts(text: &str) -> Vec<usize> {
    let mut line_starts = vec![0];
    line_starts.extend(
        text.bytes()
            .enumerate()
            .filter(|(_, b)| *b == b'\n')
            .map(|(i, _)| i + 1),
    );
    line_starts
}

/// Convert UTF-16 position to byte position within a line.
/// Returns None if the UTF-16 position is beyond the end of the line.
#[inline(always)]
pub fn convert_utf16_to_byte_in_line(line_text: &str, utf16_pos: usize) -> Option<usize> {
    let mut byte_offset = 0;
    let mut utf16_offset = 0;

    for ch in line_text.chars() {
        if utf16_offset >= utf16_pos {
            return Some(byte_offset);
        }
        utf16_offset += ch.len_utf16();
        byte_offset += ch.len_utf8();
    }

    if utf16_offset >= utf16_pos {
        Some(byte_offset)
    } else {
        None
    }
}

/// Convert byte position to UTF-16 position within a line.
/// Returns None if the byte position splits a multi-byte character or is past the line.
#[inline(always)]
pub fn convert_byte_to_utf16_in_line(line_text: &str, byte_pos: usize) -> Option<usize> {
    if byte_pos > line_text.len() || !line_text.is_char_boundary(byte_pos) {
        return None;
    }
    Some(line_text[..byte_pos].encode_utf16().count())
}

/// Whether `position` lies within `range`, both ends included
pub fn range_contains(range: &Range, position: Position) -> bool {
    range.start <= position && position <= range.end
}

/// Whether `position` lies strictly between the ends of `range`
pub fn range_strictly_contains(range: &Range, position: Position) -> bool {
    range.start < position && position < range.end
}

/// Length of a string in UTF-16 code units
pub fn utf16_len(text: &str) -> u32 {
    text.encode_utf16().count() as u32
}
