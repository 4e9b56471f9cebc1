//! Expanding the abbreviations of every cursor in one command invocation.

use std::sync::Arc;

use tokio::task::JoinSet;
use tower_lsp_server::ls_types::{Position, Range};

use super::expand::expand_one;
use crate::config::EmmetSettings;
use crate::document::{Selection, TextDocument};
use crate::editor::EditorHost;
use crate::engine::{ExpansionEngine, SELECTED_TEXT_PLACEHOLDER};
use crate::syntax::Dialect;
use crate::text::utf16_len;

/// One abbreviation to expand, and the range its expansion replaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionRequest {
    pub dialect: Dialect,
    pub abbreviation: String,
    pub range: Range,
    /// Text passed to the engine for wrapping, `None` for plain expansion
    pub wrap_text: Option<String>,
}

impl ExpansionRequest {
    pub fn new(dialect: Dialect, abbreviation: impl Into<String>, range: Range) -> Self {
        Self {
            dialect,
            abbreviation: abbreviation.into(),
            range,
            wrap_text: None,
        }
    }

    pub fn wrapping(
        dialect: Dialect,
        abbreviation: impl Into<String>,
        range: Range,
        wrap_text: impl Into<String>,
    ) -> Self {
        Self {
            wrap_text: Some(wrap_text.into()),
            ..Self::new(dialect, abbreviation, range)
        }
    }

    fn expands_like(&self, other: &ExpansionRequest) -> bool {
        self.dialect == other.dialect
            && self.abbreviation == other.abbreviation
            && self.wrap_text == other.wrap_text
    }
}

/// The requests of one invocation, in cursor order.
#[derive(Debug, Clone, Default)]
pub struct ExpansionBatch {
    requests: Vec<ExpansionRequest>,
    uniform: bool,
}

impl ExpansionBatch {
    /// A batch is uniform when every request would expand to the same snippet,
    /// in which case a single multi-range insertion keeps every cursor alive.
    pub fn new(requests: Vec<ExpansionRequest>) -> Self {
        let uniform = match requests.split_first() {
            Some((first, rest)) => rest.iter().all(|r| r.expands_like(first)),
            None => true,
        };
        Self { requests, uniform }
    }

    pub fn requests(&self) -> &[ExpansionRequest] {
        &self.requests
    }

    pub fn is_uniform(&self) -> bool {
        self.uniform
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }
}

/// Expand every request of `batch` and insert the results.
///
/// Returns `None` for an empty batch, otherwise whether any insertion was
/// applied. A uniform batch is expanded once and inserted at all ranges in
/// a single call. Otherwise each request is expanded separately and the
/// insertions run concurrently; one failing does not undo the others.
pub async fn expand_all<H, E>(
    batch: ExpansionBatch,
    host: &Arc<H>,
    engine: &E,
    settings: &EmmetSettings,
) -> Option<bool>
where
    H: EditorHost,
    E: ExpansionEngine + ?Sized,
{
    let first = batch.requests.first()?;

    if batch.uniform {
        let Some(snippet) = expand_one(first, engine, settings, host.as_ref()) else {
            return Some(false);
        };
        let ranges = batch.requests.iter().map(|r| r.range).collect();
        return Some(host.insert_snippet(snippet, ranges).await);
    }

    log::debug!(
        "Expanding {} differing abbreviations independently",
        batch.len()
    );

    let mut insertions = JoinSet::new();
    for request in &batch.requests {
        let Some(snippet) = expand_one(request, engine, settings, host.as_ref()) else {
            continue;
        };
        let host = Arc::clone(host);
        let range = request.range;
        insertions.spawn(async move { host.insert_snippet(snippet, vec![range]).await });
    }

    let mut applied = false;
    while let Some(result) = insertions.join_next().await {
        match result {
            Ok(inserted) => applied |= inserted,
            Err(err) => log::warn!("Snippet insertion task failed: {}", err),
        }
    }
    Some(applied)
}

/// The range a wrap replaces for one selection.
///
/// An empty selection stands for its whole line. Whitespace at either end of
/// the range is left outside the wrap unless the range holds nothing else.
pub fn prepare_wrap_range(document: &TextDocument, selection: &Selection) -> Range {
    let mut range = selection.range();
    if range.start == range.end {
        let line = range.start.line;
        let width = document.line_text(line).map(utf16_len).unwrap_or(0);
        range = Range::new(Position::new(line, 0), Position::new(line, width));
    }

    trim_range(document, range).unwrap_or(range)
}

fn trim_range(document: &TextDocument, range: Range) -> Option<Range> {
    let mapper = document.mapper();
    let start = mapper.position_to_byte(range.start)?;
    let end = mapper.position_to_byte(range.end)?;
    let text = document.text().get(start..end)?;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(range);
    }

    let leading = text.len() - text.trim_start().len();
    let trailing = text.len() - text.trim_end().len();
    mapper.byte_range_to_range(start + leading, end - trailing)
}

/// Wrap text for a range: multi-line content goes on its own indented line.
pub fn wrap_text_for(range: &Range) -> String {
    if range.start.line == range.end.line {
        SELECTED_TEXT_PLACEHOLDER.to_string()
    } else {
        format!("\n\t{}\n", SELECTED_TEXT_PLACEHOLDER)
    }
}
