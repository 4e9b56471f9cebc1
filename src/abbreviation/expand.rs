use regex::{NoExpand, Regex};
use serde_json::Value;
use std::sync::LazyLock;

use super::orchestrator::ExpansionRequest;
use crate::config::EmmetSettings;
use crate::editor::{EXPANSION_FAILED, EditorHost, Notice};
use crate::engine::{ExpansionEngine, SELECTED_TEXT_PLACEHOLDER, get_expand_options};

static PADDED_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\$TM_SELECTED_TEXT\s*").expect("valid regex"));

/// Expand a single request into snippet text.
///
/// Engine failures are reported to the user and yield `None`; an empty
/// expansion also yields `None` since there is nothing to insert.
pub fn expand_one<E, H>(
    request: &ExpansionRequest,
    engine: &E,
    settings: &EmmetSettings,
    host: &H,
) -> Option<String>
where
    E: ExpansionEngine + ?Sized,
    H: EditorHost,
{
    let wrap_text = request.wrap_text.as_deref();
    let mut options = get_expand_options(
        &settings.syntax_profiles,
        &settings.variables,
        request.dialect,
        wrap_text,
    );

    if wrap_text.is_some_and(|text| text.contains('\n')) {
        options
            .profile
            .insert("inlineBreak".to_string(), Value::from(1));
    }

    let expanded = match engine.expand(&request.abbreviation, &options) {
        Ok(expanded) => expanded,
        Err(err) => {
            log::error!(
                "Failed to expand '{}' as {}: {}",
                request.abbreviation,
                request.dialect,
                err
            );
            host.notify(Notice::error(EXPANSION_FAILED));
            return None;
        }
    };

    if expanded.is_empty() {
        log::debug!("Expansion of '{}' produced no text", request.abbreviation);
        return None;
    }

    if wrap_text.is_some() && !expanded.contains('\n') {
        return Some(
            PADDED_PLACEHOLDER
                .replace(&expanded, NoExpand(SELECTED_TEXT_PLACEHOLDER))
                .into_owned(),
        );
    }

    Some(expanded)
}
