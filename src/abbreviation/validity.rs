use regex::Regex;
use std::sync::LazyLock;

use crate::syntax::Dialect;

static STYLESHEET_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z!@#]").expect("valid regex"));
static MARKUP_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z!(\[#.]").expect("valid regex"));
static MARKUP_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z!)\]#.}\d*$]$").expect("valid regex"));

/// Cheap syntactic gate applied before an abbreviation reaches the engine.
///
/// Only the first and last characters are checked; anything that passes may
/// still be rejected by the engine itself.
pub fn is_abbreviation_valid(dialect: Dialect, abbreviation: &str) -> bool {
    if abbreviation.is_empty() {
        return false;
    }
    if dialect.is_stylesheet() {
        return STYLESHEET_START.is_match(abbreviation);
    }
    if abbreviation.starts_with('!') {
        return abbreviation.chars().all(|c| c == '!');
    }
    MARKUP_START.is_match(abbreviation) && MARKUP_END.is_match(abbreviation)
}
