//! Dialect resolution for a command invocation.
//!
//! The explicit language of the invocation (or the document's own language) is
//! looked up through the include-languages mapping and then through
//! [`get_emmet_mode`]. Embedded regions, such as a style block inside markup,
//! pass their host language as `parent_mode` so resolution can fall back to it.

use std::collections::HashMap;

use serde::Deserialize;

use super::dialect::{Dialect, get_emmet_mode};

/// Language overrides carried by a command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageArgs {
    /// Language to use instead of the document's language
    #[serde(default)]
    pub language: Option<String>,
    /// Host language to fall back to when `language` has no dialect
    #[serde(default)]
    pub parent_mode: Option<String>,
}

/// Resolve the dialect for an invocation.
///
/// An excluded language yields `None` whether or not the mapping table points
/// it somewhere else.
pub fn resolve_dialect(
    args: &LanguageArgs,
    document_language: &str,
    mapping: &HashMap<String, String>,
    excluded_languages: &[String],
) -> Option<Dialect> {
    let language = args
        .language
        .as_deref()
        .filter(|l| !l.is_empty())
        .unwrap_or(document_language);

    if is_excluded(language, excluded_languages) {
        log::debug!("Language '{}' is excluded from expansion", language);
        return None;
    }

    if let Some(dialect) = lookup(language, mapping, excluded_languages) {
        return Some(dialect);
    }

    let parent = args.parent_mode.as_deref()?;
    log::debug!(
        "No dialect for '{}', falling back to parent mode '{}'",
        language,
        parent
    );
    lookup(parent, mapping, excluded_languages)
}

fn lookup(
    language: &str,
    mapping: &HashMap<String, String>,
    excluded_languages: &[String],
) -> Option<Dialect> {
    if is_excluded(language, excluded_languages) {
        return None;
    }
    let mapped = mapping.get(language).map(String::as_str).unwrap_or(language);
    get_emmet_mode(mapped, excluded_languages)
}

fn is_excluded(language: &str, excluded_languages: &[String]) -> bool {
    excluded_languages.iter().any(|l| l == language)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_uses_document_language_without_override() {
        let dialect = resolve_dialect(&LanguageArgs::default(), "css", &HashMap::new(), &[]);
        assert_eq!(dialect, Some(Dialect::Css));
    }

    #[test]
    fn test_explicit_language_overrides_document() {
        let args = LanguageArgs {
            language: Some("scss".to_string()),
            parent_mode: None,
        };
        assert_eq!(
            resolve_dialect(&args, "html", &HashMap::new(), &[]),
            Some(Dialect::Scss)
        );
    }

    #[test]
    fn test_mapping_table_is_consulted() {
        let table = mapping(&[("vue-html", "html")]);
        assert_eq!(
            resolve_dialect(&LanguageArgs::default(), "vue-html", &table, &[]),
            Some(Dialect::Html)
        );
    }

    #[test]
    fn test_falls_back_to_mapped_parent() {
        let table = mapping(&[("razor", "html")]);
        let args = LanguageArgs {
            language: Some("csharp".to_string()),
            parent_mode: Some("razor".to_string()),
        };
        assert_eq!(resolve_dialect(&args, "razor", &table, &[]), Some(Dialect::Html));
    }

    #[test]
    fn test_excluded_language_ignores_mapping() {
        let table = mapping(&[("php", "html")]);
        let excluded = vec!["php".to_string()];
        let args = LanguageArgs {
            language: None,
            parent_mode: Some("html".to_string()),
        };
        assert_eq!(resolve_dialect(&args, "php", &table, &excluded), None);
    }

    #[test]
    fn test_excluded_mapped_target() {
        let table = mapping(&[("php", "html")]);
        let excluded = vec!["html".to_string()];
        assert_eq!(
            resolve_dialect(&LanguageArgs::default(), "php", &table, &excluded),
            None
        );
    }

    #[test]
    fn test_unresolvable_without_parent() {
        assert_eq!(
            resolve_dialect(&LanguageArgs::default(), "rust", &HashMap::new(), &[]),
            None
        );
    }

    #[test]
    fn test_empty_explicit_language_uses_document() {
        let args = LanguageArgs {
            language: Some(String::new()),
            parent_mode: None,
        };
        assert_eq!(
            resolve_dialect(&args, "less", &HashMap::new(), &[]),
            Some(Dialect::Less)
        );
    }
}
