//! Expansion dialects and the language → dialect lookup.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static JSX_LANGUAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(typescriptreact|javascriptreact|jsx-tags)\b").expect("valid regex")
});

/// The grammar variant an abbreviation is interpreted in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Html,
    Xml,
    Xsl,
    Jsx,
    Pug,
    Slim,
    Haml,
    Css,
    Scss,
    Sass,
    Less,
    Stylus,
}

impl Dialect {
    pub const ALL: [Dialect; 12] = [
        Dialect::Html,
        Dialect::Xml,
        Dialect::Xsl,
        Dialect::Jsx,
        Dialect::Pug,
        Dialect::Slim,
        Dialect::Haml,
        Dialect::Css,
        Dialect::Scss,
        Dialect::Sass,
        Dialect::Less,
        Dialect::Stylus,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Html => "html",
            Dialect::Xml => "xml",
            Dialect::Xsl => "xsl",
            Dialect::Jsx => "jsx",
            Dialect::Pug => "pug",
            Dialect::Slim => "slim",
            Dialect::Haml => "haml",
            Dialect::Css => "css",
            Dialect::Scss => "scss",
            Dialect::Sass => "sass",
            Dialect::Less => "less",
            Dialect::Stylus => "stylus",
        }
    }

    pub fn is_stylesheet(self) -> bool {
        matches!(
            self,
            Dialect::Css | Dialect::Scss | Dialect::Sass | Dialect::Less | Dialect::Stylus
        )
    }

    /// Tag-based markup, where a typed `<name` is an unfinished opening tag.
    pub fn is_markup(self) -> bool {
        matches!(
            self,
            Dialect::Html | Dialect::Xml | Dialect::Xsl | Dialect::Jsx
        )
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDialect(pub String);

impl fmt::Display for UnknownDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown dialect: {}", self.0)
    }
}

impl std::error::Error for UnknownDialect {}

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| UnknownDialect(s.to_string()))
    }
}

/// Whether a language identifier names a stylesheet language.
///
/// Used to pick the parser for a document, before any dialect is resolved.
pub fn is_stylesheet_language(language_id: &str) -> bool {
    language_id
        .parse::<Dialect>()
        .map(Dialect::is_stylesheet)
        .unwrap_or(false)
}

/// Language identifiers that may appear as targets of an include-languages mapping.
pub fn is_known_language_mode(language: &str) -> bool {
    language.parse::<Dialect>().is_ok()
        || matches!(language, "jade" | "javascriptreact" | "typescriptreact")
}

/// Map a language identifier to its dialect, honoring the exclusion list.
pub fn get_emmet_mode(language: &str, excluded_languages: &[String]) -> Option<Dialect> {
    if language.is_empty() || excluded_languages.iter().any(|l| l == language) {
        return None;
    }
    if JSX_LANGUAGE.is_match(language) {
        return Some(Dialect::Jsx);
    }
    match language {
        "sass-indented" => Some(Dialect::Sass),
        "jade" => Some(Dialect::Pug),
        _ => language.parse().ok(),
    }
}
