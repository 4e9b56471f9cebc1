use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// External program that turns an abbreviation into a snippet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Program followed by its arguments
    pub command: Vec<String>,
}

/// One layer of configuration (defaults, a file, or client settings).
///
/// Every field is optional so that layers can be merged; see
/// [`merge_settings`](super::merge_settings).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmmetConfig {
    /// Per-dialect output profiles handed to the expansion engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntax_profiles: Option<Map<String, Value>>,

    /// Variables substituted by the expansion engine (`lang`, `charset`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Map<String, Value>>,

    /// Languages in which expansion never triggers.
    ///
    /// The key keeps the historical `exlcudeLanguages` spelling so existing
    /// settings files keep working; `excludeLanguages` is accepted too.
    #[serde(
        default,
        rename = "exlcudeLanguages",
        alias = "excludeLanguages",
        skip_serializing_if = "Option::is_none"
    )]
    pub exclude_languages: Option<Vec<String>>,

    /// Extra language → language-mode mappings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_languages: Option<HashMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<EngineConfig>,
}
