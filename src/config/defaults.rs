//! Default configuration values for emmet-lsp.
//!
//! These form the lowest-precedence settings layer.

use super::settings::EmmetConfig;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Returns the default settings layer.
pub fn default_settings() -> EmmetConfig {
    EmmetConfig {
        syntax_profiles: Some(Map::new()),
        variables: Some(default_variables()),
        exclude_languages: Some(Vec::new()),
        include_languages: Some(default_include_languages()),
        engine: None,
    }
}

/// Variables every expansion sees unless the user overrides them.
pub fn default_variables() -> Map<String, Value> {
    let mut variables = Map::new();
    variables.insert("lang".to_string(), Value::String("en".to_string()));
    variables.insert("charset".to_string(), Value::String("UTF-8".to_string()));
    variables
}

/// Languages that expand as another language mode out of the box.
pub fn default_include_languages() -> HashMap<String, String> {
    [("handlebars", "html"), ("php", "html")]
        .into_iter()
        .map(|(language, mode)| (language.to_string(), mode.to_string()))
        .collect()
}
