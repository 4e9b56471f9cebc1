pub mod defaults;
pub mod settings;
pub mod user;

pub use settings::{EmmetConfig, EngineConfig};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::syntax::is_known_language_mode;

/// Merge two settings layers, preferring values from `primary` over `fallback`.
///
/// Object-valued settings merge key by key; list and scalar settings are
/// replaced wholesale.
pub fn merge_settings(
    fallback: Option<EmmetConfig>,
    primary: Option<EmmetConfig>,
) -> Option<EmmetConfig> {
    match (fallback, primary) {
        (None, None) => None,
        (Some(settings), None) | (None, Some(settings)) => Some(settings),
        (Some(fallback), Some(primary)) => Some(EmmetConfig {
            syntax_profiles: merge_maps(fallback.syntax_profiles, primary.syntax_profiles),
            variables: merge_maps(fallback.variables, primary.variables),
            exclude_languages: primary.exclude_languages.or(fallback.exclude_languages),
            include_languages: merge_maps(fallback.include_languages, primary.include_languages),
            engine: primary.engine.or(fallback.engine),
        }),
    }
}

/// Merge layers in order; later layers take precedence.
pub fn merge_all(layers: &[Option<EmmetConfig>]) -> Option<EmmetConfig> {
    layers
        .iter()
        .cloned()
        .fold(None, |acc, layer| merge_settings(acc, layer))
}

fn merge_maps<M>(fallback: Option<M>, primary: Option<M>) -> Option<M>
where
    M: IntoIterator + Extend<<M as IntoIterator>::Item>,
{
    match (fallback, primary) {
        (Some(mut fallback), Some(primary)) => {
            fallback.extend(primary);
            Some(fallback)
        }
        (fallback, primary) => primary.or(fallback),
    }
}

/// Fully resolved settings snapshot handed to the commands.
#[derive(Debug, Clone, PartialEq)]
pub struct EmmetSettings {
    pub syntax_profiles: Map<String, Value>,
    pub variables: Map<String, Value>,
    pub exclude_languages: Vec<String>,
    pub include_languages: HashMap<String, String>,
    pub engine: Option<EngineConfig>,
}

impl Default for EmmetSettings {
    fn default() -> Self {
        defaults::default_settings().into()
    }
}

impl From<EmmetConfig> for EmmetSettings {
    fn from(config: EmmetConfig) -> Self {
        Self {
            syntax_profiles: config.syntax_profiles.unwrap_or_default(),
            variables: config.variables.unwrap_or_default(),
            exclude_languages: config.exclude_languages.unwrap_or_default(),
            include_languages: config.include_languages.unwrap_or_default(),
            engine: config.engine,
        }
    }
}

impl From<&EmmetSettings> for EmmetConfig {
    fn from(settings: &EmmetSettings) -> Self {
        Self {
            syntax_profiles: Some(settings.syntax_profiles.clone()),
            variables: Some(settings.variables.clone()),
            exclude_languages: Some(settings.exclude_languages.clone()),
            include_languages: Some(settings.include_languages.clone()),
            engine: settings.engine.clone(),
        }
    }
}

impl EmmetSettings {
    /// Language → language-mode table used by dialect resolution.
    ///
    /// Mappings whose target is not a known language mode are dropped.
    pub fn language_mapping(&self) -> HashMap<String, String> {
        self.include_languages
            .iter()
            .filter(|(_, mode)| is_known_language_mode(mode))
            .map(|(language, mode)| (language.clone(), mode.clone()))
            .collect()
    }
}
