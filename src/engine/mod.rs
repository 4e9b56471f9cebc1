//! The abbreviation expansion engine and the options it is called with.
//!
//! The grammar of abbreviations lives entirely behind [`ExpansionEngine`];
//! this crate only decides *what* to expand, *where*, and *with which options*.

mod command;

pub use command::CommandEngine;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::EmmetSettings;
use crate::config::defaults::default_variables;
use crate::syntax::Dialect;

/// Placeholder the wrapped text is substituted for in a wrap expansion
pub const SELECTED_TEXT_PLACEHOLDER: &str = "$TM_SELECTED_TEXT";

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no expansion engine is configured")]
    Unavailable,

    #[error("failed to run expansion engine: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("failed to encode engine request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("expansion engine exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("expansion engine produced output that is not UTF-8")]
    InvalidOutput,

    #[error("cannot expand '{abbreviation}': {message}")]
    Rejected {
        abbreviation: String,
        message: String,
    },
}

/// Options passed to the engine alongside the abbreviation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandOptions {
    pub syntax: Dialect,
    pub profile: Map<String, Value>,
    pub variables: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addons: Option<Map<String, Value>>,
    /// Text the expansion wraps, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Turns abbreviations into TextMate snippets.
pub trait ExpansionEngine: Send + Sync {
    fn expand(&self, abbreviation: &str, options: &ExpandOptions) -> Result<String, EngineError>;
}

/// Engine used when none is configured; every expansion fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEngine;

impl ExpansionEngine for NoEngine {
    fn expand(&self, _abbreviation: &str, _options: &ExpandOptions) -> Result<String, EngineError> {
        Err(EngineError::Unavailable)
    }
}

/// Engine selected by the settings: the configured command, or [`NoEngine`].
pub enum ConfiguredEngine {
    Command(CommandEngine),
    Unconfigured(NoEngine),
}

impl ConfiguredEngine {
    pub fn from_settings(settings: &EmmetSettings) -> Self {
        match settings.engine.as_ref().and_then(|e| CommandEngine::new(e.command.clone())) {
            Some(engine) => ConfiguredEngine::Command(engine),
            None => ConfiguredEngine::Unconfigured(NoEngine),
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, ConfiguredEngine::Command(_))
    }
}

impl ExpansionEngine for ConfiguredEngine {
    fn expand(&self, abbreviation: &str, options: &ExpandOptions) -> Result<String, EngineError> {
        match self {
            ConfiguredEngine::Command(engine) => engine.expand(abbreviation, options),
            ConfiguredEngine::Unconfigured(engine) => engine.expand(abbreviation, options),
        }
    }
}

/// Build the engine options for a dialect.
///
/// A profile given as a string names another dialect whose profile is used.
pub fn get_expand_options(
    syntax_profiles: &Map<String, Value>,
    variables: &Map<String, Value>,
    dialect: Dialect,
    wrap_text: Option<&str>,
) -> ExpandOptions {
    let profile = match syntax_profiles.get(dialect.as_str()) {
        Some(Value::Object(profile)) => profile.clone(),
        Some(Value::String(other)) => match syntax_profiles.get(other.as_str()) {
            Some(Value::Object(profile)) => profile.clone(),
            _ => Map::new(),
        },
        _ => Map::new(),
    };

    let mut merged_variables = default_variables();
    merged_variables.extend(variables.clone());

    let addons = (dialect == Dialect::Jsx).then(|| {
        let mut addons = Map::new();
        addons.insert("jsx".to_string(), Value::Bool(true));
        addons
    });

    ExpandOptions {
        syntax: dialect,
        profile,
        variables: merged_variables,
        addons,
        text: wrap_text.map(str::to_string),
    }
}
