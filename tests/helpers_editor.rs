//! In-memory editor host and scripted engine for driving the commands
//! through the public API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use emmet_lsp::engine::{EngineError, ExpandOptions};
use emmet_lsp::{
    CommandContext, EditorHost, EditorSnapshot, EmmetSettings, ExpansionEngine, Notice,
    Selection, TextDocument, TreeSitterParser,
};
use tower_lsp_server::ls_types::{Position, Range};

/// Records everything the commands ask of the editor.
#[derive(Default)]
pub struct RecordingHost {
    pub prompt: Option<String>,
    pub notices: Mutex<Vec<Notice>>,
    pub insertions: Mutex<Vec<(String, Vec<Range>)>>,
}

impl RecordingHost {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn insertions(&self) -> Vec<(String, Vec<Range>)> {
        self.insertions.lock().unwrap().clone()
    }

    /// Every inserted range, in insertion order.
    pub fn inserted_ranges(&self) -> Vec<Range> {
        self.insertions()
            .into_iter()
            .flat_map(|(_, ranges)| ranges)
            .collect()
    }
}

impl EditorHost for RecordingHost {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }

    async fn prompt_abbreviation(&self) -> Option<String> {
        self.prompt.clone()
    }

    async fn insert_snippet(&self, snippet: String, ranges: Vec<Range>) -> bool {
        self.insertions.lock().unwrap().push((snippet, ranges));
        true
    }
}

/// Engine answering from a table, recording the options of each call.
///
/// Abbreviations missing from the table fail to expand.
#[derive(Default)]
pub struct ScriptedEngine {
    pub outputs: HashMap<String, String>,
    pub calls: Mutex<Vec<(String, ExpandOptions)>>,
}

impl ScriptedEngine {
    pub fn with(outputs: &[(&str, &str)]) -> Self {
        Self {
            outputs: outputs
                .iter()
                .map(|(a, o)| (a.to_string(), o.to_string()))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, ExpandOptions)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ExpansionEngine for ScriptedEngine {
    fn expand(&self, abbreviation: &str, options: &ExpandOptions) -> Result<String, EngineError> {
        self.calls
            .lock()
            .unwrap()
            .push((abbreviation.to_string(), options.clone()));
        self.outputs
            .get(abbreviation)
            .cloned()
            .ok_or(EngineError::Unavailable)
    }
}

/// Host, engine and settings for one command run.
pub struct Fixture {
    pub host: Arc<RecordingHost>,
    pub engine: ScriptedEngine,
    pub settings: EmmetSettings,
    pub parser: TreeSitterParser,
}

impl Fixture {
    pub fn new(outputs: &[(&str, &str)]) -> Self {
        Self {
            host: Arc::new(RecordingHost::default()),
            engine: ScriptedEngine::with(outputs),
            settings: EmmetSettings::default(),
            parser: TreeSitterParser::new(),
        }
    }

    pub fn context(&self) -> CommandContext<'_, RecordingHost, TreeSitterParser, ScriptedEngine> {
        CommandContext {
            host: &self.host,
            parser: &self.parser,
            engine: &self.engine,
            settings: &self.settings,
        }
    }
}

pub fn pos(line: u32, character: u32) -> Position {
    Position::new(line, character)
}

pub fn range(start: (u32, u32), end: (u32, u32)) -> Range {
    Range::new(pos(start.0, start.1), pos(end.0, end.1))
}

pub fn editor(text: &str, language: &str, selections: Vec<Selection>) -> EditorSnapshot {
    EditorSnapshot::new(TextDocument::new(text, language), selections)
}

pub fn cursors(positions: &[(u32, u32)]) -> Vec<Selection> {
    positions
        .iter()
        .map(|(line, character)| Selection::cursor(pos(*line, *character)))
        .collect()
}
