//! workspace/executeCommand for the Emmet commands.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tower_lsp_server::jsonrpc::{Error, Result};
use tower_lsp_server::ls_types::{ExecuteCommandParams, MessageType, TextDocumentIdentifier};

use super::{EmmetLs, uri_to_url};
use crate::commands::{CommandContext, WrapArgs, expand_abbreviation, wrap_with_abbreviation};
use crate::document::{EditorSnapshot, Selection};
use crate::editor::NO_ACTIVE_EDITOR;
use crate::error::{EmmetError, EmmetResult};
use crate::lsp::LspEditor;
use crate::syntax::LanguageArgs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EmmetCommand {
    ExpandAbbreviation,
    WrapWithAbbreviation,
}

impl EmmetCommand {
    pub(crate) const ALL: [EmmetCommand; 2] = [
        EmmetCommand::ExpandAbbreviation,
        EmmetCommand::WrapWithAbbreviation,
    ];

    pub(crate) fn name(self) -> &'static str {
        match self {
            EmmetCommand::ExpandAbbreviation => "emmet.expandAbbreviation",
            EmmetCommand::WrapWithAbbreviation => "emmet.wrapWithAbbreviation",
        }
    }

    pub(crate) fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.name() == name)
    }
}

/// The single argument object both commands take.
///
/// ```json
/// {
///   "textDocument": { "uri": "file:///index.html" },
///   "selections": [{ "anchor": { "line": 0, "character": 2 }, "active": { "line": 0, "character": 2 } }],
///   "language": "html",
///   "parentMode": "html",
///   "abbreviation": "div.wrapper"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommandArguments {
    #[serde(default)]
    pub(crate) text_document: Option<TextDocumentIdentifier>,
    #[serde(default)]
    pub(crate) selections: Vec<Selection>,
    #[serde(flatten)]
    pub(crate) language: LanguageArgs,
    #[serde(flatten)]
    pub(crate) wrap: WrapArgs,
}

impl CommandArguments {
    /// Read the first command argument; no arguments at all means no editor.
    pub(crate) fn from_arguments(arguments: Vec<Value>) -> EmmetResult<Self> {
        match arguments.into_iter().next() {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(value @ Value::Object(_)) => Ok(serde_json::from_value(value)?),
            Some(other) => Err(EmmetError::invalid_arguments(format!(
                "expected an object, got {}",
                other
            ))),
        }
    }
}

impl EmmetLs {
    pub(crate) async fn execute_command_impl(
        &self,
        params: ExecuteCommandParams,
    ) -> Result<Option<Value>> {
        let Some(command) = EmmetCommand::from_name(&params.command) else {
            self.notifier()
                .log_warning(format!("Unknown command: {}", params.command))
                .await;
            return Ok(None);
        };

        let args = CommandArguments::from_arguments(params.arguments).map_err(|e| {
            log::warn!("{}: {}", command.name(), e);
            Error::invalid_params(e.to_string())
        })?;

        let Some((uri, snapshot)) = self.editor_snapshot(&args) else {
            self.client
                .show_message(MessageType::INFO, NO_ACTIVE_EDITOR)
                .await;
            return Ok(None);
        };

        let active = self.settings.load();
        let host = Arc::new(LspEditor::new(uri, snapshot.document.clone()));
        let parser = self.parser;

        // Parsing and the engine process block; keep them off the async workers
        let task_host = Arc::clone(&host);
        let task = tokio::task::spawn_blocking(move || {
            let ctx = CommandContext {
                host: &task_host,
                parser: &parser,
                engine: &active.engine,
                settings: &active.settings,
            };
            let run = async {
                match command {
                    EmmetCommand::ExpandAbbreviation => {
                        expand_abbreviation(&ctx, Some(&snapshot), &args.language).await
                    }
                    EmmetCommand::WrapWithAbbreviation => {
                        wrap_with_abbreviation(&ctx, Some(&snapshot), &args.wrap).await
                    }
                }
            };
            tokio::runtime::Handle::current().block_on(run)
        });

        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("{} task failed: {}", command.name(), e);
                None
            }
        };

        if !self.settings.supports_apply_edit() && host.take_workspace_edit().is_some() {
            log::warn!("Dropping {} edit: client cannot apply edits", command.name());
        }
        let applied = host.flush(&self.client).await;

        Ok(outcome.map(|inserted| Value::Bool(inserted && applied)))
    }

    /// The document named by the arguments with the requested selections.
    ///
    /// `None` when no document was named or it is not open.
    fn editor_snapshot(
        &self,
        args: &CommandArguments,
    ) -> Option<(tower_lsp_server::ls_types::Uri, EditorSnapshot)> {
        let text_document = args.text_document.as_ref()?;
        let url = uri_to_url(&text_document.uri).ok()?;
        let Some(document) = self.documents.snapshot(&url) else {
            log::debug!("Command for unopened document: {}", url);
            return None;
        };

        Some((
            text_document.uri.clone(),
            EditorSnapshot::new(document, args.selections.clone()),
        ))
    }
}
