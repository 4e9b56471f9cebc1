use std::path::PathBuf;

use tower_lsp_server::jsonrpc::Result;
use tower_lsp_server::ls_types::*;
use tower_lsp_server::{Client, LanguageServer};
use url::Url;

use super::client::ClientNotifier;
use super::settings::{SettingsSource, load_settings};
use super::settings_manager::SettingsManager;
use super::text_sync::apply_content_changes;
use crate::document::TreeSitterParser;
use crate::document::store::DocumentStore;

mod execute_command;

use execute_command::EmmetCommand;

/// Convert an LSP `Uri` into a `url::Url` for storage keys and path handling.
pub(crate) fn uri_to_url(uri: &Uri) -> std::result::Result<Url, url::ParseError> {
    Url::parse(uri.as_str())
}

pub struct EmmetLs {
    client: Client,
    documents: DocumentStore,
    settings: SettingsManager,
    parser: TreeSitterParser,
}

impl std::fmt::Debug for EmmetLs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmmetLs")
            .field("client", &self.client)
            .field("documents", &self.documents.len())
            .finish_non_exhaustive()
    }
}

impl EmmetLs {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: DocumentStore::new(),
            settings: SettingsManager::new(),
            parser: TreeSitterParser::new(),
        }
    }

    fn notifier(&self) -> ClientNotifier {
        ClientNotifier::new(self.client.clone())
    }

    /// Re-resolve every settings layer with `override_settings` on top and
    /// make the result active.
    async fn reload_settings(&self, source: SettingsSource, override_settings: serde_json::Value) {
        let root_path = self.settings.root_path();
        let outcome = load_settings(root_path.as_deref(), Some((source, override_settings)));

        let notifier = self.notifier();
        notifier.log_settings_events(&outcome.events).await;

        if let Some(settings) = outcome.settings {
            self.settings.apply_settings(settings);
        }
    }
}

#[allow(deprecated)]
fn root_path_from_params(params: &InitializeParams) -> Option<(PathBuf, &'static str)> {
    let from_uri = |uri: &Uri| uri_to_url(uri).ok()?.to_file_path().ok();

    if let Some(folder) = params.workspace_folders.as_ref().and_then(|f| f.first()) {
        return from_uri(&folder.uri).map(|path| (path, "workspace folder"));
    }

    if let Some(root_uri) = &params.root_uri {
        return from_uri(root_uri).map(|path| (path, "root_uri"));
    }

    std::env::current_dir()
        .ok()
        .map(|path| (path, "current directory"))
}

impl LanguageServer for EmmetLs {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let notifier = self.notifier();

        match root_path_from_params(&params) {
            Some((path, source)) => {
                notifier
                    .log_info(format!("Using root path from {}: {}", source, path.display()))
                    .await;
                self.settings.set_root_path(Some(path));
            }
            None => self.settings.set_root_path(None),
        }

        self.settings.set_capabilities(params.capabilities);

        let override_settings = params
            .initialization_options
            .unwrap_or(serde_json::Value::Null);
        self.reload_settings(SettingsSource::InitializationOptions, override_settings)
            .await;

        if !self.settings.supports_apply_edit() {
            notifier
                .log_warning("Client does not support workspace/applyEdit; commands cannot edit")
                .await;
        }

        Ok(InitializeResult {
            server_info: Some(ServerInfo {
                name: "emmet-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::INCREMENTAL),
                        ..Default::default()
                    },
                )),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: EmmetCommand::ALL
                        .iter()
                        .map(|command| command.name().to_string())
                        .collect(),
                    ..Default::default()
                }),
                ..ServerCapabilities::default()
            },
            ..Default::default()
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.notifier().log_info("emmet-lsp initialized").await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let document = params.text_document;
        let Ok(uri) = uri_to_url(&document.uri) else {
            log::warn!("Ignoring document with invalid URI: {}", document.uri.as_str());
            return;
        };

        self.documents.insert(
            uri,
            document.text,
            document.language_id,
            Some(document.version),
        );
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let Ok(uri) = uri_to_url(&params.text_document.uri) else {
            log::warn!(
                "Ignoring change with invalid URI: {}",
                params.text_document.uri.as_str()
            );
            return;
        };

        let Some(old_text) = self.documents.get_document_text(&uri) else {
            log::warn!("Change for unopened document: {}", uri);
            return;
        };

        let text = apply_content_changes(&old_text, params.content_changes);
        self.documents
            .update_text(&uri, text, Some(params.text_document.version));
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        if let Ok(uri) = uri_to_url(&params.text_document.uri) {
            self.documents.remove(&uri);
        }
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        self.reload_settings(SettingsSource::ClientConfiguration, params.settings)
            .await;
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> Result<Option<serde_json::Value>> {
        self.execute_command_impl(params).await
    }
}
