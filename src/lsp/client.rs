//! Client-facing log messages.

use tower_lsp_server::Client;
use tower_lsp_server::ls_types::MessageType;

use crate::lsp::{SettingsEvent, SettingsEventKind};

/// Wrapper around the LSP client for `window/logMessage` traffic.
#[derive(Clone, Debug)]
pub(crate) struct ClientNotifier {
    client: Client,
}

impl ClientNotifier {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    pub(crate) async fn log(&self, level: MessageType, message: impl Into<String>) {
        self.client.log_message(level, message.into()).await;
    }

    pub(crate) async fn log_info(&self, message: impl Into<String>) {
        self.log(MessageType::INFO, message).await;
    }

    pub(crate) async fn log_warning(&self, message: impl Into<String>) {
        self.log(MessageType::WARNING, message).await;
    }

    pub(crate) async fn log_settings_events(&self, events: &[SettingsEvent]) {
        for event in events {
            self.log(settings_event_level(event.kind), event.message.clone())
                .await;
        }
    }
}

pub(crate) fn settings_event_level(kind: SettingsEventKind) -> MessageType {
    match kind {
        SettingsEventKind::Info => MessageType::INFO,
        SettingsEventKind::Warning => MessageType::WARNING,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_event_levels() {
        assert_eq!(settings_event_level(SettingsEventKind::Info), MessageType::INFO);
        assert_eq!(
            settings_event_level(SettingsEventKind::Warning),
            MessageType::WARNING
        );
    }
}
