//! Settings state of the running server.
//!
//! The resolved settings and the engine built from them are swapped together
//! whenever configuration changes, so a command always sees a consistent pair.
//! Commands load one snapshot at start and keep it for their whole run.

use arc_swap::ArcSwap;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use tower_lsp_server::ls_types::ClientCapabilities;

use crate::config::EmmetSettings;
use crate::engine::ConfiguredEngine;

/// Settings together with the engine they configure.
pub(crate) struct ActiveSettings {
    pub(crate) settings: EmmetSettings,
    pub(crate) engine: ConfiguredEngine,
}

impl ActiveSettings {
    pub(crate) fn new(settings: EmmetSettings) -> Self {
        let engine = ConfiguredEngine::from_settings(&settings);
        Self { settings, engine }
    }
}

pub(crate) struct SettingsManager {
    root_path: ArcSwap<Option<PathBuf>>,
    active: ArcSwap<ActiveSettings>,
    /// Set once during initialize()
    client_capabilities: OnceLock<ClientCapabilities>,
}

impl std::fmt::Debug for SettingsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsManager")
            .field("root_path", &"ArcSwap<Option<PathBuf>>")
            .field("active", &"ArcSwap<ActiveSettings>")
            .field("client_capabilities", &"OnceLock<ClientCapabilities>")
            .finish()
    }
}

impl Default for SettingsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsManager {
    pub(crate) fn new() -> Self {
        Self {
            root_path: ArcSwap::new(Arc::new(None)),
            active: ArcSwap::new(Arc::new(ActiveSettings::new(EmmetSettings::default()))),
            client_capabilities: OnceLock::new(),
        }
    }

    /// Later calls are ignored; initialize() happens once per session.
    pub(crate) fn set_capabilities(&self, caps: ClientCapabilities) {
        let _ = self.client_capabilities.set(caps);
    }

    pub(crate) fn set_root_path(&self, path: Option<PathBuf>) {
        self.root_path.store(Arc::new(path));
    }

    pub(crate) fn root_path(&self) -> Arc<Option<PathBuf>> {
        self.root_path.load_full()
    }

    pub(crate) fn load(&self) -> Arc<ActiveSettings> {
        self.active.load_full()
    }

    pub(crate) fn apply_settings(&self, settings: EmmetSettings) {
        self.active.store(Arc::new(ActiveSettings::new(settings)));
    }

    /// Returns true unless the client declared it cannot apply workspace edits.
    ///
    /// Before initialize() nothing is known, and edits are attempted.
    pub(crate) fn supports_apply_edit(&self) -> bool {
        self.client_capabilities
            .get()
            .and_then(|caps| caps.workspace.as_ref())
            .and_then(|ws| ws.apply_edit)
            .unwrap_or(true)
    }
}
