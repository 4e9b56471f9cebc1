mod client;
mod editor;
mod lsp_impl;
mod settings;
mod settings_manager;
pub mod snippet;
mod text_sync;

pub use editor::LspEditor;
pub use lsp_impl::EmmetLs;
pub use settings::{
    SettingsEvent, SettingsEventKind, SettingsLoadOutcome, SettingsSource, load_settings,
};
