pub mod abbreviation;
pub mod commands;
pub mod config;
pub mod document;
pub mod editor;
pub mod engine;
pub mod error;
pub mod lsp;
pub mod syntax;
pub mod text;

pub use commands::{CommandContext, WrapArgs, expand_abbreviation, wrap_with_abbreviation};
pub use config::EmmetSettings;
pub use document::{EditorSnapshot, Selection, TextDocument, TreeSitterParser};
pub use editor::{EditorHost, Notice, NoticeLevel};
pub use engine::{ConfiguredEngine, ExpansionEngine};
pub use error::{EmmetError, EmmetResult};

// Re-export the main server implementation
pub use lsp::EmmetLs;
