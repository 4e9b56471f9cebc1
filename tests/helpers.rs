//! Shared test helpers for integration tests.

#![allow(dead_code)]

#[path = "helpers_lsp_client.rs"]
pub mod lsp_client;

#[path = "helpers_editor.rs"]
pub mod editor;
