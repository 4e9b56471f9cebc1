//! User configuration location for emmet-lsp.
//!
//! User config location: $XDG_CONFIG_HOME/emmet-lsp/emmet-lsp.toml
//! Fallback: the platform configuration directory (`dirs::config_dir`).

use std::path::{Path, PathBuf};

use super::EmmetConfig;
use crate::error::EmmetResult;

pub const CONFIG_FILE_NAME: &str = "emmet-lsp.toml";
const CONFIG_DIR_NAME: &str = "emmet-lsp";

/// Returns the path to the user configuration file.
///
/// Returns None if neither $XDG_CONFIG_HOME nor a platform config directory
/// is available.
pub fn user_config_path() -> Option<PathBuf> {
    let xdg = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
    user_config_path_from(xdg.as_deref(), dirs::config_dir().as_deref())
}

fn user_config_path_from(xdg_config_home: Option<&Path>, config_dir: Option<&Path>) -> Option<PathBuf> {
    xdg_config_home
        .filter(|p| !p.as_os_str().is_empty())
        .or(config_dir)
        .map(|base| base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Path of the project configuration file under a workspace root
pub fn project_config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Load the user configuration file.
///
/// A missing file is `Ok(None)`; an unreadable or malformed one is an error.
pub fn load_user_config() -> EmmetResult<Option<EmmetConfig>> {
    match user_config_path() {
        Some(path) => load_config_file(&path),
        None => Ok(None),
    }
}

/// Load a TOML configuration file, `Ok(None)` when it does not exist.
pub fn load_config_file(path: &Path) -> EmmetResult<Option<EmmetConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(Some(toml::from_str(&contents)?))
}
