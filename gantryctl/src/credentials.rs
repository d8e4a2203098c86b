//! Session token storage
//!
//! The token issued at login lives in a plain file next to the CLI
//! configuration, so every later invocation picks it up without
//! re-authenticating.

use gantry_core::{GantryError, Result};
use std::fs;
use std::path::PathBuf;

/// Path of the stored session token
fn token_path() -> Result<PathBuf> {
    let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config)
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config")
    } else {
        return Err(GantryError::Config(
            "Cannot determine config directory".to_string(),
        ));
    };

    Ok(config_dir.join("gantry").join("token"))
}

/// Load the stored session token, if any
///
/// Returns `None` when no token has been stored, the file is empty, or
/// it cannot be read; commands then run unauthenticated and the
/// control plane decides what that may do.
pub fn load_token() -> Option<String> {
    let path = token_path().ok()?;
    let raw = fs::read_to_string(path).ok()?;
    let token = raw.trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Persist the session token, creating the config directory if needed
pub fn save_token(token: &str) -> Result<()> {
    let path = token_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, token)?;

    Ok(())
}

/// Delete the stored session token
///
/// Deleting a token that was never stored is not an error.
pub fn delete_token() -> Result<()> {
    let path = token_path()?;
    match fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
