//! Platform-specific configuration paths.
//!
//! - **Linux**: `~/.config/roomtone/`
//! - **macOS**: `~/Library/Application Support/roomtone/`
//! - **Windows**: `%APPDATA%\roomtone\`

use std::path::PathBuf;

/// Application name used for directory paths.
const APP_NAME: &str = "roomtone";

/// Config file name looked up by default.
const CONFIG_FILE: &str = "roomtone.toml";

/// Returns the user-specific configuration directory.
///
/// Falls back to the current directory if the platform config directory
/// cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the default path of the user's `roomtone.toml`.
pub fn default_config_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE)
}

/// Creates the user configuration directory if needed and returns it.
pub fn ensure_user_config_dir() -> std::io::Result<PathBuf> {
    let dir = user_config_dir();
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
