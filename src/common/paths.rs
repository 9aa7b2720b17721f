//! Configuration file locations

use std::path::PathBuf;

/// Application name used for platform directories
const APP_NAME: &str = "signal-sim";

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/signal-sim/`
/// - macOS: `~/Library/Application Support/signal-sim/`
/// - Windows: `%APPDATA%\signal-sim\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}
