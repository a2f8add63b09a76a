//! Configuration and keypair paths
//!
//! Keypair paths may start with `~`, as Solana CLI paths usually do.
//!
//! Config lives in the platform config directory:
//! - Linux: `~/.config/rfq-check/`
//! - macOS: `~/Library/Application Support/rfq-check/`
//! - Windows: `%APPDATA%\rfq-check\`

use std::path::PathBuf;

/// Name used for the config directory
const APP_NAME: &str = "rfq-check";

/// Get the user's home directory
pub fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Expand a leading `~` to the home directory
///
/// Only the first `~` is replaced; paths without it are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = home_dir() {
            let rest = rest.trim_start_matches(['/', '\\']);
            return if rest.is_empty() {
                home
            } else {
                home.join(rest)
            };
        }
    }
    PathBuf::from(path)
}

/// Get the configuration directory path
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}
