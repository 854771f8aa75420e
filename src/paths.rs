//! Path resolution for dynread configuration and data files.
//!
//! DYNREAD_HOME resolution order:
//! 1. DYNREAD_HOME environment variable (if set)
//! 2. ~/.config/dynread (default)
//! 3. ./.dynread when no home directory can be determined

use std::path::PathBuf;

pub fn dynread_home() -> PathBuf {
    if let Ok(home) = std::env::var("DYNREAD_HOME") {
        if !home.trim().is_empty() {
            return PathBuf::from(home);
        }
    }

    dirs::home_dir()
        .map(|h| h.join(".config").join("dynread"))
        .unwrap_or_else(|| PathBuf::from(".dynread"))
}

pub fn config_path() -> PathBuf {
    dynread_home().join("config.toml")
}

pub fn preferences_path() -> PathBuf {
    dynread_home().join("preferences.toml")
}

pub fn history_path() -> PathBuf {
    dynread_home().join("history.json")
}

pub fn log_dir() -> PathBuf {
    dynread_home()
}
