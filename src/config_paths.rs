//! Where panel-drag keeps its files
//!
//! Everything lives in one per-user directory:
//! - `config.yaml`: [`crate::config::PanelDragConfig`]
//! - `positions.json`: saved panel positions ([`crate::store::FileStore`])
//! - `logs/`: rotated debug logs
//!
//! The directory is `$XDG_CONFIG_HOME/panel-drag` or `~/.config/panel-drag`
//! on Unix and macOS, `%APPDATA%\panel-drag` on Windows.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "panel-drag";

/// The per-user directory, or `None` when no home or APPDATA is known
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// User preferences file
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// Default position store
pub fn positions_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("positions.json"))
}

pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> Result<(), String> {
    fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))
}

/// Create the log directory if needed. Used before the file logger starts.
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = logs_dir().ok_or_else(|| "No config directory available".to_string())?;
    ensure_dir(&logs)?;
    Ok(logs)
}
