//! Where tokenfield keeps its files on disk
//!
//! A single per-user directory holds two things:
//! - `config.yaml`: the saved [`EditorConfig`](crate::config::EditorConfig)
//!   a run starts from when no preset is named
//! - `logs/`: daily files written by the tracing file appender
//!
//! Replay scripts are always passed by path and never looked up here.
//!
//! The directory is `$XDG_CONFIG_HOME/tokenfield` (falling back to
//! `~/.config/tokenfield`) on Unix/macOS and `%APPDATA%\tokenfield` on Windows.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "tokenfield";
const CONFIG_FILE: &str = "config.yaml";
const LOGS_DIR: &str = "logs";

/// The files tokenfield keeps under one root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    root: PathBuf,
}

impl StorageLayout {
    /// Layout rooted at an arbitrary directory
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Layout rooted at the per-user config directory, if the platform has one
    pub fn user() -> Option<Self> {
        user_root().map(Self::at)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join(LOGS_DIR)
    }

    /// Create the logs directory if needed and return it
    pub fn ensure_logs_dir(&self) -> Result<PathBuf, String> {
        let logs = self.logs_dir();
        fs::create_dir_all(&logs)
            .map_err(|e| format!("Failed to create directory {}: {}", logs.display(), e))?;
        Ok(logs)
    }
}

#[cfg(target_os = "windows")]
fn user_root() -> Option<PathBuf> {
    env::var("APPDATA")
        .ok()
        .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
}

#[cfg(not(target_os = "windows"))]
fn user_root() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .map(|config| config.join(APP_DIR))
}

/// Per-user config directory
pub fn config_dir() -> Option<PathBuf> {
    user_root()
}

/// The saved editor config
pub fn config_file() -> Option<PathBuf> {
    StorageLayout::user().map(|layout| layout.config_file())
}

pub fn logs_dir() -> Option<PathBuf> {
    StorageLayout::user().map(|layout| layout.logs_dir())
}

/// Ensure the per-user logs dir exists, returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    StorageLayout::user()
        .ok_or_else(|| "No config directory available".to_string())?
        .ensure_logs_dir()
}
