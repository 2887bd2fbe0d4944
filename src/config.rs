//! Editor configuration
//!
//! Selects the editor variant (which normalization rules run, which token
//! capability level is active) and persists it as YAML in
//! `~/.config/tokenfield/config.yaml`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::TokenStyle;

/// Decoration appended to disabled tokens by the presentation layer
pub const DEFAULT_DISABLED_SUFFIX: &str = "(クエリが見つかりません)";

/// Reason reported when text arrives while a token occupies the field
pub const MULTI_QUERY_REASON: &str = "multi-query";

/// What to do with user text typed while a token exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidInputPolicy {
    #[default]
    Off,
    /// Report `onInvalidInput` and let the input through
    Notify,
    /// Report `onInvalidInput` and drop the input
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Capability level of every token this editor creates
    pub token_style: TokenStyle,

    /// Split text runs into tokens on ASCII/ideographic spaces
    pub tokenize_on_space: bool,

    /// At most one token; fresh text demotes it
    pub exclusive: bool,

    /// Keep line-break placeholders instead of stripping them
    pub allow_multiline: bool,

    /// Emit `InputComplete` when a stripped line break was typed
    pub signal_input_complete: bool,

    pub invalid_input: InvalidInputPolicy,

    /// Text content queries return for a marker
    pub marker_payload: String,

    /// Project plain text as words joined by single spaces
    pub join_words: bool,

    pub disabled_suffix: String,

    /// Number of entries kept by the snapshot history
    pub history_size: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::single_token()
    }
}

impl EditorConfig {
    /// Space-split editor: every word becomes a rich token
    pub fn space_split() -> Self {
        Self {
            token_style: TokenStyle::Rich,
            tokenize_on_space: true,
            exclusive: false,
            allow_multiline: false,
            signal_input_complete: true,
            invalid_input: InvalidInputPolicy::Off,
            marker_payload: crate::model::MARKER_GLYPH.to_string(),
            join_words: true,
            disabled_suffix: DEFAULT_DISABLED_SUFFIX.to_string(),
            history_size: 5,
        }
    }

    /// Single rich token with validity classification
    pub fn single_token() -> Self {
        Self {
            token_style: TokenStyle::Rich,
            tokenize_on_space: false,
            exclusive: true,
            allow_multiline: false,
            signal_input_complete: true,
            invalid_input: InvalidInputPolicy::Notify,
            marker_payload: crate::model::MARKER_GLYPH.to_string(),
            join_words: false,
            disabled_suffix: DEFAULT_DISABLED_SUFFIX.to_string(),
            history_size: 5,
        }
    }

    /// Single plain token (text-like, no markers)
    pub fn single_plain_token() -> Self {
        Self {
            token_style: TokenStyle::Plain,
            invalid_input: InvalidInputPolicy::Off,
            marker_payload: String::new(),
            ..Self::single_token()
        }
    }

    /// Look up a preset by its CLI name
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "space-split" => Some(Self::space_split()),
            "single-token" => Some(Self::single_token()),
            "plain-token" => Some(Self::single_plain_token()),
            _ => None,
        }
    }

    /// Load config from the user config directory, or defaults if absent
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{}", e);
                Self::default()
            }
        }
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse config at {}: {}", path.display(), e))
    }

    /// Save config to the user config directory
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Markers are only needed when tokens are rich
    pub fn uses_markers(&self) -> bool {
        self.token_style == TokenStyle::Rich
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_split_preset() {
        let c = EditorConfig::space_split();
        assert!(c.tokenize_on_space);
        assert!(!c.exclusive);
        assert!(c.join_words);
        assert!(c.uses_markers());
    }

    #[test]
    fn test_single_token_preset() {
        let c = EditorConfig::single_token();
        assert!(c.exclusive);
        assert!(!c.tokenize_on_space);
        assert_eq!(c.invalid_input, InvalidInputPolicy::Notify);
    }

    #[test]
    fn test_plain_token_preset_has_no_markers() {
        let c = EditorConfig::single_plain_token();
        assert!(c.exclusive);
        assert!(!c.uses_markers());
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(
            EditorConfig::preset("space-split"),
            Some(EditorConfig::space_split())
        );
        assert!(EditorConfig::preset("multi-paragraph").is_none());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: EditorConfig =
            serde_yaml::from_str("exclusive: false\ninvalid_input: block\n").unwrap();
        assert!(!config.exclusive);
        assert_eq!(config.invalid_input, InvalidInputPolicy::Block);
        assert_eq!(config.history_size, 5);
        assert_eq!(config.token_style, TokenStyle::Rich);
    }
}
