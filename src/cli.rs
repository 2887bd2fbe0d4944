//! Command-line argument parsing for the replay tool
//!
//! Supports:
//! - Replaying a YAML script of edit steps
//! - Typing stdin lines (each followed by Enter) when no script is given
//! - Picking an editor preset or a config file
//! - JSON output

use clap::Parser;
use std::path::PathBuf;

use crate::config::EditorConfig;

/// Replay edit sessions against the token input engine
#[derive(Parser, Debug)]
#[command(
    name = "tokenfield",
    version,
    about = "Replay edit sessions against the token input engine"
)]
pub struct CliArgs {
    /// YAML script to replay (reads lines from stdin when omitted)
    #[arg(value_name = "SCRIPT")]
    pub script: Option<PathBuf>,

    /// Editor preset: space-split, single-token or plain-token
    #[arg(short, long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Load the editor configuration from this YAML file
    #[arg(short, long, value_name = "FILE", conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Print the replay as JSON
    #[arg(long)]
    pub json: bool,
}

/// Where the configuration comes from, in priority order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Preset(String),
    /// Preset named by the script, else the user config file
    Default,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub script: Option<PathBuf>,
    pub config: ConfigSource,
    pub json: bool,
}

impl CliArgs {
    /// Convert parsed CLI args into startup configuration
    pub fn into_config(self) -> Result<StartupConfig, String> {
        let config = match (self.config, self.preset) {
            (Some(path), _) => ConfigSource::File(path),
            (None, Some(name)) => {
                if EditorConfig::preset(&name).is_none() {
                    return Err(format!(
                        "Unknown preset '{}' (expected space-split, single-token or plain-token)",
                        name
                    ));
                }
                ConfigSource::Preset(name)
            }
            (None, None) => ConfigSource::Default,
        };

        Ok(StartupConfig {
            script: self.script,
            config,
            json: self.json,
        })
    }
}

impl StartupConfig {
    /// Resolve the editor configuration, letting a script-named preset
    /// stand in when nothing was given on the command line
    pub fn resolve_editor_config(
        &self,
        script_preset: Option<&str>,
    ) -> Result<EditorConfig, String> {
        match &self.config {
            ConfigSource::File(path) => EditorConfig::load_from(path),
            ConfigSource::Preset(name) => EditorConfig::preset(name)
                .ok_or_else(|| format!("Unknown preset '{}'", name)),
            ConfigSource::Default => match script_preset {
                Some(name) => EditorConfig::preset(name)
                    .ok_or_else(|| format!("Script names unknown preset '{}'", name)),
                None => Ok(EditorConfig::load()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_no_args_reads_stdin() {
        let config = parse(&["tokenfield"]).into_config().unwrap();
        assert!(config.script.is_none());
        assert_eq!(config.config, ConfigSource::Default);
        assert!(!config.json);
    }

    #[test]
    fn test_preset_and_script() {
        let config = parse(&["tokenfield", "session.yaml", "--preset", "space-split", "--json"])
            .into_config()
            .unwrap();
        assert_eq!(config.script, Some(PathBuf::from("session.yaml")));
        assert_eq!(config.config, ConfigSource::Preset("space-split".to_string()));
        assert!(config.json);
    }

    #[test]
    fn test_unknown_preset_rejected() {
        let err = parse(&["tokenfield", "--preset", "multi-line"])
            .into_config()
            .unwrap_err();
        assert!(err.contains("multi-line"));
    }

    #[test]
    fn test_config_conflicts_with_preset() {
        assert!(CliArgs::try_parse_from([
            "tokenfield",
            "--preset",
            "space-split",
            "--config",
            "c.yaml"
        ])
        .is_err());
    }

    #[test]
    fn test_script_preset_used_by_default() {
        let config = parse(&["tokenfield"]).into_config().unwrap();
        let editor = config.resolve_editor_config(Some("space-split")).unwrap();
        assert_eq!(editor, EditorConfig::space_split());
    }

    #[test]
    fn test_cli_preset_overrides_script() {
        let config = parse(&["tokenfield", "-p", "plain-token"])
            .into_config()
            .unwrap();
        let editor = config.resolve_editor_config(Some("space-split")).unwrap();
        assert_eq!(editor, EditorConfig::single_plain_token());
    }
}
