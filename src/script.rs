//! Scripted edit sessions
//!
//! A script is a YAML list of edit steps replayed against a fresh editor:
//!
//! ```yaml
//! preset: space-split
//! steps:
//!   - action: type
//!     text: "東京 駅"
//!   - action: left
//!   - action: commit
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::commands::{EventLog, Notification};
use crate::messages::{CommandMsg, Direction, InputMsg, Msg, TokenMsg};
use crate::model::EditorModel;
use crate::projection::ChangeSnapshot;
use crate::tracing::TreeSnapshot;
use crate::update::update;

/// Root structure of a script file
#[derive(Debug, Deserialize)]
pub struct ScriptConfig {
    #[serde(default)]
    pub preset: Option<String>,
    pub steps: Vec<StepConfig>,
}

/// A single step entry from YAML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StepConfig {
    pub action: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub classification: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub focus: bool,
    /// Token position (document order) for token affordances
    #[serde(default)]
    pub index: Option<usize>,
}

/// A parsed step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Send(Msg),
    /// Close button of the n-th token
    RemoveToken(usize),
    /// Click on the n-th token
    EditToken(usize),
}

/// A parsed script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub preset: Option<String>,
    pub steps: Vec<Step>,
}

/// Load a script from a YAML file
pub fn load_script_file(path: &Path) -> Result<Script, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read script {}: {}", path.display(), e))?;
    parse_script_yaml(&content)
}

/// Parse a script from a YAML string
pub fn parse_script_yaml(yaml: &str) -> Result<Script, String> {
    let config: ScriptConfig =
        serde_yaml::from_str(yaml).map_err(|e| format!("Invalid script: {}", e))?;

    let steps = config
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| parse_step(step).map_err(|e| format!("step {}: {}", i + 1, e)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Script {
        preset: config.preset,
        steps,
    })
}

/// Turn one YAML entry into a step
pub fn parse_step(step: &StepConfig) -> Result<Step, String> {
    let text = || {
        step.text
            .clone()
            .ok_or_else(|| format!("'{}' needs a text", step.action))
    };
    let index = || {
        step.index
            .ok_or_else(|| format!("'{}' needs an index", step.action))
    };
    let input = |m: InputMsg| -> Result<Step, String> { Ok(Step::Send(Msg::Input(m))) };

    match step.action.as_str() {
        "type" => input(InputMsg::InsertText(text()?)),
        "enter" => Ok(Step::Send(Msg::enter())),
        "backspace" => input(InputMsg::DeleteBackward),
        "delete" => input(InputMsg::DeleteForward),
        "left" => input(InputMsg::MoveCaret(Direction::Left)),
        "right" => input(InputMsg::MoveCaret(Direction::Right)),
        "home" => input(InputMsg::MoveToStart),
        "end" => input(InputMsg::MoveToEnd),
        "select-all" => input(InputMsg::SelectAll),
        "compose-start" => input(InputMsg::CompositionStart),
        "compose" => input(InputMsg::CompositionUpdate(text()?)),
        "compose-end" => input(InputMsg::CompositionEnd(text()?)),
        "merge-marker" => input(InputMsg::SubstrateMergeMarker(
            step.text.clone().unwrap_or_default(),
        )),
        "focus" => input(InputMsg::Focus),
        "blur" => input(InputMsg::Blur),
        "clear" => Ok(Step::Send(Msg::Command(CommandMsg::Clear {
            focus_after: step.focus,
        }))),
        "set-token" => {
            let text = text()?;
            Ok(Step::Send(Msg::Command(CommandMsg::SetSingleToken {
                classification: step.classification.clone().unwrap_or_else(|| text.clone()),
                text,
                disabled: step.disabled,
                focus: step.focus,
            })))
        }
        "commit" => Ok(Step::Send(Msg::Command(CommandMsg::Commit {
            focus: step.focus,
        }))),
        "remove-token" => Ok(Step::RemoveToken(index()?)),
        "edit-token" => Ok(Step::EditToken(index()?)),
        other => Err(format!("unknown action '{}'", other)),
    }
}

/// What happened during one replayed step
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub step: String,
    pub notifications: Vec<Notification>,
    pub tree: Vec<String>,
    pub snapshot: ChangeSnapshot,
}

/// Replay steps against a model, collecting every collaborator event
pub fn replay(model: &mut EditorModel, steps: &[Step]) -> Vec<StepRecord> {
    steps
        .iter()
        .map(|step| {
            let mut log = EventLog::new();
            let label = match resolve(model, step) {
                Some(msg) => {
                    let label = format!("{:?}", msg);
                    if let Some(cmd) = update(model, msg) {
                        cmd.dispatch(&mut log);
                    }
                    label
                }
                None => {
                    tracing::warn!(?step, "step refers to a missing token");
                    format!("{:?} (skipped)", step)
                }
            };
            StepRecord {
                step: label,
                notifications: log.notifications,
                tree: TreeSnapshot::from_document(&model.document).nodes,
                snapshot: model.snapshot(),
            }
        })
        .collect()
}

fn resolve(model: &EditorModel, step: &Step) -> Option<Msg> {
    let uid_at = |index: usize| {
        model
            .document
            .children()
            .iter()
            .filter_map(|n| n.as_token())
            .nth(index)
            .map(|t| t.uid.clone())
    };
    match step {
        Step::Send(msg) => Some(msg.clone()),
        Step::RemoveToken(i) => uid_at(*i).map(|uid| Msg::Token(TokenMsg::Remove { uid })),
        Step::EditToken(i) => uid_at(*i).map(|uid| Msg::Token(TokenMsg::Edit { uid })),
    }
}
