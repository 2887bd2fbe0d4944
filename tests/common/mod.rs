//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use tokenfield::commands::{EventLog, Notification};
use tokenfield::config::EditorConfig;
use tokenfield::messages::Msg;
use tokenfield::model::{EditorModel, Node, NodeKind};
use tokenfield::projection::ChangeSnapshot;
use tokenfield::update::update;

/// Space-split editor (rich tokens, one per word)
pub fn space_split_model() -> EditorModel {
    EditorModel::new(EditorConfig::space_split())
}

/// Single-token editor (exclusive, whitelist oracle)
pub fn single_token_model() -> EditorModel {
    EditorModel::new(EditorConfig::single_token())
}

/// Send one message and collect everything the collaborator would see
pub fn send(model: &mut EditorModel, msg: Msg) -> EventLog {
    let mut log = EventLog::new();
    if let Some(cmd) = update(model, msg) {
        cmd.dispatch(&mut log);
    }
    log
}

/// Send several messages into one event log
pub fn send_all(model: &mut EditorModel, msgs: Vec<Msg>) -> EventLog {
    let mut log = EventLog::new();
    for msg in msgs {
        if let Some(cmd) = update(model, msg) {
            cmd.dispatch(&mut log);
        }
    }
    log
}

/// Type text one char at a time, the way keystrokes arrive
pub fn type_chars(model: &mut EditorModel, text: &str) -> EventLog {
    send_all(model, text.chars().map(|c| Msg::insert(c.to_string())).collect())
}

pub fn enter() -> Msg {
    Msg::enter()
}

/// Compact description of the tree, e.g. `["token(東京)", "marker", "text(駅)"]`
pub fn shape(model: &EditorModel) -> Vec<String> {
    model
        .document
        .children()
        .iter()
        .map(describe)
        .collect()
}

fn describe(node: &Node) -> String {
    match &node.kind {
        NodeKind::Text(run) => format!("text({})", run.content),
        NodeKind::Token(token) => format!("token({})", token.display_text),
        NodeKind::Marker(_) => "marker".to_string(),
        NodeKind::LineBreak => "br".to_string(),
    }
}

/// Classifications of the tokens in document order
pub fn classifications(model: &EditorModel) -> Vec<String> {
    model
        .document
        .children()
        .iter()
        .filter_map(|n| n.as_token())
        .map(|t| t.classification.clone())
        .collect()
}

pub fn token_count(model: &EditorModel) -> usize {
    model.document.token_count()
}

pub fn marker_count(model: &EditorModel) -> usize {
    model.document.marker_ids().len()
}

pub fn invalid_inputs(log: &EventLog) -> usize {
    log.notifications
        .iter()
        .filter(|n| matches!(n, Notification::InvalidInput(_)))
        .count()
}

pub fn plain(text: &str) -> ChangeSnapshot {
    ChangeSnapshot::PlainText(text.to_string())
}

pub fn committed(label: &str) -> ChangeSnapshot {
    ChangeSnapshot::CommittedToken(label.to_string())
}

/// Panic with the tree shape when an invariant is broken
pub fn assert_settled(model: &EditorModel) {
    if let Err(e) = model.check_invariants() {
        panic!("invariant broken: {} in {:?}", e, shape(model));
    }
}
