//! Change projection
//!
//! Derives the external [`ChangeSnapshot`] from a settled document and gates
//! delivery on structural inequality with the last delivered snapshot.

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::model::{Document, Node, NodeKind, MARKER_GLYPH};
use crate::normalize::tokenizer::split_words;

/// External, immutable view of the document at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum ChangeSnapshot {
    Empty,
    PlainText(String),
    /// Classification of the sole token
    CommittedToken(String),
}

impl ChangeSnapshot {
    pub fn is_empty(&self) -> bool {
        matches!(self, ChangeSnapshot::Empty)
    }
}

impl std::fmt::Display for ChangeSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeSnapshot::Empty => write!(f, "Empty"),
            ChangeSnapshot::PlainText(text) => write!(f, "PlainText({:?})", text),
            ChangeSnapshot::CommittedToken(label) => write!(f, "CommittedToken({:?})", label),
        }
    }
}

/// Result of projecting one settled document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub snapshot: ChangeSnapshot,
    /// False when the snapshot equals the last delivered one
    pub delivered: bool,
}

#[derive(Debug, Clone)]
pub struct ChangeProjector {
    last_delivered: ChangeSnapshot,
}

impl Default for ChangeProjector {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeProjector {
    /// A fresh session starts out having reported an empty field
    pub fn new() -> Self {
        Self {
            last_delivered: ChangeSnapshot::Empty,
        }
    }

    /// Compute the snapshot and decide whether it is delivered
    pub fn project(&mut self, doc: &Document, config: &EditorConfig) -> Projection {
        let snapshot = snapshot_of(doc, config);
        let delivered = snapshot != self.last_delivered;
        if delivered {
            tracing::debug!(%snapshot, "delivering change");
            self.last_delivered = snapshot.clone();
        } else {
            tracing::trace!(%snapshot, "change suppressed");
        }
        Projection {
            snapshot,
            delivered,
        }
    }
}

/// Pure snapshot derivation
pub fn snapshot_of(doc: &Document, config: &EditorConfig) -> ChangeSnapshot {
    let meaningful: Vec<&Node> = doc
        .children()
        .iter()
        .filter(|n| !n.is_marker())
        .filter(|n| {
            let text = visible_text(n.text_content(), &config.marker_payload);
            if n.is_token() {
                true
            } else if config.join_words {
                !split_words(&text).is_empty()
            } else {
                !text.is_empty()
            }
        })
        .collect();

    match meaningful.as_slice() {
        [] => return ChangeSnapshot::Empty,
        [only] => {
            if let NodeKind::Token(token) = &only.kind {
                return ChangeSnapshot::CommittedToken(token.classification.clone());
            }
        }
        _ => {}
    }

    let text = if config.join_words {
        meaningful
            .iter()
            .flat_map(|n| {
                split_words(&visible_text(n.text_content(), &config.marker_payload))
                    .into_iter()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        meaningful
            .iter()
            .map(|n| visible_text(n.text_content(), &config.marker_payload))
            .collect()
    };

    if text.is_empty() {
        ChangeSnapshot::Empty
    } else {
        ChangeSnapshot::PlainText(text)
    }
}

/// Strip the marker glyph and every marker payload char from text
pub(crate) fn visible_text(text: &str, payload: &str) -> String {
    text.chars()
        .filter(|c| *c != MARKER_GLYPH && !payload.contains(*c))
        .collect()
}
