//! Editor model - the complete state of one token input field
//!
//! This module contains the state types following the Elm Architecture
//! pattern: the document tree, the active configuration and the
//! session-scoped helpers the update functions drive.

pub mod document;
pub mod node;
pub mod selection;

pub use document::{Document, Mutation, MutationKind, Origin, Paragraph};
pub use node::{Marker, Node, NodeClass, NodeId, NodeKind, TextRun, Token, TokenStyle, MARKER_GLYPH};
pub use selection::{Point, Selection};

use crate::classify::{Classifier, SpaceSplitLabel, WhitelistClassifier};
use crate::config::EditorConfig;
use crate::history::SnapshotHistory;
use crate::normalize::{MarkerSync, Pass};
use crate::presentation::TokenView;
use crate::projection::{snapshot_of, ChangeProjector, ChangeSnapshot};

/// Provisional text of an in-flight input-method composition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composition {
    /// Run, char offset and char length of the provisional text
    pub range: Option<(NodeId, usize, usize)>,
}

/// The complete editor model
#[derive(Debug)]
pub struct EditorModel {
    pub document: Document,
    pub config: EditorConfig,
    /// Whether the host field has focus
    pub focused: bool,
    /// Marker -> host links; only the marker pass touches it
    pub markers: MarkerSync,
    pub projector: ChangeProjector,
    pub history: SnapshotHistory,
    pub classifier: Box<dyn Classifier>,
    /// Set between composition start and end
    pub composition: Option<Composition>,
    /// Token views last sent to the presentation layer
    pub rendered_tokens: Vec<TokenView>,
}

impl EditorModel {
    /// Create a model with the oracle matching the configuration: word
    /// labels for space-split editors, the whitelist otherwise
    pub fn new(config: EditorConfig) -> Self {
        let classifier: Box<dyn Classifier> = if config.tokenize_on_space {
            Box::new(SpaceSplitLabel)
        } else {
            Box::new(WhitelistClassifier::default())
        };
        Self::with_classifier(config, classifier)
    }

    pub fn with_classifier(config: EditorConfig, classifier: Box<dyn Classifier>) -> Self {
        let history = SnapshotHistory::with_max_size(config.history_size);
        Self {
            document: Document::new(),
            config,
            focused: false,
            markers: MarkerSync::new(),
            projector: ChangeProjector::new(),
            history,
            classifier,
            composition: None,
            rendered_tokens: Vec::new(),
        }
    }

    pub fn is_composing(&self) -> bool {
        self.composition.is_some()
    }

    /// Snapshot of the current tree (not gated, not recorded)
    pub fn snapshot(&self) -> ChangeSnapshot {
        snapshot_of(&self.document, &self.config)
    }

    /// Split borrow: the document and marker map mutably, alongside the
    /// read-only pass context
    pub fn pass_parts(&mut self) -> (&mut Document, &mut MarkerSync, Pass<'_>) {
        (
            &mut self.document,
            &mut self.markers,
            Pass::new(&self.config, self.classifier.as_ref()),
        )
    }

    /// Check the settled-tree invariants, describing the first violation
    pub fn check_invariants(&self) -> Result<(), String> {
        let doc = &self.document;
        let children = doc.children();

        if doc.paragraph().is_some() && children.is_empty() {
            return Err("paragraph without children".to_string());
        }

        for node in children {
            if let NodeKind::Text(run) = &node.kind {
                let held = doc.selection().is_some_and(|s| s.touches(node.id));
                if run.content.is_empty() && !held {
                    return Err(format!("stray empty text run {}", node.id));
                }
            }
        }
        for pair in children.windows(2) {
            if pair[0].is_text() && pair[1].is_text() {
                return Err(format!("adjacent text runs {} {}", pair[0].id, pair[1].id));
            }
        }

        if self.config.exclusive && doc.token_count() > 1 {
            return Err(format!("{} tokens in an exclusive editor", doc.token_count()));
        }
        if !self.config.allow_multiline && !doc.line_break_ids().is_empty() {
            return Err("line break in a single-line editor".to_string());
        }

        for (i, node) in children.iter().enumerate() {
            if node.is_rich_token() {
                let after = children.get(i + 1);
                let has_marker = after.is_some_and(|n| n.is_marker());
                let beyond = if has_marker { children.get(i + 2) } else { after };
                let needs_marker = beyond.map_or(true, |n| n.is_line_break());
                if has_marker != needs_marker {
                    return Err(format!(
                        "token {} marker={} required={}",
                        node.id, has_marker, needs_marker
                    ));
                }
            }
            if node.is_marker() {
                let host = self.markers.host_of(node.id);
                let prev = i.checked_sub(1).map(|p| &children[p]);
                if host.is_none() || prev.map(|p| p.id) != host {
                    return Err(format!("marker {} not paired with its host", node.id));
                }
            }
        }

        for marker in self.markers.linked_markers() {
            if !doc.contains(marker) {
                return Err(format!("link for missing marker {}", marker));
            }
        }
        Ok(())
    }

    /// Panic on an invariant violation (debug builds only)
    #[cfg(debug_assertions)]
    pub fn assert_invariants_with_context(&self, context: &str) {
        if self.is_composing() {
            return;
        }
        if let Err(e) = self.check_invariants() {
            panic!("invariant violated after {}: {}", context, e);
        }
    }

    /// No-op in release builds
    #[cfg(not(debug_assertions))]
    #[inline]
    pub fn assert_invariants_with_context(&self, _context: &str) {}
}

impl Default for EditorModel {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
