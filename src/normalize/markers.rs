//! Marker synchronization
//!
//! Rich tokens need a zero-width companion right after them whenever nothing
//! editable follows (end of field or a line break), otherwise the substrate
//! cannot place a caret next to them. This module owns the marker -> host
//! association for one editor session and reconciles it against the tree.

use std::collections::HashMap;

use crate::model::{
    Document, Mutation, MutationKind, NodeClass, NodeId, Origin, Point, MARKER_GLYPH,
};

/// Marker -> host token links, scoped to one editor session
#[derive(Debug, Clone, Default)]
pub struct MarkerSync {
    links: HashMap<NodeId, NodeId>,
}

impl MarkerSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host token a marker is paired with
    pub fn host_of(&self, marker: NodeId) -> Option<NodeId> {
        self.links.get(&marker).copied()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Every linked marker, in no particular order
    pub fn linked_markers(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.links.keys().copied()
    }

    /// Bring the tree and the link map back in line.
    ///
    /// `batch` is the mutation log drained for this round; it is consulted
    /// for markers the engine did not remove itself.
    pub fn reconcile(
        &mut self,
        doc: &mut Document,
        batch: &[Mutation],
        payload: &str,
        enabled: bool,
    ) {
        if !enabled {
            for marker in doc.marker_ids() {
                doc.remove(marker, Origin::Engine);
            }
            self.links.clear();
            return;
        }

        for m in batch {
            if m.class == NodeClass::Marker && m.kind == MutationKind::Destroyed {
                self.handle_destroyed(doc, m);
            }
        }
        self.prune_stale(doc);
        self.prune_unnecessary(doc);
        self.install_trailing(doc, payload);
        self.install_pre_break(doc, payload);

        // links whose marker vanished without a log entry
        self.links.retain(|marker, _| doc.contains(*marker));
    }

    /// A marker left the tree. Engine removals just drop the link; anything
    /// else may be the substrate folding the glyph into the following run,
    /// which is repaired by discarding that run and re-placing the marker.
    fn handle_destroyed(&mut self, doc: &mut Document, m: &Mutation) {
        let Some(host) = self.links.remove(&m.id) else {
            return;
        };
        if m.origin == Origin::Engine {
            return;
        }
        if !doc.get(host).is_some_and(|n| n.is_rich_token()) {
            tracing::debug!(marker = %m.id, %host, "host gone, dropping link");
            return;
        }

        let Some(absorbed) = doc
            .next_sibling(host)
            .filter(|n| n.as_text().is_some_and(|t| t.content.starts_with(MARKER_GLYPH)))
            .map(|n| n.id)
        else {
            return;
        };
        let still_required = doc
            .next_sibling(absorbed)
            .map_or(true, |n| n.is_line_break());
        if !still_required {
            strip_glyph(doc, absorbed);
            return;
        }

        // repaired markers carry no payload
        let marker = doc.create_marker("");
        let marker_id = marker.id;
        doc.insert_after(host, marker, Origin::Engine);
        doc.remove(absorbed, Origin::Engine);
        doc.select_end(marker_id);
        self.links.insert(marker_id, host);
        tracing::debug!(
            %host,
            marker = %marker_id,
            discarded = %absorbed,
            "repaired substrate-merged marker"
        );
    }

    /// Remove markers without a link or whose previous sibling is not
    /// their host
    fn prune_stale(&mut self, doc: &mut Document) {
        for marker in doc.marker_ids() {
            let host = self.links.get(&marker).copied();
            let valid = host.is_some_and(|h| {
                doc.previous_sibling(marker)
                    .is_some_and(|p| p.id == h && p.is_rich_token())
            });
            if !valid {
                tracing::debug!(%marker, "pruning stale marker");
                self.links.remove(&marker);
                doc.remove(marker, Origin::Engine);
            }
        }
    }

    /// Remove markers followed by anything but a line break
    fn prune_unnecessary(&mut self, doc: &mut Document) {
        for marker in doc.marker_ids() {
            let needed = doc
                .next_sibling(marker)
                .map_or(true, |n| n.is_line_break());
            if !needed {
                tracing::debug!(%marker, "pruning unnecessary marker");
                self.links.remove(&marker);
                doc.remove(marker, Origin::Engine);
            }
        }
    }

    /// A rich token at the very end gets exactly one fresh marker
    fn install_trailing(&mut self, doc: &mut Document, payload: &str) {
        let Some(host) = doc.last().filter(|n| n.is_rich_token()).map(|n| n.id) else {
            return;
        };

        for marker in doc.marker_ids() {
            self.links.remove(&marker);
            doc.remove(marker, Origin::Engine);
        }

        let caret_after_host = doc.caret() == Some(Point::new(host, 1));
        let marker = doc.create_marker(payload);
        let marker_id = marker.id;
        doc.insert_after(host, marker, Origin::Engine);
        self.links.insert(marker_id, host);
        if caret_after_host {
            doc.select_end(marker_id);
        }
        tracing::debug!(%host, marker = %marker_id, "installed trailing marker");
    }

    /// A rich token directly before a line break gets a marker between them
    fn install_pre_break(&mut self, doc: &mut Document, payload: &str) {
        for line_break in doc.line_break_ids() {
            let Some(host) = doc
                .previous_sibling(line_break)
                .filter(|n| n.is_rich_token())
                .map(|n| n.id)
            else {
                continue;
            };
            let marker = doc.create_marker(payload);
            let marker_id = marker.id;
            doc.insert_before(line_break, marker, Origin::Engine);
            self.links.insert(marker_id, host);
            tracing::debug!(%host, marker = %marker_id, "installed pre-break marker");
        }
    }
}

/// Drop the absorbed glyph from a run whose host no longer needs a marker
fn strip_glyph(doc: &mut Document, id: NodeId) {
    let Some(run) = doc.get(id).and_then(|n| n.as_text()) else {
        return;
    };
    let cleaned: String = run.content.chars().filter(|c| *c != MARKER_GLYPH).collect();
    doc.set_text(id, cleaned, Origin::Engine);
}

/// A collapsed caret at the start of a marker belongs at its end
pub fn compensate_caret(doc: &mut Document) {
    let Some(caret) = doc.caret() else {
        return;
    };
    if caret.offset == 0 && doc.get(caret.node).is_some_and(|n| n.is_marker()) {
        tracing::trace!(marker = %caret.node, "caret moved to marker end");
        doc.select(Point::new(caret.node, 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeKind, TokenStyle};

    fn rich_token(doc: &mut Document, text: &str) -> NodeId {
        let token = doc.create_token(text, "valid query", false, TokenStyle::Rich);
        let id = token.id;
        doc.append(token, Origin::Engine);
        id
    }

    fn reconcile(sync: &mut MarkerSync, doc: &mut Document) {
        let batch = doc.take_mutations();
        sync.reconcile(doc, &batch, "", true);
    }

    #[test]
    fn test_trailing_marker_installed() {
        let mut doc = Document::new();
        let host = rich_token(&mut doc, "東京");
        doc.select_end(host);
        let mut sync = MarkerSync::new();
        reconcile(&mut sync, &mut doc);

        let marker = doc.last().unwrap();
        assert!(marker.is_marker());
        assert_eq!(sync.host_of(marker.id), Some(host));
        assert_eq!(doc.caret(), Some(Point::new(marker.id, 1)));
    }

    #[test]
    fn test_plain_token_gets_no_marker() {
        let mut doc = Document::new();
        let token = doc.create_token("東京", "valid query", false, TokenStyle::Plain);
        doc.append(token, Origin::Engine);
        let mut sync = MarkerSync::new();
        reconcile(&mut sync, &mut doc);
        assert!(doc.marker_ids().is_empty());
    }

    #[test]
    fn test_unlinked_marker_pruned() {
        let mut doc = Document::new();
        rich_token(&mut doc, "東京");
        let stray = doc.create_marker("");
        let stray_id = stray.id;
        doc.append(stray, Origin::Engine);
        let mut sync = MarkerSync::new();
        reconcile(&mut sync, &mut doc);

        // replaced by a fresh linked one
        assert!(!doc.contains(stray_id));
        assert_eq!(doc.marker_ids().len(), 1);
        assert_eq!(sync.len(), 1);
    }

    #[test]
    fn test_marker_followed_by_text_is_pruned() {
        let mut doc = Document::new();
        rich_token(&mut doc, "東京");
        let mut sync = MarkerSync::new();
        reconcile(&mut sync, &mut doc);

        let text = doc.create_text("x");
        doc.append(text, Origin::User);
        reconcile(&mut sync, &mut doc);
        assert!(doc.marker_ids().is_empty());
        assert!(sync.is_empty());
    }

    #[test]
    fn test_pre_break_marker() {
        let mut doc = Document::new();
        rich_token(&mut doc, "東京");
        let lb = doc.create_line_break();
        doc.append(lb, Origin::User);
        let text = doc.create_text("駅");
        doc.append(text, Origin::User);
        let mut sync = MarkerSync::new();
        reconcile(&mut sync, &mut doc);

        let kinds: Vec<&str> = doc.children().iter().map(|n| n.type_name()).collect();
        assert_eq!(kinds, vec!["token", "marker", "linebreak", "text"]);
    }

    #[test]
    fn test_substrate_merge_repaired() {
        let mut doc = Document::new();
        let host = rich_token(&mut doc, "東京");
        let mut sync = MarkerSync::new();
        reconcile(&mut sync, &mut doc);
        let old_marker = doc.last().unwrap().id;

        doc.remove(old_marker, Origin::Substrate);
        let merged = doc.create_text(format!("{}駅", MARKER_GLYPH));
        let merged_id = merged.id;
        doc.append(merged, Origin::Substrate);
        doc.select_end(merged_id);
        reconcile(&mut sync, &mut doc);

        assert!(!doc.contains(merged_id));
        let marker = doc.last().unwrap();
        assert!(matches!(&marker.kind, NodeKind::Marker(m) if m.payload.is_empty()));
        assert_eq!(sync.host_of(marker.id), Some(host));
        assert_eq!(doc.caret(), Some(Point::new(marker.id, 1)));
    }

    #[test]
    fn test_engine_removal_drops_link() {
        let mut doc = Document::new();
        rich_token(&mut doc, "東京");
        let mut sync = MarkerSync::new();
        reconcile(&mut sync, &mut doc);
        let marker = doc.last().unwrap().id;

        doc.remove(marker, Origin::Engine);
        let text = doc.create_text("駅");
        doc.append(text, Origin::User);
        reconcile(&mut sync, &mut doc);
        assert!(sync.is_empty());
        assert!(doc.marker_ids().is_empty());
    }

    #[test]
    fn test_caret_compensation() {
        let mut doc = Document::new();
        rich_token(&mut doc, "東京");
        let mut sync = MarkerSync::new();
        reconcile(&mut sync, &mut doc);
        let marker = doc.last().unwrap().id;

        doc.select(Point::new(marker, 0));
        compensate_caret(&mut doc);
        assert_eq!(doc.caret(), Some(Point::new(marker, 1)));
    }

    #[test]
    fn test_disabled_sync_removes_markers() {
        let mut doc = Document::new();
        rich_token(&mut doc, "東京");
        let mut sync = MarkerSync::new();
        reconcile(&mut sync, &mut doc);

        let batch = doc.take_mutations();
        sync.reconcile(&mut doc, &batch, "", false);
        assert!(doc.marker_ids().is_empty());
        assert!(sync.is_empty());
    }
}
