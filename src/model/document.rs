//! Document model - a single paragraph of inline nodes plus the selection
//!
//! Every structural primitive leaves the tree settled: adjacent text runs are
//! merged, empty text runs are pruned unless the selection sits in them, and
//! a paragraph that loses its last child is dropped so the document reads as
//! empty. Token exclusivity and marker adjacency are *not* enforced here; the
//! normalization passes in [`crate::normalize`] own those.

use super::node::{
    byte_index, Marker, Node, NodeClass, NodeId, NodeKind, TextRun, Token, TokenStyle,
};
use super::selection::{Point, Selection};

/// Who caused a mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Keystrokes, deletions and compositions delivered by the host
    User,
    /// The text substrate acting on its own (e.g. an auto-merge)
    Substrate,
    /// Normalization passes and commands
    Engine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Created,
    Updated,
    Destroyed,
}

/// One entry of the mutation log drained by the normalization pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mutation {
    pub id: NodeId,
    pub class: NodeClass,
    pub kind: MutationKind,
    pub origin: Origin,
}

impl Mutation {
    /// A text run was created or edited by the user
    pub fn is_user_text_edit(&self) -> bool {
        self.class == NodeClass::Text
            && self.kind != MutationKind::Destroyed
            && self.origin == Origin::User
    }
}

/// Ordered inline children; owned by the document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub children: Vec<Node>,
}

/// Root container.
///
/// Holds at most one paragraph: single-line editors never create a second
/// one, so the type encodes it.
#[derive(Debug, Clone, Default)]
pub struct Document {
    paragraph: Option<Paragraph>,
    selection: Option<Selection>,
    mutations: Vec<Mutation>,
    next_id: u64,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Node construction (detached until inserted)
    // =========================================================================

    fn alloc_id(&mut self) -> NodeId {
        self.next_id += 1;
        NodeId(self.next_id)
    }

    pub fn create_text(&mut self, content: impl Into<String>) -> Node {
        Node {
            id: self.alloc_id(),
            kind: NodeKind::Text(TextRun {
                content: content.into(),
            }),
        }
    }

    pub fn create_token(
        &mut self,
        display_text: impl Into<String>,
        classification: impl Into<String>,
        disabled: bool,
        style: TokenStyle,
    ) -> Node {
        let id = self.alloc_id();
        Node {
            id,
            kind: NodeKind::Token(Token {
                display_text: display_text.into(),
                classification: classification.into(),
                uid: format!("token-{}", id.0),
                disabled,
                style,
            }),
        }
    }

    pub fn create_marker(&mut self, payload: impl Into<String>) -> Node {
        Node {
            id: self.alloc_id(),
            kind: NodeKind::Marker(Marker {
                payload: payload.into(),
            }),
        }
    }

    pub fn create_line_break(&mut self) -> Node {
        Node {
            id: self.alloc_id(),
            kind: NodeKind::LineBreak,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn paragraph(&self) -> Option<&Paragraph> {
        self.paragraph.as_ref()
    }

    pub fn children(&self) -> &[Node] {
        self.paragraph
            .as_ref()
            .map(|p| p.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.children().iter().find(|n| n.id == id)
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.children().iter().position(|n| n.id == id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<&Node> {
        let idx = self.index_of(id)?;
        idx.checked_sub(1).and_then(|i| self.children().get(i))
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<&Node> {
        let idx = self.index_of(id)?;
        self.children().get(idx + 1)
    }

    pub fn first(&self) -> Option<&Node> {
        self.children().first()
    }

    pub fn last(&self) -> Option<&Node> {
        self.children().last()
    }

    /// True when there is no paragraph or it only holds empty text runs
    pub fn is_empty(&self) -> bool {
        self.children()
            .iter()
            .all(|n| matches!(&n.kind, NodeKind::Text(run) if run.content.is_empty()))
    }

    /// Flattened content of every node (markers contribute their payload)
    pub fn text_content(&self) -> String {
        self.children().iter().map(Node::text_content).collect()
    }

    pub fn token_ids(&self) -> Vec<NodeId> {
        self.ids_where(Node::is_token)
    }

    pub fn marker_ids(&self) -> Vec<NodeId> {
        self.ids_where(Node::is_marker)
    }

    pub fn text_ids(&self) -> Vec<NodeId> {
        self.ids_where(Node::is_text)
    }

    pub fn line_break_ids(&self) -> Vec<NodeId> {
        self.ids_where(Node::is_line_break)
    }

    pub fn token_count(&self) -> usize {
        self.children().iter().filter(|n| n.is_token()).count()
    }

    fn ids_where(&self, pred: impl Fn(&Node) -> bool) -> Vec<NodeId> {
        self.children()
            .iter()
            .filter(|n| pred(n))
            .map(|n| n.id)
            .collect()
    }

    pub fn find_token_by_uid(&self, uid: &str) -> Option<&Node> {
        self.children()
            .iter()
            .find(|n| n.as_token().is_some_and(|t| t.uid == uid))
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// The caret when the selection is collapsed
    pub fn caret(&self) -> Option<Point> {
        self.selection.and_then(|s| s.caret())
    }

    /// Replace the selection. Points on missing nodes clear it; offsets are
    /// clamped to the node's extent.
    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection.and_then(|sel| {
            let anchor = self.clamp_point(sel.anchor)?;
            let head = self.clamp_point(sel.head)?;
            Some(Selection::new(anchor, head))
        });
        self.settle(Origin::Engine);
    }

    pub fn select(&mut self, point: Point) {
        self.set_selection(Some(Selection::collapsed(point)));
    }

    pub fn select_start(&mut self, id: NodeId) {
        self.select(Point::new(id, 0));
    }

    pub fn select_end(&mut self, id: NodeId) {
        if let Some(extent) = self.get(id).map(Node::extent) {
            self.select(Point::new(id, extent));
        }
    }

    pub fn clear_selection(&mut self) {
        self.set_selection(None);
    }

    fn clamp_point(&self, point: Point) -> Option<Point> {
        let node = self.get(point.node)?;
        Some(Point::new(point.node, point.offset.min(node.extent())))
    }

    /// Document-order key of a point
    pub fn point_key(&self, point: Point) -> Option<(usize, usize)> {
        Some((self.index_of(point.node)?, point.offset))
    }

    /// Selection ends in document order (start, end)
    pub fn ordered(&self, selection: Selection) -> Option<(Point, Point)> {
        let a = self.point_key(selection.anchor)?;
        let h = self.point_key(selection.head)?;
        if a <= h {
            Some((selection.anchor, selection.head))
        } else {
            Some((selection.head, selection.anchor))
        }
    }

    // =========================================================================
    // Structural primitives
    // =========================================================================

    pub fn append(&mut self, node: Node, origin: Origin) {
        let idx = self.children().len();
        self.insert_at(idx, node, origin);
    }

    pub fn insert_before(&mut self, target: NodeId, node: Node, origin: Origin) -> bool {
        match self.index_of(target) {
            Some(idx) => {
                self.insert_at(idx, node, origin);
                true
            }
            None => false,
        }
    }

    pub fn insert_after(&mut self, target: NodeId, node: Node, origin: Origin) -> bool {
        match self.index_of(target) {
            Some(idx) => {
                self.insert_at(idx + 1, node, origin);
                true
            }
            None => false,
        }
    }

    fn insert_at(&mut self, idx: usize, node: Node, origin: Origin) {
        self.record(node.id, node.class(), MutationKind::Created, origin);
        let paragraph = self.paragraph.get_or_insert_with(Paragraph::default);
        let idx = idx.min(paragraph.children.len());
        paragraph.children.insert(idx, node);
        self.settle(origin);
    }

    /// Remove a node. A selection end inside it moves to the end of the
    /// previous sibling, else the start of the next one.
    pub fn remove(&mut self, id: NodeId, origin: Origin) -> Option<Node> {
        let idx = self.index_of(id)?;
        let fallback = self.fallback_point(idx);
        let paragraph = self.paragraph.as_mut()?;
        let node = paragraph.children.remove(idx);
        self.record(node.id, node.class(), MutationKind::Destroyed, origin);

        if let Some(sel) = self.selection {
            if sel.touches(id) {
                self.selection = fallback.map(|p| {
                    let mut sel = sel;
                    sel.map(|q| if q.node == id { p } else { q });
                    sel
                });
            }
        }
        self.settle(origin);
        Some(node)
    }

    fn fallback_point(&self, idx: usize) -> Option<Point> {
        let children = self.children();
        if idx > 0 {
            let prev = &children[idx - 1];
            return Some(Point::new(prev.id, prev.extent()));
        }
        children.get(idx + 1).map(|next| Point::new(next.id, 0))
    }

    /// Replace a node in place. Selection ends inside it are carried over:
    /// an end at the old node's end lands at the replacement's end.
    pub fn replace(&mut self, id: NodeId, node: Node, origin: Origin) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let Some(paragraph) = self.paragraph.as_mut() else {
            return false;
        };
        let new_id = node.id;
        let new_extent = node.extent();
        let old_extent = paragraph.children[idx].extent();
        let old_class = paragraph.children[idx].class();
        let new_class = node.class();
        paragraph.children[idx] = node;

        self.record(id, old_class, MutationKind::Destroyed, origin);
        self.record(new_id, new_class, MutationKind::Created, origin);

        if let Some(sel) = self.selection.as_mut() {
            sel.map(|p| {
                if p.node != id {
                    p
                } else if p.offset >= old_extent {
                    Point::new(new_id, new_extent)
                } else {
                    Point::new(new_id, p.offset.min(new_extent))
                }
            });
        }
        self.settle(origin);
        true
    }

    /// Replace the content of a text run
    pub fn set_text(&mut self, id: NodeId, content: impl Into<String>, origin: Origin) -> bool {
        let content = content.into();
        let Some(node) = self
            .paragraph
            .as_mut()
            .and_then(|p| p.children.iter_mut().find(|n| n.id == id))
        else {
            return false;
        };
        let NodeKind::Text(run) = &mut node.kind else {
            return false;
        };
        if run.content == content {
            return true;
        }
        run.content = content;
        let extent = run.content.chars().count();
        self.record(id, NodeClass::Text, MutationKind::Updated, origin);

        if let Some(sel) = self.selection.as_mut() {
            sel.map(|p| {
                if p.node == id {
                    Point::new(id, p.offset.min(extent))
                } else {
                    p
                }
            });
        }
        self.settle(origin);
        true
    }

    /// Insert text into a run at a char offset
    pub fn insert_chars(&mut self, id: NodeId, offset: usize, text: &str, origin: Origin) -> bool {
        let Some(run) = self.get(id).and_then(Node::as_text) else {
            return false;
        };
        let mut content = run.content.clone();
        content.insert_str(byte_index(&content, offset), text);
        self.set_text(id, content, origin)
    }

    /// Remove the chars in `start..end` from a run
    pub fn remove_chars(&mut self, id: NodeId, start: usize, end: usize, origin: Origin) -> bool {
        let Some(run) = self.get(id).and_then(Node::as_text) else {
            return false;
        };
        let content = &run.content;
        let from = byte_index(content, start);
        let to = byte_index(content, end.max(start));
        let updated = format!("{}{}", &content[..from], &content[to..]);
        self.set_text(id, updated, origin)
    }

    /// Drop every node and the selection
    pub fn clear(&mut self, origin: Origin) {
        if let Some(paragraph) = self.paragraph.take() {
            for node in &paragraph.children {
                self.record(node.id, node.class(), MutationKind::Destroyed, origin);
            }
        }
        self.selection = None;
    }

    // =========================================================================
    // Mutation log
    // =========================================================================

    fn record(&mut self, id: NodeId, class: NodeClass, kind: MutationKind, origin: Origin) {
        self.mutations.push(Mutation {
            id,
            class,
            kind,
            origin,
        });
    }

    /// Drain the mutations recorded since the last call
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.mutations)
    }

    pub fn has_pending_mutations(&self) -> bool {
        !self.mutations.is_empty()
    }

    // =========================================================================
    // Settling
    // =========================================================================

    /// Merge adjacent runs, prune empty runs the selection does not hold,
    /// and drop an emptied paragraph.
    fn settle(&mut self, origin: Origin) {
        let Some(paragraph) = self.paragraph.as_mut() else {
            return;
        };
        let mut log = Vec::new();
        let mut selection = self.selection;

        let mut i = 0;
        while i + 1 < paragraph.children.len() {
            if !(paragraph.children[i].is_text() && paragraph.children[i + 1].is_text()) {
                i += 1;
                continue;
            }
            let absorbed = paragraph.children.remove(i + 1);
            let absorbed_id = absorbed.id;
            let keep = &mut paragraph.children[i];
            let keep_id = keep.id;
            if let (NodeKind::Text(run), NodeKind::Text(tail)) = (&mut keep.kind, absorbed.kind) {
                let shift = run.content.chars().count();
                run.content.push_str(&tail.content);
                if let Some(sel) = selection.as_mut() {
                    sel.map(|p| {
                        if p.node == absorbed_id {
                            Point::new(keep_id, shift + p.offset)
                        } else {
                            p
                        }
                    });
                }
            }
            log.push((absorbed_id, NodeClass::Text, MutationKind::Destroyed, origin));
            log.push((keep_id, NodeClass::Text, MutationKind::Updated, origin));
        }

        paragraph.children.retain(|n| {
            let empty_run = matches!(&n.kind, NodeKind::Text(run) if run.content.is_empty());
            let held = selection.is_some_and(|s| s.touches(n.id));
            if empty_run && !held {
                log.push((n.id, NodeClass::Text, MutationKind::Destroyed, Origin::Engine));
                false
            } else {
                true
            }
        });

        if paragraph.children.is_empty() {
            self.paragraph = None;
            selection = None;
        }
        self.selection = selection;

        for (id, class, kind, origin) in log {
            self.record(id, class, kind, origin);
        }
    }
}
