//! Caret and selection types
//!
//! Points address a node by identity plus a caret offset inside it
//! (see [`Node::extent`](super::node::Node::extent)).

use super::node::NodeId;

/// A caret position inside a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub node: NodeId,
    pub offset: usize,
}

impl Point {
    pub const fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// A selection with anchor (fixed end) and head (moving end)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Point,
    pub head: Point,
}

impl Selection {
    pub fn new(anchor: Point, head: Point) -> Self {
        Self { anchor, head }
    }

    /// Create a collapsed selection (caret with no range)
    pub fn collapsed(point: Point) -> Self {
        Self {
            anchor: point,
            head: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    /// The caret position when collapsed
    pub fn caret(&self) -> Option<Point> {
        self.is_collapsed().then_some(self.head)
    }

    /// Check whether either end sits in the given node
    pub fn touches(&self, node: NodeId) -> bool {
        self.anchor.node == node || self.head.node == node
    }

    /// Apply a point mapping to both ends
    pub(crate) fn map(&mut self, f: impl Fn(Point) -> Point) {
        self.anchor = f(self.anchor);
        self.head = f(self.head);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapsed_selection_has_caret() {
        let sel = Selection::collapsed(Point::new(NodeId(3), 2));
        assert!(sel.is_collapsed());
        assert_eq!(sel.caret(), Some(Point::new(NodeId(3), 2)));
    }

    #[test]
    fn test_range_selection_has_no_caret() {
        let sel = Selection::new(Point::new(NodeId(1), 0), Point::new(NodeId(2), 1));
        assert!(!sel.is_collapsed());
        assert_eq!(sel.caret(), None);
        assert!(sel.touches(NodeId(1)));
        assert!(sel.touches(NodeId(2)));
        assert!(!sel.touches(NodeId(3)));
    }
}
