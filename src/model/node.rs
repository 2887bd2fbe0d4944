//! Inline node variants for the single-paragraph document tree

use serde::{Deserialize, Serialize};

/// Glyph the text substrate renders for a marker.
///
/// The substrate only ever sees this character; what content queries return
/// is the marker's payload.
pub const MARKER_GLYPH: char = '\u{FEFF}';

/// Stable node identity, unique for the lifetime of one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Capability level of tokens in an editor configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenStyle {
    /// Behaves as ordinary text for caret purposes, no affordances
    Plain,
    /// Interactive chip with close/click affordances; needs markers
    #[default]
    Rich,
}

/// Editable text segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub content: String,
}

/// Atomic inline unit representing a recognized word or query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub display_text: String,
    /// Free-form label, e.g. "valid query"
    pub classification: String,
    /// Identity exposed to the presentation layer
    pub uid: String,
    /// Presentation-only: the token could not be resolved
    pub disabled: bool,
    pub style: TokenStyle,
}

/// Zero-width companion placed after a rich token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Returned by content queries instead of the glyph
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Text(TextRun),
    Token(Token),
    Marker(Marker),
    /// Line-break placeholder; stripped in single-line editors
    LineBreak,
}

/// Coarse node class, used by the mutation log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeClass {
    Text,
    Token,
    Marker,
    LineBreak,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
}

impl Node {
    pub fn class(&self) -> NodeClass {
        match self.kind {
            NodeKind::Text(_) => NodeClass::Text,
            NodeKind::Token(_) => NodeClass::Token,
            NodeKind::Marker(_) => NodeClass::Marker,
            NodeKind::LineBreak => NodeClass::LineBreak,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }

    pub fn is_token(&self) -> bool {
        matches!(self.kind, NodeKind::Token(_))
    }

    pub fn is_rich_token(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Token(Token {
                style: TokenStyle::Rich,
                ..
            })
        )
    }

    pub fn is_marker(&self) -> bool {
        matches!(self.kind, NodeKind::Marker(_))
    }

    pub fn is_line_break(&self) -> bool {
        matches!(self.kind, NodeKind::LineBreak)
    }

    pub fn as_text(&self) -> Option<&TextRun> {
        match &self.kind {
            NodeKind::Text(run) => Some(run),
            _ => None,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match &self.kind {
            NodeKind::Token(token) => Some(token),
            _ => None,
        }
    }

    /// Number of caret positions past offset 0.
    ///
    /// Text runs are measured in chars; every other variant is atomic and
    /// only admits offsets 0 (before) and 1 (after).
    pub fn extent(&self) -> usize {
        match &self.kind {
            NodeKind::Text(run) => run.content.chars().count(),
            _ => 1,
        }
    }

    /// Text returned by content queries
    pub fn text_content(&self) -> &str {
        match &self.kind {
            NodeKind::Text(run) => &run.content,
            NodeKind::Token(token) => &token.display_text,
            NodeKind::Marker(marker) => &marker.payload,
            NodeKind::LineBreak => "\n",
        }
    }

    /// Short type name for traces and dumps
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            NodeKind::Text(_) => "text",
            NodeKind::Token(_) => "token",
            NodeKind::Marker(_) => "marker",
            NodeKind::LineBreak => "linebreak",
        }
    }
}

/// Byte index of the `char_offset`-th char (or the end of the string)
pub(crate) fn byte_index(s: &str, char_offset: usize) -> usize {
    s.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(kind: NodeKind) -> Node {
        Node {
            id: NodeId(1),
            kind,
        }
    }

    #[test]
    fn test_text_extent_counts_chars() {
        let n = node(NodeKind::Text(TextRun {
            content: "東京駅".to_string(),
        }));
        assert_eq!(n.extent(), 3);
        assert_eq!(n.text_content(), "東京駅");
    }

    #[test]
    fn test_atomic_nodes_have_unit_extent() {
        let marker = node(NodeKind::Marker(Marker {
            payload: String::new(),
        }));
        assert_eq!(marker.extent(), 1);
        assert_eq!(marker.text_content(), "");
        assert_eq!(node(NodeKind::LineBreak).extent(), 1);
    }

    #[test]
    fn test_rich_token_detection() {
        let mut token = Token {
            display_text: "東京".to_string(),
            classification: "text is 東京".to_string(),
            uid: "token-1".to_string(),
            disabled: false,
            style: TokenStyle::Rich,
        };
        assert!(node(NodeKind::Token(token.clone())).is_rich_token());
        token.style = TokenStyle::Plain;
        let plain = node(NodeKind::Token(token));
        assert!(plain.is_token());
        assert!(!plain.is_rich_token());
    }

    #[test]
    fn test_byte_index_multibyte() {
        assert_eq!(byte_index("東京", 1), 3);
        assert_eq!(byte_index("東京", 2), 6);
        assert_eq!(byte_index("東京", 9), 6);
    }
}
