//! Single-token exclusivity
//!
//! Fresh user text always wins: every existing token is demoted back into
//! editable text carrying its undecorated display text.

use crate::model::{Document, NodeId, Origin, Point};

use super::Pass;

/// Demote every token. Returns the number of demoted tokens.
pub fn enforce(doc: &mut Document, pass: &Pass<'_>) -> usize {
    let tokens = doc.token_ids();
    for &id in &tokens {
        demote(doc, id, &pass.config.disabled_suffix);
    }

    if doc.token_count() == 0 {
        for marker in doc.marker_ids() {
            tracing::debug!(%marker, "removing orphaned marker");
            doc.remove(marker, Origin::Engine);
        }
    }
    tokens.len()
}

/// Replace a token in place with a text run of its display text, minus the
/// disabled decoration.
///
/// When the caret sits on the token or its marker it lands at the end of
/// the replacement.
pub fn demote(doc: &mut Document, id: NodeId, suffix: &str) -> bool {
    let Some(token) = doc.get(id).and_then(|n| n.as_token()) else {
        return false;
    };
    let text = strip_decoration(&token.display_text, suffix).to_string();

    let marker = doc
        .next_sibling(id)
        .filter(|n| n.is_marker())
        .map(|n| n.id);
    let caret_on_token = doc
        .selection()
        .is_some_and(|s| s.touches(id) || marker.is_some_and(|m| s.touches(m)));
    if caret_on_token {
        doc.select(Point::new(id, 1));
    }

    let replacement = doc.create_text(text);
    let replacement_id = replacement.id;
    doc.replace(id, replacement, Origin::Engine);
    tracing::debug!(token = %id, text = %replacement_id, "demoted token");
    true
}

/// Display text without a trailing disabled decoration
pub fn strip_decoration<'a>(display_text: &'a str, suffix: &str) -> &'a str {
    if suffix.is_empty() {
        return display_text;
    }
    display_text.strip_suffix(suffix).unwrap_or(display_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TokenStyle;

    const SUFFIX: &str = "(クエリが見つかりません)";

    #[test]
    fn test_strip_decoration() {
        assert_eq!(strip_decoration("大阪(クエリが見つかりません)", SUFFIX), "大阪");
        assert_eq!(strip_decoration("東京", SUFFIX), "東京");
        assert_eq!(strip_decoration("東京", ""), "東京");
    }

    #[test]
    fn test_demote_moves_caret_from_marker_to_replacement_end() {
        let mut doc = Document::new();
        let token = doc.create_token("東京", "valid query", false, TokenStyle::Rich);
        let token_id = token.id;
        doc.append(token, Origin::Engine);
        let marker = doc.create_marker("");
        let marker_id = marker.id;
        doc.append(marker, Origin::Engine);
        doc.select_end(marker_id);

        assert!(demote(&mut doc, token_id, SUFFIX));
        let text_id = doc.first().unwrap().id;
        assert!(doc.get(text_id).unwrap().is_text());
        assert_eq!(doc.caret(), Some(Point::new(text_id, 2)));
    }

    #[test]
    fn test_demote_strips_suffix() {
        let mut doc = Document::new();
        let token = doc.create_token(
            format!("大阪{}", SUFFIX),
            "invalid query",
            true,
            TokenStyle::Plain,
        );
        let id = token.id;
        doc.append(token, Origin::Engine);
        demote(&mut doc, id, SUFFIX);
        assert_eq!(doc.text_content(), "大阪");
        assert_eq!(doc.token_count(), 0);
    }
}
