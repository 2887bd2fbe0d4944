//! Single-line rule: line-break placeholders never survive a pass

use crate::model::{Document, Mutation, MutationKind, NodeClass, Origin};

/// Remove every line break. Returns true when one of them was typed by the
/// user in this batch, i.e. the input should be treated as submitted.
pub fn strip(doc: &mut Document, batch: &[Mutation]) -> bool {
    let mut submitted = false;
    for id in doc.line_break_ids() {
        submitted |= batch.iter().any(|m| {
            m.id == id
                && m.class == NodeClass::LineBreak
                && m.kind == MutationKind::Created
                && m.origin == Origin::User
        });
        tracing::debug!(line_break = %id, "stripping line break");
        doc.remove(id, Origin::Engine);
    }
    submitted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_merges_surrounding_text() {
        let mut doc = Document::new();
        let a = doc.create_text("東京");
        doc.append(a, Origin::User);
        let lb = doc.create_line_break();
        doc.append(lb, Origin::User);
        let b = doc.create_text("駅");
        doc.append(b, Origin::User);

        let batch = doc.take_mutations();
        assert!(strip(&mut doc, &batch));
        assert_eq!(doc.children().len(), 1);
        assert_eq!(doc.text_content(), "東京駅");
    }

    #[test]
    fn test_engine_line_break_is_not_a_submit() {
        let mut doc = Document::new();
        let lb = doc.create_line_break();
        doc.append(lb, Origin::Engine);
        let batch = doc.take_mutations();
        assert!(!strip(&mut doc, &batch));
        assert!(doc.is_empty());
    }
}
