//! Space-split tokenizer
//!
//! Turns whitespace-delimited words in user-edited text runs into tokens.
//! A run holding a single word without a trailing separator is left alone so
//! the user can keep extending it; [`commit`] forces the remainder.

use crate::model::{Document, NodeId, Origin};
use crate::projection::visible_text;

use super::Pass;

/// ASCII space and ideographic space separate words
pub fn is_separator(c: char) -> bool {
    c == ' ' || c == '\u{3000}'
}

/// Words of `text`, ignoring leading/trailing separator runs
pub fn split_words(text: &str) -> Vec<&str> {
    text.split(is_separator).filter(|w| !w.is_empty()).collect()
}

/// Tokenize one text run. Returns true when tokens were emitted.
pub fn tokenize_run(doc: &mut Document, id: NodeId, pass: &Pass<'_>) -> bool {
    let Some(run) = doc.get(id).and_then(|n| n.as_text()) else {
        return false;
    };
    let content = run.content.clone();
    let words = split_words(&content);
    let trailing = content.ends_with(is_separator);

    let emit = match words.len() {
        0 => false,
        1 => trailing,
        _ => true,
    };
    if !emit {
        tracing::trace!(run = %id, "no complete word");
        return false;
    }

    for word in &words {
        let token = pass.make_token(doc, word);
        doc.insert_before(id, token, Origin::Engine);
    }

    // the emptied run survives only to hold the caret
    doc.select_end(id);
    doc.set_text(id, "", Origin::Engine);
    tracing::debug!(run = %id, count = words.len(), "tokenized run");
    true
}

/// Force every remaining text run into tokens, then clear the selection.
///
/// Space-split editors turn each non-blank run into one token and drop
/// blank runs. Exclusive editors collapse the whole field into a single
/// token classified by the oracle.
pub fn commit(doc: &mut Document, pass: &Pass<'_>) {
    if pass.config.exclusive {
        commit_single(doc, pass);
    } else {
        commit_runs(doc, pass);
    }
    doc.clear_selection();
}

fn commit_runs(doc: &mut Document, pass: &Pass<'_>) {
    for id in doc.text_ids() {
        let Some(run) = doc.get(id).and_then(|n| n.as_text()) else {
            continue;
        };
        let text = visible_text(&run.content, &pass.config.marker_payload);
        let word = text.trim_matches(is_separator).to_string();

        if word.is_empty() {
            doc.remove(id, Origin::Engine);
        } else {
            let token = pass.make_token(doc, &word);
            doc.replace(id, token, Origin::Engine);
        }
    }
}

fn commit_single(doc: &mut Document, pass: &Pass<'_>) {
    if doc.text_ids().is_empty() {
        // already a lone token, or nothing at all
        return;
    }

    let flattened: String = doc
        .children()
        .iter()
        .filter(|n| !n.is_marker())
        .map(|n| visible_text(n.text_content(), &pass.config.marker_payload))
        .collect();
    let query = flattened.trim_matches(is_separator).to_string();

    doc.clear(Origin::Engine);
    if query.is_empty() {
        return;
    }
    let token = pass.make_token(doc, &query);
    doc.append(token, Origin::Engine);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_words_mixed_separators() {
        assert_eq!(split_words("東京 駅"), vec!["東京", "駅"]);
        assert_eq!(split_words("　東京　 駅 "), vec!["東京", "駅"]);
        assert!(split_words("  　").is_empty());
        assert!(split_words("").is_empty());
    }

    #[test]
    fn test_is_separator() {
        assert!(is_separator(' '));
        assert!(is_separator('\u{3000}'));
        assert!(!is_separator('\t'));
        assert!(!is_separator('\u{FEFF}'));
    }
}
