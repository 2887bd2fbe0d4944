//! Raw edit handling: text insertion, deletion, caret movement,
//! composition and focus

use crate::commands::{Cmd, Notification};
use crate::config::{InvalidInputPolicy, MULTI_QUERY_REASON};
use crate::messages::{Direction, InputMsg};
use crate::model::{
    Composition, Document, EditorModel, NodeId, Origin, Point, Selection, MARKER_GLYPH,
};
use crate::normalize::tokenizer;

pub fn update_input(model: &mut EditorModel, msg: InputMsg) -> Vec<Cmd> {
    match msg {
        InputMsg::InsertText(text) => insert_text(model, &text),

        InputMsg::InsertLineBreak => {
            delete_selection(&mut model.document);
            insert_line_break(&mut model.document);
            Vec::new()
        }

        InputMsg::DeleteBackward => {
            delete_backward(&mut model.document);
            Vec::new()
        }

        InputMsg::DeleteForward => {
            delete_forward(&mut model.document);
            Vec::new()
        }

        InputMsg::MoveCaret(direction) => {
            move_caret(&mut model.document, direction);
            Vec::new()
        }

        InputMsg::MoveToStart => {
            let doc = &mut model.document;
            if let Some(first) = doc.first().map(|n| n.id) {
                doc.select_start(first);
            }
            Vec::new()
        }

        InputMsg::MoveToEnd => {
            let doc = &mut model.document;
            if let Some(last) = doc.last().map(|n| n.id) {
                doc.select_end(last);
            }
            Vec::new()
        }

        InputMsg::SelectAll => {
            let doc = &mut model.document;
            let first = doc.first().map(|n| Point::new(n.id, 0));
            let last = doc.last().map(|n| Point::new(n.id, n.extent()));
            if let (Some(anchor), Some(head)) = (first, last) {
                doc.set_selection(Some(Selection::new(anchor, head)));
            }
            Vec::new()
        }

        InputMsg::SetSelection { anchor, head } => {
            model
                .document
                .set_selection(Some(Selection::new(anchor, head)));
            Vec::new()
        }

        InputMsg::CompositionStart => {
            delete_selection(&mut model.document);
            model.composition = Some(Composition::default());
            tracing::debug!("composition started");
            Vec::new()
        }

        InputMsg::CompositionUpdate(text) => {
            let mut composition = model.composition.take().unwrap_or_default();
            replace_provisional(&mut model.document, &mut composition, &text);
            model.composition = Some(composition);
            Vec::new()
        }

        InputMsg::CompositionEnd(text) => {
            let mut composition = model.composition.take().unwrap_or_default();
            let (cmds, blocked) = check_invalid_input(model);
            let text = if blocked { "" } else { text.as_str() };
            replace_provisional(&mut model.document, &mut composition, text);
            tracing::debug!(text, "composition ended");
            cmds
        }

        InputMsg::SubstrateMergeMarker(text) => {
            substrate_merge_marker(&mut model.document, &text);
            Vec::new()
        }

        InputMsg::Focus => {
            model.focused = true;
            let doc = &mut model.document;
            if doc.selection().is_none() {
                if let Some(last) = doc.last().map(|n| n.id) {
                    doc.select_end(last);
                }
            }
            Vec::new()
        }

        InputMsg::Blur => {
            model.composition = None;
            let (doc, _, pass) = model.pass_parts();
            tokenizer::commit(doc, &pass);
            model.focused = false;
            vec![Cmd::Notify(Notification::BlurCommit)]
        }
    }
}

// =============================================================================
// Insertion
// =============================================================================

fn insert_text(model: &mut EditorModel, text: &str) -> Vec<Cmd> {
    let (cmds, blocked) = check_invalid_input(model);
    if blocked {
        return cmds;
    }

    let doc = &mut model.document;
    delete_selection(doc);
    for (i, segment) in text.split('\n').enumerate() {
        if i > 0 {
            insert_line_break(doc);
        }
        insert_str(doc, segment);
    }
    cmds
}

/// Apply the invalid-input policy to user text arriving while a token
/// occupies the field. Returns the feedback and whether to drop the input.
fn check_invalid_input(model: &EditorModel) -> (Vec<Cmd>, bool) {
    let policy = model.config.invalid_input;
    if policy == InvalidInputPolicy::Off || model.document.token_count() == 0 {
        return (Vec::new(), false);
    }
    tracing::debug!(?policy, "text input while a token exists");
    let feedback = vec![Cmd::Notify(Notification::InvalidInput(
        MULTI_QUERY_REASON.to_string(),
    ))];
    (feedback, policy == InvalidInputPolicy::Block)
}

/// Insert plain text at the caret and leave the caret after it.
/// Returns the run and char offset the text landed at.
pub(crate) fn insert_str(doc: &mut Document, text: &str) -> Option<(NodeId, usize)> {
    if text.is_empty() {
        return None;
    }
    let len = text.chars().count();

    let (id, start) = match doc.caret() {
        None => match doc.last().map(|n| (n.id, n.is_text(), n.extent())) {
            Some((id, true, extent)) => {
                doc.insert_chars(id, extent, text, Origin::User);
                (id, extent)
            }
            _ => {
                let run = doc.create_text(text);
                let id = run.id;
                doc.append(run, Origin::User);
                (id, 0)
            }
        },
        Some(caret) => {
            let is_text = doc.get(caret.node)?.is_text();
            if is_text {
                doc.insert_chars(caret.node, caret.offset, text, Origin::User);
                (caret.node, caret.offset)
            } else if caret.offset >= 1 {
                // after an atomic node: extend the following run
                match doc.next_sibling(caret.node).map(|n| (n.id, n.is_text())) {
                    Some((next, true)) => {
                        doc.insert_chars(next, 0, text, Origin::User);
                        (next, 0)
                    }
                    _ => {
                        let run = doc.create_text(text);
                        let id = run.id;
                        doc.insert_after(caret.node, run, Origin::User);
                        (id, 0)
                    }
                }
            } else {
                // before an atomic node: extend the preceding run
                match doc
                    .previous_sibling(caret.node)
                    .map(|n| (n.id, n.is_text(), n.extent()))
                {
                    Some((prev, true, extent)) => {
                        doc.insert_chars(prev, extent, text, Origin::User);
                        (prev, extent)
                    }
                    _ => {
                        let run = doc.create_text(text);
                        let id = run.id;
                        doc.insert_before(caret.node, run, Origin::User);
                        (id, 0)
                    }
                }
            }
        }
    };

    doc.select(Point::new(id, start + len));
    Some((id, start))
}

/// Insert a line-break placeholder at the caret, splitting a text run
fn insert_line_break(doc: &mut Document) {
    let line_break = doc.create_line_break();
    let lb = line_break.id;

    let Some(caret) = doc.caret() else {
        doc.append(line_break, Origin::User);
        doc.select(Point::new(lb, 1));
        return;
    };
    let Some((is_text, extent)) = doc.get(caret.node).map(|n| (n.is_text(), n.extent())) else {
        return;
    };

    if is_text && caret.offset > 0 && caret.offset < extent {
        let tail = doc
            .get(caret.node)
            .and_then(|n| n.as_text())
            .map(|t| t.content.chars().skip(caret.offset).collect::<String>())
            .unwrap_or_default();
        doc.remove_chars(caret.node, caret.offset, extent, Origin::User);
        doc.insert_after(caret.node, line_break, Origin::User);
        let tail_run = doc.create_text(tail);
        let tail_id = tail_run.id;
        doc.insert_after(lb, tail_run, Origin::User);
        doc.select(Point::new(tail_id, 0));
    } else if caret.offset == 0 && !(is_text && extent == 0) {
        doc.insert_before(caret.node, line_break, Origin::User);
    } else {
        doc.insert_after(caret.node, line_break, Origin::User);
        doc.select(Point::new(lb, 1));
    }
}

// =============================================================================
// Deletion
// =============================================================================

/// Delete a range selection. Returns false when the selection is collapsed
/// or absent.
fn delete_selection(doc: &mut Document) -> bool {
    let Some(selection) = doc.selection().filter(|s| !s.is_collapsed()) else {
        return false;
    };
    let Some((start, end)) = doc.ordered(selection) else {
        return false;
    };
    let (Some(si), Some(ei)) = (doc.index_of(start.node), doc.index_of(end.node)) else {
        return false;
    };

    let ids: Vec<NodeId> = doc.children()[si..=ei].iter().map(|n| n.id).collect();
    let start_extent = doc.get(start.node).map(|n| n.extent()).unwrap_or(0);
    let start_is_text = doc.get(start.node).is_some_and(|n| n.is_text());
    let end_is_text = doc.get(end.node).is_some_and(|n| n.is_text());

    doc.select(start);

    if si == ei {
        if start_is_text {
            doc.remove_chars(start.node, start.offset, end.offset, Origin::User);
        } else if start.offset == 0 && end.offset >= 1 {
            doc.remove(start.node, Origin::User);
        }
        return true;
    }

    if end_is_text {
        doc.remove_chars(end.node, 0, end.offset, Origin::User);
    } else if end.offset >= 1 {
        doc.remove(end.node, Origin::User);
    }
    for &id in &ids[1..ids.len() - 1] {
        doc.remove(id, Origin::User);
    }
    // the end run may have merged into the start run by now; its chars sit
    // past the start run's original extent
    if start_is_text {
        doc.remove_chars(start.node, start.offset, start_extent, Origin::User);
    } else if start.offset == 0 {
        doc.remove(start.node, Origin::User);
    }
    tracing::trace!(nodes = ids.len(), "deleted range");
    true
}

fn delete_backward(doc: &mut Document) {
    if delete_selection(doc) {
        return;
    }
    let Some(caret) = doc.caret() else {
        return;
    };
    let Some((is_text, _)) = doc.get(caret.node).map(|n| (n.is_text(), n.extent())) else {
        return;
    };

    if is_text && caret.offset > 0 {
        doc.select(Point::new(caret.node, caret.offset - 1));
        doc.remove_chars(caret.node, caret.offset - 1, caret.offset, Origin::User);
        return;
    }

    let mut target = if !is_text && caret.offset >= 1 {
        Some(caret.node)
    } else {
        doc.previous_sibling(caret.node).map(|n| n.id)
    };
    // markers are zero-width; step over them
    while let Some(id) = target.filter(|id| doc.get(*id).is_some_and(|n| n.is_marker())) {
        target = doc.previous_sibling(id).map(|n| n.id);
    }
    let Some(target) = target else {
        return;
    };
    let Some((target_is_text, extent)) = doc.get(target).map(|n| (n.is_text(), n.extent())) else {
        return;
    };

    if target_is_text {
        if extent > 0 {
            doc.select(Point::new(target, extent - 1));
            doc.remove_chars(target, extent - 1, extent, Origin::User);
        }
    } else {
        doc.remove(target, Origin::User);
    }
}

fn delete_forward(doc: &mut Document) {
    if delete_selection(doc) {
        return;
    }
    let Some(caret) = doc.caret() else {
        return;
    };
    let Some((is_text, extent)) = doc.get(caret.node).map(|n| (n.is_text(), n.extent())) else {
        return;
    };

    if is_text && caret.offset < extent {
        doc.remove_chars(caret.node, caret.offset, caret.offset + 1, Origin::User);
        return;
    }

    let mut target = if !is_text && caret.offset == 0 {
        Some(caret.node)
    } else {
        doc.next_sibling(caret.node).map(|n| n.id)
    };
    while let Some(id) = target.filter(|id| doc.get(*id).is_some_and(|n| n.is_marker())) {
        target = doc.next_sibling(id).map(|n| n.id);
    }
    let Some(target) = target else {
        return;
    };
    let Some(target_is_text) = doc.get(target).map(|n| n.is_text()) else {
        return;
    };

    if target_is_text {
        doc.remove_chars(target, 0, 1, Origin::User);
    } else {
        doc.remove(target, Origin::User);
    }
}

// =============================================================================
// Caret movement
// =============================================================================

fn move_caret(doc: &mut Document, direction: Direction) {
    let Some(selection) = doc.selection() else {
        return;
    };
    if !selection.is_collapsed() {
        if let Some((start, end)) = doc.ordered(selection) {
            doc.select(match direction {
                Direction::Left => start,
                Direction::Right => end,
            });
        }
        return;
    }

    let caret = selection.head;
    let Some((is_text, is_marker, extent)) = doc
        .get(caret.node)
        .map(|n| (n.is_text(), n.is_marker(), n.extent()))
    else {
        return;
    };

    match direction {
        Direction::Left => {
            if is_marker {
                // a marker has no caret position of its own
                if let Some(prev) = doc.previous_sibling(caret.node).map(|n| (n.id, n.extent())) {
                    doc.select(Point::new(prev.0, prev.1));
                }
            } else if is_text && caret.offset > 0 {
                doc.select(Point::new(caret.node, caret.offset - 1));
            } else if !is_text && caret.offset >= 1 {
                doc.select(Point::new(caret.node, 0));
            } else {
                let mut prev = doc.previous_sibling(caret.node).map(|n| n.id);
                while let Some(id) = prev.filter(|id| doc.get(*id).is_some_and(|n| n.is_marker())) {
                    prev = doc.previous_sibling(id).map(|n| n.id);
                }
                if let Some((id, prev_is_text, prev_extent)) = prev
                    .and_then(|id| doc.get(id))
                    .map(|n| (n.id, n.is_text(), n.extent()))
                {
                    let offset = if prev_is_text {
                        prev_extent.saturating_sub(1)
                    } else {
                        0
                    };
                    doc.select(Point::new(id, offset));
                }
            }
        }
        Direction::Right => {
            if is_text && caret.offset < extent {
                doc.select(Point::new(caret.node, caret.offset + 1));
            } else if !is_text && caret.offset == 0 {
                doc.select(Point::new(caret.node, 1));
            } else {
                let mut next = doc.next_sibling(caret.node).map(|n| n.id);
                let mut last_marker = None;
                while let Some(id) = next.filter(|id| doc.get(*id).is_some_and(|n| n.is_marker())) {
                    last_marker = Some(id);
                    next = doc.next_sibling(id).map(|n| n.id);
                }
                match next
                    .and_then(|id| doc.get(id))
                    .map(|n| (n.id, n.is_text(), n.extent()))
                {
                    Some((id, true, next_extent)) => {
                        doc.select(Point::new(id, next_extent.min(1)))
                    }
                    Some((id, false, _)) => doc.select(Point::new(id, 1)),
                    None => {
                        if let Some(marker) = last_marker {
                            doc.select(Point::new(marker, 1));
                        }
                    }
                }
            }
        }
    }
}

// =============================================================================
// Composition
// =============================================================================

/// Swap the provisional composition text for `text`
fn replace_provisional(doc: &mut Document, composition: &mut Composition, text: &str) {
    let len = text.chars().count();

    if let Some((id, start, old_len)) = composition.range {
        let fits = doc
            .get(id)
            .and_then(|n| n.as_text())
            .is_some_and(|t| t.content.chars().count() >= start + old_len);
        if fits {
            doc.select(Point::new(id, start));
            doc.remove_chars(id, start, start + old_len, Origin::User);
            if len > 0 {
                doc.insert_chars(id, start, text, Origin::User);
                doc.select(Point::new(id, start + len));
            }
            composition.range = Some((id, start, len));
            return;
        }
        tracing::debug!(run = %id, "provisional text lost, inserting afresh");
    }

    composition.range = insert_str(doc, text).map(|(id, start)| (id, start, len));
}

// =============================================================================
// Substrate defects
// =============================================================================

/// Fold the marker under the caret (or the last marker) into a new run that
/// starts with the marker glyph, the way the substrate does on its own
fn substrate_merge_marker(doc: &mut Document, text: &str) {
    let marker = doc
        .caret()
        .map(|c| c.node)
        .filter(|id| doc.get(*id).is_some_and(|n| n.is_marker()))
        .or_else(|| doc.marker_ids().last().copied());
    let Some(marker) = marker else {
        tracing::debug!("no marker to merge");
        return;
    };
    let Some(host) = doc.previous_sibling(marker).map(|n| n.id) else {
        return;
    };

    doc.remove(marker, Origin::Substrate);
    let run = doc.create_text(format!("{}{}", MARKER_GLYPH, text));
    let run_id = run.id;
    doc.insert_after(host, run, Origin::Substrate);
    doc.select_end(run_id);
}
