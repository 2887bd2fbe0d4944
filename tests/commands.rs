//! Command surface tests
//!
//! clear / setSingleToken / commit, and the token chip affordances.

mod common;

use common::{
    assert_settled, committed, send, send_all, shape, single_token_model, space_split_model,
    token_count,
};
use tokenfield::commands::Cmd;
use tokenfield::messages::{CommandMsg, InputMsg, Msg};
use tokenfield::model::{Point, Selection};
use tokenfield::projection::ChangeSnapshot;
use tokenfield::tracing::TreeSnapshot;
use tokenfield::update::update;

// ========================================================================
// clear / setSingleToken
// ========================================================================

#[test]
fn test_set_token_then_clear_round_trip() {
    let mut model = single_token_model();
    let log = send_all(
        &mut model,
        vec![
            Msg::set_single_token("東京駅", "valid query"),
            Msg::clear(false),
        ],
    );

    assert!(model.document.is_empty());
    assert!(model.markers.is_empty());
    assert_eq!(model.snapshot(), ChangeSnapshot::Empty);
    assert_eq!(
        log.changes(),
        vec![&committed("valid query"), &ChangeSnapshot::Empty]
    );
    assert!(!model.focused);
}

#[test]
fn test_clear_with_focus_requests_focus() {
    let mut model = space_split_model();
    send(&mut model, Msg::insert("東京 駅"));
    let log = send(&mut model, Msg::clear(true));

    assert_eq!(log.focus_requests, 1);
    assert!(model.focused);
    assert!(model.document.is_empty());
    // the chip strip is emptied too
    assert_eq!(log.renders, vec![Vec::new()]);
}

#[test]
fn test_set_single_token_replaces_everything() {
    let mut model = space_split_model();
    send(&mut model, Msg::insert("東京 駅 大阪"));
    send(
        &mut model,
        Msg::Command(CommandMsg::SetSingleToken {
            text: "名古屋".to_string(),
            classification: "text is 名古屋".to_string(),
            disabled: false,
            focus: true,
        }),
    );

    assert_eq!(shape(&model), vec!["token(名古屋)", "marker"]);
    let marker = model.document.marker_ids()[0];
    assert_eq!(model.document.caret(), Some(Point::new(marker, 1)));
    assert_settled(&model);
}

#[test]
fn test_set_single_token_keeps_caller_flags() {
    let mut model = single_token_model();
    send(
        &mut model,
        Msg::Command(CommandMsg::SetSingleToken {
            text: "大阪".to_string(),
            classification: "invalid query".to_string(),
            disabled: true,
            focus: false,
        }),
    );

    let token = model.document.children()[0].as_token().expect("token");
    assert!(token.disabled);
    assert_eq!(token.classification, "invalid query");
    assert!(model.document.selection().is_none());
}

// ========================================================================
// commit
// ========================================================================

#[test]
fn test_commit_is_idempotent() {
    let mut model = space_split_model();
    send(&mut model, Msg::insert("東京 駅"));
    send(&mut model, Msg::commit(false));
    let first = TreeSnapshot::from_document(&model.document);

    let cmd = update(&mut model, Msg::commit(false));
    let second = TreeSnapshot::from_document(&model.document);

    assert_eq!(first, second);
    assert_eq!(cmd, None);
}

#[test]
fn test_commit_tokenizes_every_run() {
    let mut model = space_split_model();
    send(&mut model, Msg::insert("東京"));
    send(&mut model, Msg::commit(false));

    assert_eq!(shape(&model), vec!["token(東京)", "marker"]);
    assert_eq!(model.snapshot(), committed("text is 東京"));
}

#[test]
fn test_commit_with_focus_selects_end() {
    let mut model = single_token_model();
    send(&mut model, Msg::insert("東京"));
    let cmd = update(&mut model, Msg::commit(true)).expect("command");

    assert!(cmd.flatten().contains(&Cmd::Focus));
    let marker = model.document.marker_ids()[0];
    assert_eq!(model.document.caret(), Some(Point::new(marker, 1)));
}

// ========================================================================
// Token affordances
// ========================================================================

#[test]
fn test_remove_token_by_uid() {
    let mut model = space_split_model();
    send(&mut model, Msg::insert("東京 駅 "));
    let first = model.rendered_tokens[0].clone();

    let log = send(&mut model, first.remove_msg());

    assert_eq!(shape(&model), vec!["token(駅)", "text()"]);
    assert_eq!(model.rendered_tokens.len(), 1);
    assert_eq!(log.changes(), vec![&committed("text is 駅")]);
    assert_settled(&model);
}

#[test]
fn test_remove_last_token_clears_markers() {
    let mut model = single_token_model();
    send(&mut model, Msg::set_single_token("東京駅", "valid query"));
    let view = model.rendered_tokens[0].clone();
    send(&mut model, view.remove_msg());

    assert!(model.document.is_empty());
    assert!(model.markers.is_empty());
}

#[test]
fn test_edit_token_turns_it_into_text() {
    let mut model = space_split_model();
    send(&mut model, Msg::insert("東京 駅 "));
    let first = model.rendered_tokens[0].clone();

    send(&mut model, first.edit_msg());

    // the caret left the empty run, so the last token regains its marker
    assert_eq!(shape(&model), vec!["text(東京)", "token(駅)", "marker"]);
    let run = model.document.children()[0].id;
    assert_eq!(model.document.caret(), Some(Point::new(run, 2)));
    assert_eq!(token_count(&model), 1);
}

#[test]
fn test_unknown_uid_is_ignored() {
    let mut model = space_split_model();
    send(&mut model, Msg::insert("東京 "));
    let before = shape(&model);
    let cmd = update(
        &mut model,
        Msg::Token(tokenfield::messages::TokenMsg::Remove {
            uid: "token-999".to_string(),
        }),
    );

    assert_eq!(shape(&model), before);
    assert_eq!(cmd, None);
}

// ========================================================================
// Range selection
// ========================================================================

#[test]
fn test_select_all_then_type_replaces_everything() {
    let mut model = space_split_model();
    send(&mut model, Msg::insert("東京 駅 "));
    send_all(
        &mut model,
        vec![Msg::Input(InputMsg::SelectAll), Msg::insert("大阪")],
    );

    assert_eq!(shape(&model), vec!["text(大阪)"]);
    assert_settled(&model);
}

#[test]
fn test_range_delete_inside_run() {
    let mut model = single_token_model();
    send(&mut model, Msg::insert("東京駅"));
    let run = model.document.children()[0].id;
    send_all(
        &mut model,
        vec![
            Msg::Input(InputMsg::SetSelection {
                anchor: Point::new(run, 0),
                head: Point::new(run, 2),
            }),
            Msg::delete_backward(),
        ],
    );

    assert_eq!(shape(&model), vec!["text(駅)"]);
    assert_eq!(
        model.document.selection(),
        Some(Selection::collapsed(Point::new(run, 0)))
    );
}
