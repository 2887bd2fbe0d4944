//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions. Every message is
//! one logical update: the handler applies the raw change, then the
//! normalization pipeline settles the tree and the projector decides what
//! collaborators hear about. Nothing in between is observable.

mod command;
mod input;
mod token;

use crate::commands::{Cmd, Notification};
use crate::messages::Msg;
use crate::model::EditorModel;
use crate::normalize;
use crate::presentation::token_views;

#[cfg(debug_assertions)]
use crate::tracing::TreeSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use command::update_command;
pub use input::update_input;
pub use token::update_token;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut EditorModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut EditorModel, msg: Msg) -> Option<Cmd> {
    let cmds = match msg {
        Msg::Input(m) => input::update_input(model, m),
        Msg::Command(m) => command::update_command(model, m),
        Msg::Token(m) => token::update_token(model, m),
    };

    if model.is_composing() {
        // the host still owns the provisional text
        return Cmd::from_vec(cmds);
    }

    // feedback about the input precedes the change it causes
    let (mut ordered, after): (Vec<Cmd>, Vec<Cmd>) = cmds
        .into_iter()
        .partition(|c| matches!(c, Cmd::Notify(Notification::InvalidInput(_))));
    ordered.extend(settle_and_project(model));
    ordered.extend(after);
    Cmd::from_vec(ordered)
}

/// Run the normalization pipeline to a fixpoint, then project the result
pub fn settle_and_project(model: &mut EditorModel) -> Vec<Cmd> {
    let outcome = {
        let (doc, markers, pass) = model.pass_parts();
        normalize::settle(doc, markers, &pass)
    };
    if outcome.changed() {
        tracing::debug!(
            rounds = outcome.rounds,
            mutations = outcome.mutations,
            tokenized = outcome.tokenized,
            demoted = outcome.demoted,
            "settled"
        );
    }
    let mut cmds = Vec::new();

    let projection = model.projector.project(&model.document, &model.config);
    let repeat_count = model.history.record(projection.snapshot.clone());
    if projection.delivered {
        cmds.push(Cmd::Notify(Notification::Change(projection.snapshot)));
    } else {
        tracing::trace!(repeat_count, "snapshot unchanged");
    }

    if outcome.submitted && model.config.signal_input_complete {
        cmds.push(Cmd::Notify(Notification::InputComplete));
    }

    let views = token_views(&model.document, &model.config);
    if views != model.rendered_tokens {
        model.rendered_tokens = views.clone();
        cmds.push(Cmd::RenderTokens(views));
    }
    cmds
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after tree state, logs diffs and checks the tree
/// invariants after every settled update.
#[cfg(debug_assertions)]
fn update_traced(model: &mut EditorModel, msg: Msg) -> Option<Cmd> {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();

    let before = TreeSnapshot::from_document(&model.document);
    debug!(target: "message", msg = %msg_name, "processing");

    let result = update_inner(model, msg);

    let after = TreeSnapshot::from_document(&model.document);
    if let Some(diff) = before.diff(&after) {
        debug!(target: "tree", %diff, "state changed");
    }

    model.assert_invariants_with_context(&msg_name);
    result
}

/// Get a display name for a message type
///
/// Uses Debug formatting to include variant names and arguments.
/// Example outputs:
/// - `Input::InsertText("東京")`
/// - `Command::Clear { focus_after: false }`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Input(m) => format!("Input::{:?}", m),
        Msg::Command(m) => format!("Command::{:?}", m),
        Msg::Token(m) => format!("Token::{:?}", m),
    }
}
