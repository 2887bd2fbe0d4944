//! External command handling (clear / set single token / commit)

use crate::commands::Cmd;
use crate::messages::CommandMsg;
use crate::model::{EditorModel, Origin};
use crate::normalize::tokenizer;

pub fn update_command(model: &mut EditorModel, msg: CommandMsg) -> Vec<Cmd> {
    match msg {
        CommandMsg::Clear { focus_after } => {
            model.composition = None;
            model.document.clear(Origin::Engine);
            tracing::debug!(focus_after, "cleared document");
            focus_if(model, focus_after)
        }

        CommandMsg::SetSingleToken {
            text,
            classification,
            disabled,
            focus,
        } => {
            model.composition = None;
            let style = model.config.token_style;
            let doc = &mut model.document;
            doc.clear(Origin::Engine);
            let token = doc.create_token(text, classification, disabled, style);
            let id = token.id;
            doc.append(token, Origin::Engine);
            if focus {
                doc.select_end(id);
            }
            tracing::debug!(token = %id, "installed single token");
            focus_if(model, focus)
        }

        CommandMsg::Commit { focus } => {
            model.composition = None;
            let (doc, _, pass) = model.pass_parts();
            tokenizer::commit(doc, &pass);
            if focus {
                if let Some(last) = doc.last().map(|n| n.id) {
                    doc.select_end(last);
                }
            }
            focus_if(model, focus)
        }
    }
}

fn focus_if(model: &mut EditorModel, focus: bool) -> Vec<Cmd> {
    if focus {
        model.focused = true;
        vec![Cmd::Focus]
    } else {
        Vec::new()
    }
}
