//! Token chip affordances

use crate::commands::Cmd;
use crate::messages::TokenMsg;
use crate::model::{EditorModel, Origin, Point};
use crate::normalize::exclusivity;

pub fn update_token(model: &mut EditorModel, msg: TokenMsg) -> Vec<Cmd> {
    let doc = &mut model.document;
    match msg {
        TokenMsg::Remove { uid } => {
            let Some(id) = doc.find_token_by_uid(&uid).map(|n| n.id) else {
                tracing::debug!(%uid, "remove: no such token");
                return Vec::new();
            };
            doc.remove(id, Origin::User);
            if doc.token_count() == 0 {
                for marker in doc.marker_ids() {
                    doc.remove(marker, Origin::Engine);
                }
            }
        }

        TokenMsg::Edit { uid } => {
            let Some(id) = doc.find_token_by_uid(&uid).map(|n| n.id) else {
                tracing::debug!(%uid, "edit: no such token");
                return Vec::new();
            };
            // caret after the token, so it lands at the end of the text
            doc.select(Point::new(id, 1));
            exclusivity::demote(doc, id, &model.config.disabled_suffix);
        }
    }
    Vec::new()
}
