//! Presentation boundary for rich tokens
//!
//! The core never renders anything; it hands the collaborator a view per
//! rich token and accepts the affordance messages back.

use serde::Serialize;

use crate::config::EditorConfig;
use crate::messages::{Msg, TokenMsg};
use crate::model::Document;

/// What the collaborator needs to draw one token chip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenView {
    /// Display text, decorated when disabled
    pub display_text: String,
    pub uid: String,
    pub disabled: bool,
}

impl TokenView {
    /// Message for the chip's close button
    pub fn remove_msg(&self) -> Msg {
        Msg::Token(TokenMsg::Remove {
            uid: self.uid.clone(),
        })
    }

    /// Message for a click on the chip body
    pub fn edit_msg(&self) -> Msg {
        Msg::Token(TokenMsg::Edit {
            uid: self.uid.clone(),
        })
    }
}

/// Views for every rich token, in document order
pub fn token_views(doc: &Document, config: &EditorConfig) -> Vec<TokenView> {
    doc.children()
        .iter()
        .filter(|n| n.is_rich_token())
        .filter_map(|n| n.as_token())
        .map(|token| TokenView {
            display_text: decorate(&token.display_text, token.disabled, &config.disabled_suffix),
            uid: token.uid.clone(),
            disabled: token.disabled,
        })
        .collect()
}

fn decorate(text: &str, disabled: bool, suffix: &str) -> String {
    if disabled && !text.ends_with(suffix) {
        format!("{}{}", text, suffix)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Origin, TokenStyle};

    #[test]
    fn test_disabled_token_is_decorated() {
        let config = EditorConfig::single_token();
        let mut doc = Document::new();
        let token = doc.create_token("大阪", "invalid query", true, TokenStyle::Rich);
        doc.append(token, Origin::Engine);

        let views = token_views(&doc, &config);
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].display_text, "大阪(クエリが見つかりません)");
        assert!(views[0].disabled);
    }

    #[test]
    fn test_plain_tokens_have_no_views() {
        let config = EditorConfig::single_plain_token();
        let mut doc = Document::new();
        let token = doc.create_token("東京", "valid query", false, TokenStyle::Plain);
        doc.append(token, Origin::Engine);
        assert!(token_views(&doc, &config).is_empty());
    }

    #[test]
    fn test_affordance_messages_carry_uid() {
        let view = TokenView {
            display_text: "東京".to_string(),
            uid: "token-7".to_string(),
            disabled: false,
        };
        assert_eq!(
            view.remove_msg(),
            Msg::Token(TokenMsg::Remove {
                uid: "token-7".to_string()
            })
        );
    }
}
