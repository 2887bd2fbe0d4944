//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use crate::model::Point;

/// Caret movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Raw edit events delivered by the host substrate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMsg {
    // === Text ===
    /// Insert text at the caret (replacing a range selection).
    /// A `'\n'` becomes a line-break placeholder.
    InsertText(String),
    /// Enter key
    InsertLineBreak,
    /// Backspace
    DeleteBackward,
    /// Delete key
    DeleteForward,

    // === Caret ===
    MoveCaret(Direction),
    MoveToStart,
    MoveToEnd,
    SelectAll,
    /// Place the selection explicitly (pointer interaction)
    SetSelection { anchor: Point, head: Point },

    // === Input method composition ===
    CompositionStart,
    /// Provisional text replaces the previous provisional text
    CompositionUpdate(String),
    /// Final text; normalization resumes afterwards
    CompositionEnd(String),

    /// The substrate folded the marker under the caret into the text that
    /// follows it, without telling the engine
    SubstrateMergeMarker(String),

    // === Focus ===
    Focus,
    /// Commits pending text and reports `BlurCommit`
    Blur,
}

/// Structural commands from external callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandMsg {
    /// Empty the field, optionally keeping focus
    Clear { focus_after: bool },
    /// Replace everything with exactly one token
    SetSingleToken {
        text: String,
        classification: String,
        disabled: bool,
        focus: bool,
    },
    /// Force remaining text into tokens
    Commit { focus: bool },
}

/// Token affordances invoked by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenMsg {
    /// Close button: drop the token
    Remove { uid: String },
    /// Click: turn the token back into editable text
    Edit { uid: String },
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Raw edits, caret movement, composition and focus
    Input(InputMsg),
    /// External commands (clear / set token / commit)
    Command(CommandMsg),
    /// Token chip affordances
    Token(TokenMsg),
}

// Convenience constructors for common messages
impl Msg {
    pub fn insert(text: impl Into<String>) -> Self {
        Msg::Input(InputMsg::InsertText(text.into()))
    }

    /// Enter, which submits in a single-line editor
    pub fn enter() -> Self {
        Msg::Input(InputMsg::InsertLineBreak)
    }

    pub fn delete_backward() -> Self {
        Msg::Input(InputMsg::DeleteBackward)
    }

    pub fn move_caret(direction: Direction) -> Self {
        Msg::Input(InputMsg::MoveCaret(direction))
    }

    pub fn clear(focus_after: bool) -> Self {
        Msg::Command(CommandMsg::Clear { focus_after })
    }

    pub fn set_single_token(text: impl Into<String>, classification: impl Into<String>) -> Self {
        Msg::Command(CommandMsg::SetSingleToken {
            text: text.into(),
            classification: classification.into(),
            disabled: false,
            focus: false,
        })
    }

    pub fn commit(focus: bool) -> Self {
        Msg::Command(CommandMsg::Commit { focus })
    }
}
