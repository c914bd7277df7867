//! Editor commands callable from JavaScript.

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

use quire_editor_browser::{BlockKind, EditorState, Mark, Selection, Transaction, commands};

/// JavaScript-friendly editor command.
///
/// Mirrors the menu and keymap commands, plus plain text insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum JsEditorCommand {
    // Inline formatting
    ToggleBold,
    ToggleItalic,
    ToggleCode,

    // Block types
    SetParagraph,
    SetHeading { level: u8 },

    // Editing
    InsertText { text: String },
    SplitBlock,
    DeleteBackward,

    // Selection
    Select { anchor: usize, head: usize },
}

impl JsEditorCommand {
    /// The transaction this command produces, if it applies to `state`.
    pub fn transaction(&self, state: &EditorState) -> Option<Transaction> {
        match self {
            Self::ToggleBold => commands::toggle_mark(state, Mark::Strong),
            Self::ToggleItalic => commands::toggle_mark(state, Mark::Em),
            Self::ToggleCode => commands::toggle_mark(state, Mark::Code),
            Self::SetParagraph => commands::set_block_type(state, BlockKind::Paragraph),
            Self::SetHeading { level } => {
                commands::set_block_type(state, BlockKind::Heading((*level).clamp(1, 6)))
            }
            Self::InsertText { text } => commands::insert_text(state, text),
            Self::SplitBlock => commands::split_block(state),
            Self::DeleteBackward => commands::delete_backward(state),
            Self::Select { anchor, head } => {
                let doc = state.doc();
                if doc.resolve(*anchor).is_err() || doc.resolve(*head).is_err() {
                    return None;
                }
                let mut tr = state.tr();
                tr.set_selection(Selection::new(*anchor, *head));
                Some(tr)
            }
        }
    }
}

/// Parse a command from JS.
pub fn parse_command(value: JsValue) -> Result<JsEditorCommand, JsError> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsError::new(&format!("Invalid command: {}", e)))
}
