//! Browser event handling for the editor.
//!
//! Turns `beforeinput` and `keydown` events into editor terms. The handlers
//! here only compute transactions; the caller decides whether to dispatch
//! and whether to call `preventDefault`.

use quire_editor_core::{
    EditorState, Key, KeyCombo, Mark, Modifiers, Transaction, commands,
};

/// W3C Input Events `inputType` values the editor distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputType {
    InsertText,
    InsertCompositionText,
    InsertLineBreak,
    InsertParagraph,
    InsertFromPaste,
    InsertFromDrop,
    InsertReplacementText,
    DeleteContentBackward,
    DeleteContentForward,
    DeleteWordBackward,
    DeleteWordForward,
    DeleteSoftLineBackward,
    DeleteSoftLineForward,
    DeleteHardLineBackward,
    DeleteHardLineForward,
    DeleteByCut,
    DeleteByDrag,
    HistoryUndo,
    HistoryRedo,
    FormatBold,
    FormatItalic,
    Unknown(String),
}

/// Parse a browser inputType string to an InputType enum.
pub fn parse_browser_input_type(s: &str) -> InputType {
    match s {
        // Insertion
        "insertText" => InputType::InsertText,
        "insertCompositionText" => InputType::InsertCompositionText,
        "insertLineBreak" => InputType::InsertLineBreak,
        "insertParagraph" => InputType::InsertParagraph,
        "insertFromPaste" => InputType::InsertFromPaste,
        "insertFromDrop" => InputType::InsertFromDrop,
        "insertReplacementText" => InputType::InsertReplacementText,

        // Deletion
        "deleteContentBackward" => InputType::DeleteContentBackward,
        "deleteContentForward" => InputType::DeleteContentForward,
        "deleteWordBackward" => InputType::DeleteWordBackward,
        "deleteWordForward" => InputType::DeleteWordForward,
        "deleteSoftLineBackward" => InputType::DeleteSoftLineBackward,
        "deleteSoftLineForward" => InputType::DeleteSoftLineForward,
        "deleteHardLineBackward" => InputType::DeleteHardLineBackward,
        "deleteHardLineForward" => InputType::DeleteHardLineForward,
        "deleteByCut" => InputType::DeleteByCut,
        "deleteByDrag" => InputType::DeleteByDrag,

        // History
        "historyUndo" => InputType::HistoryUndo,
        "historyRedo" => InputType::HistoryRedo,

        // Formatting
        "formatBold" => InputType::FormatBold,
        "formatItalic" => InputType::FormatItalic,

        other => InputType::Unknown(other.to_string()),
    }
}

/// Result of handling a beforeinput event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeforeInputResult {
    /// Event was handled, prevent default browser behavior.
    Handled,
    /// Event should be handled by browser (e.g., during composition).
    PassThrough,
}

/// Context for beforeinput handling.
#[derive(Debug, Clone)]
pub struct BeforeInputContext {
    pub input_type: InputType,
    /// The data (text to insert, if any).
    pub data: Option<String>,
    /// Whether the event is part of an IME composition.
    pub is_composing: bool,
}

impl BeforeInputContext {
    pub fn from_event(event: &web_sys::InputEvent) -> Self {
        Self {
            input_type: parse_browser_input_type(&event.input_type()),
            // paste puts its text in dataTransfer rather than data
            data: event
                .data()
                .or_else(|| {
                    event
                        .data_transfer()
                        .and_then(|dt| dt.get_data("text/plain").ok())
                })
                .filter(|d| !d.is_empty()),
            is_composing: event.is_composing(),
        }
    }
}

/// Decide what a beforeinput event does to `state`.
///
/// Handled events may still yield no transaction, e.g. Backspace at the
/// very start of the document. The browser must not act on those either.
/// Only composition passes through: any other DOM edit the document cannot
/// follow would be undone by the next render.
pub fn handle_beforeinput(
    state: &EditorState,
    ctx: &BeforeInputContext,
) -> (BeforeInputResult, Option<Transaction>) {
    // composition text is committed on compositionend
    if ctx.is_composing || ctx.input_type == InputType::InsertCompositionText {
        return (BeforeInputResult::PassThrough, None);
    }

    let tr = match &ctx.input_type {
        InputType::InsertText | InputType::InsertFromPaste | InputType::InsertReplacementText => {
            ctx.data
                .as_deref()
                .and_then(|text| commands::insert_text(state, text))
        }
        InputType::InsertLineBreak | InputType::InsertParagraph => commands::split_block(state),
        InputType::DeleteContentBackward => commands::delete_backward(state),
        InputType::DeleteContentForward => commands::delete_forward(state),
        InputType::DeleteWordBackward => commands::delete_word_backward(state),
        InputType::DeleteWordForward => commands::delete_word_forward(state),
        InputType::DeleteSoftLineBackward | InputType::DeleteHardLineBackward => {
            commands::delete_to_block_start(state)
        }
        InputType::DeleteSoftLineForward | InputType::DeleteHardLineForward => {
            commands::delete_to_block_end(state)
        }
        InputType::DeleteByCut | InputType::DeleteByDrag => delete_selection(state),
        InputType::FormatBold => commands::toggle_mark(state, Mark::Strong),
        InputType::FormatItalic => commands::toggle_mark(state, Mark::Em),
        // no history, no drop payload and no other formats
        InputType::HistoryUndo
        | InputType::HistoryRedo
        | InputType::InsertFromDrop
        | InputType::InsertCompositionText
        | InputType::Unknown(_) => None,
    };

    tracing::trace!(
        target: "quire::input",
        input_type = ?ctx.input_type,
        changed = tr.is_some(),
        "beforeinput"
    );
    (BeforeInputResult::Handled, tr)
}

fn delete_selection(state: &EditorState) -> Option<Transaction> {
    let sel = state.selection();
    if sel.is_empty() {
        return None;
    }
    commands::delete_backward(state)
}

/// Key combination of a keydown event.
pub fn key_combo_from_event(event: &web_sys::KeyboardEvent) -> KeyCombo {
    KeyCombo::with_modifiers(
        Key::from_dom_key(&event.key()),
        Modifiers {
            ctrl: event.ctrl_key(),
            alt: event.alt_key(),
            shift: event.shift_key(),
            meta: event.meta_key(),
        },
    )
}
