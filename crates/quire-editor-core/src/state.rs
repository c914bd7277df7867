//! Editor state and plugin state reducers.

use crate::autocomplete::AutocompleteState;
use crate::document::Document;
use crate::error::EditorError;
use crate::marks::MarkSet;
use crate::transaction::Transaction;
use crate::types::Selection;

/// A slice of plugin state kept inside `EditorState`.
///
/// `init` runs once when the state is created; `apply` runs for every
/// transaction and returns the next value instead of mutating the old one.
pub trait StateField: Clone {
    fn init(state: &EditorState) -> Self;

    fn apply(&self, tr: &Transaction, old_state: &EditorState, new_state: &EditorState) -> Self;
}

/// One revision of the editor: document, selection and plugin state.
#[derive(Clone, Debug)]
pub struct EditorState {
    doc: Document,
    selection: Selection,
    stored_marks: Option<MarkSet>,
    autocomplete: AutocompleteState,
}

impl EditorState {
    /// Create a state with the cursor at the start of the document.
    pub fn new(doc: Document) -> Self {
        let selection = Selection::collapsed(doc.text_start());
        let mut state = Self {
            doc,
            selection,
            stored_marks: None,
            autocomplete: AutocompleteState::default(),
        };
        state.autocomplete = AutocompleteState::init(&state);
        state
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Marks set aside for the next typed text, if any.
    pub fn stored_marks(&self) -> Option<&MarkSet> {
        self.stored_marks.as_ref()
    }

    pub fn autocomplete(&self) -> &AutocompleteState {
        &self.autocomplete
    }

    /// Start a transaction against this state.
    pub fn tr(&self) -> Transaction {
        Transaction::new(self.doc.clone(), self.selection)
    }

    /// Marks that text typed at the cursor would carry.
    pub fn cursor_marks(&self) -> MarkSet {
        if let Some(marks) = &self.stored_marks {
            return marks.clone();
        }
        self.marks_at(self.selection.head)
    }

    /// Marks of the text around a position.
    pub fn marks_at(&self, pos: usize) -> MarkSet {
        match self.doc.resolve(pos) {
            Ok(at) => self.doc.blocks()[at.block].marks_at(at.parent_offset),
            Err(_) => MarkSet::empty(),
        }
    }

    /// Produce the next state by applying a transaction.
    pub fn apply(&self, tr: &Transaction) -> EditorState {
        let selection = tr.selection();
        let stored_marks = match tr.stored_marks() {
            Some(marks) => marks.cloned(),
            None if tr.doc_changed() || selection != self.selection => None,
            None => self.stored_marks.clone(),
        };

        let mut next = EditorState {
            doc: tr.doc().clone(),
            selection,
            stored_marks,
            autocomplete: self.autocomplete.clone(),
        };
        next.autocomplete = self.autocomplete.apply(tr, self, &next);
        next
    }

    /// Replace the selection without touching the document.
    pub fn with_selection(&self, selection: Selection) -> Result<EditorState, EditorError> {
        self.doc.resolve(selection.anchor)?;
        self.doc.resolve(selection.head)?;
        let mut tr = self.tr();
        tr.set_selection(selection);
        Ok(self.apply(&tr))
    }
}
