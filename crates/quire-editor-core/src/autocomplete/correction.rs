//! Applying a chosen suggestion back into the document.

use crate::error::EditorError;
use crate::marks::MarkSet;
use crate::platform::EditorHost;
use crate::state::EditorState;
use crate::transaction::Transaction;
use crate::types::Selection;

/// A text range bound to the marks its replacement should carry.
///
/// Built by the trigger for the word under the cursor; applying it swaps the
/// word for the picked text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Correction {
    pub from: usize,
    pub to: usize,
    pub marks: MarkSet,
}

impl Correction {
    pub fn new(from: usize, to: usize, marks: MarkSet) -> Self {
        Self { from, to, marks }
    }

    /// Build the transaction that replaces the range with `text` and puts a
    /// collapsed cursor right after it.
    pub fn transaction(&self, state: &EditorState, text: &str) -> Result<Transaction, EditorError> {
        let mut tr = state.tr();
        tr.replace_with(self.from, self.to, text, &self.marks)?;
        let cursor = tr
            .mapping()
            .maps()
            .last()
            .map(|map| map.map(self.to, 1))
            .unwrap_or(self.to);
        tr.set_selection(Selection::collapsed(cursor));
        Ok(tr)
    }

    /// Replace the range on the host, move the cursor after the inserted
    /// text and refocus the editor. Returns the new cursor position.
    ///
    /// Nothing is dispatched if the range does not lie within the document.
    pub fn apply<H: EditorHost + ?Sized>(&self, host: &mut H, text: &str) -> Result<usize, EditorError> {
        let tr = self.transaction(host.state(), text)?;
        let cursor = tr.selection().head;
        tracing::debug!(
            target: "quire::autocomplete",
            from = self.from,
            to = self.to,
            text,
            cursor,
            "applying correction"
        );
        host.dispatch(tr)?;
        host.focus();
        Ok(cursor)
    }
}
