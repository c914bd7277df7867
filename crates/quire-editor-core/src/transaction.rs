//! Transactions: ordered document steps plus selection updates.
//!
//! A `Transaction` is built against an `EditorState`, applies each step to
//! its own working copy of the document as it goes, and records a `StepMap`
//! per step so positions taken before the change can be mapped forward.

use smol_str::SmolStr;

use crate::document::{BlockKind, Document, TextRun};
use crate::error::EditorError;
use crate::marks::{Mark, MarkSet};
use crate::types::Selection;

/// A single document change.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// Replace `from..to` with runs of text.
    Replace {
        from: usize,
        to: usize,
        runs: Vec<TextRun>,
    },
    /// Split the textblock at `pos`.
    Split { pos: usize },
    AddMark { from: usize, to: usize, mark: Mark },
    RemoveMark { from: usize, to: usize, mark: Mark },
    SetBlockType {
        from: usize,
        to: usize,
        kind: BlockKind,
    },
}

impl Step {
    /// Apply the step to a document.
    pub fn apply(&self, doc: &Document) -> Result<Document, EditorError> {
        match self {
            Step::Replace { from, to, runs } => doc.replace(*from, *to, runs.clone()),
            Step::Split { pos } => doc.split(*pos),
            Step::AddMark { from, to, mark } => doc.add_mark(*from, *to, *mark),
            Step::RemoveMark { from, to, mark } => doc.remove_mark(*from, *to, *mark),
            Step::SetBlockType { from, to, kind } => doc.set_block_type(*from, *to, *kind),
        }
    }

    /// The position map for this step.
    pub fn map(&self) -> StepMap {
        match self {
            Step::Replace { from, to, runs } => StepMap::new(
                *from,
                to - from,
                runs.iter().map(TextRun::len).sum(),
            ),
            // Closing token of the first half plus opening token of the second.
            Step::Split { pos } => StepMap::new(*pos, 0, 2),
            Step::AddMark { .. } | Step::RemoveMark { .. } | Step::SetBlockType { .. } => {
                StepMap::IDENTITY
            }
        }
    }

    /// Whether the step changes document structure or text (not just marks).
    pub fn changes_content(&self) -> bool {
        matches!(self, Step::Replace { .. } | Step::Split { .. })
    }
}

/// Position map for one step: `old_size` positions at `start` became `new_size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepMap {
    pub start: usize,
    pub old_size: usize,
    pub new_size: usize,
}

impl StepMap {
    pub const IDENTITY: StepMap = StepMap {
        start: 0,
        old_size: 0,
        new_size: 0,
    };

    pub fn new(start: usize, old_size: usize, new_size: usize) -> Self {
        Self {
            start,
            old_size,
            new_size,
        }
    }

    /// Map a position through this step.
    ///
    /// Positions inside the replaced range collapse to one of its ends.
    /// `assoc` picks the side when the position touches an insertion:
    /// negative stays before the inserted content, positive moves after it.
    pub fn map(&self, pos: usize, assoc: i8) -> usize {
        let end = self.start + self.old_size;
        if pos < self.start || (pos == self.start && self.old_size == 0 && assoc < 0) {
            return pos;
        }
        if pos > end {
            return pos - self.old_size + self.new_size;
        }
        let side = if self.old_size == 0 {
            assoc
        } else if pos == self.start {
            -1
        } else if pos == end {
            1
        } else {
            assoc
        };
        if side < 0 {
            self.start
        } else {
            self.start + self.new_size
        }
    }
}

/// Ordered step maps of a transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mapping {
    maps: Vec<StepMap>,
}

impl Mapping {
    pub fn maps(&self) -> &[StepMap] {
        &self.maps
    }

    /// Map a position through every step in order.
    pub fn map(&self, pos: usize, assoc: i8) -> usize {
        self.maps.iter().fold(pos, |pos, m| m.map(pos, assoc))
    }
}

/// A document change in progress.
#[derive(Clone, Debug)]
pub struct Transaction {
    doc: Document,
    steps: Vec<Step>,
    mapping: Mapping,
    selection: Option<Selection>,
    stored_marks: Option<Option<MarkSet>>,
    /// Selection of the state this transaction was created from.
    start_selection: Selection,
}

impl Transaction {
    pub(crate) fn new(doc: Document, selection: Selection) -> Self {
        Self {
            doc,
            steps: Vec::new(),
            mapping: Mapping::default(),
            selection: None,
            stored_marks: None,
            start_selection: selection,
        }
    }

    /// The document with all steps so far applied.
    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn doc_changed(&self) -> bool {
        !self.steps.is_empty()
    }

    /// The selection this transaction will leave behind.
    ///
    /// Explicitly set selections win; otherwise the starting selection is
    /// mapped through the steps.
    pub fn selection(&self) -> Selection {
        self.selection.unwrap_or_else(|| {
            let anchor = self.doc.nearest_text_pos(self.mapping.map(self.start_selection.anchor, 1));
            let head = self.doc.nearest_text_pos(self.mapping.map(self.start_selection.head, 1));
            Selection::new(anchor, head)
        })
    }

    pub fn selection_set(&self) -> bool {
        self.selection.is_some()
    }

    /// Stored marks override: `Some(None)` clears, `Some(Some(..))` sets.
    pub fn stored_marks(&self) -> Option<Option<&MarkSet>> {
        self.stored_marks.as_ref().map(Option::as_ref)
    }

    /// Apply a step, failing without change when it does not fit the document.
    pub fn step(&mut self, step: Step) -> Result<&mut Self, EditorError> {
        let doc = step.apply(&self.doc)?;
        tracing::trace!(target: "quire::transaction", ?step, "applied step");
        self.mapping.maps.push(step.map());
        self.steps.push(step);
        self.doc = doc;
        Ok(self)
    }

    /// Replace `from..to` with `text` carrying `marks`.
    pub fn replace_with(
        &mut self,
        from: usize,
        to: usize,
        text: &str,
        marks: &MarkSet,
    ) -> Result<&mut Self, EditorError> {
        let runs = if text.is_empty() {
            Vec::new()
        } else {
            vec![TextRun::new(SmolStr::new(text), marks.clone())]
        };
        self.step(Step::Replace { from, to, runs })
    }

    /// Delete `from..to`.
    pub fn delete(&mut self, from: usize, to: usize) -> Result<&mut Self, EditorError> {
        self.step(Step::Replace {
            from,
            to,
            runs: Vec::new(),
        })
    }

    pub fn split(&mut self, pos: usize) -> Result<&mut Self, EditorError> {
        self.step(Step::Split { pos })
    }

    pub fn add_mark(&mut self, from: usize, to: usize, mark: Mark) -> Result<&mut Self, EditorError> {
        self.step(Step::AddMark { from, to, mark })
    }

    pub fn remove_mark(
        &mut self,
        from: usize,
        to: usize,
        mark: Mark,
    ) -> Result<&mut Self, EditorError> {
        self.step(Step::RemoveMark { from, to, mark })
    }

    pub fn set_block_type(
        &mut self,
        from: usize,
        to: usize,
        kind: BlockKind,
    ) -> Result<&mut Self, EditorError> {
        self.step(Step::SetBlockType { from, to, kind })
    }

    /// Set the selection the transaction leaves behind.
    ///
    /// Positions are clamped into the nearest textblock of the current document.
    pub fn set_selection(&mut self, selection: Selection) -> &mut Self {
        self.selection = Some(Selection::new(
            self.doc.nearest_text_pos(selection.anchor),
            self.doc.nearest_text_pos(selection.head),
        ));
        self
    }

    /// Set or clear the marks applied to the next typed text.
    pub fn set_stored_marks(&mut self, marks: Option<MarkSet>) -> &mut Self {
        self.stored_marks = Some(marks);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_map_replacement() {
        // "lio" at 10..13 replaced with "lion"
        let map = StepMap::new(10, 3, 4);
        assert_eq!(map.map(5, 1), 5);
        assert_eq!(map.map(10, 1), 10);
        assert_eq!(map.map(13, 1), 14);
        assert_eq!(map.map(13, -1), 14);
        assert_eq!(map.map(11, -1), 10);
        assert_eq!(map.map(11, 1), 14);
        assert_eq!(map.map(20, 1), 21);
    }

    #[test]
    fn test_step_map_insertion_assoc() {
        let map = StepMap::new(10, 0, 2);
        assert_eq!(map.map(10, 1), 12);
        assert_eq!(map.map(10, -1), 10);
        assert_eq!(map.map(11, -1), 13);
    }

    #[test]
    fn test_step_map_deletion() {
        let map = StepMap::new(10, 3, 0);
        assert_eq!(map.map(13, 1), 10);
        assert_eq!(map.map(15, 1), 12);
    }

    #[test]
    fn test_transaction_rejects_bad_step() {
        let doc = Document::from_text("abc");
        let mut tr = Transaction::new(doc.clone(), Selection::collapsed(1));
        assert!(tr.delete(2, 99).is_err());
        assert!(!tr.doc_changed());
        assert_eq!(tr.doc(), &doc);
    }

    #[test]
    fn test_transaction_maps_selection() {
        let doc = Document::from_text("abc");
        let mut tr = Transaction::new(doc, Selection::collapsed(4));
        tr.replace_with(1, 1, "xy", &MarkSet::empty()).unwrap();
        assert_eq!(tr.doc().to_plain_text(), "xyabc");
        assert_eq!(tr.selection(), Selection::collapsed(6));
        assert!(!tr.selection_set());

        tr.set_selection(Selection::collapsed(0));
        assert_eq!(tr.selection(), Selection::collapsed(1));
    }

    #[test]
    fn test_mapping_composes() {
        let doc = Document::from_text("abc");
        let mut tr = Transaction::new(doc, Selection::collapsed(1));
        tr.replace_with(1, 1, "x", &MarkSet::empty()).unwrap();
        tr.split(2).unwrap();
        // 'c' was at 3: +1 for the insert, +2 for the split.
        assert_eq!(tr.mapping().map(3, 1), 6);
        assert_eq!(tr.doc().to_plain_text(), "x\nabc");
    }
}
