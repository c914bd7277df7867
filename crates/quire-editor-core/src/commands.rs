//! Editing commands.
//!
//! Each command looks at an `EditorState` and returns the transaction it
//! would dispatch, or None when it does not apply. Checking whether a command
//! is enabled is the same call with the result discarded.

use crate::autocomplete::is_word_char;
use crate::document::BlockKind;
use crate::marks::{Mark, MarkSet};
use crate::state::EditorState;
use crate::transaction::Transaction;
use crate::types::Selection;

/// Whether `mark` is active for the current selection.
///
/// Empty selections look at the stored marks or the marks at the cursor;
/// ranges report whether any text in them carries the mark.
pub fn mark_active(state: &EditorState, mark: Mark) -> bool {
    let sel = state.selection();
    if sel.is_empty() {
        state.cursor_marks().contains(mark)
    } else {
        state.doc().range_has_mark(sel.from(), sel.to(), mark)
    }
}

/// Toggle `mark` on the selection.
///
/// With an empty selection this only changes the stored marks, so the next
/// typed text picks it up.
pub fn toggle_mark(state: &EditorState, mark: Mark) -> Option<Transaction> {
    let sel = state.selection();
    let mut tr = state.tr();
    if sel.is_empty() {
        let marks = state.cursor_marks();
        let next = if marks.contains(mark) {
            marks.without(mark)
        } else {
            marks.with(mark)
        };
        tr.set_stored_marks(Some(next));
        return Some(tr);
    }

    let result = if state.doc().range_has_mark(sel.from(), sel.to(), mark) {
        tr.remove_mark(sel.from(), sel.to(), mark)
    } else {
        tr.add_mark(sel.from(), sel.to(), mark)
    };
    match result {
        Ok(_) => Some(tr),
        Err(e) => {
            tracing::warn!("toggle {} failed: {}", mark, e);
            None
        }
    }
}

/// Whether the selection sits in a single block of type `kind`.
pub fn block_type_active(state: &EditorState, kind: BlockKind) -> bool {
    let sel = state.selection();
    let blocks = state.doc().blocks_between(sel.from(), sel.to());
    blocks.len() == 1 && state.doc().blocks()[blocks.start].kind() == kind
}

/// Convert every block touched by the selection to `kind`.
///
/// Returns None when all of them already have that type.
pub fn set_block_type(state: &EditorState, kind: BlockKind) -> Option<Transaction> {
    let sel = state.selection();
    let doc = state.doc();
    let applicable = doc
        .blocks_between(sel.from(), sel.to())
        .any(|i| doc.blocks()[i].kind() != kind);
    if !applicable {
        return None;
    }
    let mut tr = state.tr();
    tr.set_block_type(sel.from(), sel.to(), kind).ok()?;
    Some(tr)
}

/// Replace the selection with typed text carrying the cursor marks.
pub fn insert_text(state: &EditorState, text: &str) -> Option<Transaction> {
    if text.is_empty() {
        return None;
    }
    let sel = state.selection();
    let marks = if sel.is_empty() {
        state.cursor_marks()
    } else {
        state.marks_at(sel.from() + 1)
    };
    let mut tr = state.tr();
    tr.replace_with(sel.from(), sel.to(), text, &marks).ok()?;
    tr.set_selection(Selection::collapsed(sel.from() + text.chars().count()));
    Some(tr)
}

/// Split the textblock at the cursor, deleting any selected content first.
pub fn split_block(state: &EditorState) -> Option<Transaction> {
    let sel = state.selection();
    let mut tr = state.tr();
    if !sel.is_empty() {
        tr.delete(sel.from(), sel.to()).ok()?;
    }
    tr.split(sel.from()).ok()?;
    // past the closing and opening tokens
    tr.set_selection(Selection::collapsed(sel.from() + 2));
    Some(tr)
}

/// Delete the selection, or the character before the cursor.
///
/// At the start of a block the block is joined onto the previous one.
pub fn delete_backward(state: &EditorState) -> Option<Transaction> {
    let sel = state.selection();
    let mut tr = state.tr();
    if !sel.is_empty() {
        tr.delete(sel.from(), sel.to()).ok()?;
        tr.set_selection(Selection::collapsed(sel.from()));
        return Some(tr);
    }

    let at = state.doc().resolve(sel.head).ok()?;
    let from = if at.parent_offset > 0 {
        sel.head - 1
    } else if at.block > 0 {
        // end of the previous block
        sel.head - 2
    } else {
        return None;
    };
    tr.delete(from, sel.head).ok()?;
    tr.set_selection(Selection::collapsed(from));
    Some(tr)
}

/// Delete the selection, or the character after the cursor.
///
/// At the end of a block the next block is joined onto this one.
pub fn delete_forward(state: &EditorState) -> Option<Transaction> {
    let sel = state.selection();
    if !sel.is_empty() {
        return delete_backward(state);
    }

    let doc = state.doc();
    let at = doc.resolve(sel.head).ok()?;
    let to = if at.parent_offset < at.parent_len {
        sel.head + 1
    } else if at.block + 1 < doc.blocks().len() {
        // start of the next block
        sel.head + 2
    } else {
        return None;
    };
    let mut tr = state.tr();
    tr.delete(sel.head, to).ok()?;
    tr.set_selection(Selection::collapsed(sel.head));
    Some(tr)
}

/// Characters a word deletion removes, scanning `chars` in order: any
/// whitespace, then a run of word characters or a single other character.
fn word_extent(chars: impl Iterator<Item = char>) -> usize {
    let mut chars = chars.peekable();
    let mut n = 0;
    while chars.next_if(|c| c.is_whitespace()).is_some() {
        n += 1;
    }
    match chars.next() {
        Some(c) if is_word_char(c) => {
            n += 1;
            while chars.next_if(|c| is_word_char(*c)).is_some() {
                n += 1;
            }
        }
        Some(_) => n += 1,
        None => {}
    }
    n
}

/// Delete the word before the cursor, joining blocks at a block start.
pub fn delete_word_backward(state: &EditorState) -> Option<Transaction> {
    let sel = state.selection();
    if !sel.is_empty() {
        return delete_backward(state);
    }
    let at = state.doc().resolve(sel.head).ok()?;
    if at.parent_offset == 0 {
        return delete_backward(state);
    }
    let text = state.doc().blocks()[at.block].text();
    let before: Vec<char> = text.chars().take(at.parent_offset).collect();
    let from = sel.head - word_extent(before.into_iter().rev());
    let mut tr = state.tr();
    tr.delete(from, sel.head).ok()?;
    tr.set_selection(Selection::collapsed(from));
    Some(tr)
}

/// Delete the word after the cursor, joining blocks at a block end.
pub fn delete_word_forward(state: &EditorState) -> Option<Transaction> {
    let sel = state.selection();
    if !sel.is_empty() {
        return delete_backward(state);
    }
    let at = state.doc().resolve(sel.head).ok()?;
    if at.parent_offset == at.parent_len {
        return delete_forward(state);
    }
    let text = state.doc().blocks()[at.block].text();
    let to = sel.head + word_extent(text.chars().skip(at.parent_offset));
    let mut tr = state.tr();
    tr.delete(sel.head, to).ok()?;
    tr.set_selection(Selection::collapsed(sel.head));
    Some(tr)
}

/// Delete from the start of the block to the cursor.
pub fn delete_to_block_start(state: &EditorState) -> Option<Transaction> {
    let sel = state.selection();
    if !sel.is_empty() {
        return delete_backward(state);
    }
    let at = state.doc().resolve(sel.head).ok()?;
    if at.parent_offset == 0 {
        return delete_backward(state);
    }
    let mut tr = state.tr();
    tr.delete(at.start, sel.head).ok()?;
    tr.set_selection(Selection::collapsed(at.start));
    Some(tr)
}

/// Delete from the cursor to the end of the block.
pub fn delete_to_block_end(state: &EditorState) -> Option<Transaction> {
    let sel = state.selection();
    if !sel.is_empty() {
        return delete_backward(state);
    }
    let at = state.doc().resolve(sel.head).ok()?;
    if at.parent_offset == at.parent_len {
        return delete_forward(state);
    }
    let mut tr = state.tr();
    tr.delete(sel.head, at.end()).ok()?;
    tr.set_selection(Selection::collapsed(sel.head));
    Some(tr)
}

/// Drop the stored marks, so typing picks up the marks at the cursor again.
pub fn clear_stored_marks(state: &EditorState) -> Option<Transaction> {
    state.stored_marks()?;
    let mut tr = state.tr();
    tr.set_stored_marks(None::<MarkSet>);
    Some(tr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, Document, TextRun};

    fn state(text: &str, sel: Selection) -> EditorState {
        EditorState::new(Document::from_text(text))
            .with_selection(sel)
            .unwrap()
    }

    fn run(state: &EditorState, tr: Option<Transaction>) -> EditorState {
        state.apply(&tr.expect("command should apply"))
    }

    #[test]
    fn test_toggle_mark_on_range() {
        let s = state("hello world", Selection::new(1, 6));
        assert!(!mark_active(&s, Mark::Strong));

        let s = run(&s, toggle_mark(&s, Mark::Strong));
        assert!(s.doc().range_has_mark(1, 6, Mark::Strong));
        assert!(!s.doc().range_has_mark(6, 12, Mark::Strong));
        assert!(mark_active(&s, Mark::Strong));

        let s = run(&s, toggle_mark(&s, Mark::Strong));
        assert!(!s.doc().range_has_mark(1, 12, Mark::Strong));
    }

    #[test]
    fn test_toggle_mark_partial_range_removes() {
        let doc = Document::new(vec![Block::new(
            BlockKind::Paragraph,
            vec![
                TextRun::new("bold", MarkSet::from(Mark::Strong)),
                TextRun::plain(" plain"),
            ],
        )]);
        let s = EditorState::new(doc)
            .with_selection(Selection::new(1, 11))
            .unwrap();
        let s = run(&s, toggle_mark(&s, Mark::Strong));
        assert!(!s.doc().range_has_mark(1, 11, Mark::Strong));
    }

    #[test]
    fn test_toggle_mark_empty_selection_uses_stored_marks() {
        let s = state("hello", Selection::collapsed(3));
        let s = run(&s, toggle_mark(&s, Mark::Em));
        assert_eq!(s.stored_marks(), Some(&MarkSet::from(Mark::Em)));
        assert!(mark_active(&s, Mark::Em));
        // document untouched
        assert!(!s.doc().range_has_mark(1, 6, Mark::Em));

        let s = run(&s, insert_text(&s, "XY"));
        assert!(s.doc().range_has_mark(3, 5, Mark::Em));
        assert!(s.stored_marks().is_none());
    }

    #[test]
    fn test_set_block_type() {
        let s = state("one\ntwo", Selection::new(2, 7));
        let s = run(&s, set_block_type(&s, BlockKind::Heading(2)));
        assert!(s.doc().blocks().iter().all(|b| b.kind() == BlockKind::Heading(2)));
        assert!(set_block_type(&s, BlockKind::Heading(2)).is_none());
        assert!(set_block_type(&s, BlockKind::Paragraph).is_some());
    }

    #[test]
    fn test_block_type_active() {
        let s = state("one\ntwo", Selection::collapsed(2));
        assert!(block_type_active(&s, BlockKind::Paragraph));
        assert!(!block_type_active(&s, BlockKind::Heading(1)));
        let s = s.with_selection(Selection::new(2, 7)).unwrap();
        assert!(!block_type_active(&s, BlockKind::Paragraph));
    }

    #[test]
    fn test_split_block() {
        let s = state("hello", Selection::collapsed(3));
        let s = run(&s, split_block(&s));
        assert_eq!(s.doc().to_plain_text(), "he\nllo");
        assert_eq!(s.selection(), Selection::collapsed(5));

        let s = state("hello world", Selection::new(6, 12));
        let s = run(&s, split_block(&s));
        assert_eq!(s.doc().to_plain_text(), "hello\n");
        assert_eq!(s.selection(), Selection::collapsed(8));
    }

    #[test]
    fn test_delete_backward() {
        let s = state("abc", Selection::collapsed(3));
        let s = run(&s, delete_backward(&s));
        assert_eq!(s.doc().to_plain_text(), "ac");
        assert_eq!(s.selection(), Selection::collapsed(2));

        let s = state("abc", Selection::collapsed(1));
        assert!(delete_backward(&s).is_none());

        let s = state("abc", Selection::new(1, 3));
        let s = run(&s, delete_backward(&s));
        assert_eq!(s.doc().to_plain_text(), "c");
    }

    #[test]
    fn test_delete_backward_joins_blocks() {
        // "ab" occupies 1..3, "cd" starts at 5
        let s = state("ab\ncd", Selection::collapsed(5));
        let s = run(&s, delete_backward(&s));
        assert_eq!(s.doc().blocks().len(), 1);
        assert_eq!(s.doc().to_plain_text(), "abcd");
        assert_eq!(s.selection(), Selection::collapsed(3));
    }

    #[test]
    fn test_delete_forward() {
        let s = state("abc", Selection::collapsed(2));
        let s = run(&s, delete_forward(&s));
        assert_eq!(s.doc().to_plain_text(), "ac");
        assert_eq!(s.selection(), Selection::collapsed(2));

        // end of the last block
        let s = state("abc", Selection::collapsed(4));
        assert!(delete_forward(&s).is_none());
    }

    #[test]
    fn test_delete_forward_joins_blocks() {
        let s = state("ab\ncd", Selection::collapsed(3));
        let s = run(&s, delete_forward(&s));
        assert_eq!(s.doc().blocks().len(), 1);
        assert_eq!(s.doc().to_plain_text(), "abcd");
        assert_eq!(s.selection(), Selection::collapsed(3));
    }

    #[test]
    fn test_delete_word_backward() {
        // "the tame lion" with the cursor after "lion"
        let s = state("the tame lion", Selection::collapsed(14));
        let s = run(&s, delete_word_backward(&s));
        assert_eq!(s.doc().to_plain_text(), "the tame ");
        // trailing space goes together with the word before it
        let s = run(&s, delete_word_backward(&s));
        assert_eq!(s.doc().to_plain_text(), "the ");
        assert_eq!(s.selection(), Selection::collapsed(5));

        let s = state("end.", Selection::collapsed(5));
        let s = run(&s, delete_word_backward(&s));
        assert_eq!(s.doc().to_plain_text(), "end");

        // block start joins like Backspace
        let s = state("ab\ncd", Selection::collapsed(5));
        let s = run(&s, delete_word_backward(&s));
        assert_eq!(s.doc().to_plain_text(), "abcd");
    }

    #[test]
    fn test_delete_word_forward() {
        let s = state("the tame lion", Selection::collapsed(4));
        let s = run(&s, delete_word_forward(&s));
        assert_eq!(s.doc().to_plain_text(), "the lion");
        assert_eq!(s.selection(), Selection::collapsed(4));
    }

    #[test]
    fn test_delete_to_block_edges() {
        let s = state("one two\nx", Selection::collapsed(5));
        let start = run(&s, delete_to_block_start(&s));
        assert_eq!(start.doc().to_plain_text(), "two\nx");
        assert_eq!(start.selection(), Selection::collapsed(1));

        let end = run(&s, delete_to_block_end(&s));
        assert_eq!(end.doc().to_plain_text(), "one \nx");
        assert_eq!(end.selection(), Selection::collapsed(5));
    }

    #[test]
    fn test_clear_stored_marks() {
        let s = state("x", Selection::collapsed(1));
        assert!(clear_stored_marks(&s).is_none());
        let s = run(&s, toggle_mark(&s, Mark::Code));
        let s = run(&s, clear_stored_marks(&s));
        assert!(s.stored_marks().is_none());
    }
}
