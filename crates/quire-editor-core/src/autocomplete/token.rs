//! Locating the word under the cursor.

use crate::marks::MarkSet;
use crate::state::EditorState;

/// Word-constituent characters: letters, digits and underscore.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// The trailing run of word characters in `text`, if `text` ends in one.
pub fn trailing_word(text: &str) -> Option<&str> {
    let start = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word_char(*c))
        .last()
        .map(|(i, _)| i)?;
    Some(&text[start..])
}

/// A whole word ending at the cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub word: String,
    pub from: usize,
    pub to: usize,
    /// Marks of the text run holding the word.
    pub marks: MarkSet,
}

/// Find the word that ends at a collapsed cursor.
///
/// Walks back from the cursor to the start of the text run it sits in, then
/// takes the trailing word of that run's text. Returns None for range
/// selections, when the character before the cursor is not a word character,
/// and when the cursor sits inside a word.
pub fn token_before_cursor(state: &EditorState) -> Option<Token> {
    let cursor = state.selection().cursor()?;
    let at = state.doc().resolve(cursor).ok()?;
    let block = &state.doc().blocks()[at.block];
    if block.text().chars().nth(at.parent_offset).is_some_and(is_word_char) {
        return None;
    }
    let child = block.child_before(at.parent_offset)?;

    let in_run = at.parent_offset - child.offset;
    let text: String = child.run.text.chars().take(in_run).collect();
    let word = trailing_word(&text)?;
    let len = word.chars().count();

    Some(Token {
        word: word.to_string(),
        from: cursor - len,
        to: cursor,
        marks: child.run.marks.clone(),
    })
}
