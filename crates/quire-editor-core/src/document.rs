//! Structured document model.
//!
//! A `Document` is a flat sequence of textblocks, each holding runs of text
//! that share a mark set. Documents are immutable per revision: every edit
//! returns a new `Document`.
//!
//! # Positions
//!
//! Positions are integer offsets counted the way a node tree is walked:
//! every block contributes an opening token, one unit per character
//! (Unicode scalar value), and a closing token. With two paragraphs
//! `"ab"` and `"c"`:
//!
//! ```text
//! pos:  0   1   2   3   4   5   6   7
//!         <p> a   b  </p><p>  c  </p>
//! ```
//!
//! Position 0 sits before the first block, positions 1..=3 are inside the
//! first paragraph, 4 is between the blocks, and 5..=6 are inside the second.

use std::ops::Range;

use smol_str::SmolStr;

use crate::error::EditorError;
use crate::marks::{Mark, MarkSet};

/// The type of a textblock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Paragraph,
    /// Heading with level 1..=6.
    Heading(u8),
}

impl BlockKind {
    /// HTML tag used to render the block.
    pub fn tag(self) -> &'static str {
        match self {
            BlockKind::Paragraph => "p",
            BlockKind::Heading(1) => "h1",
            BlockKind::Heading(2) => "h2",
            BlockKind::Heading(3) => "h3",
            BlockKind::Heading(4) => "h4",
            BlockKind::Heading(5) => "h5",
            BlockKind::Heading(_) => "h6",
        }
    }
}

/// A run of text sharing one mark set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextRun {
    pub text: SmolStr,
    pub marks: MarkSet,
}

impl TextRun {
    pub fn new(text: impl Into<SmolStr>, marks: MarkSet) -> Self {
        Self {
            text: text.into(),
            marks,
        }
    }

    /// Unmarked text.
    pub fn plain(text: impl Into<SmolStr>) -> Self {
        Self::new(text, MarkSet::empty())
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// The child run found before an offset inside a block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChildBefore<'a> {
    /// Index of the run within the block.
    pub index: usize,
    /// Offset of the run's first character, relative to the block content.
    pub offset: usize,
    pub run: &'a TextRun,
}

/// A textblock: paragraph or heading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    kind: BlockKind,
    runs: Vec<TextRun>,
}

impl Block {
    /// Create a block, merging adjacent runs with equal marks and dropping empty runs.
    pub fn new(kind: BlockKind, runs: Vec<TextRun>) -> Self {
        Self {
            kind,
            runs: normalize_runs(runs),
        }
    }

    pub fn paragraph(text: &str) -> Self {
        Self::new(BlockKind::Paragraph, vec![TextRun::plain(text)])
    }

    pub fn heading(level: u8, text: &str) -> Self {
        Self::new(BlockKind::Heading(level), vec![TextRun::plain(text)])
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// Length of the block content in characters.
    pub fn content_len(&self) -> usize {
        self.runs.iter().map(TextRun::len).sum()
    }

    /// Size of the block in positions, including its opening and closing tokens.
    pub fn node_size(&self) -> usize {
        self.content_len() + 2
    }

    /// The block's text with marks dropped.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// The run containing the character just before `offset`.
    ///
    /// Returns None at offset 0 or when the block is empty.
    pub fn child_before(&self, offset: usize) -> Option<ChildBefore<'_>> {
        if offset == 0 {
            return None;
        }
        let mut start = 0;
        for (index, run) in self.runs.iter().enumerate() {
            let end = start + run.len();
            if end >= offset {
                return Some(ChildBefore {
                    index,
                    offset: start,
                    run,
                });
            }
            start = end;
        }
        None
    }

    /// Marks a cursor at `offset` would pick up: those of the text before it,
    /// or of the text after it at the start of the block.
    pub fn marks_at(&self, offset: usize) -> MarkSet {
        if let Some(child) = self.child_before(offset) {
            return child.run.marks.clone();
        }
        self.runs
            .first()
            .map(|r| r.marks.clone())
            .unwrap_or_default()
    }

    /// Split the content at a character offset.
    pub fn split_runs(&self, offset: usize) -> (Vec<TextRun>, Vec<TextRun>) {
        let mut before = Vec::new();
        let mut after = Vec::new();
        let mut start = 0;
        for run in &self.runs {
            let len = run.len();
            if start + len <= offset {
                before.push(run.clone());
            } else if start >= offset {
                after.push(run.clone());
            } else {
                let (head, tail) = split_text(&run.text, offset - start);
                before.push(TextRun::new(head, run.marks.clone()));
                after.push(TextRun::new(tail, run.marks.clone()));
            }
            start += len;
        }
        (before, after)
    }

    /// Apply `f` to the mark sets of the content between two offsets.
    fn map_marks(&self, from: usize, to: usize, f: impl Fn(&MarkSet) -> MarkSet) -> Block {
        let (head, rest) = self.split_runs(from);
        let rest_block = Block {
            kind: self.kind,
            runs: rest,
        };
        let (middle, tail) = rest_block.split_runs(to - from);
        let middle = middle
            .into_iter()
            .map(|r| TextRun::new(r.text, f(&r.marks)));
        Block::new(
            self.kind,
            head.into_iter().chain(middle).chain(tail).collect(),
        )
    }

    fn has_mark_between(&self, from: usize, to: usize, mark: Mark) -> bool {
        let mut start = 0;
        for run in &self.runs {
            let end = start + run.len();
            if end > from && start < to && run.marks.contains(mark) {
                return true;
            }
            start = end;
        }
        false
    }
}

/// A position resolved against a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedPos {
    pub pos: usize,
    /// Index of the parent block.
    pub block: usize,
    /// Position of the first character of the parent block.
    pub start: usize,
    /// Offset of `pos` within the parent block content.
    pub parent_offset: usize,
    /// Length of the parent block content.
    pub parent_len: usize,
}

impl ResolvedPos {
    /// Position just past the last character of the parent block.
    pub fn end(&self) -> usize {
        self.start + self.parent_len
    }
}

/// An immutable document revision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Document {
    /// Create a document. A document always holds at least one block.
    pub fn new(mut blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            blocks.push(Block::new(BlockKind::Paragraph, Vec::new()));
        }
        Self { blocks }
    }

    /// One unmarked paragraph per line of `text`.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines().map(Block::paragraph).collect())
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Total size of the document in positions.
    pub fn content_size(&self) -> usize {
        self.blocks.iter().map(Block::node_size).sum()
    }

    /// Position of the opening token of block `index`.
    pub fn block_start(&self, index: usize) -> usize {
        self.blocks[..index.min(self.blocks.len())]
            .iter()
            .map(Block::node_size)
            .sum()
    }

    /// First position inside the first textblock.
    pub fn text_start(&self) -> usize {
        1
    }

    /// Last position inside the last textblock.
    pub fn text_end(&self) -> usize {
        self.content_size() - 1
    }

    /// Resolve a position to its parent block.
    pub fn resolve(&self, pos: usize) -> Result<ResolvedPos, EditorError> {
        let mut block_start = 0;
        for (block, node) in self.blocks.iter().enumerate() {
            let start = block_start + 1;
            let parent_len = node.content_len();
            if pos < start {
                break;
            }
            if pos <= start + parent_len {
                return Ok(ResolvedPos {
                    pos,
                    block,
                    start,
                    parent_offset: pos - start,
                    parent_len,
                });
            }
            block_start += node.node_size();
        }
        Err(EditorError::InvalidPosition { pos })
    }

    /// The closest position inside a textblock.
    pub fn nearest_text_pos(&self, pos: usize) -> usize {
        let mut block_start = 0;
        let mut last_end = 1;
        for node in &self.blocks {
            let start = block_start + 1;
            let end = start + node.content_len();
            if pos < start {
                return start;
            }
            if pos <= end {
                return pos;
            }
            last_end = end;
            block_start += node.node_size();
        }
        last_end
    }

    /// Indices of blocks whose content overlaps `from..to`.
    pub fn blocks_between(&self, from: usize, to: usize) -> Range<usize> {
        let mut first = None;
        let mut last = 0;
        let mut block_start = 0;
        for (i, node) in self.blocks.iter().enumerate() {
            let start = block_start + 1;
            let end = start + node.content_len();
            if end >= from && start <= to {
                first.get_or_insert(i);
                last = i;
            }
            block_start += node.node_size();
        }
        match first {
            Some(first) => first..last + 1,
            None => 0..0,
        }
    }

    /// Whole document text, blocks separated by newlines.
    pub fn to_plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether any text in `from..to` carries `mark`.
    pub fn range_has_mark(&self, from: usize, to: usize, mark: Mark) -> bool {
        self.blocks_between(from, to).any(|i| {
            let start = self.block_start(i) + 1;
            let block = &self.blocks[i];
            let lo = from.max(start) - start;
            let hi = to.min(start + block.content_len()).max(start) - start;
            block.has_mark_between(lo, hi, mark)
        })
    }

    fn check_range(&self, from: usize, to: usize) -> Result<(), EditorError> {
        let size = self.content_size();
        if from > to || to > size {
            return Err(EditorError::OutOfRange { from, to, size });
        }
        Ok(())
    }

    /// Replace `from..to` with the given runs.
    ///
    /// Both ends must lie inside textblocks. When they are in different blocks
    /// the blocks are joined, keeping the type of the first.
    pub fn replace(&self, from: usize, to: usize, runs: Vec<TextRun>) -> Result<Document, EditorError> {
        self.check_range(from, to)?;
        let start = self.resolve(from)?;
        let end = self.resolve(to)?;

        let (head, _) = self.blocks[start.block].split_runs(start.parent_offset);
        let (_, tail) = self.blocks[end.block].split_runs(end.parent_offset);
        let joined = Block::new(
            self.blocks[start.block].kind,
            head.into_iter().chain(runs).chain(tail).collect(),
        );

        let mut blocks = self.blocks.clone();
        blocks.splice(start.block..=end.block, [joined]);
        Ok(Document { blocks })
    }

    /// Split the textblock at `pos` into two.
    ///
    /// Splitting at the end of a heading continues with a paragraph.
    pub fn split(&self, pos: usize) -> Result<Document, EditorError> {
        let at = self.resolve(pos)?;
        let block = &self.blocks[at.block];
        let (head, tail) = block.split_runs(at.parent_offset);
        let next_kind = if at.parent_offset == at.parent_len {
            BlockKind::Paragraph
        } else {
            block.kind
        };

        let mut blocks = self.blocks.clone();
        blocks.splice(
            at.block..=at.block,
            [Block::new(block.kind, head), Block::new(next_kind, tail)],
        );
        Ok(Document { blocks })
    }

    /// Add `mark` to all text in `from..to`.
    pub fn add_mark(&self, from: usize, to: usize, mark: Mark) -> Result<Document, EditorError> {
        self.map_marks(from, to, |m| m.with(mark))
    }

    /// Remove `mark` from all text in `from..to`.
    pub fn remove_mark(&self, from: usize, to: usize, mark: Mark) -> Result<Document, EditorError> {
        self.map_marks(from, to, |m| m.without(mark))
    }

    fn map_marks(
        &self,
        from: usize,
        to: usize,
        f: impl Fn(&MarkSet) -> MarkSet,
    ) -> Result<Document, EditorError> {
        self.check_range(from, to)?;
        let mut blocks = self.blocks.clone();
        for i in self.blocks_between(from, to) {
            let start = self.block_start(i) + 1;
            let block = &self.blocks[i];
            let lo = from.max(start) - start;
            let hi = to.min(start + block.content_len()).max(start) - start;
            blocks[i] = block.map_marks(lo, hi, &f);
        }
        Ok(Document { blocks })
    }

    /// Change the type of every block touched by `from..to`.
    pub fn set_block_type(&self, from: usize, to: usize, kind: BlockKind) -> Result<Document, EditorError> {
        self.check_range(from, to)?;
        let mut blocks = self.blocks.clone();
        for i in self.blocks_between(from, to) {
            blocks[i].kind = kind;
        }
        Ok(Document { blocks })
    }
}

/// Split a string at a character offset.
fn split_text(text: &str, char_offset: usize) -> (SmolStr, SmolStr) {
    let byte = text
        .char_indices()
        .nth(char_offset)
        .map(|(b, _)| b)
        .unwrap_or(text.len());
    (SmolStr::new(&text[..byte]), SmolStr::new(&text[byte..]))
}

/// Merge adjacent runs with equal marks and drop empty runs.
fn normalize_runs(runs: Vec<TextRun>) -> Vec<TextRun> {
    let mut out: Vec<TextRun> = Vec::with_capacity(runs.len());
    for run in runs.into_iter().filter(|r| !r.is_empty()) {
        match out.last_mut() {
            Some(last) if last.marks == run.marks => {
                let mut text = last.text.to_string();
                text.push_str(&run.text);
                last.text = SmolStr::new(text);
            }
            _ => out.push(run),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_paragraphs() -> Document {
        Document::new(vec![Block::paragraph("ab"), Block::paragraph("c")])
    }

    #[test]
    fn test_positions() {
        let doc = two_paragraphs();
        assert_eq!(doc.content_size(), 7);
        assert_eq!(doc.block_start(1), 4);

        let pos = doc.resolve(6).unwrap();
        assert_eq!(pos.block, 1);
        assert_eq!(pos.start, 5);
        assert_eq!(pos.parent_offset, 1);
        assert_eq!(pos.end(), 6);

        assert_eq!(doc.resolve(0), Err(EditorError::InvalidPosition { pos: 0 }));
        assert_eq!(doc.resolve(4), Err(EditorError::InvalidPosition { pos: 4 }));
        assert!(doc.resolve(7).is_err());
    }

    #[test]
    fn test_empty_document_has_one_paragraph() {
        let doc = Document::default();
        assert_eq!(doc.blocks().len(), 1);
        assert_eq!(doc.content_size(), 2);
        assert_eq!(doc.resolve(1).unwrap().parent_len, 0);
    }

    #[test]
    fn test_nearest_text_pos() {
        let doc = two_paragraphs();
        assert_eq!(doc.nearest_text_pos(0), 1);
        assert_eq!(doc.nearest_text_pos(2), 2);
        assert_eq!(doc.nearest_text_pos(4), 5);
        assert_eq!(doc.nearest_text_pos(100), 6);
    }

    #[test]
    fn test_plain_text() {
        let doc = two_paragraphs();
        assert_eq!(doc.to_plain_text(), "ab\nc");
    }

    #[test]
    fn test_replace_within_block_keeps_marks() {
        let doc = Document::new(vec![Block::new(
            BlockKind::Paragraph,
            vec![
                TextRun::plain("the "),
                TextRun::new("lio", MarkSet::from(Mark::Strong)),
            ],
        )]);
        let doc = doc
            .replace(5, 8, vec![TextRun::new("lion", MarkSet::from(Mark::Strong))])
            .unwrap();
        let runs = doc.blocks()[0].runs();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1].text, "lion");
        assert!(runs[1].marks.contains(Mark::Strong));
    }

    #[test]
    fn test_replace_across_blocks_joins() {
        let doc = Document::new(vec![Block::heading(2, "ab"), Block::paragraph("cd")]);
        let doc = doc.replace(3, 5, Vec::new()).unwrap();
        assert_eq!(doc.blocks().len(), 1);
        assert_eq!(doc.blocks()[0].kind(), BlockKind::Heading(2));
        assert_eq!(doc.blocks()[0].text(), "abcd");
    }

    #[test]
    fn test_replace_out_of_range() {
        let doc = two_paragraphs();
        assert_eq!(
            doc.replace(3, 2, Vec::new()),
            Err(EditorError::OutOfRange { from: 3, to: 2, size: 7 })
        );
        assert!(doc.replace(1, 40, Vec::new()).is_err());
    }

    #[test]
    fn test_split() {
        let doc = Document::new(vec![Block::heading(1, "title")]);
        let mid = doc.split(3).unwrap();
        assert_eq!(mid.blocks()[0].text(), "ti");
        assert_eq!(mid.blocks()[1].kind(), BlockKind::Heading(1));

        let end = doc.split(6).unwrap();
        assert_eq!(end.blocks()[1].kind(), BlockKind::Paragraph);
        assert_eq!(end.content_size(), doc.content_size() + 2);
    }

    #[test]
    fn test_marks_and_child_before() {
        let doc = Document::from_text("hello world")
            .add_mark(7, 12, Mark::Em)
            .unwrap();
        let block = &doc.blocks()[0];
        assert_eq!(block.runs().len(), 2);
        assert!(doc.range_has_mark(1, 8, Mark::Em));
        assert!(!doc.range_has_mark(1, 7, Mark::Em));

        let child = block.child_before(11).unwrap();
        assert_eq!(child.index, 1);
        assert_eq!(child.offset, 6);
        assert!(block.marks_at(11).contains(Mark::Em));
        assert!(block.marks_at(0).is_empty());
        assert!(block.child_before(0).is_none());

        let doc = doc.remove_mark(1, 12, Mark::Em).unwrap();
        assert_eq!(doc.blocks()[0].runs().len(), 1);
    }

    #[test]
    fn test_set_block_type_touches_selected_blocks() {
        let doc = Document::from_text("a\nb\nc");
        let doc = doc.set_block_type(2, 4, BlockKind::Heading(3)).unwrap();
        let kinds: Vec<_> = doc.blocks().iter().map(Block::kind).collect();
        assert_eq!(
            kinds,
            vec![BlockKind::Heading(3), BlockKind::Heading(3), BlockKind::Paragraph]
        );
    }

    #[test]
    fn test_multibyte_split() {
        let block = Block::paragraph("héllo");
        let (a, b) = block.split_runs(2);
        assert_eq!(a[0].text, "hé");
        assert_eq!(b[0].text, "llo");
    }
}
