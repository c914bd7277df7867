//! Inline formatting marks.

use std::fmt;

/// A formatting annotation attachable to a run of text.
///
/// Variant order is the rank used to keep mark sets canonical, and the
/// nesting order used when rendering (outermost first).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mark {
    Strong,
    Em,
    Code,
}

impl Mark {
    /// Schema name of the mark.
    pub fn name(self) -> &'static str {
        match self {
            Mark::Strong => "strong",
            Mark::Em => "em",
            Mark::Code => "code",
        }
    }

    /// HTML tag used to render the mark.
    pub fn tag(self) -> &'static str {
        match self {
            Mark::Strong => "strong",
            Mark::Em => "em",
            Mark::Code => "code",
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered, duplicate-free set of marks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MarkSet(Vec<Mark>);

impl MarkSet {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, mark: Mark) -> bool {
        self.0.binary_search(&mark).is_ok()
    }

    /// Copy of this set with `mark` added.
    pub fn with(&self, mark: Mark) -> Self {
        let mut marks = self.0.clone();
        if let Err(idx) = marks.binary_search(&mark) {
            marks.insert(idx, mark);
        }
        Self(marks)
    }

    /// Copy of this set with `mark` removed.
    pub fn without(&self, mark: Mark) -> Self {
        Self(self.0.iter().copied().filter(|m| *m != mark).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = Mark> + '_ {
        self.0.iter().copied()
    }
}

impl From<Mark> for MarkSet {
    fn from(mark: Mark) -> Self {
        Self(vec![mark])
    }
}

impl FromIterator<Mark> for MarkSet {
    fn from_iter<I: IntoIterator<Item = Mark>>(iter: I) -> Self {
        iter.into_iter()
            .fold(MarkSet::empty(), |set, mark| set.with(mark))
    }
}
