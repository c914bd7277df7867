//! Core editor types: selection and screen geometry.
//!
//! These types are framework-agnostic; the browser layer converts DOM rects
//! into them.

use std::ops::Range;

/// Text selection with anchor and head positions.
///
/// The anchor is where the selection started, the head is where the cursor is now.
/// They may be in any order - use `from()` and `to()` for ordered bounds.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Where selection started
    pub anchor: usize,
    /// Where cursor is now
    pub head: usize,
}

impl Selection {
    /// Create a new selection.
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// Create a collapsed selection (cursor position).
    pub fn collapsed(pos: usize) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    /// Lower bound of the selection.
    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    /// Upper bound of the selection.
    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    /// Check if the selection is collapsed (empty, cursor only).
    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// The cursor position, if the selection is collapsed.
    pub fn cursor(&self) -> Option<usize> {
        self.is_empty().then_some(self.head)
    }

    /// Convert to a Range<usize> (ordered).
    pub fn to_range(&self) -> Range<usize> {
        self.from()..self.to()
    }
}

/// A point on screen, in CSS pixels relative to the viewport.
#[derive(Clone, Debug, Copy, PartialEq, Default)]
pub struct ScreenPos {
    pub x: f64,
    pub y: f64,
}

impl ScreenPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of a rendered element.
#[derive(Clone, Debug, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in viewport coordinates.
#[derive(Clone, Debug, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build a rect from an origin and a size.
    pub fn from_origin(origin: ScreenPos, size: Size) -> Self {
        Self {
            left: origin.x,
            top: origin.y,
            right: origin.x + size.width,
            bottom: origin.y + size.height,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_bounds() {
        let sel = Selection::new(5, 10);
        assert_eq!(sel.from(), 5);
        assert_eq!(sel.to(), 10);

        // Backward selection
        let sel = Selection::new(10, 5);
        assert_eq!(sel.from(), 5);
        assert_eq!(sel.to(), 10);
        assert_eq!(sel.to_range(), 5..10);
        assert_eq!(sel.cursor(), None);
    }

    #[test]
    fn test_selection_collapsed() {
        let sel = Selection::collapsed(7);
        assert!(sel.is_empty());
        assert_eq!(sel.cursor(), Some(7));
        assert_eq!(sel.from(), 7);
        assert_eq!(sel.to(), 7);
    }

    #[test]
    fn test_rect_from_origin() {
        let rect = Rect::from_origin(ScreenPos::new(10.0, 20.0), Size::new(30.0, 40.0));
        assert_eq!(rect, Rect::new(10.0, 20.0, 40.0, 60.0));
        assert_eq!(rect.width(), 30.0);
        assert_eq!(rect.height(), 40.0);
    }
}
