//! In-memory host and popup surface for tests.

use crate::autocomplete::WidgetOption;
use crate::document::Document;
use crate::error::EditorError;
use crate::platform::{EditorHost, WidgetSurface};
use crate::state::EditorState;
use crate::transaction::Transaction;
use crate::types::{Rect, ScreenPos, Size};

const CHAR_WIDTH: f64 = 8.0;
const LINE_HEIGHT: f64 = 20.0;

/// Monospace layout: one line per block, fixed character width.
pub struct TestHost {
    state: EditorState,
    pub surface: Rect,
    pub dispatched: usize,
    pub focused: bool,
}

impl TestHost {
    pub fn new(doc: Document) -> Self {
        Self {
            state: EditorState::new(doc),
            surface: Rect::new(0.0, 0.0, 800.0, 600.0),
            dispatched: 0,
            focused: false,
        }
    }
}

impl EditorHost for TestHost {
    fn state(&self) -> &EditorState {
        &self.state
    }

    fn dispatch(&mut self, tr: Transaction) -> Result<(), EditorError> {
        self.state = self.state.apply(&tr);
        self.dispatched += 1;
        Ok(())
    }

    fn coords_at_pos(&self, pos: usize) -> Option<Rect> {
        let at = self.state.doc().resolve(pos).ok()?;
        let left = self.surface.left + at.parent_offset as f64 * CHAR_WIDTH;
        let top = self.surface.top + at.block as f64 * LINE_HEIGHT;
        Some(Rect::new(left, top, left, top + LINE_HEIGHT))
    }

    fn surface_rect(&self) -> Rect {
        self.surface
    }

    fn focus(&mut self) {
        self.focused = true;
    }
}

/// Records what the widget asked it to draw.
pub struct RecordingSurface {
    pub size: Size,
    pub position: ScreenPos,
    pub rendered: Vec<WidgetOption>,
    pub focused: bool,
}

impl RecordingSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            position: ScreenPos::default(),
            rendered: Vec::new(),
            focused: false,
        }
    }
}

impl WidgetSurface for RecordingSurface {
    fn render(&mut self, options: &[WidgetOption]) {
        self.rendered = options.to_vec();
    }

    fn measure(&self) -> Size {
        self.size
    }

    fn move_to(&mut self, pos: ScreenPos) {
        self.position = pos;
    }

    fn focus(&mut self) {
        self.focused = true;
    }
}
