//! Platform abstraction traits for editor operations.
//!
//! These traits define the interface between the editor logic and platform-specific
//! implementations (browser DOM, test doubles, etc.). The autocomplete plugin only
//! talks to the editor through `EditorHost` and to its popup through `WidgetSurface`.

use crate::error::EditorError;
use crate::state::EditorState;
use crate::transaction::Transaction;
use crate::types::{Rect, ScreenPos, Size};
use crate::autocomplete::WidgetOption;

/// The editing engine as seen by plugins.
///
/// Implementations own the current `EditorState`, commit transactions to it,
/// and know where document positions end up on screen.
pub trait EditorHost {
    /// The current state.
    fn state(&self) -> &EditorState;

    /// Commit a transaction, replacing the current state with its result.
    ///
    /// Content and selection change together; observers never see one
    /// without the other.
    fn dispatch(&mut self, tr: Transaction) -> Result<(), EditorError>;

    /// Viewport coordinates of a document position.
    ///
    /// Returns None if the position cannot be mapped to the screen.
    fn coords_at_pos(&self, pos: usize) -> Option<Rect>;

    /// Bounding box of the editable surface.
    fn surface_rect(&self) -> Rect;

    /// Give input focus back to the editable surface.
    fn focus(&mut self);
}

/// Platform rendering for the suggestion popup.
pub trait WidgetSurface {
    /// Replace the popup's entries.
    fn render(&mut self, options: &[WidgetOption]);

    /// Size of the popup as currently rendered.
    fn measure(&self) -> Size;

    /// Move the popup's top-left corner.
    fn move_to(&mut self, pos: ScreenPos);

    /// Focus the popup so keyboard selection works.
    fn focus(&mut self) {}
}
