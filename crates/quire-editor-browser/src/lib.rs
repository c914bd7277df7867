//! Browser DOM layer for the quire editor.
//!
//! This crate renders a `quire-editor-core` document into a contenteditable
//! element and wires browser events back into it. It assumes a
//! `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `view`: rendering and DOM ↔ document position mapping
//! - `events`: beforeinput and keydown translation
//! - `suggest_box`: the `<select>` the suggestion popup draws into
//! - `menubar`: the formatting menu
//! - `stylesheet`: CSS injected for the popup and menu
//! - `editor`: `mount`, which ties all of the above to one element
//! - `platform`: Browser/OS detection for platform-specific behavior
//!
//! # Re-exports
//!
//! This crate re-exports `quire-editor-core` for convenience, so consumers
//! only need to depend on `quire-editor-browser`.

// Re-export core crate
pub use quire_editor_core;
pub use quire_editor_core::*;

pub mod debounce;
pub mod editor;
pub mod events;
pub mod menubar;
pub mod platform;
pub mod stylesheet;
pub mod suggest_box;
pub mod view;

pub use debounce::TimerDebounce;
pub use editor::{BrowserEditor, EditorHandle, SuggestWidget, mount};
pub use menubar::MenuBar;
pub use suggest_box::BrowserSuggestBox;
pub use view::EditorView;

// Platform detection
pub use platform::{Platform, platform};
