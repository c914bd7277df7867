//! quire-editor-core: editor logic without browser dependencies.
//!
//! This crate provides:
//! - `Document`, `Transaction` and `EditorState`: the structured document model
//! - `commands`, `menu` and `keymap`: formatting commands and how they are reached
//! - `autocomplete`: dictionary lookup, the suggestion popup and word correction
//! - `EditorHost` / `WidgetSurface`: the seams the browser layer implements

pub mod autocomplete;
pub mod commands;
pub mod config;
pub mod debounce;
pub mod document;
pub mod error;
pub mod keymap;
pub mod marks;
pub mod menu;
pub mod platform;
pub mod state;
pub mod transaction;
pub mod types;

#[cfg(test)]
mod testing;

pub use autocomplete::{
    AutocompletePlugin, AutocompleteState, Correction, DEFAULT_WORDS, Dictionary, IGNORE_ALL,
    SuggestionSource, SuggestionWidget, WidgetConfig, WidgetOption, WidgetState,
};
pub use config::AutocompleteConfig;
pub use debounce::Debouncer;
pub use document::{Block, BlockKind, Document, ResolvedPos, TextRun};
pub use error::{EditorError, PlatformError};
pub use keymap::{Key, KeyCombo, KeydownResult, Keymap, KeymapAction, Modifiers};
pub use marks::{Mark, MarkSet};
pub use menu::{MenuCommand, MenuElement, MenuItem, MenuItems};
pub use platform::{EditorHost, WidgetSurface};
pub use smol_str::SmolStr;
pub use state::{EditorState, StateField};
pub use transaction::{Mapping, Step, StepMap, Transaction};
pub use types::{Rect, ScreenPos, Selection, Size};
