//! Key types and the base keymap.
//!
//! Platform-agnostic key representation. Platform code converts native key
//! events into `KeyCombo`s and asks the keymap what to do with them.

use std::collections::HashMap;

use smol_str::SmolStr;

use crate::commands;
use crate::marks::Mark;
use crate::state::EditorState;
use crate::transaction::Transaction;

/// Key values for keyboard input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character key.
    Character(SmolStr),

    /// Unknown/unidentified key.
    Unidentified,

    // === Whitespace / editing ===
    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,

    // === Navigation ===
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,

    // === Modifiers ===
    Alt,
    Control,
    Meta,
    Shift,
}

impl Key {
    /// Create a character key.
    pub fn character(s: impl Into<SmolStr>) -> Self {
        Self::Character(s.into())
    }

    /// Parse a DOM `KeyboardEvent.key` value.
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Enter" => Key::Enter,
            "Backspace" => Key::Backspace,
            "Delete" => Key::Delete,
            "Tab" => Key::Tab,
            "Escape" => Key::Escape,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "Home" => Key::Home,
            "End" => Key::End,
            "PageUp" => Key::PageUp,
            "PageDown" => Key::PageDown,
            "Alt" => Key::Alt,
            "Control" => Key::Control,
            "Meta" => Key::Meta,
            "Shift" => Key::Shift,
            s if s.chars().count() == 1 => Key::character(s.to_lowercase()),
            _ => Key::Unidentified,
        }
    }

    /// Check if this is a navigation key.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::ArrowLeft
                | Self::ArrowRight
                | Self::ArrowUp
                | Self::ArrowDown
                | Self::Home
                | Self::End
                | Self::PageUp
                | Self::PageDown
        )
    }

    /// Check if this is a modifier key.
    pub fn is_modifier(&self) -> bool {
        matches!(self, Self::Alt | Self::Control | Self::Meta | Self::Shift)
    }
}

/// Modifier key state for a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const META: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: true,
    };

    /// Get the primary modifier for the platform (Cmd on Mac, Ctrl elsewhere).
    pub fn primary(is_mac: bool) -> Self {
        if is_mac { Self::META } else { Self::CTRL }
    }
}

/// A key combination for triggering an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn primary(key: Key, is_mac: bool) -> Self {
        Self {
            key,
            modifiers: Modifiers::primary(is_mac),
        }
    }

    /// Parse a binding such as `"Tab"`, `"Ctrl-Space"` or `"Shift-Alt-x"`.
    ///
    /// `Mod` resolves to Cmd on Mac and Ctrl elsewhere.
    pub fn parse(binding: &str, is_mac: bool) -> Self {
        let mut parts: Vec<&str> = binding.split('-').collect();
        // a trailing "-" means the minus key itself
        let key = match parts.pop() {
            Some("") => "-",
            Some(key) => key,
            None => "",
        };
        let key = if key == "Space" { " " } else { key };

        let mut modifiers = Modifiers::NONE;
        for part in parts.into_iter().filter(|p| !p.is_empty()) {
            match part {
                "Ctrl" | "Control" | "c" => modifiers.ctrl = true,
                "Alt" | "a" => modifiers.alt = true,
                "Shift" | "s" => modifiers.shift = true,
                "Meta" | "Cmd" | "m" => modifiers.meta = true,
                "Mod" => {
                    if is_mac {
                        modifiers.meta = true
                    } else {
                        modifiers.ctrl = true
                    }
                }
                other => tracing::warn!("unknown modifier {:?} in binding {:?}", other, binding),
            }
        }
        Self::with_modifiers(Key::from_dom_key(key), modifiers)
    }
}

/// Result of handling a keydown event.
#[derive(Debug, Clone, PartialEq)]
pub enum KeydownResult {
    /// Event was handled, prevent default.
    Handled,
    /// Event was not a keybinding, let platform handle it.
    NotHandled,
    /// Event should be passed through (navigation, etc.).
    PassThrough,
}

/// Commands reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapAction {
    ToggleMark(Mark),
    SplitBlock,
    DeleteBackward,
    DeleteForward,
}

impl KeymapAction {
    /// The transaction this action produces on `state`, if it applies.
    pub fn run(self, state: &EditorState) -> Option<Transaction> {
        match self {
            KeymapAction::ToggleMark(mark) => commands::toggle_mark(state, mark),
            KeymapAction::SplitBlock => commands::split_block(state),
            KeymapAction::DeleteBackward => commands::delete_backward(state),
            KeymapAction::DeleteForward => commands::delete_forward(state),
        }
    }
}

/// Key bindings to editor commands.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: HashMap<KeyCombo, KeymapAction>,
}

impl Keymap {
    /// The base keymap: `Mod-b`, `Mod-i`, Enter, Backspace and Delete.
    pub fn default_for_platform(is_mac: bool) -> Self {
        let mut keymap = Self::default();
        keymap.bind(
            KeyCombo::primary(Key::character("b"), is_mac),
            KeymapAction::ToggleMark(Mark::Strong),
        );
        keymap.bind(
            KeyCombo::primary(Key::character("i"), is_mac),
            KeymapAction::ToggleMark(Mark::Em),
        );
        keymap.bind(KeyCombo::new(Key::Enter), KeymapAction::SplitBlock);
        keymap.bind(KeyCombo::new(Key::Backspace), KeymapAction::DeleteBackward);
        keymap.bind(KeyCombo::new(Key::Delete), KeymapAction::DeleteForward);
        keymap
    }

    pub fn bind(&mut self, combo: KeyCombo, action: KeymapAction) {
        self.bindings.insert(combo, action);
    }

    pub fn lookup(&self, combo: &KeyCombo) -> Option<KeymapAction> {
        self.bindings.get(combo).copied()
    }

    /// Resolve a key press to a transaction, or say how the platform should
    /// treat it.
    ///
    /// A bound key whose command does not apply still counts as handled.
    pub fn handle_keydown(
        &self,
        state: &EditorState,
        combo: &KeyCombo,
    ) -> (KeydownResult, Option<Transaction>) {
        if let Some(action) = self.lookup(combo) {
            tracing::trace!(target: "quire::keymap", ?combo, ?action, "keybinding");
            return (KeydownResult::Handled, action.run(state));
        }
        if combo.key.is_navigation() || combo.key.is_modifier() {
            return (KeydownResult::PassThrough, None);
        }
        (KeydownResult::NotHandled, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::types::Selection;

    #[test]
    fn test_parse_bindings() {
        assert_eq!(KeyCombo::parse("Tab", false), KeyCombo::new(Key::Tab));
        assert_eq!(
            KeyCombo::parse("Mod-b", true),
            KeyCombo::with_modifiers(Key::character("b"), Modifiers::META)
        );
        assert_eq!(
            KeyCombo::parse("Mod-b", false),
            KeyCombo::with_modifiers(Key::character("b"), Modifiers::CTRL)
        );
        let combo = KeyCombo::parse("Shift-Alt-Space", false);
        assert_eq!(combo.key, Key::character(" "));
        assert!(combo.modifiers.shift && combo.modifiers.alt);
        assert_eq!(KeyCombo::parse("Ctrl--", false).key, Key::character("-"));
    }

    #[test]
    fn test_dom_keys() {
        assert_eq!(Key::from_dom_key("B"), Key::character("b"));
        assert_eq!(Key::from_dom_key("ArrowUp"), Key::ArrowUp);
        assert_eq!(Key::from_dom_key("F13"), Key::Unidentified);
    }

    #[test]
    fn test_base_keymap() {
        let keymap = Keymap::default_for_platform(false);
        let state = EditorState::new(Document::from_text("hello"))
            .with_selection(Selection::new(1, 3))
            .unwrap();

        let (result, tr) = keymap.handle_keydown(&state, &KeyCombo::parse("Ctrl-b", false));
        assert_eq!(result, KeydownResult::Handled);
        let next = state.apply(&tr.unwrap());
        assert!(next.doc().range_has_mark(1, 3, Mark::Strong));

        let (result, tr) = keymap.handle_keydown(&state, &KeyCombo::new(Key::Enter));
        assert_eq!(result, KeydownResult::Handled);
        assert_eq!(state.apply(&tr.unwrap()).doc().blocks().len(), 2);

        let (result, tr) = keymap.handle_keydown(&state, &KeyCombo::new(Key::ArrowLeft));
        assert_eq!(result, KeydownResult::PassThrough);
        assert!(tr.is_none());

        // Tab is left for the autocomplete plugin
        let (result, _) = keymap.handle_keydown(&state, &KeyCombo::new(Key::Tab));
        assert_eq!(result, KeydownResult::NotHandled);
    }

    #[test]
    fn test_delete_key_removes_next_char() {
        let keymap = Keymap::default_for_platform(true);
        let state = EditorState::new(Document::from_text("abc"))
            .with_selection(Selection::collapsed(2))
            .unwrap();
        let (result, tr) = keymap.handle_keydown(&state, &KeyCombo::new(Key::Delete));
        assert_eq!(result, KeydownResult::Handled);
        assert_eq!(state.apply(&tr.unwrap()).doc().to_plain_text(), "ac");
    }
}
