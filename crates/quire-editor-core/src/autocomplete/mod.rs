//! Word autocomplete plugin.
//!
//! - `dictionary`: suggestion source
//! - `correction`: replacing the word with the picked suggestion
//! - `widget`: popup state machine and placement
//! - `token`: finding the word under the cursor
//!
//! `AutocompletePlugin` ties these together behind the trigger key, and
//! `AutocompleteState` is the plugin's slice of `EditorState`.

mod correction;
mod dictionary;
mod token;
mod widget;

use std::cell::RefCell;
use std::rc::Rc;

pub use correction::Correction;
pub use dictionary::{DEFAULT_WORDS, Dictionary, SuggestionSource};
pub use token::{Token, is_word_char, token_before_cursor, trailing_word};
pub use widget::{
    HIDDEN_POS, IGNORE_ALL, Pick, PickHandler, SuggestionWidget, WidgetConfig, WidgetOption,
    WidgetState, build_options, clamp_position,
};

use crate::config::AutocompleteConfig;
use crate::keymap::{KeyCombo, KeydownResult};
use crate::platform::{EditorHost, WidgetSurface};
use crate::state::{EditorState, StateField};
use crate::transaction::Transaction;
use crate::types::ScreenPos;

/// Plugin state: the word most recently completed by typing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AutocompleteState {
    last_word: String,
}

impl AutocompleteState {
    pub fn last_word(&self) -> &str {
        &self.last_word
    }
}

impl StateField for AutocompleteState {
    fn init(_state: &EditorState) -> Self {
        Self::default()
    }

    /// Content changes recompute the word before the cursor (empty when the
    /// cursor does not follow a word); other transactions carry it over.
    fn apply(&self, tr: &Transaction, _old_state: &EditorState, new_state: &EditorState) -> Self {
        if !tr.doc_changed() {
            return self.clone();
        }
        Self {
            last_word: token_before_cursor(new_state)
                .map(|t| t.word)
                .unwrap_or_default(),
        }
    }
}

/// Completes the word before the cursor from a suggestion source.
pub struct AutocompletePlugin<D: SuggestionSource = Dictionary> {
    source: D,
    trigger: KeyCombo,
    vertical_offset: f64,
}

impl AutocompletePlugin<Dictionary> {
    /// Plugin using the configured dictionary.
    pub fn from_config(config: &AutocompleteConfig) -> Self {
        Self::new(config.dictionary(), config)
    }
}

impl<D: SuggestionSource> AutocompletePlugin<D> {
    pub fn new(source: D, config: &AutocompleteConfig) -> Self {
        Self {
            source,
            trigger: config.trigger_combo(),
            vertical_offset: config.vertical_offset,
        }
    }

    pub fn source(&self) -> &D {
        &self.source
    }

    pub fn trigger(&self) -> &KeyCombo {
        &self.trigger
    }

    /// The plugin draws its own suggestions, so the platform spellchecker is off.
    pub fn native_spellcheck(&self) -> bool {
        false
    }

    /// Key interception hook.
    ///
    /// On the trigger key, looks up the word before the cursor and opens the
    /// popup when there is anything to offer. Anything else, or a trigger
    /// with nothing to complete, is left to the default key handling.
    pub fn handle_key_down<H, S>(
        &self,
        host: &Rc<RefCell<H>>,
        widget: &mut SuggestionWidget<S>,
        key: &KeyCombo,
    ) -> KeydownResult
    where
        H: EditorHost + 'static,
        S: WidgetSurface,
    {
        if *key != self.trigger {
            return KeydownResult::NotHandled;
        }
        if self.complete(host, widget) {
            KeydownResult::Handled
        } else {
            KeydownResult::NotHandled
        }
    }

    /// Open the popup for the word before the cursor. Returns whether it opened.
    pub fn complete<H, S>(&self, host: &Rc<RefCell<H>>, widget: &mut SuggestionWidget<S>) -> bool
    where
        H: EditorHost + 'static,
        S: WidgetSurface,
    {
        let (token, screen_pos, anchor, candidates) = {
            let host_ref = host.borrow();
            let Some(token) = token_before_cursor(host_ref.state()) else {
                tracing::debug!(target: "quire::autocomplete", "no word before cursor");
                return false;
            };
            let Some(coords) = host_ref.coords_at_pos(token.to) else {
                tracing::warn!(
                    target: "quire::autocomplete",
                    pos = token.to,
                    "no screen coordinates for word end"
                );
                return false;
            };
            let screen_pos = ScreenPos::new(coords.left, coords.top + self.vertical_offset);
            let candidates = self.source.suggest(&token.word);
            if candidates.is_empty() {
                tracing::debug!(target: "quire::autocomplete", word = %token.word, "no suggestions");
                return false;
            }
            (token, screen_pos, host_ref.surface_rect(), candidates)
        };

        let correction = Correction::new(token.from, token.to, token.marks.clone());
        let host = Rc::downgrade(host);
        widget.show(
            anchor,
            &token.word,
            screen_pos,
            &candidates,
            false,
            move |replacement| {
                let Some(host) = host.upgrade() else {
                    return;
                };
                let mut host = host.borrow_mut();
                if let Err(e) = correction.apply(&mut *host, &replacement) {
                    tracing::warn!("correction failed: {}", e);
                }
            },
        );
        true
    }

    /// Pointer interception hook: any click in the editor closes the popup.
    pub fn handle_click<S: WidgetSurface>(&self, widget: &mut SuggestionWidget<S>) -> bool {
        if widget.is_shown() {
            widget.hide();
        }
        false
    }

    /// Text input interception hook. Typing is never intercepted.
    pub fn handle_text_input(&self, _from: usize, _to: usize, _text: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, BlockKind, Document, TextRun};
    use crate::keymap::Key;
    use crate::marks::{Mark, MarkSet};
    use crate::testing::{RecordingSurface, TestHost};
    use crate::types::{Rect, Selection, Size};

    fn tab() -> KeyCombo {
        KeyCombo::new(Key::Tab)
    }

    fn host_with(doc: Document, cursor: usize) -> Rc<RefCell<TestHost>> {
        let mut host = TestHost::new(doc);
        let mut tr = host.state().tr();
        tr.set_selection(Selection::collapsed(cursor));
        host.dispatch(tr).unwrap();
        Rc::new(RefCell::new(host))
    }

    fn widget() -> SuggestionWidget<RecordingSurface> {
        SuggestionWidget::new(RecordingSurface::new(Size::new(80.0, 60.0)), WidgetConfig::default())
    }

    fn plugin() -> AutocompletePlugin {
        AutocompletePlugin::from_config(&AutocompleteConfig::default())
    }

    fn lion_doc() -> Document {
        Document::new(vec![Block::new(
            BlockKind::Paragraph,
            vec![
                TextRun::plain("The tame "),
                TextRun::new("lio", MarkSet::from(Mark::Strong)),
            ],
        )])
    }

    #[test]
    fn test_tab_completes_word() {
        let host = host_with(lion_doc(), 13);
        let mut widget = widget();
        let result = plugin().handle_key_down(&host, &mut widget, &tab());
        assert_eq!(result, KeydownResult::Handled);

        let WidgetState::Shown {
            trigger_word,
            position,
            options,
        } = widget.state().clone()
        else {
            panic!("widget should be shown");
        };
        assert_eq!(trigger_word, "lio");
        assert_eq!(options[0], WidgetOption::Candidate("lion".into()));
        // below the word end
        let coords = host.borrow().coords_at_pos(13).unwrap();
        assert_eq!(position, ScreenPos::new(coords.left, coords.top + 10.0));

        assert!(widget.pick("lion"));
        let host = host.borrow();
        assert_eq!(host.state().doc().to_plain_text(), "The tame lion");
        assert_eq!(host.state().selection(), Selection::collapsed(14));
        assert!(host.state().doc().range_has_mark(10, 14, Mark::Strong));
        assert_eq!(host.state().autocomplete().last_word(), "lion");
    }

    #[test]
    fn test_ignore_all_leaves_content_unchanged() {
        let host = host_with(lion_doc(), 13);
        let before = host.borrow().state().doc().clone();
        let mut widget = widget();
        plugin().handle_key_down(&host, &mut widget, &tab());

        assert!(widget.pick(IGNORE_ALL));
        let host = host.borrow();
        assert_eq!(host.state().doc(), &before);
        assert_eq!(host.state().selection(), Selection::collapsed(13));
        assert_eq!(host.dispatched, 2);
    }

    #[test]
    fn test_other_keys_pass_through() {
        let host = host_with(lion_doc(), 13);
        let mut widget = widget();
        let result = plugin().handle_key_down(&host, &mut widget, &KeyCombo::new(Key::Enter));
        assert_eq!(result, KeydownResult::NotHandled);
        assert!(!widget.is_shown());
    }

    #[test]
    fn test_no_word_or_no_candidates_is_noop() {
        let mut widget = widget();

        let host = host_with(Document::from_text("lio "), 5);
        assert_eq!(
            plugin().handle_key_down(&host, &mut widget, &tab()),
            KeydownResult::NotHandled
        );

        let host = host_with(Document::from_text("qq"), 3);
        assert_eq!(
            plugin().handle_key_down(&host, &mut widget, &tab()),
            KeydownResult::NotHandled
        );

        // a full word has no longer matches
        let host = host_with(Document::from_text("lion"), 5);
        assert_eq!(
            plugin().handle_key_down(&host, &mut widget, &tab()),
            KeydownResult::NotHandled
        );
        assert!(!widget.is_shown());
        assert_eq!(host.borrow().dispatched, 1);
    }

    #[test]
    fn test_tab_inside_word_is_noop() {
        let host = host_with(Document::from_text("dolphin"), 3);
        let mut widget = widget();
        assert_eq!(
            plugin().handle_key_down(&host, &mut widget, &tab()),
            KeydownResult::NotHandled
        );
        assert!(!widget.is_shown());
        assert_eq!(host.borrow().state().doc().to_plain_text(), "dolphin");
    }

    #[test]
    fn test_popup_stays_inside_surface() {
        // Cursor near the bottom-right corner of a small surface.
        let host = host_with(Document::from_text("some text then sn"), 18);
        host.borrow_mut().surface = Rect::new(0.0, 0.0, 150.0, 40.0);
        let mut widget = SuggestionWidget::new(
            RecordingSurface::new(Size::new(60.0, 30.0)),
            WidgetConfig::default(),
        );
        plugin().handle_key_down(&host, &mut widget, &tab());
        let WidgetState::Shown { position, .. } = widget.state() else {
            panic!("widget should be shown");
        };
        let rect = Rect::from_origin(*position, Size::new(60.0, 30.0));
        assert!(rect.right <= 150.0);
        assert!(rect.bottom <= 40.0);
    }

    #[test]
    fn test_click_hides_popup() {
        let host = host_with(lion_doc(), 13);
        let mut widget = widget();
        let plugin = plugin();
        plugin.handle_key_down(&host, &mut widget, &tab());
        assert!(widget.is_shown());
        assert!(!plugin.handle_click(&mut widget));
        assert!(!widget.is_shown());
        assert!(!plugin.handle_text_input(1, 1, "x"));
    }

    #[test]
    fn test_last_word_reducer() {
        let state = EditorState::new(Document::from_text("the"));
        assert_eq!(state.autocomplete().last_word(), "");

        let mut tr = state.tr();
        tr.replace_with(4, 4, " lio", &MarkSet::empty()).unwrap();
        tr.set_selection(Selection::collapsed(8));
        let state = state.apply(&tr);
        assert_eq!(state.autocomplete().last_word(), "lio");

        // selection-only transactions keep the previous value
        let moved = state.with_selection(Selection::collapsed(1)).unwrap();
        assert_eq!(moved.autocomplete().last_word(), "lio");

        let mut tr = state.tr();
        tr.replace_with(8, 8, " ", &MarkSet::empty()).unwrap();
        tr.set_selection(Selection::collapsed(9));
        let state = state.apply(&tr);
        assert_eq!(state.autocomplete().last_word(), "");
    }
}
