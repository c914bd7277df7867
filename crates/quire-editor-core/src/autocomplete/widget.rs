//! Suggestion popup state machine and placement.
//!
//! The widget is one reusable popup per editor. `show` fills it with
//! candidates and places it near the cursor, `pick` hides it and hands the
//! chosen word to the callback registered by the last `show`.

use crate::platform::WidgetSurface;
use crate::types::{Rect, ScreenPos, Size};

/// Value carried by the "Ignore All" entry.
pub const IGNORE_ALL: &str = "##ignoreall##";

/// Where a hidden widget is parked.
pub const HIDDEN_POS: ScreenPos = ScreenPos {
    x: -1000.0,
    y: -1000.0,
};

/// One entry in the popup list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WidgetOption {
    /// A selectable replacement.
    Candidate(String),
    /// Non-selectable marker shown while more results are on the way.
    Pending,
    /// Non-selectable separator line.
    Divider,
    /// Keep the word as typed.
    IgnoreAll,
}

impl WidgetOption {
    /// The value reported when the entry is picked, if it can be picked.
    pub fn value(&self) -> Option<&str> {
        match self {
            WidgetOption::Candidate(word) => Some(word),
            WidgetOption::IgnoreAll => Some(IGNORE_ALL),
            WidgetOption::Pending | WidgetOption::Divider => None,
        }
    }

    pub fn is_selectable(&self) -> bool {
        self.value().is_some()
    }
}

/// Rendering and placement knobs.
#[derive(Clone, Debug, PartialEq)]
pub struct WidgetConfig {
    /// Whether to draw the separator above "Ignore All".
    pub show_divider: bool,
    /// Gap kept between the popup and the right edge of the surface.
    pub right_margin: f64,
    /// Gap kept between the popup and the bottom edge of the surface.
    pub bottom_margin: f64,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            show_divider: true,
            right_margin: 2.0,
            bottom_margin: 8.0,
        }
    }
}

/// Build the popup entries for a candidate list.
pub fn build_options(candidates: &[String], loading: bool, show_divider: bool) -> Vec<WidgetOption> {
    let mut options: Vec<WidgetOption> = candidates
        .iter()
        .cloned()
        .map(WidgetOption::Candidate)
        .collect();
    if loading {
        options.push(WidgetOption::Pending);
    }
    if show_divider && (loading || !candidates.is_empty()) {
        options.push(WidgetOption::Divider);
    }
    options.push(WidgetOption::IgnoreAll);
    options
}

/// Pull a popup of `size` at `pos` back inside `anchor`.
///
/// Each axis is only adjusted when the popup would overflow that edge and
/// the anchor is large enough to hold it.
pub fn clamp_position(pos: ScreenPos, size: Size, anchor: Rect, config: &WidgetConfig) -> ScreenPos {
    let mut out = pos;
    if pos.x + size.width > anchor.right && anchor.right - size.width > anchor.left {
        out.x = anchor.right - size.width - config.right_margin;
    }
    if pos.y + size.height > anchor.bottom && anchor.bottom - size.height > anchor.top {
        out.y = anchor.bottom - size.height - config.bottom_margin;
    }
    out
}

/// Callback receiving the replacement text.
pub type PickHandler = Box<dyn FnOnce(String)>;

/// A resolved pick, ready to hand to its callback.
pub struct Pick {
    pub replacement: String,
    handler: PickHandler,
}

impl Pick {
    /// Invoke the callback registered by the `show` that produced this pick.
    pub fn run(self) {
        (self.handler)(self.replacement)
    }
}

impl std::fmt::Debug for Pick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pick")
            .field("replacement", &self.replacement)
            .finish_non_exhaustive()
    }
}

/// Visible state of the popup.
#[derive(Clone, Debug, PartialEq)]
pub enum WidgetState {
    Hidden,
    Shown {
        trigger_word: String,
        position: ScreenPos,
        options: Vec<WidgetOption>,
    },
}

/// The suggestion popup, generic over where it is drawn.
pub struct SuggestionWidget<S: WidgetSurface> {
    surface: S,
    config: WidgetConfig,
    state: WidgetState,
    on_pick: Option<PickHandler>,
}

impl<S: WidgetSurface> SuggestionWidget<S> {
    /// Create a hidden widget drawing on `surface`.
    pub fn new(mut surface: S, config: WidgetConfig) -> Self {
        surface.move_to(HIDDEN_POS);
        Self {
            surface,
            config,
            state: WidgetState::Hidden,
            on_pick: None,
        }
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn is_shown(&self) -> bool {
        matches!(self.state, WidgetState::Shown { .. })
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Fill the popup and place it near `pos`, kept inside `anchor`.
    ///
    /// Replaces any callback from a previous `show`. Returns where the popup
    /// ended up.
    pub fn show<F>(
        &mut self,
        anchor: Rect,
        trigger_word: &str,
        pos: ScreenPos,
        candidates: &[String],
        loading: bool,
        on_pick: F,
    ) -> ScreenPos
    where
        F: FnOnce(String) + 'static,
    {
        let options = build_options(candidates, loading, self.config.show_divider);
        self.surface.render(&options);

        let size = self.surface.measure();
        let position = clamp_position(pos, size, anchor, &self.config);
        self.surface.move_to(position);
        self.surface.focus();

        tracing::debug!(
            target: "quire::autocomplete",
            trigger_word,
            candidates = candidates.len(),
            x = position.x,
            y = position.y,
            "showing suggestions"
        );

        self.on_pick = Some(Box::new(on_pick));
        self.state = WidgetState::Shown {
            trigger_word: trigger_word.to_string(),
            position,
            options,
        };
        position
    }

    /// Park the popup off-screen and drop the pending callback.
    pub fn hide(&mut self) {
        self.surface.move_to(HIDDEN_POS);
        self.state = WidgetState::Hidden;
        self.on_pick = None;
    }

    /// Hide the popup and resolve a picked value without running the callback.
    ///
    /// "Ignore All" resolves to the word that opened the popup. Returns None
    /// when the popup is not shown.
    pub fn take_pick(&mut self, value: &str) -> Option<Pick> {
        let WidgetState::Shown { trigger_word, .. } = &self.state else {
            return None;
        };
        let replacement = if value == IGNORE_ALL {
            trigger_word.clone()
        } else {
            value.to_string()
        };
        let handler = self.on_pick.take();
        self.hide();
        handler.map(|handler| Pick {
            replacement,
            handler,
        })
    }

    /// Hide the popup and run the callback with the resolved replacement.
    ///
    /// Returns whether a callback ran.
    pub fn pick(&mut self, value: &str) -> bool {
        match self.take_pick(value) {
            Some(pick) => {
                pick.run();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::testing::RecordingSurface;

    fn words(w: &[&str]) -> Vec<String> {
        w.iter().map(|s| s.to_string()).collect()
    }

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn() -> PickHandler) {
        let picked = Rc::new(RefCell::new(Vec::new()));
        let sink = picked.clone();
        let make = move || -> PickHandler {
            let sink = sink.clone();
            Box::new(move |s| sink.borrow_mut().push(s))
        };
        (picked, make)
    }

    #[test]
    fn test_options_layout() {
        insta::assert_debug_snapshot!(build_options(&words(&["dog", "dolphin"]), true, true), @r#"
        [
            Candidate(
                "dog",
            ),
            Candidate(
                "dolphin",
            ),
            Pending,
            Divider,
            IgnoreAll,
        ]
        "#);
    }

    #[test]
    fn test_divider_rules() {
        assert_eq!(build_options(&[], false, true), vec![WidgetOption::IgnoreAll]);
        assert_eq!(
            build_options(&[], true, true),
            vec![WidgetOption::Pending, WidgetOption::Divider, WidgetOption::IgnoreAll]
        );
        assert_eq!(
            build_options(&words(&["dog"]), false, false),
            vec![WidgetOption::Candidate("dog".into()), WidgetOption::IgnoreAll]
        );
    }

    #[test]
    fn test_exactly_one_trailing_ignore_all() {
        for (loading, divider) in [(false, false), (true, false), (false, true), (true, true)] {
            let options = build_options(&words(&["a", "b", "c"]), loading, divider);
            assert_eq!(options.last(), Some(&WidgetOption::IgnoreAll));
            assert_eq!(
                options.iter().filter(|o| **o == WidgetOption::IgnoreAll).count(),
                1
            );
        }
    }

    #[test]
    fn test_only_candidates_and_ignore_are_selectable() {
        let options = build_options(&words(&["dog"]), true, true);
        let values: Vec<_> = options.iter().filter_map(WidgetOption::value).collect();
        assert_eq!(values, vec!["dog", IGNORE_ALL]);
    }

    #[test]
    fn test_clamp_keeps_popup_inside_anchor() {
        let config = WidgetConfig::default();
        let anchor = Rect::new(0.0, 0.0, 500.0, 300.0);
        let size = Size::new(100.0, 80.0);

        // fits: untouched
        let pos = clamp_position(ScreenPos::new(10.0, 10.0), size, anchor, &config);
        assert_eq!(pos, ScreenPos::new(10.0, 10.0));

        // overflows both edges
        let pos = clamp_position(ScreenPos::new(450.0, 280.0), size, anchor, &config);
        assert_eq!(pos, ScreenPos::new(398.0, 212.0));
    }

    #[test]
    fn test_clamp_never_exceeds_large_enough_anchor() {
        let config = WidgetConfig::default();
        let anchor = Rect::new(20.0, 40.0, 420.0, 340.0);
        let size = Size::new(120.0, 90.0);
        for x in (0..600).step_by(37) {
            for y in (0..500).step_by(41) {
                let pos = clamp_position(ScreenPos::new(x as f64, y as f64), size, anchor, &config);
                let rect = Rect::from_origin(pos, size);
                assert!(rect.right <= anchor.right, "{rect:?}");
                assert!(rect.bottom <= anchor.bottom, "{rect:?}");
            }
        }
    }

    #[test]
    fn test_clamp_skips_anchor_too_small() {
        let config = WidgetConfig::default();
        let anchor = Rect::new(0.0, 0.0, 50.0, 50.0);
        let pos = clamp_position(ScreenPos::new(30.0, 30.0), Size::new(100.0, 100.0), anchor, &config);
        assert_eq!(pos, ScreenPos::new(30.0, 30.0));
    }

    #[test]
    fn test_show_and_pick_candidate() {
        let (picked, make) = recorder();
        let mut widget = SuggestionWidget::new(RecordingSurface::new(Size::new(100.0, 60.0)), WidgetConfig::default());
        assert_eq!(widget.surface().position, HIDDEN_POS);

        let anchor = Rect::new(0.0, 0.0, 400.0, 400.0);
        let pos = widget.show(anchor, "do", ScreenPos::new(5.0, 15.0), &words(&["dog", "dolphin"]), false, make());
        assert_eq!(pos, ScreenPos::new(5.0, 15.0));
        assert!(widget.is_shown());
        assert_eq!(widget.surface().rendered.len(), 4);
        assert!(widget.surface().focused);

        assert!(widget.pick("dolphin"));
        assert!(!widget.is_shown());
        assert_eq!(widget.surface().position, HIDDEN_POS);
        assert_eq!(*picked.borrow(), vec!["dolphin"]);
    }

    #[test]
    fn test_ignore_all_resolves_to_trigger_word() {
        let (picked, make) = recorder();
        let mut widget = SuggestionWidget::new(RecordingSurface::new(Size::new(10.0, 10.0)), WidgetConfig::default());
        widget.show(Rect::new(0.0, 0.0, 100.0, 100.0), "lio", ScreenPos::default(), &words(&["lion"]), false, make());
        assert!(widget.pick(IGNORE_ALL));
        assert_eq!(*picked.borrow(), vec!["lio"]);
    }

    #[test]
    fn test_pick_while_hidden_is_noop() {
        let mut widget = SuggestionWidget::new(RecordingSurface::new(Size::default()), WidgetConfig::default());
        assert!(!widget.pick("dog"));
        assert!(widget.take_pick(IGNORE_ALL).is_none());
    }

    #[test]
    fn test_reshow_replaces_callback() {
        let (first, make_first) = recorder();
        let (second, make_second) = recorder();
        let mut widget = SuggestionWidget::new(RecordingSurface::new(Size::new(10.0, 10.0)), WidgetConfig::default());
        let anchor = Rect::new(0.0, 0.0, 100.0, 100.0);

        widget.show(anchor, "do", ScreenPos::default(), &words(&["dog"]), false, make_first());
        widget.hide();
        assert!(!widget.pick("dog"));

        widget.show(anchor, "do", ScreenPos::default(), &words(&["dog"]), false, make_first());
        widget.show(anchor, "sn", ScreenPos::default(), &words(&["snake"]), false, make_second());
        assert!(widget.pick("snake"));
        assert!(first.borrow().is_empty());
        assert_eq!(*second.borrow(), vec!["snake"]);
    }

    #[test]
    fn test_show_clamps_using_measured_size() {
        let mut widget = SuggestionWidget::new(RecordingSurface::new(Size::new(100.0, 50.0)), WidgetConfig::default());
        let anchor = Rect::new(0.0, 0.0, 300.0, 200.0);
        let pos = widget.show(anchor, "x", ScreenPos::new(280.0, 190.0), &words(&["xy"]), false, |_| {});
        assert_eq!(pos, ScreenPos::new(198.0, 142.0));
        assert_eq!(widget.surface().position, pos);
    }
}
