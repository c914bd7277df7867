//! The mounted editor: state, DOM view and event wiring.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{CompositionEvent, HtmlElement, HtmlStyleElement, InputEvent, KeyboardEvent};

use quire_editor_core::{
    AutocompleteConfig, AutocompletePlugin, Document, EditorError, EditorHost, EditorState, Key,
    KeydownResult, Keymap, MenuItem, MenuItems, PlatformError, Rect, Selection, SuggestionWidget,
    Transaction, commands,
};

use crate::debounce::TimerDebounce;
use crate::events::{
    BeforeInputContext, BeforeInputResult, InputType, handle_beforeinput, key_combo_from_event,
};
use crate::menubar::MenuBar;
use crate::platform::platform;
use crate::stylesheet;
use crate::suggest_box::BrowserSuggestBox;
use crate::view::EditorView;

type StateObserver = Box<dyn Fn(&EditorState)>;
type ChangeHandler = Rc<dyn Fn(String)>;

/// Editor state bound to its DOM view.
///
/// Every committed transaction re-renders changed content, puts the DOM
/// selection back where the state says, and notifies observers.
pub struct BrowserEditor {
    view: EditorView,
    state: EditorState,
    observers: Vec<StateObserver>,
    change: Option<(TimerDebounce, ChangeHandler)>,
}

impl BrowserEditor {
    pub fn new(view: EditorView, state: EditorState) -> Result<Self, PlatformError> {
        view.render(state.doc())?;
        Ok(Self {
            view,
            state,
            observers: Vec::new(),
            change: None,
        })
    }

    pub fn view(&self) -> &EditorView {
        &self.view
    }

    /// Run `observer` after every commit, and once now.
    pub fn observe(&mut self, observer: impl Fn(&EditorState) + 'static) {
        observer(&self.state);
        self.observers.push(Box::new(observer));
    }

    /// Report the plain text after content changes settle for `delay_ms`.
    pub fn on_change(&mut self, delay_ms: u32, handler: impl Fn(String) + 'static) {
        self.change = Some((TimerDebounce::new(delay_ms), Rc::new(handler)));
    }

    /// Redraw the document, discarding anything the browser changed in the DOM.
    pub fn refresh(&self) -> Result<(), PlatformError> {
        self.view.render(self.state.doc())?;
        self.view.restore_selection(self.state.doc(), self.state.selection())
    }

    /// Adopt the DOM selection if it moved. Returns whether it did.
    pub fn sync_selection(&mut self) -> bool {
        let Some(selection) = self.view.read_selection(self.state.doc()) else {
            return false;
        };
        if selection == self.state.selection() {
            return false;
        }
        tracing::trace!(
            target: "quire::cursor",
            anchor = selection.anchor,
            head = selection.head,
            "selection moved in DOM"
        );
        let mut tr = self.state.tr();
        tr.set_selection(selection);
        // already where the DOM has it
        if let Err(e) = self.commit(tr, false) {
            tracing::warn!("selection sync failed: {}", e);
        }
        true
    }

    fn commit(&mut self, tr: Transaction, restore_selection: bool) -> Result<(), EditorError> {
        self.state = self.state.apply(&tr);
        if tr.doc_changed() {
            self.view.render(self.state.doc())?;
        }
        if restore_selection {
            self.view
                .restore_selection(self.state.doc(), self.state.selection())?;
        }
        for observer in &self.observers {
            observer(&self.state);
        }

        if tr.doc_changed() {
            if let Some((debounce, handler)) = &self.change {
                let text = self.state.doc().to_plain_text();
                let handler = handler.clone();
                debounce.schedule(move || handler(text));
            }
        }
        Ok(())
    }
}

impl EditorHost for BrowserEditor {
    fn state(&self) -> &EditorState {
        &self.state
    }

    fn dispatch(&mut self, tr: Transaction) -> Result<(), EditorError> {
        self.commit(tr, true)
    }

    fn coords_at_pos(&self, pos: usize) -> Option<Rect> {
        self.view.coords_at_pos(self.state.doc(), pos)
    }

    fn surface_rect(&self) -> Rect {
        self.view.surface_rect()
    }

    fn focus(&mut self) {
        self.view.focus();
        if let Err(e) = self
            .view
            .restore_selection(self.state.doc(), self.state.selection())
        {
            tracing::warn!("restoring selection after focus failed: {}", e);
        }
    }
}

fn dispatch_logged(editor: &RefCell<BrowserEditor>, tr: Option<Transaction>) {
    if let Some(tr) = tr {
        if let Err(e) = editor.borrow_mut().dispatch(tr) {
            tracing::warn!("dispatch failed: {}", e);
        }
    }
}

pub type SuggestWidget = SuggestionWidget<BrowserSuggestBox>;

/// A mounted editor. Dropping it detaches listeners and removes the popup,
/// menu bar and stylesheet it added to the page.
pub struct EditorHandle {
    editor: Rc<RefCell<BrowserEditor>>,
    widget: Rc<RefCell<SuggestWidget>>,
    plugin: Rc<AutocompletePlugin>,
    menubar: Option<Rc<MenuBar>>,
    style: HtmlStyleElement,
    _listeners: Vec<EventListener>,
}

/// Turn `root` into an editor holding `text`, one paragraph per line.
pub fn mount(
    root: HtmlElement,
    text: &str,
    config: &AutocompleteConfig,
) -> Result<EditorHandle, PlatformError> {
    let document = root.owner_document().ok_or("editor root has no document")?;
    let platform = platform();
    let style = stylesheet::inject(&document, stylesheet::RULES)?;

    let plugin = Rc::new(AutocompletePlugin::from_config(config));
    let keymap = Rc::new(Keymap::default_for_platform(platform.mac));

    let view = EditorView::new(root.clone(), plugin.native_spellcheck());
    let editor = Rc::new(RefCell::new(BrowserEditor::new(
        view,
        EditorState::new(Document::from_text(text)),
    )?));

    let suggest_box = BrowserSuggestBox::new(&document, &config.ignore_all_label)?;
    let select = suggest_box.select().clone();
    let widget = Rc::new(RefCell::new(SuggestionWidget::new(
        suggest_box,
        config.widget_config(platform.supports_select_divider()),
    )));

    let menubar = match root.parent_node() {
        Some(parent) => {
            let weak = Rc::downgrade(&editor);
            let on_command = Rc::new(move |item: &MenuItem| {
                let Some(editor) = weak.upgrade() else {
                    return;
                };
                let tr = item.run(editor.borrow().state());
                dispatch_logged(&editor, tr);
            });
            let bar = Rc::new(MenuBar::new(&document, &MenuItems::build(), on_command)?);
            let before: &web_sys::Node = root.as_ref();
            parent
                .insert_before(bar.element(), Some(before))
                .map_err(|e| format!("insert_before failed: {:?}", e))?;
            let observed = bar.clone();
            editor
                .borrow_mut()
                .observe(move |state| observed.update(state));
            Some(bar)
        }
        None => {
            tracing::warn!("editor root is detached, skipping menu bar");
            None
        }
    };

    let mut listeners = Vec::new();

    // keydown: trigger key first, then the keymap
    {
        let editor = editor.clone();
        let widget = widget.clone();
        let plugin = plugin.clone();
        let keymap = keymap.clone();
        listeners.push(EventListener::new_with_options(
            &root,
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                if event.is_composing() {
                    return;
                }
                let combo = key_combo_from_event(event);
                editor.borrow_mut().sync_selection();

                if combo == *plugin.trigger() {
                    let font_size = editor.borrow().view().font_size();
                    widget.borrow_mut().surface_mut().set_font_size(font_size);
                }
                let result = plugin.handle_key_down(&editor, &mut widget.borrow_mut(), &combo);
                if result == KeydownResult::Handled {
                    event.prevent_default();
                    return;
                }

                let (result, tr) = keymap.handle_keydown(editor.borrow().state(), &combo);
                if result == KeydownResult::Handled {
                    event.prevent_default();
                    dispatch_logged(&editor, tr);
                }
            },
        ));
    }

    // beforeinput: typed text goes through the document, not the DOM
    {
        let editor = editor.clone();
        let plugin = plugin.clone();
        listeners.push(EventListener::new_with_options(
            &root,
            "beforeinput",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let Some(event) = event.dyn_ref::<InputEvent>() else {
                    return;
                };
                let ctx = BeforeInputContext::from_event(event);
                editor.borrow_mut().sync_selection();
                if let (InputType::InsertText, Some(text)) = (&ctx.input_type, &ctx.data) {
                    let sel = editor.borrow().state().selection();
                    if plugin.handle_text_input(sel.from(), sel.to(), text) {
                        event.prevent_default();
                        return;
                    }
                }
                let (result, tr) = handle_beforeinput(editor.borrow().state(), &ctx);
                if result == BeforeInputResult::Handled {
                    event.prevent_default();
                    dispatch_logged(&editor, tr);
                }
            },
        ));
    }

    // composition: let the IME edit the DOM, then commit its result
    {
        let composing_from: Rc<Cell<Option<Selection>>> = Rc::new(Cell::new(None));

        let editor_start = editor.clone();
        let start = composing_from.clone();
        listeners.push(EventListener::new(&root, "compositionstart", move |_| {
            editor_start.borrow_mut().sync_selection();
            start.set(Some(editor_start.borrow().state().selection()));
        }));

        let editor = editor.clone();
        listeners.push(EventListener::new(&root, "compositionend", move |event| {
            let data = event
                .dyn_ref::<CompositionEvent>()
                .and_then(CompositionEvent::data)
                .unwrap_or_default();
            let Some(selection) = composing_from.take() else {
                return;
            };
            let tr = editor
                .borrow()
                .state()
                .with_selection(selection)
                .ok()
                .and_then(|state| commands::insert_text(&state, &data));
            match tr {
                Some(tr) => dispatch_logged(&editor, Some(tr)),
                None => {
                    if let Err(e) = editor.borrow().refresh() {
                        tracing::warn!("redraw after composition failed: {}", e);
                    }
                }
            }
        }));
    }

    {
        let widget = widget.clone();
        let plugin = plugin.clone();
        let menubar = menubar.clone();
        listeners.push(EventListener::new(&root, "mousedown", move |_| {
            plugin.handle_click(&mut widget.borrow_mut());
            if let Some(menubar) = &menubar {
                menubar.close_dropdowns();
            }
        }));
    }

    // formatting toggled with an empty selection does not outlive focus
    {
        let editor = editor.clone();
        listeners.push(EventListener::new(&root, "blur", move |_| {
            let tr = commands::clear_stored_marks(editor.borrow().state());
            if let Some(tr) = tr {
                if let Err(e) = editor.borrow_mut().commit(tr, false) {
                    tracing::warn!("clearing stored marks failed: {}", e);
                }
            }
        }));
    }

    {
        let editor = editor.clone();
        listeners.push(EventListener::new(&document, "selectionchange", move |_| {
            // skip while a handler is mid-dispatch
            if let Ok(mut editor) = editor.try_borrow_mut() {
                editor.sync_selection();
            }
        }));
    }

    // popup: a pick replaces the word, Escape dismisses
    {
        let widget = widget.clone();
        let list = select.clone();
        listeners.push(EventListener::new(&select, "change", move |_| {
            let value = list.value();
            let pick = widget.borrow_mut().take_pick(&value);
            if let Some(pick) = pick {
                pick.run();
            }
        }));
    }
    {
        let widget = widget.clone();
        let editor = editor.clone();
        let list = select.clone();
        listeners.push(EventListener::new_with_options(
            &select,
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                match Key::from_dom_key(&event.key()) {
                    Key::Escape => {
                        event.prevent_default();
                        widget.borrow_mut().hide();
                        editor.borrow_mut().focus();
                    }
                    Key::Enter => {
                        event.prevent_default();
                        let value = list.value();
                        if value.is_empty() {
                            return;
                        }
                        let pick = widget.borrow_mut().take_pick(&value);
                        if let Some(pick) = pick {
                            pick.run();
                        }
                    }
                    _ => {}
                }
            },
        ));
    }

    tracing::info!(
        target: "quire::editor",
        blocks = editor.borrow().state().doc().blocks().len(),
        trigger = ?plugin.trigger(),
        "editor mounted"
    );

    Ok(EditorHandle {
        editor,
        widget,
        plugin,
        menubar,
        style,
        _listeners: listeners,
    })
}

impl EditorHandle {
    pub fn editor(&self) -> &Rc<RefCell<BrowserEditor>> {
        &self.editor
    }

    pub fn widget(&self) -> &Rc<RefCell<SuggestWidget>> {
        &self.widget
    }

    pub fn menubar(&self) -> Option<&MenuBar> {
        self.menubar.as_deref()
    }

    pub fn state(&self) -> EditorState {
        self.editor.borrow().state().clone()
    }

    /// Document text, blocks joined by newlines.
    pub fn text(&self) -> String {
        self.editor.borrow().state().doc().to_plain_text()
    }

    pub fn last_word(&self) -> String {
        self.editor.borrow().state().autocomplete().last_word().to_string()
    }

    pub fn on_change(&self, delay_ms: u32, handler: impl Fn(String) + 'static) {
        self.editor.borrow_mut().on_change(delay_ms, handler);
    }

    /// Open the popup for the word before the cursor, as the trigger key does.
    pub fn complete(&self) -> bool {
        self.plugin.complete(&self.editor, &mut self.widget.borrow_mut())
    }

    pub fn focus(&self) {
        self.editor.borrow_mut().focus();
    }
}

impl Drop for EditorHandle {
    fn drop(&mut self) {
        self.widget.borrow().surface().remove();
        if let Some(menubar) = &self.menubar {
            menubar.remove();
        }
        self.style.remove();
    }
}
