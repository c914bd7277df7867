//! DOM rendering of the menu bar.
//!
//! Items act on `mousedown` with the default prevented, so the editor keeps
//! focus and its selection while a command runs.

use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use quire_editor_core::{EditorState, MenuElement, MenuItem, MenuItems, PlatformError};

use crate::stylesheet::MENUBAR_CLASS;

const ITEM_CLASS: &str = "quire-menuitem";
const DROPDOWN_CLASS: &str = "quire-menu-dropdown";
const DROPDOWN_LABEL_CLASS: &str = "quire-menu-dropdown-label";
const DROPDOWN_CONTENT_CLASS: &str = "quire-menu-dropdown-content";
const SEPARATOR_CLASS: &str = "quire-menuseparator";

/// Called with the item whose command should run.
pub type MenuHandler = Rc<dyn Fn(&MenuItem)>;

/// A rendered menu bar.
///
/// Listeners live as long as the bar; drop it to detach them.
pub struct MenuBar {
    element: HtmlElement,
    items: Vec<(MenuItem, Element)>,
    dropdowns: Vec<Element>,
    _listeners: Vec<EventListener>,
}

struct Builder<'a> {
    document: &'a Document,
    on_command: MenuHandler,
    items: Vec<(MenuItem, Element)>,
    dropdowns: Vec<Element>,
    listeners: Vec<EventListener>,
}

fn create(document: &Document, tag: &str, class: &str) -> Result<Element, PlatformError> {
    let el = document
        .create_element(tag)
        .map_err(|e| format!("create_element failed: {:?}", e))?;
    el.set_class_name(class);
    Ok(el)
}

fn append(parent: &Element, child: &Element) -> Result<(), PlatformError> {
    parent
        .append_child(child)
        .map_err(|e| format!("append_child failed: {:?}", e))?;
    Ok(())
}

fn close_all(dropdowns: &[Element]) {
    for dropdown in dropdowns {
        let _ = dropdown.class_list().remove_1("open");
    }
}

impl Builder<'_> {
    fn element(&mut self, parent: &Element, element: &MenuElement) -> Result<(), PlatformError> {
        match element {
            MenuElement::Item(item) => self.item(parent, item),
            MenuElement::Dropdown { label, content } | MenuElement::Submenu { label, content } => {
                let dropdown = create(self.document, "div", DROPDOWN_CLASS)?;
                if matches!(element, MenuElement::Submenu { .. }) {
                    let _ = dropdown.class_list().add_1("quire-menu-submenu");
                }
                let label_el = create(self.document, "span", DROPDOWN_LABEL_CLASS)?;
                label_el.set_text_content(Some(label));
                append(&dropdown, &label_el)?;

                let content_el = create(self.document, "div", DROPDOWN_CONTENT_CLASS)?;
                for child in content {
                    self.element(&content_el, child)?;
                }
                append(&dropdown, &content_el)?;
                append(parent, &dropdown)?;

                let target = dropdown.clone();
                self.listeners.push(EventListener::new_with_options(
                    &label_el,
                    "mousedown",
                    EventListenerOptions::enable_prevent_default(),
                    move |event| {
                        event.prevent_default();
                        event.stop_propagation();
                        let _ = target.class_list().toggle("open");
                    },
                ));
                self.dropdowns.push(dropdown);
                Ok(())
            }
        }
    }

    fn item(&mut self, parent: &Element, item: &MenuItem) -> Result<(), PlatformError> {
        let el = create(self.document, "span", ITEM_CLASS)?;
        el.set_text_content(Some(&item.label));
        el.set_attribute("title", &item.title)
            .map_err(|e| format!("set_attribute failed: {:?}", e))?;
        append(parent, &el)?;

        let on_command = self.on_command.clone();
        let command_item = item.clone();
        let target = el.clone();
        self.listeners.push(EventListener::new_with_options(
            &el,
            "mousedown",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                event.prevent_default();
                if target.class_list().contains("disabled") {
                    return;
                }
                tracing::debug!(target: "quire::menu", label = %command_item.label, "menu command");
                on_command(&command_item);
            },
        ));
        self.items.push((item.clone(), el));
        Ok(())
    }
}

impl MenuBar {
    /// Build the bar for `menu`. The caller places `element()` in the page.
    pub fn new(
        document: &Document,
        menu: &MenuItems,
        on_command: MenuHandler,
    ) -> Result<Self, PlatformError> {
        let element: HtmlElement = create(document, "div", MENUBAR_CLASS)?
            .dyn_into()
            .map_err(|_| "menu bar is not HtmlElement")?;

        let mut builder = Builder {
            document,
            on_command,
            items: Vec::new(),
            dropdowns: Vec::new(),
            listeners: Vec::new(),
        };
        for (i, group) in menu.full_menu().iter().enumerate() {
            if i > 0 {
                append(&element, &create(document, "span", SEPARATOR_CLASS)?)?;
            }
            for entry in group {
                builder.element(&element, entry)?;
            }
        }

        let Builder {
            items,
            dropdowns,
            mut listeners,
            ..
        } = builder;

        // running any item closes the open dropdowns
        for (_, el) in &items {
            let dropdowns = dropdowns.clone();
            listeners.push(EventListener::new(el, "mousedown", move |_| {
                close_all(&dropdowns)
            }));
        }

        Ok(Self {
            element,
            items,
            dropdowns,
            _listeners: listeners,
        })
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }

    /// Refresh the active and disabled markers for `state`.
    pub fn update(&self, state: &EditorState) {
        for (item, el) in &self.items {
            let classes = el.class_list();
            let _ = classes.toggle_with_force("active", item.active(state));
            let _ = classes.toggle_with_force("disabled", !item.enabled(state));
        }
    }

    pub fn close_dropdowns(&self) {
        close_all(&self.dropdowns);
    }

    /// Items in drawing order with their elements.
    pub fn items(&self) -> impl Iterator<Item = (&MenuItem, &Element)> {
        self.items.iter().map(|(item, el)| (item, el))
    }

    pub fn remove(&self) {
        self.element.remove();
    }
}
