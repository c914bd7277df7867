//! The suggestion popup as a floating `<select multiple>`.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlOptionElement, HtmlSelectElement};

use quire_editor_core::{IGNORE_ALL, PlatformError, ScreenPos, Size, WidgetOption, WidgetSurface};

use crate::stylesheet::SUGGEST_BOX_CLASS;

const PENDING_LABEL: &str = "\u{a0}\u{a0}\u{a0}\u{231b}";
const DIVIDER_STYLE: &str = "min-height:1px; max-height:1px; padding:0; background-color: #000000;";

/// A fixed-position container holding one list box.
///
/// Created once per editor and appended to the body. Hidden by parking it
/// off-screen, never by toggling display.
pub struct BrowserSuggestBox {
    container: HtmlElement,
    select: HtmlSelectElement,
    ignore_all_label: String,
    font_size: Option<String>,
}

impl BrowserSuggestBox {
    pub fn new(document: &Document, ignore_all_label: &str) -> Result<Self, PlatformError> {
        let container: HtmlElement = document
            .create_element("div")
            .map_err(|e| format!("create_element failed: {:?}", e))?
            .dyn_into()
            .map_err(|_| "div is not HtmlElement")?;
        container.set_class_name(SUGGEST_BOX_CLASS);
        let style = container.style();
        style
            .set_property("position", "fixed")
            .and_then(|_| style.set_property("z-index", "100000"))
            .map_err(|e| format!("set_property failed: {:?}", e))?;

        let select: HtmlSelectElement = document
            .create_element("select")
            .map_err(|e| format!("create_element failed: {:?}", e))?
            .dyn_into()
            .map_err(|_| "select is not HtmlSelectElement")?;
        select.set_multiple(true);
        container
            .append_child(&select)
            .map_err(|e| format!("append_child failed: {:?}", e))?;

        let body = document.body().ok_or("no document body")?;
        body.append_child(&container)
            .map_err(|e| format!("append_child failed: {:?}", e))?;

        Ok(Self {
            container,
            select,
            ignore_all_label: ignore_all_label.to_string(),
            font_size: None,
        })
    }

    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    /// The list box; its `change` event carries the picked value.
    pub fn select(&self) -> &HtmlSelectElement {
        &self.select
    }

    /// Font size applied to the list on the next render.
    pub fn set_font_size(&mut self, font_size: Option<String>) {
        self.font_size = font_size;
    }

    /// Detach the container from the page.
    pub fn remove(&self) {
        self.container.remove();
    }

    fn option(&self, option: &WidgetOption) -> Result<HtmlOptionElement, PlatformError> {
        let el = match option {
            WidgetOption::Candidate(word) => {
                HtmlOptionElement::new_with_text_and_value(word, word)
            }
            WidgetOption::Pending => HtmlOptionElement::new_with_text(PENDING_LABEL),
            WidgetOption::Divider => HtmlOptionElement::new_with_text("\u{a0}"),
            WidgetOption::IgnoreAll => {
                HtmlOptionElement::new_with_text_and_value(&self.ignore_all_label, IGNORE_ALL)
            }
        }
        .map_err(|e| format!("Option() failed: {:?}", e))?;

        if !option.is_selectable() {
            el.set_disabled(true);
        }
        if *option == WidgetOption::Divider {
            el.style().set_css_text(DIVIDER_STYLE);
        }
        Ok(el)
    }

    fn try_render(&mut self, options: &[WidgetOption]) -> Result<(), PlatformError> {
        self.select.set_text_content(None);
        for option in options {
            let el = self.option(option)?;
            self.select
                .append_child(&el)
                .map_err(|e| format!("append_child failed: {:?}", e))?;
        }

        if let Some(font_size) = &self.font_size {
            self.select
                .style()
                .set_property("font-size", font_size)
                .map_err(|e| format!("set_property failed: {:?}", e))?;
        }

        // the divider row is one pixel tall, so it does not count as a line
        let has_divider = options.contains(&WidgetOption::Divider);
        let rows = options.len() - usize::from(has_divider);
        self.select.set_size(rows as u32);
        self.select.set_selected_index(-1);
        Ok(())
    }
}

impl WidgetSurface for BrowserSuggestBox {
    fn render(&mut self, options: &[WidgetOption]) {
        if let Err(e) = self.try_render(options) {
            tracing::error!("rendering suggestions failed: {}", e);
        }
    }

    fn measure(&self) -> Size {
        let rect = self.container.get_bounding_client_rect();
        Size::new(rect.width(), rect.height())
    }

    fn move_to(&mut self, pos: ScreenPos) {
        let style = self.container.style();
        let result = style
            .set_property("left", &format!("{}px", pos.x))
            .and_then(|_| style.set_property("top", &format!("{}px", pos.y)));
        if let Err(e) = result {
            tracing::warn!("moving suggestion box failed: {:?}", e);
        }
    }

    fn focus(&mut self) {
        if let Err(e) = self.select.focus() {
            tracing::warn!("focusing suggestion box failed: {:?}", e);
        }
    }
}
