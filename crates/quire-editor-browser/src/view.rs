//! Document rendering and DOM position mapping.
//!
//! Each block renders as one child of the editable root, tagged with its
//! index in `data-block`. Text runs render as text nodes wrapped in one
//! element per mark. Everything under a block is replaced on every render,
//! so mapping only has to understand this flat shape.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlElement, Node};

use quire_editor_core::{Document, PlatformError, Rect, Selection};

/// Attribute holding a block's index.
pub const BLOCK_ATTR: &str = "data-block";

/// NodeFilter.SHOW_TEXT
const SHOW_TEXT: u32 = 0x4;

fn dom_err(context: &str, e: JsValue) -> PlatformError {
    PlatformError(format!("{} failed: {:?}", context, e))
}

/// The editable element and everything needed to map positions in it.
pub struct EditorView {
    root: HtmlElement,
}

impl EditorView {
    /// Take over `root` as the editable surface.
    pub fn new(root: HtmlElement, spellcheck: bool) -> Self {
        if let Err(e) = root.set_attribute("contenteditable", "true") {
            tracing::warn!("can't make editor editable: {:?}", e);
        }
        root.set_spellcheck(spellcheck);
        Self { root }
    }

    pub fn root(&self) -> &HtmlElement {
        &self.root
    }

    fn dom(&self) -> Result<web_sys::Document, PlatformError> {
        Ok(self.root.owner_document().ok_or("editor has no owner document")?)
    }

    /// Replace the DOM contents with `doc`.
    pub fn render(&self, doc: &Document) -> Result<(), PlatformError> {
        let dom = self.dom()?;
        self.root.set_text_content(None);

        for (index, block) in doc.blocks().iter().enumerate() {
            let el = dom
                .create_element(block.kind().tag())
                .map_err(|e| dom_err("create_element", e))?;
            el.set_attribute(BLOCK_ATTR, &index.to_string())
                .map_err(|e| dom_err("set_attribute", e))?;

            if block.runs().is_empty() {
                // keeps the empty line selectable
                let br = dom.create_element("br").map_err(|e| dom_err("create_element", e))?;
                el.append_child(&br).map_err(|e| dom_err("append_child", e))?;
            }
            for run in block.runs() {
                let mut node: Node = dom.create_text_node(&run.text).into();
                for mark in run.marks.iter().collect::<Vec<_>>().into_iter().rev() {
                    let wrapper = dom
                        .create_element(mark.tag())
                        .map_err(|e| dom_err("create_element", e))?;
                    wrapper.append_child(&node).map_err(|e| dom_err("append_child", e))?;
                    node = wrapper.into();
                }
                el.append_child(&node).map_err(|e| dom_err("append_child", e))?;
            }

            self.root
                .append_child(&el)
                .map_err(|e| dom_err("append_child", e))?;
        }

        tracing::trace!(target: "quire::view", blocks = doc.blocks().len(), "rendered document");
        Ok(())
    }

    fn block_element(&self, index: usize) -> Option<Element> {
        self.root.children().item(index as u32)
    }

    /// DOM point (node, UTF-16 offset) for a document position.
    pub fn pos_to_dom(&self, doc: &Document, pos: usize) -> Result<(Node, u32), PlatformError> {
        let at = doc
            .resolve(pos)
            .map_err(|e| PlatformError(e.to_string()))?;
        let block = &doc.blocks()[at.block];
        let el = self
            .block_element(at.block)
            .ok_or_else(|| format!("no element for block {}", at.block))?;
        if block.content_len() == 0 {
            return Ok((el.into(), 0));
        }

        let target: usize = block
            .text()
            .chars()
            .take(at.parent_offset)
            .map(char::len_utf16)
            .sum();
        let (node, offset) = find_text_node_at_offset(&el, target)?;
        Ok((node, offset as u32))
    }

    /// Document position for a DOM point inside the editor.
    pub fn dom_to_pos(&self, doc: &Document, node: &Node, offset: u32) -> Option<usize> {
        let root: &Node = self.root.as_ref();
        if node == root {
            let index = offset as usize;
            return Some(if index >= doc.blocks().len() {
                doc.text_end()
            } else {
                doc.block_start(index) + 1
            });
        }

        // the child of the root holding `node`
        let mut current = node.clone();
        let block_el = loop {
            let parent = current.parent_node()?;
            if &parent == root {
                break current;
            }
            current = parent;
        };
        let index: usize = block_el
            .dyn_ref::<Element>()?
            .get_attribute(BLOCK_ATTR)?
            .parse()
            .ok()?;
        let block = doc.block(index)?;

        let range = self.dom().ok()?.create_range().ok()?;
        range.set_start(&block_el, 0).ok()?;
        range.set_end(node, offset).ok()?;
        let utf16 = range.to_string().length() as usize;

        let mut counted = 0;
        let chars = block
            .text()
            .chars()
            .take_while(|c| {
                counted += c.len_utf16();
                counted <= utf16
            })
            .count();

        tracing::trace!(
            target: "quire::view",
            block = index,
            utf16,
            chars,
            "mapped DOM point to position"
        );
        Some(doc.block_start(index) + 1 + chars.min(block.content_len()))
    }

    /// Current DOM selection as document positions, if it lies in the editor.
    pub fn read_selection(&self, doc: &Document) -> Option<Selection> {
        let selection = web_sys::window()?.get_selection().ok()??;
        let anchor_node = selection.anchor_node()?;
        let focus_node = selection.focus_node()?;
        if !self.root.contains(Some(&anchor_node)) || !self.root.contains(Some(&focus_node)) {
            return None;
        }
        let anchor = self.dom_to_pos(doc, &anchor_node, selection.anchor_offset())?;
        let head = self.dom_to_pos(doc, &focus_node, selection.focus_offset())?;
        Some(Selection::new(anchor, head))
    }

    /// Put the DOM selection where `sel` says.
    pub fn restore_selection(&self, doc: &Document, sel: Selection) -> Result<(), PlatformError> {
        let (anchor_node, anchor_offset) = self.pos_to_dom(doc, sel.anchor)?;
        let (focus_node, focus_offset) = self.pos_to_dom(doc, sel.head)?;

        tracing::trace!(
            target: "quire::cursor",
            anchor = sel.anchor,
            head = sel.head,
            "restoring selection"
        );

        let window = web_sys::window().ok_or("no window")?;
        let selection = window
            .get_selection()
            .map_err(|e| dom_err("get_selection", e))?
            .ok_or("no selection object")?;
        selection
            .set_base_and_extent(&anchor_node, anchor_offset, &focus_node, focus_offset)
            .map_err(|e| dom_err("set_base_and_extent", e))?;
        Ok(())
    }

    /// Viewport rectangle of the caret at `pos`.
    pub fn coords_at_pos(&self, doc: &Document, pos: usize) -> Option<Rect> {
        let (node, offset) = self.pos_to_dom(doc, pos).ok()?;
        let range = self.dom().ok()?.create_range().ok()?;
        range.set_start(&node, offset).ok()?;
        range.collapse_with_to_start(true);

        let rect = range.get_bounding_client_rect();
        if rect.width() == 0.0 && rect.height() == 0.0 && rect.x() == 0.0 && rect.y() == 0.0 {
            // collapsed ranges in empty blocks have no box; use the element
            let el = match node.dyn_ref::<Element>() {
                Some(el) => el.clone(),
                None => node.parent_element()?,
            };
            let rect = el.get_bounding_client_rect();
            return Some(Rect::new(rect.left(), rect.top(), rect.left(), rect.bottom()));
        }
        Some(Rect::new(
            rect.left(),
            rect.top(),
            rect.right(),
            rect.top() + rect.height().max(16.0),
        ))
    }

    /// Viewport rectangle of the editable element.
    pub fn surface_rect(&self) -> Rect {
        let rect = self.root.get_bounding_client_rect();
        Rect::new(rect.left(), rect.top(), rect.right(), rect.bottom())
    }

    pub fn focus(&self) {
        if let Err(e) = self.root.focus() {
            tracing::warn!("focus failed: {:?}", e);
        }
    }

    /// Computed font size of the editor, for matching the popup to it.
    pub fn font_size(&self) -> Option<String> {
        let style = web_sys::window()?.get_computed_style(&self.root).ok()??;
        style.get_property_value("font-size").ok()
    }
}

/// Find text node at given UTF-16 offset within element.
pub fn find_text_node_at_offset(
    container: &Element,
    target_utf16_offset: usize,
) -> Result<(Node, usize), PlatformError> {
    let document = container.owner_document().ok_or("no document")?;
    let walker = document
        .create_tree_walker_with_what_to_show(container, SHOW_TEXT)
        .map_err(|e| dom_err("create_tree_walker", e))?;

    let mut accumulated_utf16 = 0;
    let mut last_node: Option<Node> = None;

    while let Ok(Some(node)) = walker.next_node() {
        last_node = Some(node.clone());
        if let Some(text) = node.text_content() {
            let text_len = text.encode_utf16().count();
            if accumulated_utf16 + text_len >= target_utf16_offset {
                return Ok((node, target_utf16_offset - accumulated_utf16));
            }
            accumulated_utf16 += text_len;
        }
    }

    if let Some(node) = last_node {
        if let Some(text) = node.text_content() {
            let text_len = text.encode_utf16().count();
            return Ok((node, text_len));
        }
    }

    Err("no text node found in container".into())
}
