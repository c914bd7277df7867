//! JsEditor - the main editor wrapper for JavaScript.

use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use quire_editor_browser::{EditorHandle, EditorHost, mount};

use crate::actions::parse_command;
use crate::types::{JsEditorSnapshot, parse_config};

/// The main editor instance exposed to JavaScript.
///
/// Owns the mounted editor; `free()` unmounts it.
#[wasm_bindgen]
pub struct JsEditor {
    handle: EditorHandle,
    debounce_ms: u32,
}

#[wasm_bindgen]
impl JsEditor {
    /// Mount an editor into `container` with `text`, one paragraph per line.
    ///
    /// `config` is an optional `JsAutocompleteConfig`.
    #[wasm_bindgen(constructor)]
    pub fn new(container: HtmlElement, text: &str, config: JsValue) -> Result<JsEditor, JsError> {
        let config = parse_config(config)?;
        let handle = mount(container, text, &config)
            .map_err(|e| JsError::new(&format!("Mount failed: {}", e)))?;
        Ok(Self {
            handle,
            debounce_ms: config.debounce_ms,
        })
    }

    // === Content access ===

    /// Get the document as plain text, one line per block.
    #[wasm_bindgen(js_name = getText)]
    pub fn get_text(&self) -> String {
        self.handle.text()
    }

    /// The word before the cursor after the last content change.
    #[wasm_bindgen(js_name = getLastWord)]
    pub fn get_last_word(&self) -> String {
        self.handle.last_word()
    }

    /// Get text, selection and last word in one object.
    #[wasm_bindgen(js_name = getSnapshot)]
    pub fn get_snapshot(&self) -> JsEditorSnapshot {
        JsEditorSnapshot::from(&self.handle.state())
    }

    // === Commands ===

    /// Run a `JsEditorCommand`. Returns whether it changed anything.
    #[wasm_bindgen(js_name = executeCommand)]
    pub fn execute_command(&self, command: JsValue) -> Result<bool, JsError> {
        let command = parse_command(command)?;
        let editor = self.handle.editor();
        let Some(tr) = command.transaction(editor.borrow().state()) else {
            return Ok(false);
        };
        editor
            .borrow_mut()
            .dispatch(tr)
            .map_err(|e| JsError::new(&format!("Command failed: {}", e)))?;
        Ok(true)
    }

    /// Open the suggestion popup for the word before the cursor.
    ///
    /// Returns false when there is no word or nothing to suggest.
    pub fn complete(&self) -> bool {
        self.handle.complete()
    }

    pub fn focus(&self) {
        self.handle.focus();
    }

    // === Callbacks ===

    /// Call `callback(text)` once edits pause for the configured debounce.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: js_sys::Function) {
        self.handle.on_change(self.debounce_ms, move |text| {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&text)) {
                tracing::error!("onChange callback threw: {:?}", e);
            }
        });
    }
}
