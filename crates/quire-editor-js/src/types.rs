//! Types exposed to JavaScript via wasm-bindgen.

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

use quire_editor_browser::{AutocompleteConfig, EditorState};

/// Editor options. Every field is optional; missing ones take the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsAutocompleteConfig {
    /// Binding that opens the popup, e.g. "Tab" or "Ctrl-Space".
    #[tsify(optional)]
    pub trigger_key: Option<String>,
    #[tsify(optional)]
    pub vertical_offset: Option<f64>,
    #[tsify(optional)]
    pub right_margin: Option<f64>,
    #[tsify(optional)]
    pub bottom_margin: Option<f64>,
    /// Force the separator above "Ignore All" on or off.
    #[tsify(optional)]
    pub show_divider: Option<bool>,
    #[tsify(optional)]
    pub ignore_all_label: Option<String>,
    /// Replaces the built-in word list.
    #[tsify(optional)]
    pub words: Option<Vec<String>>,
    /// Quiet period before `onChange` fires, in milliseconds.
    #[tsify(optional)]
    pub debounce_ms: Option<u32>,
}

impl From<JsAutocompleteConfig> for AutocompleteConfig {
    fn from(js: JsAutocompleteConfig) -> Self {
        let defaults = AutocompleteConfig::default();
        AutocompleteConfig {
            trigger_key: js.trigger_key.unwrap_or(defaults.trigger_key),
            vertical_offset: js.vertical_offset.unwrap_or(defaults.vertical_offset),
            right_margin: js.right_margin.unwrap_or(defaults.right_margin),
            bottom_margin: js.bottom_margin.unwrap_or(defaults.bottom_margin),
            show_divider: js.show_divider.or(defaults.show_divider),
            ignore_all_label: js.ignore_all_label.unwrap_or(defaults.ignore_all_label),
            words: js.words.or(defaults.words),
            debounce_ms: js.debounce_ms.unwrap_or(defaults.debounce_ms),
        }
    }
}

/// Parse editor options from JS. `undefined` and `null` mean defaults.
pub fn parse_config(value: JsValue) -> Result<AutocompleteConfig, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(AutocompleteConfig::default());
    }
    let config: JsAutocompleteConfig = serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;
    Ok(config.into())
}

/// Selection as document positions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct JsSelection {
    pub anchor: usize,
    pub head: usize,
}

/// Point-in-time view of the editor.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsEditorSnapshot {
    /// Plain text, one line per block.
    pub text: String,
    pub selection: JsSelection,
    /// Word before the cursor after the last content change.
    pub last_word: String,
}

impl From<&EditorState> for JsEditorSnapshot {
    fn from(state: &EditorState) -> Self {
        let selection = state.selection();
        Self {
            text: state.doc().to_plain_text(),
            selection: JsSelection {
                anchor: selection.anchor,
                head: selection.head,
            },
            last_word: state.autocomplete().last_word().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let js = JsAutocompleteConfig {
            trigger_key: Some("Ctrl-Space".into()),
            words: Some(vec!["alpha".into()]),
            ..Default::default()
        };
        let config = AutocompleteConfig::from(js);
        assert_eq!(config.trigger_key, "Ctrl-Space");
        assert_eq!(config.words, Some(vec!["alpha".to_string()]));
        assert_eq!(config.debounce_ms, AutocompleteConfig::default().debounce_ms);
        assert_eq!(config.ignore_all_label, "Ignore All");
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = AutocompleteConfig::from(JsAutocompleteConfig::default());
        assert_eq!(config, AutocompleteConfig::default());
    }
}
