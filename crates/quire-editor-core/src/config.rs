//! Autocomplete configuration.

use serde::{Deserialize, Serialize};

use crate::autocomplete::{Dictionary, WidgetConfig};
use crate::keymap::KeyCombo;

/// Settings for the autocomplete plugin and its popup.
///
/// Every field has a default, so an empty object is a valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutocompleteConfig {
    /// Key binding that opens the popup, e.g. `"Tab"` or `"Ctrl-Space"`.
    pub trigger_key: String,
    /// Distance from the word's top edge to the popup, in pixels.
    pub vertical_offset: f64,
    pub right_margin: f64,
    pub bottom_margin: f64,
    /// Separator above "Ignore All". Unset means the platform decides.
    pub show_divider: Option<bool>,
    pub ignore_all_label: String,
    /// Replacement word list. Unset means the built-in one.
    pub words: Option<Vec<String>>,
    pub debounce_ms: u32,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            trigger_key: "Tab".to_string(),
            vertical_offset: 10.0,
            right_margin: 2.0,
            bottom_margin: 8.0,
            show_divider: None,
            ignore_all_label: "Ignore All".to_string(),
            words: None,
            debounce_ms: 1000,
        }
    }
}

impl AutocompleteConfig {
    /// The trigger binding. `Mod` is not platform-resolved here and maps to Ctrl.
    pub fn trigger_combo(&self) -> KeyCombo {
        KeyCombo::parse(&self.trigger_key, false)
    }

    pub fn dictionary(&self) -> Dictionary {
        match &self.words {
            Some(words) => Dictionary::new(words.iter().map(String::as_str)),
            None => Dictionary::default(),
        }
    }

    /// Popup settings, using `platform_divider` when `show_divider` is unset.
    pub fn widget_config(&self, platform_divider: bool) -> WidgetConfig {
        WidgetConfig {
            show_divider: self.show_divider.unwrap_or(platform_divider),
            right_margin: self.right_margin,
            bottom_margin: self.bottom_margin,
        }
    }
}
