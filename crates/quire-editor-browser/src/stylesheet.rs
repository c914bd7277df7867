//! Runtime stylesheet for the suggestion popup and menu bar.

use wasm_bindgen::JsCast;
use web_sys::{CssStyleSheet, Document, HtmlStyleElement};

use crate::PlatformError;

/// Class of the floating suggestion container.
pub const SUGGEST_BOX_CLASS: &str = "quire-suggest-box";
pub const MENUBAR_CLASS: &str = "quire-menubar";

/// One CSS rule: a selector and its declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CssRule {
    pub selector: &'static str,
    pub declarations: &'static str,
}

impl CssRule {
    pub fn text(&self) -> String {
        format!("{}{{{}}}", self.selector, self.declarations)
    }
}

pub const RULES: &[CssRule] = &[
    CssRule {
        selector: ".spell-error",
        declarations: "background-image: url(\"data:image/gif;base64,R0lGODlhBAADAIABAP8AAP///yH5BAEAAAEALAAAAAAEAAMAAAIFRB5mGQUAOw==\"); background-position: bottom; background-repeat: repeat-x;",
    },
    CssRule {
        selector: ".quire-suggest-box",
        declarations: "display:inline-block; overflow:hidden; border:solid black 1px;",
    },
    CssRule {
        selector: ".quire-suggest-box > select",
        declarations: "padding:10px; margin:-5px -20px -5px -5px;",
    },
    CssRule {
        selector: ".quire-suggest-box > select > option:hover",
        declarations: "box-shadow: 0 0 10px 100px #4A8CF7 inset; color: white;",
    },
    CssRule {
        selector: ".quire-menubar",
        declarations: "display:flex; gap:4px; padding:2px 6px; border-bottom:1px solid silver; user-select:none;",
    },
    CssRule {
        selector: ".quire-menuitem.active",
        declarations: "background:#eee; border-radius:4px;",
    },
    CssRule {
        selector: ".quire-menuitem.disabled",
        declarations: "opacity:0.3; cursor:default;",
    },
    CssRule {
        selector: ".quire-menu-dropdown-content",
        declarations: "display:none; position:absolute; background:white; border:1px solid #ddd; z-index:15;",
    },
    CssRule {
        selector: ".quire-menu-dropdown.open > .quire-menu-dropdown-content",
        declarations: "display:block;",
    },
];

/// Append a `<style>` element to the head and insert `rules` into it.
///
/// Rules the browser rejects are logged and skipped. Fails only when the
/// style element itself cannot be created.
pub fn inject(document: &Document, rules: &[CssRule]) -> Result<HtmlStyleElement, PlatformError> {
    let style: HtmlStyleElement = document
        .create_element("style")
        .map_err(|e| format!("create_element failed: {:?}", e))?
        .dyn_into()
        .map_err(|_| "style element is not HtmlStyleElement")?;
    // WebKit only creates the sheet once the element has content.
    style
        .append_child(&document.create_text_node(""))
        .map_err(|e| format!("append_child failed: {:?}", e))?;
    let head = document.head().ok_or("no document head")?;
    head.append_child(&style)
        .map_err(|e| format!("append_child failed: {:?}", e))?;

    let sheet = match style.sheet().and_then(|s| s.dyn_into::<CssStyleSheet>().ok()) {
        Some(sheet) => sheet,
        None => {
            tracing::error!("style element has no CSSStyleSheet, skipping rules");
            return Ok(style);
        }
    };

    let mut inserted = 0;
    for rule in rules {
        match sheet.insert_rule_with_index(&rule.text(), inserted) {
            Ok(_) => inserted += 1,
            Err(e) => tracing::error!("can't add CSS rule {:?}: {:?}", rule.selector, e),
        }
    }
    Ok(style)
}
