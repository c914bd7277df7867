//! WASM bindings for the quire editor.
//!
//! Provides an embeddable rich-text editor with word autocomplete for
//! JavaScript/TypeScript apps.

mod actions;
mod editor;
mod types;

pub use actions::*;
pub use editor::*;
pub use types::*;

use wasm_bindgen::prelude::*;

/// Initialize panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    let reg = Registry::default().with(wasm_layer);
    // a host page may have installed one already
    let _ = set_global_default(reg);
}
