//! Browser DOM layer for the weaver floating link editor.
//!
//! This crate implements `LinkEditorPlatform` on top of `web-sys` and builds
//! the panel's DOM. It assumes a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `panel`: the panel's elements, placement and rendering
//! - `platform`: native selection, focus and geometry queries
//! - `events`: input, keydown and viewport listeners
//! - `mount`: one-call setup returning a `BrowserLinkEditor`
//!
//! # Re-exports
//!
//! This crate re-exports `weaver-link-editor` for convenience, so consumers
//! only need to depend on `weaver-link-editor-browser`.

// Re-export core crate
pub use weaver_link_editor;
pub use weaver_link_editor::*;

pub mod events;
pub mod mount;
pub mod panel;
pub mod platform;

pub use events::{bind_escape, bind_input, bind_input_keys};
pub use mount::{BrowserLinkEditor, mount_link_editor};
pub use panel::PanelElements;
pub use platform::BrowserLinkPlatform;

/// Route panics and `tracing` output to the browser console.
///
/// Safe to call more than once; only the first subscriber is installed.
pub fn init_tracing() {
    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    console_error_panic_hook::set_once();

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

    let _ = set_global_default(Registry::default().with(wasm_layer));
}
