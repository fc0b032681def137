//! WASM bindings for cadence-playback
//!
//! Runs the playlist widget in a browser: two `<audio>` elements act as the
//! playback handles and a plain JS object of callbacks draws the UI.

pub mod backend;
pub mod surface;
pub mod widget;

pub use backend::HtmlAudioBackend;
pub use surface::JsRenderSurface;
pub use widget::WasmPlaylistWidget;

use wasm_bindgen::JsValue;

/// Best-effort text for a JS exception or rejection reason
pub(crate) fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}
