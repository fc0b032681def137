//! `MediaBackend` over an `HtmlAudioElement`

use super::describe;
use crate::error::{PlayerError, Result};
use cadence_core::{HandleId, MediaBackend};
use js_sys::Function;
use wasm_bindgen::prelude::*;
use web_sys::HtmlAudioElement;

/// One `<audio>` element used as a playback handle
///
/// The element reports resolved absolute URLs from `src`, so the URL as
/// assigned is remembered separately for preload matching.
pub struct HtmlAudioBackend {
    element: HtmlAudioElement,
    source: Option<String>,

    // Reused for every play() promise
    on_rejected: Closure<dyn FnMut(JsValue)>,
}

impl HtmlAudioBackend {
    /// Create a detached `<audio>` element for handle `id`
    ///
    /// An asynchronous autoplay refusal calls `on_rejected(handle, reason)`
    /// where `handle` is `"primary"` or `"secondary"`; the host is expected
    /// to forward it as a `playRejected` notification.
    pub fn new(id: HandleId, on_rejected: Option<Function>) -> Result<Self> {
        let element = HtmlAudioElement::new()
            .map_err(|err| PlayerError::backend(describe(&err)))?;
        element.set_preload("none");

        let label = handle_label(id);
        let on_rejected = Closure::wrap(Box::new(move |reason: JsValue| match &on_rejected {
            Some(callback) => {
                callback
                    .call2(&JsValue::NULL, &JsValue::from_str(label), &reason)
                    .ok();
            }
            None => web_sys::console::warn_2(&JsValue::from_str("play() rejected:"), &reason),
        }) as Box<dyn FnMut(JsValue)>);

        Ok(Self {
            element,
            source: None,
            on_rejected,
        })
    }

    /// The underlying element, for attaching listeners or inserting into the page
    pub fn element(&self) -> &HtmlAudioElement {
        &self.element
    }
}

impl MediaBackend for HtmlAudioBackend {
    fn assign_source(&mut self, url: &str) -> Result<()> {
        self.element.set_src(url);
        self.source = Some(url.to_string());
        Ok(())
    }

    fn assigned_source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn clear_source(&mut self) {
        if self.source.take().is_some() {
            self.element.remove_attribute("src").ok();
            self.element.load();
        }
    }

    fn play(&mut self) -> Result<()> {
        let promise = self
            .element
            .play()
            .map_err(|err| PlayerError::playback_rejected(describe(&err)))?;
        // Rejection is reported through the callback, not here
        let _ = promise.catch(&self.on_rejected);
        Ok(())
    }

    fn pause(&mut self) {
        self.element.pause().ok();
    }

    fn is_paused(&self) -> bool {
        self.element.paused()
    }

    fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    fn set_current_time(&mut self, secs: f64) -> Result<()> {
        self.element.set_current_time(secs);
        Ok(())
    }

    fn duration(&self) -> Option<f64> {
        let duration = self.element.duration();
        (duration.is_finite() && duration > 0.0).then_some(duration)
    }

    fn buffer_ahead(&mut self) -> Result<()> {
        self.element.set_preload("auto");
        self.element.load();
        Ok(())
    }
}

/// Name a handle the way the JS side refers to it
pub(crate) fn handle_label(id: HandleId) -> &'static str {
    match id {
        HandleId::Primary => "primary",
        HandleId::Secondary => "secondary",
    }
}

/// Parse a handle name coming from JS
pub(crate) fn parse_handle(label: &str) -> Option<HandleId> {
    match label {
        "primary" => Some(HandleId::Primary),
        "secondary" => Some(HandleId::Secondary),
        _ => None,
    }
}
