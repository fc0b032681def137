//! `RenderSurface` over a JS object of callbacks
//!
//! The object may define any of `createControl(kind)`,
//! `renderPlaylist(entries)`, `setProgress(fraction)`,
//! `setTimeLabels(elapsed, total)`, `setPlayIcon(playing)` and
//! `setShuffleLabel(enabled)`. Missing callbacks are skipped.

use cadence_core::{format_time, ControlHandle, ControlKind, RenderSurface, Track};
use js_sys::{Function, Object, Reflect};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};

/// One playlist row as handed to `renderPlaylist`
#[derive(Serialize)]
struct RenderedEntry<'a> {
    index: usize,
    label: String,
    prefix: String,
    url: &'a str,
    current: bool,
}

/// Render surface backed by host JS callbacks
pub struct JsRenderSurface {
    callbacks: Object,
    next_handle: u32,
}

impl JsRenderSurface {
    /// Wrap a callback object
    pub fn new(callbacks: Object) -> Self {
        Self {
            callbacks,
            next_handle: 0,
        }
    }

    fn callback(&self, name: &str) -> Option<Function> {
        Reflect::get(&self.callbacks, &JsValue::from_str(name))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
    }

    fn call1(&self, name: &str, arg: &JsValue) -> Option<JsValue> {
        self.callback(name)
            .and_then(|callback| callback.call1(&self.callbacks, arg).ok())
    }
}

impl RenderSurface for JsRenderSurface {
    fn create_control(&mut self, kind: ControlKind) -> ControlHandle {
        let fallback = self.next_handle;
        self.next_handle += 1;

        let returned = self
            .call1("createControl", &JsValue::from_str(control_name(kind)))
            .and_then(|value| value.as_f64());
        ControlHandle(returned.map_or(fallback, |id| id as u32))
    }

    fn render_playlist(
        &mut self,
        tracks: &[Track],
        current: Option<usize>,
        prefix: &dyn Fn(&Track, usize) -> String,
    ) {
        let entries: Vec<RenderedEntry<'_>> = tracks
            .iter()
            .enumerate()
            .map(|(index, track)| RenderedEntry {
                index,
                label: track.label(),
                prefix: prefix(track, index),
                url: &track.url,
                current: current == Some(index),
            })
            .collect();

        if let Ok(value) = serde_wasm_bindgen::to_value(&entries) {
            self.call1("renderPlaylist", &value);
        }
    }

    fn set_progress(&mut self, fraction: f64) {
        self.call1("setProgress", &JsValue::from_f64(fraction));
    }

    fn set_time_labels(&mut self, elapsed: f64, total: f64) {
        if let Some(callback) = self.callback("setTimeLabels") {
            callback
                .call2(
                    &self.callbacks,
                    &JsValue::from_str(&format_time(elapsed)),
                    &JsValue::from_str(&format_time(total)),
                )
                .ok();
        }
    }

    fn set_play_icon(&mut self, is_playing: bool) {
        self.call1("setPlayIcon", &JsValue::from_bool(is_playing));
    }

    fn set_shuffle_label(&mut self, enabled: bool) {
        self.call1("setShuffleLabel", &JsValue::from_bool(enabled));
    }
}

fn control_name(kind: ControlKind) -> &'static str {
    match kind {
        ControlKind::Previous => "previous",
        ControlKind::PlayPause => "playPause",
        ControlKind::Next => "next",
        ControlKind::Shuffle => "shuffle",
        ControlKind::Progress => "progress",
        ControlKind::ElapsedLabel => "elapsed",
        ControlKind::TotalLabel => "total",
        ControlKind::TrackList => "trackList",
    }
}
