//! WASM-compatible PlaylistWidget wrapper

use super::backend::{parse_handle, HtmlAudioBackend};
use super::surface::JsRenderSurface;
use crate::{PlayerError, PlaylistWidget, WidgetHooks, WidgetSettings};
use cadence_core::{BackendEvent, HandleId, Track};
use js_sys::{Function, Object, Reflect};
use wasm_bindgen::{prelude::*, JsCast};
use web_sys::HtmlAudioElement;

/// Playlist widget driven from JavaScript
///
/// ```js
/// const widget = new WasmPlaylistWidget(surface, { shuffle: false }, hooks, onRejected);
/// for (const handle of ["primary", "secondary"]) {
///   const el = widget.element(handle);
///   for (const ev of ["ended", "timeupdate", "play", "pause"]) {
///     el.addEventListener(ev, () => widget.notify(handle, ev));
///   }
/// }
/// ```
#[wasm_bindgen]
pub struct WasmPlaylistWidget {
    inner: PlaylistWidget<HtmlAudioBackend, JsRenderSurface>,
    on_event: Option<Function>,
}

#[wasm_bindgen]
impl WasmPlaylistWidget {
    /// Create a widget
    ///
    /// `settings` is an optional `WidgetSettings` object; `hooks` may define
    /// `onTrackStart(track)`, `onMilestone(track)` and
    /// `trackPrefix(track, index)`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        surface: Object,
        settings: JsValue,
        hooks: Option<Object>,
        on_rejected: Option<Function>,
    ) -> Result<WasmPlaylistWidget, JsValue> {
        // Enable panic hooks for better error messages in console
        console_error_panic_hook::set_once();

        let settings: WidgetSettings = if settings.is_undefined() || settings.is_null() {
            WidgetSettings::default()
        } else {
            serde_wasm_bindgen::from_value(settings)
                .map_err(|e| JsValue::from_str(&format!("Invalid settings: {}", e)))?
        };

        let primary =
            HtmlAudioBackend::new(HandleId::Primary, on_rejected.clone()).map_err(to_js)?;
        let secondary = HtmlAudioBackend::new(HandleId::Secondary, on_rejected).map_err(to_js)?;

        let mut inner =
            PlaylistWidget::new(settings, primary, secondary, JsRenderSurface::new(surface));
        if let Some(hooks) = hooks {
            inner = inner.with_hooks(js_hooks(&hooks));
        }

        Ok(Self {
            inner,
            on_event: None,
        })
    }

    // ===== Navigation =====

    /// Advance to the next track
    #[wasm_bindgen(js_name = playNext)]
    pub fn play_next(&mut self) -> Option<usize> {
        let index = self.inner.play_next();
        self.flush_events();
        index
    }

    /// Go back to the previous track
    #[wasm_bindgen(js_name = playPrevious)]
    pub fn play_previous(&mut self) -> Option<usize> {
        let index = self.inner.play_previous();
        self.flush_events();
        index
    }

    /// Load and play the track at `index`
    #[wasm_bindgen(js_name = loadAndPlay)]
    pub fn load_and_play(&mut self, index: usize) -> Result<(), JsValue> {
        let result = self.inner.load_and_play(index);
        self.finish(result)
    }

    /// Click on a list entry
    #[wasm_bindgen(js_name = selectTrack)]
    pub fn select_track(&mut self, index: usize) -> Result<(), JsValue> {
        let result = self.inner.select_track(index);
        self.finish(result)
    }

    /// Play/pause button
    #[wasm_bindgen(js_name = togglePlayPause)]
    pub fn toggle_play_pause(&mut self) -> Result<(), JsValue> {
        let result = self.inner.toggle_play_pause();
        self.finish(result)
    }

    /// Seek to a fraction (0.0 - 1.0) of the current track
    pub fn seek(&mut self, fraction: f64) -> Result<(), JsValue> {
        let result = self.inner.seek_to_fraction(fraction);
        self.finish(result)
    }

    // ===== Playlist Editing =====

    /// Append one `{ title, artist?, url }` track, returning its position
    #[wasm_bindgen(js_name = addTrack)]
    pub fn add_track(&mut self, track: JsValue) -> Result<usize, JsValue> {
        let track: Track = serde_wasm_bindgen::from_value(track)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse track: {}", e)))?;
        let result = self.inner.add_track(track);
        self.finish(result)
    }

    /// Add an array of tracks, returning `{ start, count }`
    #[wasm_bindgen(js_name = addTracks)]
    pub fn add_tracks(
        &mut self,
        tracks: JsValue,
        insert_after_current: bool,
    ) -> Result<JsValue, JsValue> {
        let tracks: Vec<Track> = serde_wasm_bindgen::from_value(tracks)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse tracks: {}", e)))?;
        let result = self.inner.add_tracks(tracks, insert_after_current);
        let added = self.finish(result)?;

        serde_wasm_bindgen::to_value(&added)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Drag-reorder a track
    #[wasm_bindgen(js_name = moveTrack)]
    pub fn move_track(&mut self, from: usize, to: usize) -> Result<(), JsValue> {
        let result = self.inner.move_track(from, to);
        self.finish(result)
    }

    /// Stop and remove every track
    #[wasm_bindgen(js_name = clearPlaylist)]
    pub fn clear_playlist(&mut self) {
        self.inner.clear_playlist();
        self.flush_events();
    }

    /// Flip shuffle mode, returning the position jumped to
    #[wasm_bindgen(js_name = toggleShuffle)]
    pub fn toggle_shuffle(&mut self) -> Option<usize> {
        let index = self.inner.toggle_shuffle();
        self.flush_events();
        index
    }

    // ===== Backend Wiring =====

    /// Forward an `<audio>` event
    ///
    /// `handle` is `"primary"` or `"secondary"`; `event` is one of `ended`,
    /// `timeupdate`, `play`, `pause` or `playRejected` (with `detail` as the
    /// reason).
    pub fn notify(
        &mut self,
        handle: &str,
        event: &str,
        detail: Option<String>,
    ) -> Result<(), JsValue> {
        let id = parse_handle(handle)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown handle '{}'", handle)))?;
        let event = match event {
            "ended" => BackendEvent::Ended,
            "timeupdate" => BackendEvent::TimeUpdate,
            "play" => BackendEvent::Play,
            "pause" => BackendEvent::Pause,
            "playRejected" => BackendEvent::PlayRejected(detail.unwrap_or_default()),
            other => return Err(JsValue::from_str(&format!("Unknown event '{}'", other))),
        };

        self.inner.handle_backend_event(id, event);
        self.flush_events();
        Ok(())
    }

    /// The `<audio>` element behind a handle
    pub fn element(&self, handle: &str) -> Result<HtmlAudioElement, JsValue> {
        let id = parse_handle(handle)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown handle '{}'", handle)))?;
        Ok(self
            .inner
            .coordinator()
            .handles()
            .get(id)
            .backend()
            .element()
            .clone())
    }

    // ===== State Queries =====

    /// Position of the track now playing
    #[wasm_bindgen(js_name = currentIndex)]
    pub fn current_index(&self) -> Option<usize> {
        self.inner.current_index()
    }

    /// Whether shuffle mode is on
    #[wasm_bindgen(js_name = isShuffle)]
    pub fn is_shuffle(&self) -> bool {
        self.inner.is_shuffle()
    }

    /// Playlist as an array of tracks
    pub fn tracks(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.inner.tracks()).unwrap_or(JsValue::NULL)
    }

    // ===== Event Listeners =====

    /// Register a callback receiving every widget event
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&mut self, callback: Function) {
        self.on_event = Some(callback);
    }
}

impl WasmPlaylistWidget {
    fn finish<T>(&mut self, result: crate::Result<T>) -> Result<T, JsValue> {
        self.flush_events();
        result.map_err(to_js)
    }

    fn flush_events(&mut self) {
        let events = self.inner.drain_events();
        if let Some(ref cb) = self.on_event {
            for event in events {
                if let Ok(value) = serde_wasm_bindgen::to_value(&event) {
                    cb.call1(&JsValue::NULL, &value).ok();
                }
            }
        }
    }
}

fn to_js(error: PlayerError) -> JsValue {
    let message = JsValue::from_str(&error.to_string());
    web_sys::console::error_1(&message);
    message
}

fn hook(hooks: &Object, name: &str) -> Option<Function> {
    Reflect::get(hooks, &JsValue::from_str(name))
        .ok()
        .and_then(|value| value.dyn_into::<Function>().ok())
}

fn track_value(track: &Track) -> JsValue {
    serde_wasm_bindgen::to_value(track).unwrap_or(JsValue::NULL)
}

fn js_hooks(hooks: &Object) -> WidgetHooks {
    let mut widget_hooks = WidgetHooks::default();

    if let Some(callback) = hook(hooks, "onTrackStart") {
        widget_hooks = widget_hooks.on_track_start(move |track| {
            callback.call1(&JsValue::NULL, &track_value(track)).ok();
        });
    }
    if let Some(callback) = hook(hooks, "onMilestone") {
        widget_hooks = widget_hooks.on_milestone(move |track| {
            callback.call1(&JsValue::NULL, &track_value(track)).ok();
        });
    }
    if let Some(callback) = hook(hooks, "trackPrefix") {
        widget_hooks = widget_hooks.track_prefix(move |track, index| {
            callback
                .call2(&JsValue::NULL, &track_value(track), &JsValue::from_f64(index as f64))
                .ok()
                .and_then(|value| value.as_string())
                .unwrap_or_default()
        });
    }

    widget_hooks
}
