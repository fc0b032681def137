//! Shared fakes for playlist widget tests
//!
//! Backends keep their state behind `Rc<RefCell<_>>` so a test can hold a
//! probe into a handle the widget owns.

#![allow(dead_code)]

use cadence_playback::{
    ControlHandle, ControlKind, HandleId, MediaBackend, PlayerError, PlaylistWidget,
    RenderSurface, Result, Track, WidgetSettings,
};
use std::cell::RefCell;
use std::rc::Rc;

// ===== Fake Backend =====

#[derive(Debug, Default)]
pub struct FakeState {
    pub source: Option<String>,
    /// Every URL ever assigned, in order
    pub loads: Vec<String>,
    pub buffered: Vec<String>,
    pub paused: bool,
    pub time: f64,
    pub duration: Option<f64>,
    pub play_calls: usize,
    pub refuse_play: bool,
    pub refuse_source: bool,
}

#[derive(Debug, Clone)]
pub struct FakeBackend {
    pub state: Rc<RefCell<FakeState>>,
    // Mirror of `state.source`, so `assigned_source` can lend a borrow
    source: Option<String>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(FakeState {
                paused: true,
                ..FakeState::default()
            })),
            source: None,
        }
    }

    /// Simulate playback reaching `time` of a `duration`-long source
    pub fn set_position(&self, time: f64, duration: f64) {
        let mut state = self.state.borrow_mut();
        state.time = time;
        state.duration = Some(duration);
    }

    pub fn source(&self) -> Option<String> {
        self.state.borrow().source.clone()
    }

    pub fn loads(&self) -> Vec<String> {
        self.state.borrow().loads.clone()
    }

    pub fn is_playing(&self) -> bool {
        !self.state.borrow().paused
    }

    pub fn refuse_play(&self, refuse: bool) {
        self.state.borrow_mut().refuse_play = refuse;
    }

    pub fn refuse_source(&self, refuse: bool) {
        self.state.borrow_mut().refuse_source = refuse;
    }
}

impl MediaBackend for FakeBackend {
    fn assign_source(&mut self, url: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.refuse_source {
            return Err(PlayerError::backend("unsupported source"));
        }
        state.source = Some(url.to_string());
        self.source = Some(url.to_string());
        state.loads.push(url.to_string());
        state.paused = true;
        state.time = 0.0;
        state.duration = None;
        Ok(())
    }

    fn assigned_source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn clear_source(&mut self) {
        self.source = None;
        let mut state = self.state.borrow_mut();
        state.source = None;
        state.time = 0.0;
        state.duration = None;
    }

    fn play(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.play_calls += 1;
        if state.refuse_play {
            return Err(PlayerError::playback_rejected("autoplay blocked"));
        }
        state.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.state.borrow_mut().paused = true;
    }

    fn is_paused(&self) -> bool {
        self.state.borrow().paused
    }

    fn current_time(&self) -> f64 {
        self.state.borrow().time
    }

    fn set_current_time(&mut self, secs: f64) -> Result<()> {
        self.state.borrow_mut().time = secs;
        Ok(())
    }

    fn duration(&self) -> Option<f64> {
        self.state.borrow().duration
    }

    fn buffer_ahead(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if let Some(source) = state.source.clone() {
            state.buffered.push(source);
        }
        Ok(())
    }
}

// ===== Recording Surface =====

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub controls: Vec<ControlKind>,
    /// Rendered rows of the last `render_playlist` call
    pub rows: Vec<String>,
    pub highlighted: Option<usize>,
    pub renders: usize,
    pub progress: f64,
    pub labels: (f64, f64),
    pub playing_icon: bool,
    pub shuffle_label: bool,
}

impl RenderSurface for RecordingSurface {
    fn create_control(&mut self, kind: ControlKind) -> ControlHandle {
        self.controls.push(kind);
        ControlHandle(self.controls.len() as u32 - 1)
    }

    fn render_playlist(
        &mut self,
        tracks: &[Track],
        current: Option<usize>,
        prefix: &dyn Fn(&Track, usize) -> String,
    ) {
        self.rows = tracks
            .iter()
            .enumerate()
            .map(|(index, track)| format!("{}{}", prefix(track, index), track.label()))
            .collect();
        self.highlighted = current;
        self.renders += 1;
    }

    fn set_progress(&mut self, fraction: f64) {
        self.progress = fraction;
    }

    fn set_time_labels(&mut self, elapsed: f64, total: f64) {
        self.labels = (elapsed, total);
    }

    fn set_play_icon(&mut self, is_playing: bool) {
        self.playing_icon = is_playing;
    }

    fn set_shuffle_label(&mut self, enabled: bool) {
        self.shuffle_label = enabled;
    }
}

// ===== Fixtures =====

pub type TestWidget = PlaylistWidget<FakeBackend, RecordingSurface>;

/// Widget plus probes into its primary and secondary handles
pub struct Harness {
    pub widget: TestWidget,
    pub primary: FakeBackend,
    pub secondary: FakeBackend,
}

impl Harness {
    pub fn new(settings: WidgetSettings) -> Self {
        let primary = FakeBackend::new();
        let secondary = FakeBackend::new();
        let widget = PlaylistWidget::new(
            settings,
            primary.clone(),
            secondary.clone(),
            RecordingSurface::default(),
        )
        .with_seed(42);
        Self {
            widget,
            primary,
            secondary,
        }
    }

    /// Widget that does not start on its own when tracks arrive
    pub fn manual() -> Self {
        Self::new(WidgetSettings {
            autoplay: false,
            ..WidgetSettings::default()
        })
    }

    pub fn probe(&self, id: HandleId) -> &FakeBackend {
        match id {
            HandleId::Primary => &self.primary,
            HandleId::Secondary => &self.secondary,
        }
    }

    /// Probe into whichever handle is active right now
    pub fn active(&self) -> &FakeBackend {
        self.probe(self.active_id())
    }

    pub fn active_id(&self) -> HandleId {
        if self.widget.coordinator().is_active(HandleId::Primary) {
            HandleId::Primary
        } else {
            HandleId::Secondary
        }
    }
}

pub fn track(name: &str) -> Track {
    Track::new(
        format!("Song {}", name),
        format!("Artist {}", name),
        format!("https://cdn.example.com/{}.mp3", name),
    )
}

pub fn tracks(names: &[&str]) -> Vec<Track> {
    names.iter().map(|name| track(name)).collect()
}
