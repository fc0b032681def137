//! Playlist widget - core orchestration
//!
//! Coordinates the sequencer, the preload coordinator and the render
//! surface in response to host calls and backend notifications.

use crate::{
    error::{PlayerError, Result},
    events::WidgetEvent,
    preload::{Activation, PreloadCoordinator},
    sequencer::{Sequencer, SequencerCheckpoint},
    types::{AddedRange, PlaybackState, WidgetSettings},
};
use cadence_core::{
    progress_fraction, BackendEvent, ControlHandle, ControlKind, HandleId, MediaBackend,
    RenderSurface, Track,
};
use tracing::{debug, trace, warn};

/// Host callbacks
///
/// All optional; unset hooks are skipped.
#[derive(Default)]
pub struct WidgetHooks {
    /// Called whenever a track becomes current
    pub on_track_start: Option<Box<dyn FnMut(&Track)>>,

    /// Called once per track when elapsed time crosses the milestone
    pub on_milestone: Option<Box<dyn FnMut(&Track)>>,

    /// Decoration shown before each list entry
    pub track_prefix: Option<Box<dyn Fn(&Track, usize) -> String>>,
}

impl WidgetHooks {
    /// Set the track-start callback
    pub fn on_track_start(mut self, hook: impl FnMut(&Track) + 'static) -> Self {
        self.on_track_start = Some(Box::new(hook));
        self
    }

    /// Set the milestone callback
    pub fn on_milestone(mut self, hook: impl FnMut(&Track) + 'static) -> Self {
        self.on_milestone = Some(Box::new(hook));
        self
    }

    /// Set the list prefix provider
    pub fn track_prefix(mut self, hook: impl Fn(&Track, usize) -> String + 'static) -> Self {
        self.track_prefix = Some(Box::new(hook));
        self
    }
}

impl std::fmt::Debug for WidgetHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetHooks")
            .field("on_track_start", &self.on_track_start.is_some())
            .field("on_milestone", &self.on_milestone.is_some())
            .field("track_prefix", &self.track_prefix.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Next,
    Previous,
}

/// Embeddable playlist player
///
/// One instance owns all of its state: playlist, position, shuffle history
/// and both playback handles. Any number of widgets can coexist.
pub struct PlaylistWidget<B, R> {
    sequencer: Sequencer,
    coordinator: PreloadCoordinator<B>,
    surface: R,
    hooks: WidgetHooks,
    settings: WidgetSettings,
    controls: Vec<(ControlKind, ControlHandle)>,

    state: PlaybackState,
    milestone_fired: bool,

    // Event queue for host synchronization
    pending_events: Vec<WidgetEvent>,
}

impl<B: MediaBackend, R: RenderSurface> PlaylistWidget<B, R> {
    /// Create a widget with an empty playlist
    ///
    /// `primary` and `secondary` are the two playback handles; both must be
    /// wired to forward their notifications through
    /// [`PlaylistWidget::handle_backend_event`].
    pub fn new(settings: WidgetSettings, primary: B, secondary: B, mut surface: R) -> Self {
        let controls = ControlKind::ALL
            .iter()
            .map(|kind| (*kind, surface.create_control(*kind)))
            .collect();

        let mut widget = Self {
            sequencer: Sequencer::new(settings.shuffle),
            coordinator: PreloadCoordinator::new(primary, secondary, settings.preload_margin_secs),
            surface,
            hooks: WidgetHooks::default(),
            settings,
            controls,
            state: PlaybackState::Stopped,
            milestone_fired: false,
            pending_events: Vec::new(),
        };
        widget.render_idle();
        widget
            .surface
            .set_shuffle_label(widget.sequencer.is_shuffle());
        widget
    }

    /// Install host callbacks
    pub fn with_hooks(mut self, hooks: WidgetHooks) -> Self {
        self.hooks = hooks;
        self.refresh_playlist();
        self
    }

    /// Use a fixed shuffle seed
    ///
    /// Playlist, position and shuffle history are kept.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.sequencer.reseed(seed);
        self
    }

    // ===== Navigation =====

    /// Advance to the next track
    ///
    /// Returns the position now playing, or `None` when the playlist is
    /// empty or the transition failed (reported, state unchanged).
    pub fn play_next(&mut self) -> Option<usize> {
        self.advance(Direction::Next)
    }

    /// Go back to the previous track
    ///
    /// In shuffle mode this retraces the actual shuffle order.
    pub fn play_previous(&mut self) -> Option<usize> {
        self.advance(Direction::Previous)
    }

    /// Load and play the track at `index`
    ///
    /// Always loads into the active handle, whatever the standby holds.
    pub fn load_and_play(&mut self, index: usize) -> Result<()> {
        let len = self.sequencer.len();
        if index >= len {
            let err = PlayerError::invalid_index(index, len);
            warn!(error = %err, "Refusing to load track");
            return Err(err);
        }

        let checkpoint = self.sequencer.checkpoint();
        match self.start_track(index, false) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.roll_back(checkpoint, &err);
                Err(err)
            }
        }
    }

    /// React to a click on a list entry
    ///
    /// Clicking the current track toggles play/pause; any other entry is
    /// loaded and played.
    pub fn select_track(&mut self, index: usize) -> Result<()> {
        if self.sequencer.current() == Some(index) {
            self.toggle_play_pause()
        } else {
            self.load_and_play(index)
        }
    }

    /// Play/pause button
    ///
    /// With nothing loaded yet, starts the first track.
    pub fn toggle_play_pause(&mut self) -> Result<()> {
        if self.sequencer.current().is_none() {
            if self.sequencer.is_empty() {
                return Ok(());
            }
            return self.load_and_play(0);
        }

        if self.coordinator.active().is_paused() {
            self.coordinator.play().map_err(|err| {
                warn!(error = %err, "Resume refused");
                err
            })
        } else {
            self.coordinator.pause();
            Ok(())
        }
    }

    /// Seek the current track to `fraction` of its length
    pub fn seek_to_fraction(&mut self, fraction: f64) -> Result<()> {
        self.coordinator.seek_to_fraction(fraction)?;
        self.refresh_progress();
        Ok(())
    }

    // ===== Playlist Editing =====

    /// Append a track
    ///
    /// The first track added to an empty, idle widget starts playing.
    pub fn add_track(&mut self, track: Track) -> Result<usize> {
        let was_idle = self.is_idle();
        let index = self.sequencer.add_track(track)?;
        self.playlist_changed();

        if was_idle && self.settings.autoplay {
            // Failure is already reported; the track stays in the list
            let _ = self.load_and_play(index);
        }
        Ok(index)
    }

    /// Add several tracks, optionally right after the current one
    pub fn add_tracks(
        &mut self,
        tracks: Vec<Track>,
        insert_after_current: bool,
    ) -> Result<AddedRange> {
        let was_idle = self.is_idle();
        let added = self.sequencer.add_tracks(tracks, insert_after_current)?;
        if added.count == 0 {
            return Ok(added);
        }

        if insert_after_current && !was_idle {
            // What plays next just changed
            self.coordinator.invalidate();
        }
        self.playlist_changed();

        if was_idle && self.settings.autoplay {
            let _ = self.load_and_play(added.start);
        }
        Ok(added)
    }

    /// Move a track (drag-reorder)
    pub fn move_track(&mut self, from: usize, to: usize) -> Result<()> {
        self.sequencer.move_track(from, to)?;
        if from != to {
            self.coordinator.invalidate();
            self.playlist_changed();
        }
        Ok(())
    }

    /// Stop playback and remove every track
    pub fn clear_playlist(&mut self) {
        self.coordinator.reset();
        self.sequencer.clear();
        self.milestone_fired = false;
        self.set_state(PlaybackState::Stopped);
        self.playlist_changed();
        self.render_idle();
    }

    /// Flip shuffle mode
    ///
    /// Turning shuffle on immediately jumps to a random other track;
    /// returns the position jumped to.
    pub fn toggle_shuffle(&mut self) -> Option<usize> {
        let jump = self.sequencer.toggle_shuffle();
        let enabled = self.sequencer.is_shuffle();
        let checkpoint = self.sequencer.checkpoint();

        self.coordinator.invalidate();
        self.surface.set_shuffle_label(enabled);
        self.pending_events.push(WidgetEvent::ShuffleChanged { enabled });
        debug!(enabled, ?jump, "Shuffle toggled");

        let index = jump?;
        match self.start_track(index, false) {
            Ok(()) => Some(index),
            Err(err) => {
                // The new mode stays; only the jump is undone
                self.roll_back(checkpoint, &err);
                None
            }
        }
    }

    // ===== Backend Notifications =====

    /// Feed a notification from one of the two playback handles
    ///
    /// Only the active handle's notifications count; the standby's are
    /// ignored.
    pub fn handle_backend_event(&mut self, id: HandleId, event: BackendEvent) {
        if !self.coordinator.is_active(id) {
            trace!(?id, ?event, "Ignoring standby notification");
            return;
        }

        match event {
            BackendEvent::Ended => {
                self.play_next();
            }
            BackendEvent::TimeUpdate => self.on_time_update(),
            BackendEvent::Play => {
                self.set_state(PlaybackState::Playing);
                self.surface.set_play_icon(true);
            }
            BackendEvent::Pause => {
                self.set_state(PlaybackState::Paused);
                self.surface.set_play_icon(false);
            }
            BackendEvent::PlayRejected(reason) => {
                self.report_error(&PlayerError::PlaybackRejected(reason));
                self.set_state(PlaybackState::Paused);
                self.surface.set_play_icon(false);
            }
        }
    }

    // ===== Events =====

    /// Drain all pending events
    ///
    /// Returns all events that have been emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<WidgetEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== State Queries =====

    /// Position of the track now playing
    pub fn current_index(&self) -> Option<usize> {
        self.sequencer.current()
    }

    /// Track now playing
    pub fn current_track(&self) -> Option<&Track> {
        self.sequencer.current_track()
    }

    /// All tracks in play order
    pub fn tracks(&self) -> &[Track] {
        self.sequencer.tracks()
    }

    /// Whether shuffle mode is on
    pub fn is_shuffle(&self) -> bool {
        self.sequencer.is_shuffle()
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Sequencing state (position, shuffle history)
    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Both playback handles and the preload state
    pub fn coordinator(&self) -> &PreloadCoordinator<B> {
        &self.coordinator
    }

    /// Render surface
    pub fn surface(&self) -> &R {
        &self.surface
    }

    /// Render surface, mutably
    pub fn surface_mut(&mut self) -> &mut R {
        &mut self.surface
    }

    /// Handle the render surface returned for `kind`
    pub fn control(&self, kind: ControlKind) -> Option<ControlHandle> {
        self.controls
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map(|(_, handle)| *handle)
    }

    /// Settings the widget was built with
    pub fn settings(&self) -> &WidgetSettings {
        &self.settings
    }

    // ===== Internals =====

    fn is_idle(&self) -> bool {
        self.sequencer.is_empty() && self.sequencer.current().is_none()
    }

    fn advance(&mut self, direction: Direction) -> Option<usize> {
        let checkpoint = self.sequencer.checkpoint();
        let target = match direction {
            Direction::Next => self.sequencer.compute_next(),
            Direction::Previous => self.sequencer.compute_previous(),
        };

        let index = match target {
            Ok(index) => index,
            Err(err) => {
                debug!(?direction, error = %err, "Nothing to advance to");
                return None;
            }
        };

        match self.start_track(index, true) {
            Ok(()) => Some(index),
            Err(err) => {
                self.roll_back(checkpoint, &err);
                None
            }
        }
    }

    /// Make `index` current and start it
    ///
    /// All state is updated before the surface is redrawn.
    fn start_track(&mut self, index: usize, allow_swap: bool) -> Result<()> {
        let track = self
            .sequencer
            .track(index)
            .cloned()
            .ok_or_else(|| PlayerError::invalid_index(index, self.sequencer.len()))?;

        let activation = self.coordinator.activate(&track, allow_swap)?;
        self.sequencer.on_track_loaded(index)?;
        self.milestone_fired = false;
        self.set_state(PlaybackState::Playing);

        debug!(index, url = %track.url, ?activation, "Track started");
        if let Some(hook) = self.hooks.on_track_start.as_mut() {
            hook(&track);
        }
        self.pending_events.push(WidgetEvent::TrackStarted {
            index,
            url: track.url,
            swapped: activation == Activation::Swapped,
        });

        self.refresh_playlist();
        self.surface.set_play_icon(true);
        self.refresh_progress();
        Ok(())
    }

    fn on_time_update(&mut self) {
        self.refresh_progress();

        let elapsed = self.coordinator.active().current_time();
        if !self.milestone_fired && elapsed >= self.settings.milestone_secs {
            self.milestone_fired = true;
            if let Some(index) = self.sequencer.current() {
                if let (Some(hook), Some(track)) =
                    (self.hooks.on_milestone.as_mut(), self.sequencer.track(index))
                {
                    hook(track);
                }
                self.pending_events
                    .push(WidgetEvent::MilestoneReached { index });
            }
        }

        if self.coordinator.should_preload() {
            self.preload_next();
        }
    }

    fn preload_next(&mut self) {
        let index = match self.sequencer.peek_next() {
            Ok(index) => index,
            Err(err) => {
                debug!(error = %err, "Nothing to preload");
                return;
            }
        };
        let Some(track) = self.sequencer.track(index).cloned() else {
            return;
        };

        match self.coordinator.preload(index, &track) {
            Ok(()) => {
                debug!(index, url = %track.url, "Next track buffering");
                self.pending_events
                    .push(WidgetEvent::NextTrackPreloaded { index });
            }
            Err(err) => {
                warn!(index, error = %err, "Preload failed, next track will load on demand");
            }
        }
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.pending_events.push(WidgetEvent::StateChanged { state });
        }
    }

    /// Undo a failed transition and resync with what the active handle
    /// is actually doing
    fn roll_back(&mut self, checkpoint: SequencerCheckpoint, err: &PlayerError) {
        self.sequencer.restore(checkpoint);

        let active = self.coordinator.active();
        let state = if active.assigned_source().is_none() {
            PlaybackState::Stopped
        } else if active.is_paused() {
            PlaybackState::Paused
        } else {
            PlaybackState::Playing
        };
        self.set_state(state);
        self.surface.set_play_icon(state == PlaybackState::Playing);

        self.report_error(err);
    }

    fn report_error(&mut self, err: &PlayerError) {
        warn!(error = %err, "Playback transition failed");
        self.pending_events.push(WidgetEvent::Error {
            message: err.to_string(),
        });
    }

    fn playlist_changed(&mut self) {
        self.pending_events.push(WidgetEvent::PlaylistChanged {
            length: self.sequencer.len(),
        });
        self.refresh_playlist();
    }

    fn refresh_playlist(&mut self) {
        let hooks = &self.hooks;
        let prefix = |track: &Track, index: usize| {
            hooks
                .track_prefix
                .as_ref()
                .map_or_else(String::new, |hook| hook(track, index))
        };
        self.surface.render_playlist(
            self.sequencer.tracks(),
            self.sequencer.current(),
            &prefix,
        );
    }

    fn refresh_progress(&mut self) {
        let active = self.coordinator.active();
        let elapsed = active.current_time();
        let duration = active.duration();

        if let Some(fraction) = progress_fraction(elapsed, duration) {
            self.surface.set_progress(fraction);
            self.surface
                .set_time_labels(elapsed, duration.unwrap_or_default());
        }
    }

    fn render_idle(&mut self) {
        self.refresh_playlist();
        self.surface.set_play_icon(false);
        self.surface.set_progress(0.0);
        self.surface.set_time_labels(0.0, 0.0);
    }
}

impl<B, R> std::fmt::Debug for PlaylistWidget<B, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaylistWidget")
            .field("sequencer", &self.sequencer)
            .field("state", &self.state)
            .field("settings", &self.settings)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}
