//! Preload coordination
//!
//! Two media backends take turns: the active one plays, the standby one
//! buffers whatever the sequencer expects next. When that track is asked
//! for, the two trade roles instead of loading it again.
//!
//! ```text
//!   Idle ──(remaining < margin)──> Preloaded { index, url }
//!    ^                                   │
//!    │            advance to url: swap   │
//!    └───────────────────────────────────┘
//!    └── any other transition: load into active, clear standby
//! ```

use crate::error::Result;
use cadence_core::{HandleId, MediaBackend, Track};
use tracing::warn;

/// A media backend tagged with a stable identity
#[derive(Debug)]
pub struct PlaybackHandle<B> {
    id: HandleId,
    backend: B,
}

impl<B> PlaybackHandle<B> {
    /// Wrap a backend
    pub fn new(id: HandleId, backend: B) -> Self {
        Self { id, backend }
    }

    /// Identity used to tag this handle's notifications
    pub fn id(&self) -> HandleId {
        self.id
    }

    /// The wrapped backend
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

/// Two owned handles, one active and one on standby
///
/// `swap` moves the handles between the two slots; backends are never
/// copied or recreated.
#[derive(Debug)]
pub struct HandlePair<B> {
    active: PlaybackHandle<B>,
    standby: PlaybackHandle<B>,
}

impl<B> HandlePair<B> {
    /// Build the pair; `primary` starts active
    pub fn new(primary: B, secondary: B) -> Self {
        Self {
            active: PlaybackHandle::new(HandleId::Primary, primary),
            standby: PlaybackHandle::new(HandleId::Secondary, secondary),
        }
    }

    /// Exchange roles
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.active, &mut self.standby);
    }

    /// Handle the user hears
    pub fn active(&self) -> &PlaybackHandle<B> {
        &self.active
    }

    /// Handle buffering ahead
    pub fn standby(&self) -> &PlaybackHandle<B> {
        &self.standby
    }

    /// Whether `id` names the active handle
    pub fn is_active(&self, id: HandleId) -> bool {
        self.active.id == id
    }

    /// Handle by identity, whichever role it holds
    pub fn get(&self, id: HandleId) -> &PlaybackHandle<B> {
        if self.active.id == id {
            &self.active
        } else {
            &self.standby
        }
    }
}

/// Preload progress for the current track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreloadState {
    /// Nothing buffered ahead yet
    Idle,

    /// Standby holds the track at `index`
    Preloaded { index: usize, url: String },

    /// Buffering was attempted and failed; not retried for this track
    Failed,
}

/// How a track became active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Standby already held it; roles were exchanged
    Swapped,

    /// Loaded into the active handle from scratch
    Loaded,
}

/// Owner of both playback handles
#[derive(Debug)]
pub struct PreloadCoordinator<B> {
    handles: HandlePair<B>,
    state: PreloadState,
    margin_secs: f64,
}

impl<B: MediaBackend> PreloadCoordinator<B> {
    /// Create a coordinator; `primary` starts active
    pub fn new(primary: B, secondary: B, margin_secs: f64) -> Self {
        Self {
            handles: HandlePair::new(primary, secondary),
            state: PreloadState::Idle,
            margin_secs,
        }
    }

    /// Whether the active track is close enough to its end to buffer ahead
    ///
    /// Fires at most once per track: only while `Idle`.
    pub fn should_preload(&self) -> bool {
        if self.state != PreloadState::Idle {
            return false;
        }

        let active = &self.handles.active.backend;
        active
            .duration()
            .is_some_and(|duration| duration - active.current_time() < self.margin_secs)
    }

    /// Buffer `track` (at playlist position `index`) into the standby handle
    pub fn preload(&mut self, index: usize, track: &Track) -> Result<()> {
        let standby = &mut self.handles.standby.backend;
        let result = standby
            .assign_source(&track.url)
            .and_then(|()| standby.buffer_ahead());

        match result {
            Ok(()) => {
                self.state = PreloadState::Preloaded {
                    index,
                    url: track.url.clone(),
                };
                Ok(())
            }
            Err(err) => {
                self.state = PreloadState::Failed;
                Err(err)
            }
        }
    }

    /// Make `track` the one playing
    ///
    /// With `allow_swap`, a standby that already buffered the track is
    /// promoted. Otherwise (or on a miss) the track is loaded into the
    /// active handle and the standby's stale buffer is dropped. On error
    /// the roles are left as they were.
    pub fn activate(&mut self, track: &Track, allow_swap: bool) -> Result<Activation> {
        if allow_swap && self.standby_holds(&track.url) {
            self.handles.swap();
            if let Err(err) = self.handles.active.backend.play() {
                self.handles.swap();
                return Err(err);
            }
            self.handles.standby.backend.pause();
            self.state = PreloadState::Idle;
            return Ok(Activation::Swapped);
        }

        let active = &mut self.handles.active.backend;
        let previous = active.assigned_source().map(str::to_owned);
        let resume_at = active.current_time();
        let was_playing = !active.is_paused();

        active.assign_source(&track.url)?;
        if let Err(err) = active.play() {
            restore_source(active, previous.as_deref(), resume_at, was_playing);
            return Err(err);
        }
        self.handles.standby.backend.clear_source();
        self.state = PreloadState::Idle;
        Ok(Activation::Loaded)
    }

    /// Drop whatever the standby buffered so the next threshold check
    /// preloads again
    pub fn invalidate(&mut self) {
        if self.state != PreloadState::Idle {
            self.handles.standby.backend.clear_source();
            self.state = PreloadState::Idle;
        }
    }

    /// Stop both handles and forget their sources
    pub fn reset(&mut self) {
        for handle in [&mut self.handles.active, &mut self.handles.standby] {
            handle.backend.pause();
            handle.backend.clear_source();
        }
        self.state = PreloadState::Idle;
    }

    // ===== Active Handle Control =====

    /// Resume the active handle
    pub fn play(&mut self) -> Result<()> {
        self.handles.active.backend.play()
    }

    /// Pause the active handle
    pub fn pause(&mut self) {
        self.handles.active.backend.pause();
    }

    /// Seek the active handle to `fraction` of its length
    ///
    /// No-op while the length is unknown or `fraction` is not finite.
    pub fn seek_to_fraction(&mut self, fraction: f64) -> Result<()> {
        if !fraction.is_finite() {
            return Ok(());
        }
        let active = &mut self.handles.active.backend;
        match active.duration() {
            Some(duration) => active.set_current_time(duration * fraction.clamp(0.0, 1.0)),
            None => Ok(()),
        }
    }

    // ===== State Queries =====

    /// Both handles
    pub fn handles(&self) -> &HandlePair<B> {
        &self.handles
    }

    /// Backend the user hears
    pub fn active(&self) -> &B {
        &self.handles.active.backend
    }

    /// Backend buffering ahead
    pub fn standby(&self) -> &B {
        &self.handles.standby.backend
    }

    /// Whether `id` names the active handle
    pub fn is_active(&self, id: HandleId) -> bool {
        self.handles.is_active(id)
    }

    /// Current preload state
    pub fn state(&self) -> &PreloadState {
        &self.state
    }

    /// Playlist position buffered in standby, if any
    pub fn preloaded_index(&self) -> Option<usize> {
        match self.state {
            PreloadState::Preloaded { index, .. } => Some(index),
            PreloadState::Idle | PreloadState::Failed => None,
        }
    }

    fn standby_holds(&self, url: &str) -> bool {
        matches!(&self.state, PreloadState::Preloaded { url: preloaded, .. } if preloaded == url)
            && self.handles.standby.backend.assigned_source() == Some(url)
    }
}

/// Put a handle back the way it was before a refused load
fn restore_source<B: MediaBackend>(
    backend: &mut B,
    url: Option<&str>,
    resume_at: f64,
    was_playing: bool,
) {
    let Some(url) = url else {
        backend.clear_source();
        return;
    };

    if let Err(err) = backend.assign_source(url) {
        warn!(url, error = %err, "Could not restore previous source");
        backend.clear_source();
        return;
    }
    if let Err(err) = backend.set_current_time(resume_at) {
        warn!(url, error = %err, "Could not restore playback position");
    }
    if was_playing {
        if let Err(err) = backend.play() {
            warn!(url, error = %err, "Previous track stays paused");
        }
    }
}
