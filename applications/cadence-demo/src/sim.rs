//! Simulated media backend
//!
//! Stands in for an audio element: time advances only when ticked, and
//! notifications queue up until the host collects them.

use cadence_core::{BackendEvent, HandleId, MediaBackend, PlayerError, Result};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct SimState {
    source: Option<String>,
    playing: bool,
    time: f64,
    duration: Option<f64>,
    buffered: bool,
    pending: Vec<BackendEvent>,
}

/// Host-side view of a simulated backend the widget owns
#[derive(Debug, Clone)]
pub struct SimProbe {
    id: HandleId,
    state: Rc<RefCell<SimState>>,
}

impl SimProbe {
    /// Which handle this probe watches
    pub fn id(&self) -> HandleId {
        self.id
    }

    /// Advance playback by `secs`, queueing `timeupdate` and `ended`
    pub fn tick(&self, secs: f64) {
        let mut state = self.state.borrow_mut();
        if !state.playing {
            return;
        }

        let duration = state.duration.unwrap_or(f64::INFINITY);
        state.time = (state.time + secs).min(duration);
        state.pending.push(BackendEvent::TimeUpdate);

        if state.time >= duration {
            state.playing = false;
            state.pending.push(BackendEvent::Ended);
        }
    }

    /// Take every notification queued since the last call
    pub fn take_events(&self) -> Vec<BackendEvent> {
        std::mem::take(&mut self.state.borrow_mut().pending)
    }

    /// Source the backend currently holds
    pub fn source(&self) -> Option<String> {
        self.state.borrow().source.clone()
    }

    /// Whether the backend buffered its source ahead of playback
    pub fn is_buffered(&self) -> bool {
        self.state.borrow().buffered
    }
}

/// `MediaBackend` that plays silence on a simulated clock
#[derive(Debug)]
pub struct SimulatedBackend {
    state: Rc<RefCell<SimState>>,
    source: Option<String>,
    track_length_secs: f64,
    reject_urls: Rc<[String]>,
}

impl SimulatedBackend {
    /// Create a backend plus the probe the host ticks it through
    pub fn new(
        id: HandleId,
        track_length_secs: f64,
        reject_urls: Rc<[String]>,
    ) -> (Self, SimProbe) {
        let state = Rc::new(RefCell::new(SimState::default()));
        let backend = Self {
            state: Rc::clone(&state),
            source: None,
            track_length_secs,
            reject_urls,
        };
        (backend, SimProbe { id, state })
    }
}

impl MediaBackend for SimulatedBackend {
    fn assign_source(&mut self, url: &str) -> Result<()> {
        if url.trim().is_empty() {
            return Err(PlayerError::backend("empty source"));
        }

        let mut state = self.state.borrow_mut();
        state.source = Some(url.to_string());
        state.playing = false;
        state.time = 0.0;
        state.duration = Some(self.track_length_secs);
        state.buffered = false;
        self.source = Some(url.to_string());
        Ok(())
    }

    fn assigned_source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn clear_source(&mut self) {
        self.source = None;
        let mut state = self.state.borrow_mut();
        let pending = std::mem::take(&mut state.pending);
        *state = SimState {
            pending,
            ..SimState::default()
        };
    }

    fn play(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let Some(source) = state.source.clone() else {
            return Err(PlayerError::playback_rejected("no source assigned"));
        };

        // Refusals arrive later, like a rejected play() promise
        if self.reject_urls.contains(&source) {
            state
                .pending
                .push(BackendEvent::PlayRejected(format!("NotAllowedError: {}", source)));
            return Ok(());
        }

        if !state.playing {
            state.playing = true;
            state.pending.push(BackendEvent::Play);
        }
        Ok(())
    }

    fn pause(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.playing {
            state.playing = false;
            state.pending.push(BackendEvent::Pause);
        }
    }

    fn is_paused(&self) -> bool {
        !self.state.borrow().playing
    }

    fn current_time(&self) -> f64 {
        self.state.borrow().time
    }

    fn set_current_time(&mut self, secs: f64) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let Some(duration) = state.duration else {
            return Err(PlayerError::backend("cannot seek without a source"));
        };
        state.time = secs.clamp(0.0, duration);
        state.pending.push(BackendEvent::TimeUpdate);
        Ok(())
    }

    fn duration(&self) -> Option<f64> {
        self.state.borrow().duration
    }

    fn buffer_ahead(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.source.is_none() {
            return Err(PlayerError::backend("nothing to buffer"));
        }
        state.buffered = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> (SimulatedBackend, SimProbe) {
        SimulatedBackend::new(HandleId::Primary, 3.0, Rc::from(vec!["blocked.mp3".to_string()]))
    }

    #[test]
    fn test_ticks_until_ended() {
        let (mut backend, probe) = backend();
        backend.assign_source("a.mp3").unwrap();
        backend.play().unwrap();

        for _ in 0..3 {
            probe.tick(1.0);
        }
        probe.tick(1.0);

        let events = probe.take_events();
        assert_eq!(events.first(), Some(&BackendEvent::Play));
        assert_eq!(events.last(), Some(&BackendEvent::Ended));
        assert_eq!(
            events
                .iter()
                .filter(|event| **event == BackendEvent::TimeUpdate)
                .count(),
            3
        );
        assert!(backend.is_paused());
        assert_eq!(backend.current_time(), 3.0);
    }

    #[test]
    fn test_paused_backend_does_not_advance() {
        let (mut backend, probe) = backend();
        backend.assign_source("a.mp3").unwrap();

        probe.tick(1.0);

        assert_eq!(backend.current_time(), 0.0);
        assert!(probe.take_events().is_empty());
    }

    #[test]
    fn test_rejection_is_asynchronous() {
        let (mut backend, probe) = backend();
        backend.assign_source("blocked.mp3").unwrap();

        assert!(backend.play().is_ok());

        assert!(backend.is_paused());
        assert!(matches!(
            probe.take_events().as_slice(),
            [BackendEvent::PlayRejected(_)]
        ));
    }

    #[test]
    fn test_clear_source_forgets_everything() {
        let (mut backend, probe) = backend();
        backend.assign_source("a.mp3").unwrap();
        backend.buffer_ahead().unwrap();
        assert!(probe.is_buffered());

        backend.clear_source();

        assert_eq!(backend.assigned_source(), None);
        assert_eq!(probe.source(), None);
        assert!(!probe.is_buffered());
        assert_eq!(backend.duration(), None);
    }
}
