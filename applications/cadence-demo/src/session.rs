//! Tick loop that plays a playlist through the widget
//!
//! Plays the part of the browser: advances both simulated handles, forwards
//! their notifications and reacts to widget events the way a page would.

use crate::config::DemoConfig;
use crate::console::ConsoleSurface;
use crate::error::Result;
use crate::sim::{SimProbe, SimulatedBackend};
use cadence_core::{BackendEvent, HandleId, Track};
use cadence_playback::{PlaylistWidget, WidgetEvent, WidgetHooks};
use serde::Serialize;
use std::io::Write;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// What happened during a session
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    /// Playlist positions in the order they started
    pub started: Vec<usize>,
    /// Starts served by the preloaded standby handle
    pub swaps: usize,
    pub preloads: usize,
    pub milestones: usize,
    /// Tracks that played through to the end
    pub finished: usize,
    pub errors: Vec<String>,
    pub ticks: u64,
}

type DemoWidget<W> = PlaylistWidget<SimulatedBackend, ConsoleSurface<W>>;

/// Play `tracks` until `max_tracks` have finished or the tick budget runs out
pub fn run_session<W: Write>(
    config: &DemoConfig,
    tracks: Vec<Track>,
    seed: Option<u64>,
    out: W,
) -> Result<SessionReport> {
    let sim = &config.simulation;
    let reject: Rc<[String]> = Rc::from(sim.reject_urls.clone());
    let (primary, primary_probe) =
        SimulatedBackend::new(HandleId::Primary, sim.track_length_secs, Rc::clone(&reject));
    let (secondary, secondary_probe) =
        SimulatedBackend::new(HandleId::Secondary, sim.track_length_secs, reject);

    let mut widget = PlaylistWidget::new(
        config.widget.clone(),
        primary,
        secondary,
        ConsoleSurface::new(out),
    );
    if let Some(seed) = seed {
        widget = widget.with_seed(seed);
    }
    let mut widget = widget.with_hooks(
        WidgetHooks::default()
            .on_track_start(|track| info!(title = %track.title, url = %track.url, "Now playing"))
            .on_milestone(|track| info!(title = %track.title, "Listened past the milestone"))
            .track_prefix(|_, index| format!("{:02}. ", index + 1)),
    );

    let max_tracks = sim.max_tracks.unwrap_or(tracks.len());
    let mut report = SessionReport::default();

    let added = widget.add_tracks(tracks, false)?;
    info!(count = added.count, shuffle = widget.is_shuffle(), "Playlist loaded");
    if widget.current_index().is_none() && added.count > 0 {
        widget.toggle_play_pause()?;
    }
    collect_events(&mut widget, &mut report, sim.skip_on_error);

    let probes = [primary_probe, secondary_probe];
    'ticks: while report.ticks < sim.max_ticks && report.finished < max_tracks {
        report.ticks += 1;

        for probe in &probes {
            probe.tick(sim.tick_secs);
            if forward(&mut widget, probe, &mut report, max_tracks) {
                break 'ticks;
            }
            collect_events(&mut widget, &mut report, sim.skip_on_error);
        }
    }

    if report.ticks >= sim.max_ticks {
        warn!(ticks = report.ticks, "Tick budget exhausted");
    }
    info!(
        started = report.started.len(),
        finished = report.finished,
        swaps = report.swaps,
        "Session over"
    );
    Ok(report)
}

/// Feed a handle's notifications to the widget
///
/// Returns `true` once enough tracks have finished.
fn forward<W: Write>(
    widget: &mut DemoWidget<W>,
    probe: &SimProbe,
    report: &mut SessionReport,
    max_tracks: usize,
) -> bool {
    for event in probe.take_events() {
        if event == BackendEvent::Ended && widget.coordinator().is_active(probe.id()) {
            report.finished += 1;
            if report.finished >= max_tracks {
                return true;
            }
        }
        widget.handle_backend_event(probe.id(), event);
    }
    false
}

fn collect_events<W: Write>(
    widget: &mut DemoWidget<W>,
    report: &mut SessionReport,
    skip_on_error: bool,
) {
    // Skipping can fail again, so keep draining until quiet
    let mut skips = 0;
    while widget.has_pending_events() {
        let mut skip = false;
        for event in widget.drain_events() {
            debug!(?event, "Widget event");
            match event {
                WidgetEvent::TrackStarted { index, swapped, .. } => {
                    report.started.push(index);
                    if swapped {
                        report.swaps += 1;
                    }
                }
                WidgetEvent::NextTrackPreloaded { .. } => report.preloads += 1,
                WidgetEvent::MilestoneReached { .. } => report.milestones += 1,
                WidgetEvent::Error { message } => {
                    report.errors.push(message);
                    skip = skip_on_error;
                }
                WidgetEvent::StateChanged { .. }
                | WidgetEvent::PlaylistChanged { .. }
                | WidgetEvent::ShuffleChanged { .. } => {}
            }
        }

        if skip {
            if skips >= widget.tracks().len() {
                warn!("Every track failed, giving up on skipping");
                return;
            }
            skips += 1;
            warn!("Skipping to the next track");
            widget.play_next();
        }
    }
}
