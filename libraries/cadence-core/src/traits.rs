/// Collaborator traits for Cadence Player
use crate::error::Result;
use crate::types::{ControlHandle, ControlKind, Track};

/// Media backend trait
///
/// One playback handle: an audio element (or anything behaving like one)
/// that can be pointed at a URL, buffered, played, paused and seeked.
/// The widget owns two of these and re-targets them for every track.
///
/// Notifications (`ended`, `timeupdate`, `play`, `pause`) are not pulled
/// through this trait; the host forwards them to the widget tagged with the
/// emitting handle's `HandleId`.
pub trait MediaBackend {
    /// Point the backend at a new source
    ///
    /// Replaces whatever was loaded before, stopping it.
    ///
    /// # Errors
    /// Returns an error if the backend refuses the source
    fn assign_source(&mut self, url: &str) -> Result<()>;

    /// The source last assigned, as given to `assign_source`
    fn assigned_source(&self) -> Option<&str>;

    /// Drop the current source and any buffered data
    fn clear_source(&mut self);

    /// Start or resume playback
    ///
    /// Playback start is asynchronous: `Ok` means the request was issued.
    /// A later refusal is reported as `BackendEvent::PlayRejected`.
    ///
    /// # Errors
    /// Returns an error if the request is refused immediately
    fn play(&mut self) -> Result<()>;

    /// Pause playback
    fn pause(&mut self);

    /// Whether the backend is paused (or has never played)
    fn is_paused(&self) -> bool;

    /// Current playback position in seconds
    fn current_time(&self) -> f64;

    /// Move the playback position
    ///
    /// # Errors
    /// Returns an error if the source does not allow seeking there
    fn set_current_time(&mut self, seconds: f64) -> Result<()>;

    /// Total length in seconds, once known
    fn duration(&self) -> Option<f64>;

    /// Start buffering the assigned source without playing it
    ///
    /// # Errors
    /// Returns an error if no source is assigned or loading cannot start
    fn buffer_ahead(&mut self) -> Result<()>;
}

/// Render surface trait
///
/// Whatever draws the widget: DOM, terminal, native toolkit. The widget
/// pushes complete state; implementors should not need to keep their own.
pub trait RenderSurface {
    /// Create a control and return a handle to it
    fn create_control(&mut self, kind: ControlKind) -> ControlHandle;

    /// Redraw the track list
    ///
    /// `prefix` yields an optional decoration for each row (empty string
    /// for none).
    fn render_playlist(
        &mut self,
        tracks: &[Track],
        current: Option<usize>,
        prefix: &dyn Fn(&Track, usize) -> String,
    );

    /// Update the progress indicator, `fraction` in `[0, 1]`
    fn set_progress(&mut self, fraction: f64);

    /// Update the elapsed/total labels (seconds)
    fn set_time_labels(&mut self, elapsed: f64, total: f64);

    /// Show the play glyph (`false`) or the pause glyph (`true`)
    fn set_play_icon(&mut self, is_playing: bool);

    /// Update the shuffle toggle label
    fn set_shuffle_label(&mut self, enabled: bool) {
        let _ = enabled;
    }
}
