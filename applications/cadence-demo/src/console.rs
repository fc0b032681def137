//! Render surface that draws the widget as plain text

use cadence_core::{format_time, ControlHandle, ControlKind, RenderSurface, Track};
use std::io::Write;

/// Text rendering of the playlist widget
///
/// Writes are best effort; a closed pipe must not stop playback.
pub struct ConsoleSurface<W> {
    out: W,
    controls: Vec<ControlKind>,
    elapsed_label: String,
    playing: Option<bool>,
    shuffle: Option<bool>,
}

impl<W: Write> ConsoleSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            controls: Vec::new(),
            elapsed_label: String::new(),
            playing: None,
            shuffle: None,
        }
    }

    /// Controls created so far, in creation order
    pub fn controls(&self) -> &[ControlKind] {
        &self.controls
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSurface for ConsoleSurface<W> {
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
        writeln!(self.out, "--- playlist ({} tracks) ---", tracks.len()).ok();
        for (index, track) in tracks.iter().enumerate() {
            let marker = if current == Some(index) { '>' } else { ' ' };
            writeln!(
                self.out,
                "{} {}{}",
                marker,
                prefix(track, index),
                track.label()
            )
            .ok();
        }
    }

    fn set_progress(&mut self, _fraction: f64) {
        // Shown through the time labels
    }

    fn set_time_labels(&mut self, elapsed: f64, total: f64) {
        let label = format_time(elapsed);
        if label != self.elapsed_label {
            writeln!(self.out, "  [{} / {}]", label, format_time(total)).ok();
            self.elapsed_label = label;
        }
    }

    fn set_play_icon(&mut self, is_playing: bool) {
        if self.playing != Some(is_playing) {
            let icon = if is_playing { "playing" } else { "paused" };
            writeln!(self.out, "  ({})", icon).ok();
            self.playing = Some(is_playing);
        }
    }

    fn set_shuffle_label(&mut self, enabled: bool) {
        if self.shuffle != Some(enabled) {
            let label = if enabled { "on" } else { "off" };
            writeln!(self.out, "  shuffle: {}", label).ok();
            self.shuffle = Some(enabled);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(surface: ConsoleSurface<Vec<u8>>) -> String {
        String::from_utf8(surface.into_inner()).unwrap()
    }

    #[test]
    fn test_marks_current_track() {
        let mut surface = ConsoleSurface::new(Vec::new());
        let tracks = vec![
            Track::new("One", "", "one.mp3"),
            Track::new("Two", "Band", "two.mp3"),
        ];

        surface.render_playlist(&tracks, Some(1), &|_, index| format!("{}. ", index + 1));

        let text = rendered(surface);
        assert!(text.contains("  1. One\n"));
        assert!(text.contains("> 2. Two - Band\n"));
    }

    #[test]
    fn test_time_labels_print_once_per_second() {
        let mut surface = ConsoleSurface::new(Vec::new());

        surface.set_time_labels(1.2, 30.0);
        surface.set_time_labels(1.7, 30.0);
        surface.set_time_labels(2.1, 30.0);

        let text = rendered(surface);
        assert_eq!(text.matches("0:30]").count(), 2);
        assert!(text.contains("[0:01 / 0:30]"));
        assert!(text.contains("[0:02 / 0:30]"));
    }

    #[test]
    fn test_icon_changes_only() {
        let mut surface = ConsoleSurface::new(Vec::new());

        surface.set_play_icon(true);
        surface.set_play_icon(true);
        surface.set_play_icon(false);

        assert_eq!(rendered(surface), "  (playing)\n  (paused)\n");
    }
}
