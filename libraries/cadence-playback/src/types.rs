//! Core types for the playlist widget

use serde::{Deserialize, Serialize};

/// Playback state of the active handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Nothing has played yet, or the playlist was cleared
    Stopped,

    /// Active handle is playing
    Playing,

    /// Active handle is paused mid-track
    Paused,
}

/// Range of playlist positions filled by a bulk add
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedRange {
    /// Index of the first added track
    pub start: usize,

    /// Number of tracks added
    pub count: usize,
}

/// Configuration for the playlist widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetSettings {
    /// Start in shuffle mode (default: false)
    pub shuffle: bool,

    /// Remaining seconds at which the next track is buffered (default: 10)
    pub preload_margin_secs: f64,

    /// Elapsed seconds at which the milestone hook fires (default: 5)
    pub milestone_secs: f64,

    /// Start playing when the first tracks land in an empty playlist (default: true)
    pub autoplay: bool,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            shuffle: false,
            preload_margin_secs: 10.0,
            milestone_secs: 5.0,
            autoplay: true,
        }
    }
}
