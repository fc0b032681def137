//! Widget Events
//!
//! Event-based communication for host synchronization. Events are queued at
//! key points and drained by the host:
//! - Track changes (after a transition completes)
//! - State changes (play/pause/stop)
//! - Preload completion and milestone crossings
//! - Playlist and shuffle edits
//! - Caught failures

use crate::types::PlaybackState;
use serde::{Deserialize, Serialize};

/// Events emitted by the playlist widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WidgetEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// A new track became current
    TrackStarted {
        /// Playlist position of the track
        index: usize,
        /// Source the active handle now holds
        url: String,
        /// Whether the standby's buffer was promoted instead of loading
        swapped: bool,
    },

    /// Current track crossed the milestone mark
    MilestoneReached {
        /// Playlist position of the track
        index: usize,
    },

    /// Standby handle finished queueing the anticipated track
    NextTrackPreloaded {
        /// Playlist position of the buffered track
        index: usize,
    },

    /// Tracks added, moved or cleared
    PlaylistChanged {
        /// New playlist length
        length: usize,
    },

    /// Shuffle mode toggled
    ShuffleChanged {
        /// Whether shuffle is now on
        enabled: bool,
    },

    /// A transition failed and was rolled back
    Error {
        /// Error message
        message: String,
    },
}
