//! Media backend notifications and render surface handles

use serde::{Deserialize, Serialize};

/// Stable identity of one of the two playback handles
///
/// Roles (active/standby) move between handles; the identity does not, so
/// notifications are tagged with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleId {
    /// Handle that starts out active
    Primary,

    /// Handle that starts out on standby
    Secondary,
}

impl HandleId {
    /// The other handle of the pair
    pub fn other(self) -> Self {
        match self {
            HandleId::Primary => HandleId::Secondary,
            HandleId::Secondary => HandleId::Primary,
        }
    }
}

/// Notification emitted by a media backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BackendEvent {
    /// Playback reached the end of the source
    Ended,

    /// Playback position advanced
    TimeUpdate,

    /// Playback started or resumed
    Play,

    /// Playback paused
    Pause,

    /// A previously issued `play()` was refused asynchronously
    PlayRejected(String),
}

/// Kinds of controls the widget asks its render surface to create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlKind {
    /// Previous-track button
    Previous,
    /// Play/pause toggle
    PlayPause,
    /// Next-track button
    Next,
    /// Shuffle toggle
    Shuffle,
    /// Seekable progress indicator
    Progress,
    /// Elapsed time label
    ElapsedLabel,
    /// Total length label
    TotalLabel,
    /// Track list container
    TrackList,
}

impl ControlKind {
    /// Every control, in the order they are laid out
    pub const ALL: [ControlKind; 8] = [
        ControlKind::Previous,
        ControlKind::PlayPause,
        ControlKind::ElapsedLabel,
        ControlKind::Progress,
        ControlKind::TotalLabel,
        ControlKind::Next,
        ControlKind::Shuffle,
        ControlKind::TrackList,
    ];
}

/// Opaque handle returned by a render surface for a created control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlHandle(pub u32);
