/// Core error types for Cadence Player
use thiserror::Error;

/// Result type alias using `PlayerError`
pub type Result<T> = std::result::Result<T, PlayerError>;

/// Core error type for Cadence Player
#[derive(Error, Debug)]
pub enum PlayerError {
    /// Track is missing a required field
    #[error("Invalid track: {0}")]
    InvalidTrack(String),

    /// Index outside the playlist
    #[error("Index {index} out of range for playlist of {len} tracks")]
    InvalidIndex { index: usize, len: usize },

    /// Sequencing requested with no tracks
    #[error("Playlist is empty")]
    EmptyPlaylist,

    /// Backend refused to start playback (autoplay policy, decode failure)
    #[error("Playback rejected: {0}")]
    PlaybackRejected(String),

    /// Backend failed to take a source or buffer it
    #[error("Media backend error: {0}")]
    Backend(String),

    /// Playlist (de)serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl PlayerError {
    /// Create an invalid track error
    pub fn invalid_track(msg: impl Into<String>) -> Self {
        Self::InvalidTrack(msg.into())
    }

    /// Create an invalid index error
    pub fn invalid_index(index: usize, len: usize) -> Self {
        Self::InvalidIndex { index, len }
    }

    /// Create a playback rejected error
    pub fn playback_rejected(msg: impl Into<String>) -> Self {
        Self::PlaybackRejected(msg.into())
    }

    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
