/// Track domain type
use crate::error::{PlayerError, Result};
use serde::{Deserialize, Serialize};

/// Playlist entry
///
/// Tracks are immutable values. Within a playlist a track is addressed by
/// position; the URL is what a media backend is loaded with, so two
/// handles holding the same URL hold the same track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Track title
    pub title: String,

    /// Artist name (may be empty)
    #[serde(default)]
    pub artist: String,

    /// Media source location handed to the backend
    pub url: String,
}

impl Track {
    /// Create a new track
    pub fn new(title: impl Into<String>, artist: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            url: url.into(),
        }
    }

    /// Check required fields
    ///
    /// # Errors
    /// Returns `InvalidTrack` when the title or URL is blank
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(PlayerError::invalid_track(format!(
                "missing title (url: {:?})",
                self.url
            )));
        }
        if self.url.trim().is_empty() {
            return Err(PlayerError::invalid_track(format!(
                "missing url (title: {:?})",
                self.title
            )));
        }
        Ok(())
    }

    /// Parse and validate a playlist from a JSON array of tracks
    pub fn list_from_json(json: &str) -> Result<Vec<Self>> {
        let tracks: Vec<Self> = serde_json::from_str(json)?;
        for track in &tracks {
            track.validate()?;
        }
        Ok(tracks)
    }

    /// Display line used by list renderers: `"Title - Artist"`
    pub fn label(&self) -> String {
        if self.artist.is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, self.artist)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_track_passes() {
        let track = Track::new("Song 1", "Artist 1", "song1.mp3");
        assert!(track.validate().is_ok());
    }

    #[test]
    fn artist_is_optional() {
        let track = Track::new("Song 1", "", "song1.mp3");
        assert!(track.validate().is_ok());
        assert_eq!(track.label(), "Song 1");
    }

    #[test]
    fn blank_title_rejected() {
        let track = Track::new("   ", "Artist", "song1.mp3");
        assert!(matches!(
            track.validate(),
            Err(PlayerError::InvalidTrack(_))
        ));
    }

    #[test]
    fn blank_url_rejected() {
        let track = Track::new("Song", "Artist", "");
        assert!(matches!(
            track.validate(),
            Err(PlayerError::InvalidTrack(_))
        ));
    }

    #[test]
    fn parse_playlist_json() {
        let json = r#"[
            {"title": "Song 1", "artist": "Artist 1", "url": "song1.mp3"},
            {"title": "Song 2", "url": "song2.mp3"}
        ]"#;
        let tracks = Track::list_from_json(json).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].artist, "");
        assert_eq!(tracks[0].label(), "Song 1 - Artist 1");
    }

    #[test]
    fn parse_playlist_rejects_missing_url_field() {
        let json = r#"[{"title": "Song 1", "artist": "Artist 1"}]"#;
        assert!(matches!(
            Track::list_from_json(json),
            Err(PlayerError::Serialization(_))
        ));
    }

    #[test]
    fn parse_playlist_rejects_blank_entry() {
        let json = r#"[{"title": "", "artist": "Artist 1", "url": "a.mp3"}]"#;
        assert!(matches!(
            Track::list_from_json(json),
            Err(PlayerError::InvalidTrack(_))
        ));
    }
}
