//! Cadence Player Core
//!
//! Platform-agnostic core types, traits, and error handling for the Cadence
//! playlist widget.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, backend notifications, control kinds
//! - **Collaborator Traits**: `MediaBackend` (an audio element the widget
//!   drives) and `RenderSurface` (whatever draws the controls)
//! - **Error Handling**: Unified `PlayerError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cadence_core::Track;
//!
//! let track = Track::new("Relaxing Tune", "Artist 1", "https://example.com/track1.mp3");
//! assert!(track.validate().is_ok());
//!
//! let playlist = Track::list_from_json(
//!     r#"[{"title": "Chill Vibes", "artist": "Artist 2", "url": "track2.mp3"}]"#,
//! )
//! .unwrap();
//! assert_eq!(playlist.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{PlayerError, Result};
pub use traits::{MediaBackend, RenderSurface};
pub use types::{
    format_time, progress_fraction, BackendEvent, ControlHandle, ControlKind, HandleId, Track,
};
