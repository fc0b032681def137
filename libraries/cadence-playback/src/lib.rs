//! Cadence Player - Playlist Widget
//!
//! Platform-agnostic playlist playback for an embeddable player widget.
//!
//! This crate provides:
//! - Sequential and shuffled navigation with shuffle history
//! - Gapless-ish transitions through a preloaded standby handle
//! - Playlist editing (append, insert after current, drag-reorder, clear)
//! - Host hooks and a drainable event queue
//!
//! # Architecture
//!
//! `cadence-playback` never touches a real audio element or UI toolkit.
//! Playback goes through [`MediaBackend`] and drawing through
//! [`RenderSurface`]; the host forwards backend notifications to
//! [`PlaylistWidget::handle_backend_event`]. Browser bindings live behind
//! the `wasm` feature.
//!
//! # Example: Sequencing
//!
//! ```rust
//! use cadence_playback::{Sequencer, Track};
//!
//! let mut sequencer = Sequencer::with_seed(false, 7);
//! sequencer.add_track(Track::new("One", "", "a.mp3")).unwrap();
//! sequencer.add_track(Track::new("Two", "", "b.mp3")).unwrap();
//!
//! let next = sequencer.compute_next().unwrap();
//! sequencer.on_track_loaded(next).unwrap();
//! assert_eq!(sequencer.current(), Some(0));
//! assert_eq!(sequencer.compute_next().unwrap(), 1);
//! ```
//!
//! # Example: Settings
//!
//! ```rust
//! use cadence_playback::WidgetSettings;
//!
//! let settings: WidgetSettings = serde_json::from_str(r#"{ "shuffle": true }"#).unwrap();
//! assert!(settings.shuffle);
//! assert_eq!(settings.preload_margin_secs, 10.0);
//! ```

mod error;
pub mod events;
mod history;
pub mod preload;
mod sequencer;
pub mod types;
mod widget;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use cadence_core::{
    BackendEvent, ControlHandle, ControlKind, HandleId, MediaBackend, RenderSurface, Track,
};
pub use error::{PlayerError, Result};
pub use events::WidgetEvent;
pub use history::ShuffleHistory;
pub use preload::{Activation, HandlePair, PlaybackHandle, PreloadCoordinator, PreloadState};
pub use sequencer::{moved_index, Sequencer, SequencerCheckpoint};
pub use types::{AddedRange, PlaybackState, WidgetSettings};
pub use widget::{PlaylistWidget, WidgetHooks};
