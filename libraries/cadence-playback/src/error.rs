//! Error types for playback management
//!
//! The widget shares the core error taxonomy so host code handles one type.

pub use cadence_core::error::{PlayerError, Result};
