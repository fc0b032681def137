//! Cadence Demo - terminal host for the playlist widget
//!
//! Loads a playlist from JSON and plays it through the widget against two
//! simulated audio handles, printing the widget's UI as text.

pub mod config;
pub mod console;
pub mod error;
pub mod session;
pub mod sim;

pub use config::{DemoConfig, SimulationSettings};
pub use error::{DemoError, Result};
pub use session::{run_session, SessionReport};

use cadence_core::Track;
use std::path::Path;

/// Read a playlist file: a JSON array of `{ title, artist?, url }`
pub fn load_playlist(path: &Path) -> Result<Vec<Track>> {
    let json = std::fs::read_to_string(path)?;
    Ok(Track::list_from_json(&json)?)
}
