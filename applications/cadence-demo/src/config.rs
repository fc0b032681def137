/// Demo configuration
use crate::error::{DemoError, Result};
use cadence_playback::WidgetSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DemoConfig {
    #[serde(default)]
    pub widget: WidgetSettings,

    #[serde(default)]
    pub simulation: SimulationSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationSettings {
    /// Length every simulated source reports
    #[serde(default = "default_track_length_secs")]
    pub track_length_secs: f64,

    /// Simulated seconds per tick
    #[serde(default = "default_tick_secs")]
    pub tick_secs: f64,

    /// Hard stop for the tick loop
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Stop after this many tracks played to the end (default: one lap)
    #[serde(default)]
    pub max_tracks: Option<usize>,

    /// URLs whose playback the simulated backend refuses
    #[serde(default)]
    pub reject_urls: Vec<String>,

    /// Skip to the next track when a transition fails
    #[serde(default = "default_skip_on_error")]
    pub skip_on_error: bool,
}

impl DemoConfig {
    /// Load configuration from file and environment
    ///
    /// `path` overrides the default `cadence.toml`; an explicit path must
    /// exist. Environment variables prefixed with `CADENCE_` win over the
    /// file, with `__` between section and key (`CADENCE_WIDGET__SHUFFLE`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(DemoError::Config(format!(
                        "config file {:?} not found",
                        path
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: DemoConfig = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !is_positive(self.simulation.tick_secs) {
            return Err(DemoError::Config(
                "simulation.tick_secs must be positive".to_string(),
            ));
        }
        if !is_positive(self.simulation.track_length_secs) {
            return Err(DemoError::Config(
                "simulation.track_length_secs must be positive".to_string(),
            ));
        }
        if self.widget.preload_margin_secs < 0.0 || self.widget.milestone_secs < 0.0 {
            return Err(DemoError::Config(
                "widget thresholds must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

// Default values
fn default_track_length_secs() -> f64 {
    30.0
}

fn default_tick_secs() -> f64 {
    1.0
}

fn default_max_ticks() -> u64 {
    10_000
}

fn default_skip_on_error() -> bool {
    true
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            track_length_secs: default_track_length_secs(),
            tick_secs: default_tick_secs(),
            max_ticks: default_max_ticks(),
            max_tracks: None,
            reject_urls: Vec::new(),
            skip_on_error: default_skip_on_error(),
        }
    }
}
