/// Demo error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DemoError>;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Playlist error: {0}")]
    Playlist(#[from] cadence_core::PlayerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for DemoError {
    fn from(err: config::ConfigError) -> Self {
        DemoError::Config(err.to_string())
    }
}
