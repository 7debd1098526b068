use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading or validating a [`GameConfig`](crate::config::GameConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {reason}")]
    Invalid { reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}

impl From<ConfigError> for io::Error {
    fn from(error: ConfigError) -> Self {
        let kind = match &error {
            ConfigError::Io { source, .. } => source.kind(),
            _ => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, error)
    }
}

/// Reasons a board or game snapshot is rejected.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("snake body is empty")]
    EmptyBody,

    #[error("snake segments are not one step apart")]
    BrokenBody,

    #[error("grid of size {size} has {actual} cells, expected {expected}")]
    CellCount {
        size: u16,
        expected: usize,
        actual: usize,
    },

    #[error("grid size {grid} does not match configured size {config}")]
    GridSize { grid: u16, config: u16 },

    #[error("position ({x}, {y}) is off the board")]
    OffBoard { x: i32, y: i32 },

    #[error("grid snake cells do not match the snake body")]
    GridMismatch,

    #[error("grid holds {0} food cells, at most one is allowed")]
    TooMuchFood(usize),

    #[error("difficulty {0} is not a configured level")]
    Difficulty(u8),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
