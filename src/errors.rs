use std::path::PathBuf;

use thiserror::Error;

/// Raised while opening the leaderboard. Fatal for the binary.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read leaderboard file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("leaderboard file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Raised when the leaderboard could not be written back.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to write leaderboard file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("record for {name} has accuracy {accuracy}, expected a value in 0..=100")]
    InvalidAccuracy { name: String, accuracy: f64 },
    #[error("failed to serialize leaderboard: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error("elapsed time must be a positive number of seconds, got {0}")]
    NonPositiveElapsed(f64),
    #[error("original text is empty, accuracy is undefined")]
    EmptyOriginal,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config file {path} is invalid: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything the binary can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
    #[error("failed to initialize logging: {0}")]
    Logging(String),
}
