//! Core error types for islearn-core.
//!
//! Domain operations on the progress store never fail; these errors cover
//! the fallible edges: persistence, configuration, catalog loading and
//! rejected practice-session input.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for islearn-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Profile persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Level or reward catalog errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Rejected practice-session input
    #[error("Game error: {0}")]
    Game(#[from] GameError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Profile store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Stored profile document could not be decoded
    #[error("Corrupt profile document for '{user_id}': {message}")]
    CorruptDocument { user_id: String, message: String },

    /// Remote or backing store unreachable
    #[error("Profile store unavailable: {0}")]
    Unavailable(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Could not resolve the data directory
    #[error("Could not prepare data directory {path}: {message}")]
    DataDir { path: PathBuf, message: String },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Catalog validation and loading errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Level id must be positive")]
    ZeroLevelId,

    #[error("Duplicate level id {0}")]
    DuplicateLevel(u32),

    #[error("Sign id '{sign_id}' appears in level {first} and level {second}")]
    DuplicateSign {
        sign_id: String,
        first: u32,
        second: u32,
    },

    #[error("Duplicate reward id '{0}'")]
    DuplicateReward(String),

    #[error("Failed to read catalog {path}: {message}")]
    ReadFailed { path: PathBuf, message: String },

    #[error("Failed to parse catalog: {0}")]
    ParseFailed(String),
}

/// Practice-session input rejected by the game session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    /// Feedback from the previous evaluation is still on screen
    #[error("An evaluation is already pending; wait for its feedback to clear")]
    EvaluationPending,

    /// Confidence outside [0, 1] or NaN
    #[error("Confidence must be within [0, 1], got {0}")]
    InvalidConfidence(f64),

    /// Caller-supplied threshold would swallow the "almost" band
    #[error("Threshold {threshold} is below the partial threshold {partial}")]
    ThresholdBelowPartial { threshold: f64, partial: f64 },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
