//! Error types for loading fleets and scheduler configuration.
//!
//! Scheduling itself never fails: unknown ids are ignored and out-of-range
//! hours are clamped. Errors only surface at I/O and validation edges.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a timeline or reading configuration.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// File could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Fleet document is not valid JSON for the expected shape
    #[error("invalid fleet document: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file is not valid TOML for the expected shape
    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration values are out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("duplicate robot id: {robot_id}")]
    DuplicateRobot { robot_id: String },

    #[error("duplicate mission id: {mission_id}")]
    DuplicateMission { mission_id: String },

    /// Mission refers to a lane that does not exist
    #[error("mission {mission_id} refers to unknown robot {robot_id}")]
    UnknownRobot {
        mission_id: String,
        robot_id: String,
    },

    #[error("mission {mission_id} has zero duration")]
    ZeroDuration { mission_id: String },
}

/// Result type for scheduler setup operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;
