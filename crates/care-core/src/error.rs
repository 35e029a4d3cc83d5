use std::path::PathBuf;
use thiserror::Error;

use crate::models::ProfileKind;

/// All errors produced by the Care Tracker.
#[derive(Error, Debug)]
pub enum CareError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required input file could not be located.
    #[error("{kind} file not found (looked for: {candidates})")]
    MissingInput { kind: String, candidates: String },

    /// A profile value could not be converted to the field's type.
    #[error("Invalid {profile} profile value for `{key}`: {value:?} ({reason})")]
    ProfileField {
        profile: ProfileKind,
        key: String,
        value: String,
        reason: String,
    },

    /// A profile field required by the analysis was never provided.
    #[error("{profile} profile is missing required field `{key}`")]
    MissingProfileField { profile: ProfileKind, key: String },

    /// A date string did not match `YYYY-MM-DD`.
    #[error("Invalid date: {0}")]
    DateParse(String),

    /// A time string did not match `HH:MM`.
    #[error("Invalid time: {0}")]
    TimeParse(String),

    /// A report could not be serialized.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CareError {
    /// Build a [`CareError::ProfileField`] from its parts.
    pub fn profile_field(
        profile: ProfileKind,
        key: &str,
        value: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::ProfileField {
            profile,
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the care crates.
pub type Result<T> = std::result::Result<T, CareError>;
