//! Crate-level error types.

use std::fmt;

use crate::backend::BackendError;
use crate::model::SchemaError;
use crate::playback::PlaybackError;

/// Errors produced by the clusterscope crate.
#[derive(Debug)]
pub enum ScopeError {
    /// The backend call failed: transport, non-2xx status, or undecodable
    /// body.
    NetworkFailure(BackendError),
    /// A run was requested with no dataset (or an empty one) loaded.
    NoDataset,
    /// Cluster count input was not a positive integer.
    InvalidClusterCount(String),
    /// A backend reply decoded but violated the data model.
    MalformedResponse(SchemaError),
    /// The workflow is already waiting on the backend.
    RequestInFlight(&'static str),
    /// Playback state machine misuse. Indicates a wiring defect.
    Playback(PlaybackError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Failed to spawn a background thread.
    ThreadSpawn(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl ScopeError {
    /// Whether the user can retry after this error. Everything except
    /// state machine misuse, which aborts the operation that caused it.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Playback(PlaybackError::InvalidTransition { .. }))
    }
}

impl fmt::Display for ScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkFailure(e) => write!(f, "network failure: {e}"),
            Self::NoDataset => {
                write!(f, "no dataset loaded; generate data first")
            }
            Self::InvalidClusterCount(input) => write!(
                f,
                "cluster count must be a positive integer, got {input:?}"
            ),
            Self::MalformedResponse(e) => {
                write!(f, "malformed backend response: {e}")
            }
            Self::RequestInFlight(workflow) => {
                write!(f, "{workflow} request already in flight")
            }
            Self::Playback(e) => write!(f, "playback error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn thread: {e}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for ScopeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NetworkFailure(e) => Some(e),
            Self::MalformedResponse(e) => Some(e),
            Self::Playback(e) => Some(e),
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BackendError> for ScopeError {
    fn from(e: BackendError) -> Self {
        Self::NetworkFailure(e)
    }
}

impl From<SchemaError> for ScopeError {
    fn from(e: SchemaError) -> Self {
        match e {
            SchemaError::InvalidClusterCount(input) => {
                Self::InvalidClusterCount(input)
            }
            other => Self::MalformedResponse(other),
        }
    }
}

impl From<PlaybackError> for ScopeError {
    fn from(e: PlaybackError) -> Self {
        Self::Playback(e)
    }
}

impl From<std::io::Error> for ScopeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_is_not_recoverable() {
        let err = ScopeError::from(PlaybackError::InvalidTransition {
            operation: "load_run",
            reason: "no dataset loaded",
        });
        assert!(!err.is_recoverable());
        assert!(ScopeError::NoDataset.is_recoverable());
        assert!(ScopeError::from(PlaybackError::NoMoreSteps).is_recoverable());
    }

    #[test]
    fn cluster_count_schema_error_maps_to_validation_error() {
        let err = ScopeError::from(SchemaError::InvalidClusterCount("x".to_owned()));
        assert!(matches!(err, ScopeError::InvalidClusterCount(ref s) if s == "x"));
        let err = ScopeError::from(SchemaError::EmptyRun);
        assert!(matches!(err, ScopeError::MalformedResponse(SchemaError::EmptyRun)));
    }
}
