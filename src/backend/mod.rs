//! The clustering service, as seen from the controller.
//!
//! [`Backend`] is the seam: one call produces a fresh dataset, the other
//! runs k-means against the most recently generated dataset and returns every
//! iteration. Replies are returned in wire form; checking them against the
//! loaded dataset is the session's job.
//!
//! With the `http` feature, [`http::HttpBackend`] talks to the service over
//! HTTP. [`worker::RequestWorker`] moves any backend onto a background
//! thread so the event loop never blocks on the network.

#[cfg(feature = "http")]
pub mod http;
pub mod worker;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{ClusterCount, Sample, Snapshot};

/// A source of datasets and k-means runs.
pub trait Backend {
    /// Generate a new synthetic dataset.
    ///
    /// # Errors
    ///
    /// Any [`BackendError`]: transport failure, non-2xx status, or a body
    /// that does not decode.
    fn generate_data(&self) -> Result<Vec<Sample>, BackendError>;

    /// Run k-means with `k` clusters against the last generated dataset.
    ///
    /// # Errors
    ///
    /// Any [`BackendError`]: transport failure, non-2xx status, or a body
    /// that does not decode.
    fn run_kmeans(&self, k: ClusterCount) -> Result<Vec<Snapshot>, BackendError>;
}

// ── Wire types ───────────────────────────────────────────────────────────

/// Body of the dataset generation reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Samples as `[x, y]` pairs.
    pub data: Vec<Sample>,
}

/// Body of the k-means request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    /// Requested cluster count.
    pub k: ClusterCount,
}

/// Body of the k-means reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResponse {
    /// One entry per iteration, in order.
    pub steps: Vec<Snapshot>,
}

/// Decode a generation reply body.
///
/// # Errors
///
/// [`BackendError::Decode`] if the body is not `{"data": [[x, y], ...]}`.
pub fn decode_generate(body: &str) -> Result<Vec<Sample>, BackendError> {
    serde_json::from_str::<GenerateResponse>(body)
        .map(|r| r.data)
        .map_err(|e| BackendError::Decode(e.to_string()))
}

/// Decode a k-means reply body.
///
/// # Errors
///
/// [`BackendError::Decode`] if the body is not `{"steps": [...]}` with
/// snapshot-shaped entries.
pub fn decode_run(body: &str) -> Result<Vec<Snapshot>, BackendError> {
    serde_json::from_str::<RunResponse>(body)
        .map(|r| r.steps)
        .map_err(|e| BackendError::Decode(e.to_string()))
}

// ── Errors ───────────────────────────────────────────────────────────────

/// Why a backend call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The service answered with a non-2xx status.
    Status(u16),
    /// The request never completed (DNS, connect, timeout, I/O).
    Transport(String),
    /// The reply body did not match the expected JSON shape.
    Decode(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "server responded with HTTP {code}"),
            Self::Transport(msg) => write!(f, "request failed: {msg}"),
            Self::Decode(msg) => write!(f, "could not decode reply: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}
