//! Dataset, snapshot and run types shared by every layer.
//!
//! The backend is not trusted blindly: [`Dataset::new`] and
//! [`Run::validated`] check the invariants the renderer relies on (finite
//! coordinates, one label per sample, labels that name an existing centroid)
//! and report violations as [`SchemaError`].

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A 2-D coordinate pair. Serialized as a two-element array `[x, y]`.
///
/// Centroids use the same representation as data samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Sample {
    /// Horizontal data coordinate.
    pub x: f64,
    /// Vertical data coordinate.
    pub y: f64,
}

impl Sample {
    /// Sample at `(x, y)`.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Sample {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Sample> for [f64; 2] {
    fn from(s: Sample) -> Self {
        [s.x, s.y]
    }
}

// ── Dataset ──────────────────────────────────────────────────────────────

/// The ordered point cloud being clustered.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    /// Build a dataset, rejecting non-finite coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NonFiniteSample`] naming the first offending
    /// sample.
    pub fn new(samples: Vec<Sample>) -> Result<Self, SchemaError> {
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(SchemaError::NonFiniteSample { index });
        }
        Ok(Self { samples })
    }

    /// Samples in dataset order.
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the dataset has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// ── Snapshot / Run ───────────────────────────────────────────────────────

/// One iteration of the algorithm: per-sample labels and per-cluster
/// centroids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Iteration number as reported by the backend.
    pub iteration: u32,
    /// Cluster index per sample, in dataset order.
    pub labels: Vec<usize>,
    /// Centroid position per cluster index.
    pub centroids: Vec<Sample>,
}

impl Snapshot {
    fn check(&self, dataset_len: usize) -> Result<(), SchemaError> {
        let iteration = self.iteration;
        if self.labels.len() != dataset_len {
            return Err(SchemaError::LabelCountMismatch {
                iteration,
                expected: dataset_len,
                found: self.labels.len(),
            });
        }
        if self.centroids.is_empty() {
            return Err(SchemaError::NoCentroids { iteration });
        }
        if self.centroids.iter().any(|c| !c.is_finite()) {
            return Err(SchemaError::NonFiniteCentroid { iteration });
        }
        let clusters = self.centroids.len();
        if let Some(&label) = self.labels.iter().find(|&&l| l >= clusters) {
            return Err(SchemaError::LabelOutOfRange {
                iteration,
                label,
                clusters,
            });
        }
        Ok(())
    }
}

/// The full snapshot sequence of one algorithm invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    snapshots: Vec<Snapshot>,
}

impl Run {
    /// Wrap a snapshot sequence without validation.
    ///
    /// The playback state machine still refuses an empty run; use
    /// [`validated`](Self::validated) for data coming off the wire.
    #[must_use]
    pub fn new(snapshots: Vec<Snapshot>) -> Self {
        Self { snapshots }
    }

    /// Build a run and check every snapshot against the dataset it was
    /// computed for.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found: an empty run, a label count
    /// that differs from the dataset length, a snapshot without centroids,
    /// a non-finite centroid, or a label naming a missing centroid.
    pub fn validated(
        snapshots: Vec<Snapshot>,
        dataset: &Dataset,
    ) -> Result<Self, SchemaError> {
        if snapshots.is_empty() {
            return Err(SchemaError::EmptyRun);
        }
        for snapshot in &snapshots {
            snapshot.check(dataset.len())?;
        }
        Ok(Self { snapshots })
    }

    /// Snapshot at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// Number of snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the run has no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

// ── ClusterCount ─────────────────────────────────────────────────────────

/// A validated, positive cluster count `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterCount(NonZeroUsize);

impl ClusterCount {
    /// Cluster count from a raw integer; `None` for zero.
    #[must_use]
    pub fn new(k: usize) -> Option<Self> {
        NonZeroUsize::new(k).map(Self)
    }

    /// The count as a plain integer.
    #[must_use]
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl fmt::Display for ClusterCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClusterCount {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .parse::<usize>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| SchemaError::InvalidClusterCount(trimmed.to_owned()))
    }
}

// ── Errors ───────────────────────────────────────────────────────────────

/// A value that violates the data model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A dataset sample has a NaN or infinite coordinate.
    NonFiniteSample {
        /// Position of the sample in the dataset.
        index: usize,
    },
    /// The backend returned a run with no snapshots.
    EmptyRun,
    /// A snapshot's label list does not match the dataset length.
    LabelCountMismatch {
        /// Iteration of the offending snapshot.
        iteration: u32,
        /// Dataset length.
        expected: usize,
        /// Number of labels received.
        found: usize,
    },
    /// A snapshot has no centroids.
    NoCentroids {
        /// Iteration of the offending snapshot.
        iteration: u32,
    },
    /// A centroid has a NaN or infinite coordinate.
    NonFiniteCentroid {
        /// Iteration of the offending snapshot.
        iteration: u32,
    },
    /// A label names a cluster with no centroid.
    LabelOutOfRange {
        /// Iteration of the offending snapshot.
        iteration: u32,
        /// The offending label.
        label: usize,
        /// Number of centroids in the snapshot.
        clusters: usize,
    },
    /// Cluster count input is not a positive integer.
    InvalidClusterCount(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteSample { index } => {
                write!(f, "sample {index} has a non-finite coordinate")
            }
            Self::EmptyRun => write!(f, "run contains no iterations"),
            Self::LabelCountMismatch {
                iteration,
                expected,
                found,
            } => write!(
                f,
                "iteration {iteration}: expected {expected} labels, got {found}"
            ),
            Self::NoCentroids { iteration } => {
                write!(f, "iteration {iteration}: no centroids")
            }
            Self::NonFiniteCentroid { iteration } => {
                write!(f, "iteration {iteration}: non-finite centroid")
            }
            Self::LabelOutOfRange {
                iteration,
                label,
                clusters,
            } => write!(
                f,
                "iteration {iteration}: label {label} out of range for \
                 {clusters} centroids"
            ),
            Self::InvalidClusterCount(input) => {
                write!(f, "cluster count must be a positive integer, got {input:?}")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Dataset {
        Dataset::new(vec![
            Sample::new(0.0, 0.0),
            Sample::new(2.0, 0.0),
            Sample::new(0.0, 2.0),
            Sample::new(2.0, 2.0),
        ])
        .unwrap()
    }

    fn snapshot(iteration: u32, labels: Vec<usize>) -> Snapshot {
        Snapshot {
            iteration,
            labels,
            centroids: vec![Sample::new(1.0, 0.0), Sample::new(1.0, 2.0)],
        }
    }

    #[test]
    fn sample_deserializes_from_pair() {
        let s: Sample = serde_json::from_str("[1.5, -2.0]").unwrap();
        assert_eq!(s, Sample::new(1.5, -2.0));
        assert_eq!(serde_json::to_string(&s).unwrap(), "[1.5,-2.0]");
    }

    #[test]
    fn sample_rejects_wrong_arity() {
        assert!(serde_json::from_str::<Sample>("[1.0]").is_err());
        assert!(serde_json::from_str::<Sample>("[1.0, 2.0, 3.0]").is_err());
    }

    #[test]
    fn dataset_rejects_non_finite() {
        let err = Dataset::new(vec![Sample::new(0.0, 0.0), Sample::new(f64::NAN, 1.0)])
            .unwrap_err();
        assert_eq!(err, SchemaError::NonFiniteSample { index: 1 });
    }

    #[test]
    fn validated_run_accepts_well_formed_steps() {
        let run = Run::validated(
            vec![snapshot(1, vec![0, 0, 1, 1]), snapshot(2, vec![0, 1, 0, 1])],
            &square(),
        )
        .unwrap();
        assert_eq!(run.len(), 2);
        assert_eq!(run.get(1).map(|s| s.iteration), Some(2));
    }

    #[test]
    fn validated_run_rejects_empty() {
        assert_eq!(
            Run::validated(Vec::new(), &square()),
            Err(SchemaError::EmptyRun)
        );
    }

    #[test]
    fn validated_run_rejects_label_count_mismatch() {
        let err = Run::validated(vec![snapshot(3, vec![0, 1])], &square())
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::LabelCountMismatch {
                iteration: 3,
                expected: 4,
                found: 2
            }
        );
    }

    #[test]
    fn validated_run_rejects_dangling_label() {
        let err = Run::validated(vec![snapshot(1, vec![0, 0, 1, 2])], &square())
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::LabelOutOfRange {
                iteration: 1,
                label: 2,
                clusters: 2
            }
        );
    }

    #[test]
    fn snapshot_decodes_wire_shape() {
        let json = r#"{"iteration":1,"labels":[0,0,1,1],"centroids":[[1,0],[1,2]]}"#;
        let snap: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap, snapshot(1, vec![0, 0, 1, 1]));
    }

    #[test]
    fn cluster_count_parsing() {
        assert_eq!("3".parse::<ClusterCount>().unwrap().get(), 3);
        assert_eq!(" 7 ".parse::<ClusterCount>().unwrap().get(), 7);
        assert!("0".parse::<ClusterCount>().is_err());
        assert!("-2".parse::<ClusterCount>().is_err());
        assert!("three".parse::<ClusterCount>().is_err());
        assert!("".parse::<ClusterCount>().is_err());
    }

    #[test]
    fn cluster_count_serializes_as_integer() {
        let k = ClusterCount::new(4).unwrap();
        assert_eq!(serde_json::to_string(&k).unwrap(), "4");
    }
}
