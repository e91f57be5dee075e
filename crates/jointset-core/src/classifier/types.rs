//! Result types produced by the joint-set classifier

use serde::{Deserialize, Serialize};

use crate::summary::JointSetSummary;

/// Non-fatal quality concerns raised during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QualityWarning {
    /// Fewer distinct pole vectors than requested sets; some sets share
    /// coincident centroids (e.g. every plane horizontal)
    NumericDegeneracy { distinct_poles: usize, k: usize },
    /// The winning initialisation hit the iteration cap
    NotConverged { iterations: usize },
}

impl std::fmt::Display for QualityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NumericDegeneracy { distinct_poles, k } => write!(
                f,
                "only {} distinct pole vector(s) for k={}; some joint sets coincide",
                distinct_poles, k
            ),
            Self::NotConverged { iterations } => write!(
                f,
                "k-means did not converge within {} iterations",
                iterations
            ),
        }
    }
}

/// Outcome of a single Lloyd run from one initialisation
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LloydRun {
    pub labels: Vec<usize>,
    pub centroids: Vec<[f64; 3]>,
    pub inertia: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Best k-means fit over all initialisations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KMeansFit {
    /// One label per input vector, input order
    pub labels: Vec<usize>,
    /// Centroid of each label (mean pole, generally not unit length)
    pub centroids: Vec<[f64; 3]>,
    pub diagnostics: ClusteringDiagnostics,
}

impl KMeansFit {
    /// Number of members carrying each label
    pub fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.centroids.len()];
        for &label in &self.labels {
            counts[label] += 1;
        }
        counts
    }
}

/// Diagnostics for reporting and export; not needed for correctness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringDiagnostics {
    /// Within-cluster sum of squared distances of the winning run
    pub inertia: f64,
    /// Lloyd iterations used by the winning run
    pub iterations: usize,
    /// Whether the winning run stopped before the iteration cap
    pub converged: bool,
    /// Initialisations performed
    pub n_init: usize,
    /// Zero-based index of the winning initialisation
    pub best_restart: usize,
    /// Master seed used; replaying it reproduces the labels
    pub seed: u64,
    /// Distinct pole vectors in the input
    pub distinct_poles: usize,
    pub warnings: Vec<QualityWarning>,
}

impl ClusteringDiagnostics {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Labels, centroids, diagnostics and per-set summaries for a measurement set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointSetClustering {
    pub labels: Vec<usize>,
    pub centroids: Vec<[f64; 3]>,
    pub diagnostics: ClusteringDiagnostics,
    pub summaries: Vec<JointSetSummary>,
}

impl JointSetClustering {
    /// Number of joint sets requested
    #[inline]
    pub fn num_sets(&self) -> usize {
        self.centroids.len()
    }

    /// Row indices belonging to `set`, in input order
    pub fn members(&self, set: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, label)| **label == set)
            .map(|(i, _)| i)
            .collect()
    }
}
