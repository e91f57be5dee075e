//! Run configuration for the joint-set classifier

use serde::{Deserialize, Serialize};

use crate::error::{JointSetError, Result};

/// Default number of independent k-means++ initialisations per run
pub const DEFAULT_N_INIT: usize = 10;
/// Default Lloyd iteration cap per initialisation
pub const DEFAULT_MAX_ITERATIONS: usize = 300;
/// Default stop threshold on the total squared centroid shift
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// How cluster indices are numbered in the output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelOrder {
    /// Keep the centroid order of the winning initialisation (opaque ids)
    #[default]
    AsFound,
    /// Renumber sets by ascending centroid dip angle, then dip direction
    ByDip,
}

/// Immutable configuration for one clustering run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Requested number of joint sets
    pub k: usize,
    /// Seed for the master RNG; `None` draws one from entropy
    pub seed: Option<u64>,
    /// Independent initialisations; the lowest-inertia one wins
    pub n_init: usize,
    /// Lloyd iteration cap per initialisation
    pub max_iterations: usize,
    /// Convergence threshold on total squared centroid movement
    pub tolerance: f64,
    /// Label numbering policy
    pub label_order: LabelOrder,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            k: 3,
            seed: Some(42),
            n_init: DEFAULT_N_INIT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            label_order: LabelOrder::AsFound,
        }
    }
}

impl ClassifierConfig {
    /// Default configuration for `k` sets with an optional seed
    pub fn new(k: usize, seed: Option<u64>) -> Self {
        Self {
            k,
            seed,
            ..Self::default()
        }
    }

    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_label_order(mut self, label_order: LabelOrder) -> Self {
        self.label_order = label_order;
        self
    }

    /// Check parameters that do not depend on the input data.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` when `k`, `n_init` or `max_iterations` is zero,
    /// or the tolerance is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        if self.k < 1 {
            return Err(JointSetError::invalid_configuration(format!(
                "k must be >= 1 (got {})",
                self.k
            )));
        }
        if self.n_init < 1 {
            return Err(JointSetError::invalid_configuration(
                "n_init must be >= 1",
            ));
        }
        if self.max_iterations < 1 {
            return Err(JointSetError::invalid_configuration(
                "max_iterations must be >= 1",
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(JointSetError::invalid_configuration(format!(
                "tolerance must be a finite non-negative number (got {})",
                self.tolerance
            )));
        }
        Ok(())
    }
}
