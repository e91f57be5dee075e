//! Joint-set classifier
//!
//! Seeded, multi-restart k-means over pole vectors.
//!
//! # Algorithm
//!
//! 1. Draw one sub-seed per restart from a master `StdRng` seeded with the
//!    run seed (or a seed drawn from the OS when none is given)
//! 2. For each restart: k-means++ initialisation, then Lloyd iterations
//!    until labels settle, centroids stop moving, or the iteration cap
//! 3. Keep the restart with the lowest inertia; exact ties keep the
//!    earliest restart
//! 4. Optionally renumber sets by centroid dip
//!
//! # Validation
//!
//! - input must not be empty
//! - `k >= 1` and `k <=` the number of distinct input rows
//! - every vector component must be finite
//!
//! Hitting the iteration cap is reported in diagnostics, never as an error.

mod config;
mod kmeans;
mod types;

use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

use crate::error::{JointSetError, Result};
use crate::orientation::{decode, encode_all, Measurement};
use crate::summary::summarize;

pub use config::{
    ClassifierConfig, LabelOrder, DEFAULT_MAX_ITERATIONS, DEFAULT_N_INIT, DEFAULT_TOLERANCE,
};
pub use kmeans::{count_distinct, squared_distance};
pub use types::{ClusteringDiagnostics, JointSetClustering, KMeansFit, QualityWarning};

use types::LloydRun;

/// Seeded multi-restart k-means for 3-D vectors
#[derive(Debug, Clone)]
pub struct KMeans {
    config: ClassifierConfig,
}

impl KMeans {
    /// Create a classifier; the configuration is checked up front.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if any data-independent parameter is out of range.
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Cluster an `(n, 3)` matrix of vectors.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the matrix is empty, is not three columns
    /// wide, holds non-finite values, or has fewer rows than `k`.
    pub fn fit(&self, vectors: ArrayView2<'_, f64>) -> Result<KMeansFit> {
        let (n, dim) = vectors.dim();
        if n == 0 {
            return Err(JointSetError::invalid_configuration(
                "input must not be empty",
            ));
        }
        if dim != 3 {
            return Err(JointSetError::invalid_configuration(format!(
                "expected 3 columns per vector, got {}",
                dim
            )));
        }
        if self.config.k > n {
            return Err(JointSetError::invalid_configuration(format!(
                "k ({}) must be <= number of rows ({})",
                self.config.k, n
            )));
        }

        let mut points = Vec::with_capacity(n);
        for (i, row) in vectors.rows().into_iter().enumerate() {
            let p = [row[0], row[1], row[2]];
            if p.iter().any(|v| !v.is_finite()) {
                return Err(JointSetError::invalid_configuration(format!(
                    "row {} has a non-finite component",
                    i
                )));
            }
            points.push(p);
        }

        Ok(self.fit_points(&points))
    }

    fn fit_points(&self, points: &[[f64; 3]]) -> KMeansFit {
        let k = self.config.k;
        let seed = self
            .config
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen());
        let mut master = StdRng::seed_from_u64(seed);

        tracing::debug!(
            n = points.len(),
            k,
            n_init = self.config.n_init,
            seed,
            "starting k-means"
        );

        let mut best_restart = 0;
        let mut run = self.restart(points, 0, &mut master);
        for restart in 1..self.config.n_init {
            let candidate = self.restart(points, restart, &mut master);
            if candidate.inertia < run.inertia {
                run = candidate;
                best_restart = restart;
            }
        }

        let (labels, centroids) = match self.config.label_order {
            LabelOrder::AsFound => (run.labels, run.centroids),
            LabelOrder::ByDip => order_by_dip(run.labels, run.centroids),
        };

        let distinct_poles = count_distinct(points);
        let mut warnings = Vec::new();
        if distinct_poles < k {
            warnings.push(QualityWarning::NumericDegeneracy { distinct_poles, k });
        }
        if !run.converged {
            warnings.push(QualityWarning::NotConverged {
                iterations: run.iterations,
            });
        }
        for warning in &warnings {
            tracing::warn!("{}", warning);
        }

        tracing::info!(
            n = points.len(),
            k,
            inertia = run.inertia,
            iterations = run.iterations,
            converged = run.converged,
            best_restart,
            "k-means complete"
        );

        KMeansFit {
            labels,
            centroids,
            diagnostics: ClusteringDiagnostics {
                inertia: run.inertia,
                iterations: run.iterations,
                converged: run.converged,
                n_init: self.config.n_init,
                best_restart,
                seed,
                distinct_poles,
                warnings,
            },
        }
    }

    fn restart(&self, points: &[[f64; 3]], restart: usize, master: &mut StdRng) -> LloydRun {
        let mut rng = StdRng::seed_from_u64(master.gen());
        let run = kmeans::lloyd(
            points,
            self.config.k,
            self.config.max_iterations,
            self.config.tolerance,
            &mut rng,
        );

        tracing::debug!(
            restart,
            inertia = run.inertia,
            iterations = run.iterations,
            converged = run.converged,
            "k-means restart finished"
        );

        run
    }
}

/// Renumber sets by ascending centroid dip angle, then dip direction
fn order_by_dip(labels: Vec<usize>, centroids: Vec<[f64; 3]>) -> (Vec<usize>, Vec<[f64; 3]>) {
    let mut order: Vec<usize> = (0..centroids.len()).collect();
    let orientations: Vec<(f64, f64)> = centroids.iter().map(|c| decode(*c)).collect();
    order.sort_by(|&a, &b| {
        let (dd_a, dip_a) = orientations[a];
        let (dd_b, dip_b) = orientations[b];
        dip_a
            .total_cmp(&dip_b)
            .then(dd_a.total_cmp(&dd_b))
    });

    let mut new_label = vec![0usize; centroids.len()];
    for (new, &old) in order.iter().enumerate() {
        new_label[old] = new;
    }

    let labels = labels.into_iter().map(|l| new_label[l]).collect();
    let centroids = order.iter().map(|&old| centroids[old]).collect();
    (labels, centroids)
}

/// Number of distinct (dip direction, dip angle) rows
fn distinct_rows(measurements: &[Measurement]) -> usize {
    measurements
        .iter()
        .map(|m| ((m.dip_direction + 0.0).to_bits(), (m.dip_angle + 0.0).to_bits()))
        .collect::<HashSet<_>>()
        .len()
}

/// Full run over measurements: labels, centroids, diagnostics and summaries.
///
/// # Errors
///
/// `InvalidConfiguration` if the configuration is invalid, the input is
/// empty, a value is not finite, or `k` exceeds the number of distinct rows.
pub fn cluster_with(
    measurements: &[Measurement],
    config: &ClassifierConfig,
) -> Result<JointSetClustering> {
    let classifier = KMeans::new(config.clone())?;

    if measurements.is_empty() {
        return Err(JointSetError::invalid_configuration(
            "input must not be empty",
        ));
    }
    if let Some(i) = measurements.iter().position(|m| !m.is_finite()) {
        return Err(JointSetError::invalid_configuration(format!(
            "measurement {} is not finite",
            i
        )));
    }

    let distinct = distinct_rows(measurements);
    if config.k > distinct {
        return Err(JointSetError::invalid_configuration(format!(
            "k ({}) must be <= number of distinct measurements ({})",
            config.k, distinct
        )));
    }

    let poles = encode_all(measurements);
    let fit = classifier.fit(poles.view())?;
    let summaries = summarize(&fit.labels, &fit.centroids);

    Ok(JointSetClustering {
        labels: fit.labels,
        centroids: fit.centroids,
        diagnostics: fit.diagnostics,
        summaries,
    })
}

/// Assign each measurement a joint-set label in `[0, k)`, input order.
///
/// # Errors
///
/// `InvalidConfiguration` for an empty input, `k < 1`, or `k` above the
/// number of distinct measurements.
pub fn cluster(measurements: &[Measurement], k: usize, seed: Option<u64>) -> Result<Vec<usize>> {
    cluster_with(measurements, &ClassifierConfig::new(k, seed)).map(|c| c.labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use proptest::prelude::*;

    fn measurements(pairs: &[(f64, f64)]) -> Vec<Measurement> {
        pairs.iter().copied().map(Measurement::from).collect()
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = cluster(&[], 1, Some(0)).unwrap_err();
        assert!(err.is_invalid_configuration());
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_zero_k_rejected() {
        let ms = measurements(&[(90.0, 45.0), (270.0, 45.0)]);
        assert!(cluster(&ms, 0, Some(0)).unwrap_err().is_invalid_configuration());
    }

    #[test]
    fn test_k_above_row_count_rejected() {
        let ms = measurements(&[(90.0, 45.0), (92.0, 44.0), (270.0, 46.0)]);
        let err = cluster(&ms[..2], 5, Some(0)).unwrap_err();
        assert!(err.is_invalid_configuration());
        assert!(err.to_string().contains("k (5)"));
    }

    #[test]
    fn test_k_above_distinct_rows_rejected() {
        let ms = measurements(&[(90.0, 45.0), (90.0, 45.0), (90.0, 45.0)]);
        let err = cluster(&ms, 2, Some(0)).unwrap_err();
        assert!(err.to_string().contains("distinct"));
    }

    #[test]
    fn test_non_finite_measurement_rejected() {
        let ms = measurements(&[(90.0, 45.0), (f64::NAN, 45.0)]);
        assert!(cluster(&ms, 1, Some(0)).unwrap_err().is_invalid_configuration());
    }

    #[test]
    fn test_groups_by_orientation_not_row_order() {
        let ms = measurements(&[(90.0, 45.0), (270.0, 46.0), (92.0, 44.0), (268.0, 45.0)]);
        let labels = cluster(&ms, 2, Some(42)).unwrap();

        assert_eq!(labels.len(), 4);
        assert_eq!(labels[0], labels[2]);
        assert_eq!(labels[1], labels[3]);
        assert_ne!(labels[0], labels[1]);
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let ms: Vec<Measurement> = (0..60)
            .map(|i| Measurement::new((i * 37 % 360) as f64, (i * 13 % 90) as f64))
            .collect();
        let config = ClassifierConfig::new(4, Some(2024));

        let a = cluster_with(&ms, &config).unwrap();
        let b = cluster_with(&ms, &config).unwrap();
        assert_eq!(a.labels, b.labels);
        assert_eq!(a.centroids, b.centroids);
        assert_eq!(a.diagnostics, b.diagnostics);
    }

    #[test]
    fn test_unseeded_run_reports_replayable_seed() {
        let ms = measurements(&[
            (10.0, 20.0),
            (12.0, 22.0),
            (200.0, 70.0),
            (205.0, 68.0),
            (100.0, 5.0),
        ]);
        let first = cluster_with(&ms, &ClassifierConfig::new(2, None)).unwrap();
        let replay_config = ClassifierConfig::new(2, Some(first.diagnostics.seed));
        let replay = cluster_with(&ms, &replay_config).unwrap();
        assert_eq!(first.labels, replay.labels);
    }

    #[test]
    fn test_horizontal_planes_single_set() {
        let ms: Vec<Measurement> = (0..100)
            .map(|i| Measurement::new(i as f64 * 3.6, 0.0))
            .collect();
        let result = cluster_with(&ms, &ClassifierConfig::new(1, Some(0))).unwrap();

        assert_eq!(result.labels.len(), 100);
        assert!(result.labels.iter().all(|&l| l == 0));
        assert_eq!(result.diagnostics.distinct_poles, 1);
        assert!(result.diagnostics.inertia.abs() < 1e-24);
        assert!(result.diagnostics.warnings.is_empty());
    }

    #[test]
    fn test_horizontal_planes_with_several_sets_do_not_fail() {
        let ms: Vec<Measurement> = (0..100)
            .map(|i| Measurement::new(i as f64 * 3.6, 0.0))
            .collect();
        let result = cluster_with(&ms, &ClassifierConfig::new(3, Some(0))).unwrap();

        assert_eq!(result.labels.len(), 100);
        assert!(result.labels.iter().all(|&l| l < 3));
        assert!(result
            .diagnostics
            .warnings
            .contains(&QualityWarning::NumericDegeneracy { distinct_poles: 1, k: 3 }));
    }

    #[test]
    fn test_restarts_pick_lowest_inertia() {
        // Three tight groups; a bad start would merge two of them
        let mut pairs = Vec::new();
        for base in [(30.0, 20.0), (150.0, 60.0), (260.0, 85.0)] {
            for j in 0..5 {
                pairs.push((base.0 + j as f64, base.1 - j as f64 * 0.5));
            }
        }
        let ms = measurements(&pairs);
        let result = cluster_with(&ms, &ClassifierConfig::new(3, Some(9)).with_n_init(10)).unwrap();

        for group in result.labels.chunks(5) {
            assert!(group.iter().all(|&l| l == group[0]));
        }
        let mut distinct = result.labels.clone();
        distinct.sort_unstable();
        distinct.dedup();
        assert_eq!(distinct.len(), 3);
        assert!(result.diagnostics.best_restart < 10);
    }

    #[test]
    fn test_by_dip_ordering() {
        let ms = measurements(&[
            (40.0, 80.0),
            (42.0, 79.0),
            (120.0, 10.0),
            (118.0, 12.0),
            (250.0, 45.0),
            (252.0, 44.0),
        ]);
        let config = ClassifierConfig::new(3, Some(1)).with_label_order(LabelOrder::ByDip);
        let result = cluster_with(&ms, &config).unwrap();

        assert_eq!(result.labels, vec![2, 2, 0, 0, 1, 1]);
        assert_eq!(result.members(0), vec![2, 3]);
        assert_eq!(result.members(2), vec![0, 1]);
        let dips: Vec<f64> = result.summaries.iter().map(|s| s.mean_dip_angle).collect();
        assert!(dips.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_iteration_cap_is_not_an_error() {
        let ms: Vec<Measurement> = (0..40)
            .map(|i| Measurement::new((i * 53 % 360) as f64, (i * 7 % 90) as f64))
            .collect();
        let config = ClassifierConfig::new(6, Some(3))
            .with_max_iterations(1)
            .with_tolerance(0.0);
        let result = cluster_with(&ms, &config).unwrap();

        assert_eq!(result.diagnostics.iterations, 1);
        assert_eq!(result.labels.len(), 40);
        assert!(!result.diagnostics.converged);
        assert!(result.diagnostics.has_warnings());
        assert!(result
            .diagnostics
            .warnings
            .contains(&QualityWarning::NotConverged { iterations: 1 }));
    }

    #[test]
    fn test_fit_rejects_wrong_shape_and_non_finite() {
        let classifier = KMeans::new(ClassifierConfig::new(1, Some(0))).unwrap();

        let wide = Array2::<f64>::zeros((2, 4));
        assert!(classifier.fit(wide.view()).is_err());

        let mut bad = Array2::<f64>::zeros((2, 3));
        bad[[1, 2]] = f64::INFINITY;
        let err = classifier.fit(bad.view()).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_fit_counts_match_labels() {
        let poles = encode_all(&measurements(&[(0.0, 30.0), (5.0, 31.0), (180.0, 60.0)]));
        let fit = KMeans::new(ClassifierConfig::new(2, Some(5)))
            .unwrap()
            .fit(poles.view())
            .unwrap();
        let mut counts = fit.counts();
        counts.sort_unstable();
        assert_eq!(counts, vec![1, 2]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_one_label_per_row(
            pairs in proptest::collection::vec((0.0f64..360.0, 0.0f64..=90.0), 1..40),
            k in 1usize..5,
            seed in any::<u64>(),
        ) {
            let ms = measurements(&pairs);
            prop_assume!(k <= distinct_rows(&ms));
            let labels = cluster(&ms, k, Some(seed)).unwrap();
            prop_assert_eq!(labels.len(), ms.len());
            prop_assert!(labels.iter().all(|&l| l < k));
        }
    }
}
