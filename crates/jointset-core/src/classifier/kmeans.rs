//! Lloyd's k-means over 3-D pole vectors
//!
//! Contains seeded k-means++ initialisation, the assignment and update
//! steps, empty-cluster recovery and inertia.

use rand::Rng;
use std::collections::HashSet;

use super::types::LloydRun;

/// Squared Euclidean distance between two 3-D vectors
#[inline]
pub fn squared_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

/// Number of distinct vectors, comparing exact bit patterns (`-0.0 == 0.0`)
pub fn count_distinct(points: &[[f64; 3]]) -> usize {
    points
        .iter()
        .map(|p| p.map(|v| (v + 0.0).to_bits()))
        .collect::<HashSet<_>>()
        .len()
}

/// k-means++ initialisation.
///
/// The first centre is a uniformly drawn point; each further centre is drawn
/// with probability proportional to its squared distance from the nearest
/// centre so far. When every remaining point coincides with a centre the
/// draw falls back to uniform, which yields coincident centroids.
pub fn kmeans_plus_plus_init<R: Rng + ?Sized>(
    points: &[[f64; 3]],
    k: usize,
    rng: &mut R,
) -> Vec<[f64; 3]> {
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..n)]);

    let mut min_distances = vec![f64::INFINITY; n];

    while centroids.len() < k {
        let last = centroids[centroids.len() - 1];
        for (d, p) in min_distances.iter_mut().zip(points) {
            *d = d.min(squared_distance(p, &last));
        }

        let total: f64 = min_distances.iter().sum();
        let next = if total > 0.0 {
            let target = rng.gen::<f64>() * total;
            let mut cumulative = 0.0;
            let mut chosen = None;
            for (i, &d) in min_distances.iter().enumerate() {
                cumulative += d;
                if d > 0.0 && cumulative > target {
                    chosen = Some(i);
                    break;
                }
            }
            // Rounding can leave `target` just past the final sum
            chosen.unwrap_or_else(|| {
                min_distances
                    .iter()
                    .rposition(|&d| d > 0.0)
                    .unwrap_or(n - 1)
            })
        } else {
            rng.gen_range(0..n)
        };

        centroids.push(points[next]);
    }

    centroids
}

/// Assign every point to its nearest centroid; ties go to the lower index.
///
/// Returns whether any label changed.
pub fn assign(points: &[[f64; 3]], centroids: &[[f64; 3]], labels: &mut [usize]) -> bool {
    let mut changed = false;
    for (label, p) in labels.iter_mut().zip(points) {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (j, c) in centroids.iter().enumerate() {
            let d = squared_distance(p, c);
            if d < best_dist {
                best_dist = d;
                best = j;
            }
        }
        if *label != best {
            *label = best;
            changed = true;
        }
    }
    changed
}

fn means(points: &[[f64; 3]], labels: &[usize], k: usize) -> (Vec<[f64; 3]>, Vec<usize>) {
    let mut sums = vec![[0.0f64; 3]; k];
    let mut counts = vec![0usize; k];

    for (p, &label) in points.iter().zip(labels) {
        counts[label] += 1;
        for d in 0..3 {
            sums[label][d] += p[d];
        }
    }

    for (sum, &count) in sums.iter_mut().zip(&counts) {
        if count > 0 {
            for v in sum.iter_mut() {
                *v /= count as f64;
            }
        }
    }

    (sums, counts)
}

/// Recompute centroids as member means.
///
/// A cluster left empty takes over the point farthest from its own
/// centroid among clusters with more than one member (lowest row index on
/// ties); `labels` is updated to match.
pub fn update_centroids(points: &[[f64; 3]], labels: &mut [usize], k: usize) -> Vec<[f64; 3]> {
    let (centroids, mut counts) = means(points, labels, k);
    if counts.iter().all(|&c| c > 0) {
        return centroids;
    }

    for empty in 0..k {
        if counts[empty] > 0 {
            continue;
        }

        let donor = points
            .iter()
            .enumerate()
            .filter(|(i, _)| counts[labels[*i]] > 1)
            .map(|(i, p)| (i, squared_distance(p, &centroids[labels[i]])))
            .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
                Some((_, best_d)) if best_d >= d => best,
                _ => Some((i, d)),
            });

        if let Some((i, _)) = donor {
            counts[labels[i]] -= 1;
            labels[i] = empty;
            counts[empty] = 1;
        }
    }

    means(points, labels, k).0
}

/// Within-cluster sum of squared distances
pub fn inertia(points: &[[f64; 3]], labels: &[usize], centroids: &[[f64; 3]]) -> f64 {
    points
        .iter()
        .zip(labels)
        .map(|(p, &label)| squared_distance(p, &centroids[label]))
        .sum()
}

/// One Lloyd run from a k-means++ start.
///
/// Stops when labels stop changing, when the total squared centroid shift
/// drops to `tolerance`, or after `max_iterations`.
pub(crate) fn lloyd<R: Rng + ?Sized>(
    points: &[[f64; 3]],
    k: usize,
    max_iterations: usize,
    tolerance: f64,
    rng: &mut R,
) -> LloydRun {
    let mut centroids = kmeans_plus_plus_init(points, k, rng);
    let mut labels = vec![0usize; points.len()];
    let mut iterations = 0;
    let mut converged = false;

    for iter in 0..max_iterations {
        iterations = iter + 1;

        let changed = assign(points, &centroids, &mut labels);
        if iter > 0 && !changed {
            converged = true;
            break;
        }

        let updated = update_centroids(points, &mut labels, k);
        let shift: f64 = centroids
            .iter()
            .zip(&updated)
            .map(|(old, new)| squared_distance(old, new))
            .sum();
        centroids = updated;

        if shift <= tolerance {
            converged = true;
            break;
        }
    }

    let inertia = inertia(points, &labels, &centroids);

    LloydRun {
        labels,
        centroids,
        inertia,
        iterations,
        converged,
    }
}
