//! Per-set statistics

use serde::{Deserialize, Serialize};

use crate::orientation::decode;

/// Summary of one joint set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointSetSummary {
    /// Set label
    pub set: usize,
    /// Number of member measurements
    pub count: usize,
    /// Mean pole vector of the members
    pub centroid: [f64; 3],
    /// Dip direction of the mean pole (degrees)
    pub mean_dip_direction: f64,
    /// Dip angle of the mean pole (degrees)
    pub mean_dip_angle: f64,
    /// Length of the mean pole, 0..1; 1 means every member is parallel
    pub resultant_length: f64,
}

impl JointSetSummary {
    /// Build a summary from a set's centroid and member count
    pub fn from_centroid(set: usize, count: usize, centroid: [f64; 3]) -> Self {
        let (mean_dip_direction, mean_dip_angle) = decode(centroid);
        let resultant_length = if count == 0 {
            0.0
        } else {
            let [x, y, z] = centroid;
            (x * x + y * y + z * z).sqrt()
        };

        Self {
            set,
            count,
            centroid,
            mean_dip_direction,
            mean_dip_angle,
            resultant_length,
        }
    }

    /// Legend text used by plots and reports
    pub fn legend_label(&self) -> String {
        format!("Set {} (n={})", self.set, self.count)
    }
}

/// Summaries for every set, label order
pub fn summarize(labels: &[usize], centroids: &[[f64; 3]]) -> Vec<JointSetSummary> {
    let mut counts = vec![0usize; centroids.len()];
    for &label in labels {
        counts[label] += 1;
    }

    centroids
        .iter()
        .zip(counts)
        .enumerate()
        .map(|(set, (&centroid, count))| JointSetSummary::from_centroid(set, count, centroid))
        .collect()
}
