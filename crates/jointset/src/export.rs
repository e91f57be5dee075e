//! Labelled CSV and JSON report writers

use jointset_core::{ClassifierConfig, ClusteringDiagnostics, JointSetSummary, Measurement};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};
use crate::ingestion::{IngestionStats, DIP_ANGLE_COLUMN, DIP_DIRECTION_COLUMN};

/// Header of the label column in exported CSV
pub const JOINT_SET_COLUMN: &str = "joint_set";

/// Write `dip direction,dip angle,joint_set` rows in input order
pub fn write_labeled_csv<W: Write>(
    writer: W,
    measurements: &[Measurement],
    labels: &[usize],
) -> Result<()> {
    if measurements.len() != labels.len() {
        return Err(Error::invalid_configuration(format!(
            "{} measurements but {} labels",
            measurements.len(),
            labels.len()
        )));
    }

    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record([DIP_DIRECTION_COLUMN, DIP_ANGLE_COLUMN, JOINT_SET_COLUMN])?;
    for (m, label) in measurements.iter().zip(labels) {
        csv.write_record([
            m.dip_direction.to_string(),
            m.dip_angle.to_string(),
            label.to_string(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the labelled CSV to a file
pub fn save_labeled_csv(
    path: impl AsRef<Path>,
    measurements: &[Measurement],
    labels: &[usize],
) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)?;
    write_labeled_csv(std::io::BufWriter::new(file), measurements, labels)?;
    tracing::info!("Wrote labelled data to {}", path.display());
    Ok(())
}

/// Everything a run produced, for machine-readable export
#[derive(Debug, Clone, Serialize)]
pub struct RunReport<'a> {
    pub input: String,
    pub config: &'a ClassifierConfig,
    pub ingestion: &'a IngestionStats,
    pub diagnostics: &'a ClusteringDiagnostics,
    pub summaries: &'a [JointSetSummary],
}

/// Write a pretty-printed JSON run report
pub fn save_report(path: impl AsRef<Path>, report: &RunReport<'_>) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    tracing::info!("Wrote run report to {}", path.display());
    Ok(())
}
