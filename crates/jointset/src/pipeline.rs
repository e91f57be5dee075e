//! End-to-end run: ingest, classify, export, plot

use jointset_core::{cluster_with, JointSetClustering};
use std::path::{Path, PathBuf};

use crate::config::JointSetConfig;
use crate::error::Result;
use crate::export::{save_labeled_csv, save_report, RunReport};
use crate::ingestion::{MeasurementTable, TableReader};
use crate::stereonet::save_svg;

/// Files written by a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOutputs {
    pub labeled_csv: PathBuf,
    pub stereonet: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub table: MeasurementTable,
    pub clustering: JointSetClustering,
    pub outputs: RunOutputs,
}

/// Classify the measurements in `input` and write all configured outputs
pub fn run(input: &Path, config: &JointSetConfig) -> Result<RunOutcome> {
    config.validate()?;

    let table = TableReader::read_path(input)?;
    let clustering = cluster_with(&table.measurements, &config.clustering)?;

    std::fs::create_dir_all(&config.output.directory)?;
    let stem = config.output_stem(input);
    let dir = &config.output.directory;

    let labeled_csv = dir.join(format!("{}_joint_sets.csv", stem));
    save_labeled_csv(&labeled_csv, &table.measurements, &clustering.labels)?;

    let stereonet = if config.plot.enabled {
        let path = dir.join(format!("{}_stereonet.svg", stem));
        save_svg(
            &path,
            &table.measurements,
            &clustering.labels,
            &clustering.summaries,
            &config.plot,
        )?;
        Some(path)
    } else {
        None
    };

    let report = if config.output.json_report {
        let path = dir.join(format!("{}_report.json", stem));
        save_report(
            &path,
            &RunReport {
                input: input.display().to_string(),
                config: &config.clustering,
                ingestion: &table.stats,
                diagnostics: &clustering.diagnostics,
                summaries: &clustering.summaries,
            },
        )?;
        Some(path)
    } else {
        None
    };

    Ok(RunOutcome {
        table,
        clustering,
        outputs: RunOutputs {
            labeled_csv,
            stereonet,
            report,
        },
    })
}
