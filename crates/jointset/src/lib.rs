//! jointset: classify joint measurements into joint sets
//!
//! Thin collaborators around `jointset-core`: CSV / XLSX ingestion, TOML
//! configuration, labelled exports, stereonet SVG plots and a console
//! report. The `jointset` binary wires them together.

pub mod config;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod pipeline;
pub mod report;
pub mod stereonet;

pub use config::JointSetConfig;
pub use error::{Error, Result};
pub use ingestion::{MeasurementTable, TableReader};
pub use pipeline::{run, RunOutcome, RunOutputs};
pub use stereonet::PlotStyle;

/// Re-export jointset-core for convenience
pub use jointset_core;
