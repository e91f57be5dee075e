//! Joint-set classifier CLI
//!
//! Run with: cargo run -p jointset -- joints.csv -k 3

use anyhow::Context;
use clap::{Parser, ValueEnum};
use jointset::{config::MAX_SETS, report, run, JointSetConfig, PlotStyle};
use jointset_core::LabelOrder;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LabelOrderArg {
    AsFound,
    ByDip,
}

impl From<LabelOrderArg> for LabelOrder {
    fn from(arg: LabelOrderArg) -> Self {
        match arg {
            LabelOrderArg::AsFound => LabelOrder::AsFound,
            LabelOrderArg::ByDip => LabelOrder::ByDip,
        }
    }
}

/// Classify dip / dip-direction measurements into joint sets
#[derive(Debug, Parser)]
#[command(name = "jointset", version, about)]
struct Cli {
    /// Measurement file (.csv or .xlsx) with "dip direction" and "dip angle" columns
    input: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of joint sets
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=MAX_SETS as i64))]
    k: Option<u32>,

    /// Seed for reproducible clustering
    #[arg(long, conflicts_with = "unseeded")]
    seed: Option<u64>,

    /// Draw a fresh seed from the OS (reported in the output)
    #[arg(long)]
    unseeded: bool,

    /// Independent k-means initialisations
    #[arg(long)]
    n_init: Option<usize>,

    /// Plot poles or planes
    #[arg(long, value_enum)]
    style: Option<PlotStyle>,

    /// Set numbering policy
    #[arg(long, value_enum)]
    label_order: Option<LabelOrderArg>,

    /// Directory for output files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Skip the stereonet SVG
    #[arg(long)]
    no_plot: bool,

    /// Write a JSON run report next to the CSV
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<(PathBuf, JointSetConfig)> {
        let mut config = match &self.config {
            Some(path) => JointSetConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => JointSetConfig::default(),
        };

        if let Some(k) = self.k {
            config.clustering.k = k as usize;
        }
        if let Some(seed) = self.seed {
            config.clustering.seed = Some(seed);
        }
        if self.unseeded {
            config.clustering.seed = None;
        }
        if let Some(n_init) = self.n_init {
            config.clustering.n_init = n_init;
        }
        if let Some(style) = self.style {
            config.plot.style = style;
        }
        if let Some(order) = self.label_order {
            config.clustering.label_order = order.into();
        }
        if let Some(dir) = self.output_dir {
            config.output.directory = dir;
        }
        if self.no_plot {
            config.plot.enabled = false;
        }
        if self.json {
            config.output.json_report = true;
        }

        Ok((self.input, config))
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jointset=info,jointset_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let (input, config) = Cli::parse().into_config()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Joint sets (k): {}", config.clustering.k);
    tracing::info!("  - Restarts: {}", config.clustering.n_init);
    tracing::info!("  - Plot style: {}", config.plot.style);

    let outcome = run(&input, &config)
        .with_context(|| format!("classifying {}", input.display()))?;

    println!("{}", report::format_summary(&outcome.table, &outcome.clustering));
    println!("Labelled data: {}", outcome.outputs.labeled_csv.display());
    if let Some(path) = &outcome.outputs.stereonet {
        println!("Stereonet:     {}", path.display());
    }
    if let Some(path) = &outcome.outputs.report {
        println!("Run report:    {}", path.display());
    }

    Ok(())
}
