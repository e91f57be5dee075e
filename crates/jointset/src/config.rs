//! Configuration for the joint-set tool
//!
//! Loaded from TOML; every field is optional and falls back to its default.
//!
//! ```toml
//! [clustering]
//! k = 4
//! seed = 7
//! label_order = "by-dip"
//!
//! [plot]
//! style = "plane"
//!
//! [output]
//! directory = "out"
//! ```

use jointset_core::ClassifierConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::stereonet::PlotStyle;

/// Largest joint-set count offered to users
pub const MAX_SETS: usize = 10;

/// Main tool configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JointSetConfig {
    /// Clustering run parameters
    pub clustering: ClassifierConfig,
    /// Stereonet rendering
    pub plot: PlotConfig,
    /// Output locations
    pub output: OutputConfig,
}

/// Stereonet rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Poles (points) or planes (great circles)
    pub style: PlotStyle,
    /// Square image size in pixels
    pub size_px: u32,
    /// Samples per great circle
    pub great_circle_samples: usize,
    /// Write the SVG at all
    pub enabled: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            style: PlotStyle::Pole,
            size_px: 700,
            great_circle_samples: 181,
            enabled: true,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for exported files
    pub directory: PathBuf,
    /// File name stem; defaults to the input file's stem
    pub stem: Option<String>,
    /// Also write a JSON run report
    pub json_report: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            stem: None,
            json_report: false,
        }
    }
}

impl JointSetConfig {
    /// Parse a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Check ranges the core does not know about, then the core's own rules
    pub fn validate(&self) -> Result<()> {
        if self.clustering.k > MAX_SETS {
            return Err(Error::invalid_configuration(format!(
                "k must be between 1 and {} (got {})",
                MAX_SETS, self.clustering.k
            )));
        }
        if self.plot.size_px < 100 {
            return Err(Error::invalid_configuration(format!(
                "plot.size_px must be >= 100 (got {})",
                self.plot.size_px
            )));
        }
        if self.plot.great_circle_samples < 2 {
            return Err(Error::invalid_configuration(
                "plot.great_circle_samples must be >= 2",
            ));
        }
        self.clustering.validate()?;
        Ok(())
    }

    /// File stem for outputs derived from `input`
    pub fn output_stem(&self, input: &Path) -> String {
        self.output.stem.clone().unwrap_or_else(|| {
            input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "joints".to_string())
        })
    }
}
