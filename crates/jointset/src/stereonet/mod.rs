//! Stereonet plotting of classified joints

mod projection;
mod svg;

use serde::{Deserialize, Serialize};

pub use projection::{great_circle, pole_point, project_line, NetPoint};
pub use svg::{render_svg, save_svg, set_color, SET_COLORS};

/// What to draw for each measurement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlotStyle {
    /// One point per plane normal
    #[default]
    Pole,
    /// One great circle per plane
    Plane,
}

impl std::fmt::Display for PlotStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pole => write!(f, "Pole"),
            Self::Plane => write!(f, "Plane"),
        }
    }
}
