//! Console summary of a clustering run

use colored::Colorize;
use jointset_core::JointSetClustering;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::ingestion::MeasurementTable;

/// One line of the per-set table
#[derive(Tabled)]
struct SetRow {
    #[tabled(rename = "Set")]
    set: usize,
    #[tabled(rename = "n")]
    count: usize,
    #[tabled(rename = "Dip dir")]
    dip_direction: String,
    #[tabled(rename = "Dip")]
    dip_angle: String,
    #[tabled(rename = "R")]
    resultant: String,
}

/// Format a human-readable run summary
pub fn format_summary(table: &MeasurementTable, result: &JointSetClustering) -> String {
    let diag = &result.diagnostics;
    let mut out = String::new();

    out.push_str(&format!(
        "{}\n",
        format!("Joint sets (K={})", result.num_sets()).bold()
    ));
    out.push_str(&format!(
        "  rows: {} kept, {} dropped of {}\n",
        table.stats.kept,
        table.stats.dropped(),
        table.stats.total_rows
    ));
    out.push_str(&format!(
        "  inertia: {:.6}  iterations: {}  converged: {}  best restart: {}/{}  seed: {}\n\n",
        diag.inertia,
        diag.iterations,
        diag.converged,
        diag.best_restart + 1,
        diag.n_init,
        diag.seed
    ));

    let rows = result.summaries.iter().map(|s| SetRow {
        set: s.set,
        count: s.count,
        dip_direction: format!("{:.1}", s.mean_dip_direction),
        dip_angle: format!("{:.1}", s.mean_dip_angle),
        resultant: format!("{:.3}", s.resultant_length),
    });
    out.push_str(&Table::new(rows).with(Style::rounded()).to_string());
    out.push('\n');

    if diag.has_warnings() {
        for warning in &diag.warnings {
            out.push_str(&format!("\n  {} {}", "warning:".yellow().bold(), warning));
        }
        out.push('\n');
    }

    out
}
