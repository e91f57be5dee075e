//! SVG rendering of a classified stereonet

use jointset_core::{JointSetSummary, Measurement};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

use super::projection::{great_circle, pole_point, NetPoint};
use super::PlotStyle;
use crate::config::{PlotConfig, MAX_SETS};
use crate::error::{Error, Result};

/// Qualitative palette (Set1 plus cyan), one colour per set
pub const SET_COLORS: [RGBColor; MAX_SETS] = [
    RGBColor(0xe4, 0x1a, 0x1c),
    RGBColor(0x37, 0x7e, 0xb8),
    RGBColor(0x4d, 0xaf, 0x4a),
    RGBColor(0x98, 0x4e, 0xa3),
    RGBColor(0xff, 0x7f, 0x00),
    RGBColor(0xff, 0xff, 0x33),
    RGBColor(0xa6, 0x56, 0x28),
    RGBColor(0xf7, 0x81, 0xbf),
    RGBColor(0x99, 0x99, 0x99),
    RGBColor(0x17, 0xbe, 0xcf),
];

/// Colour of a set; cycles if a caller goes past `MAX_SETS`
pub fn set_color(set: usize) -> RGBColor {
    SET_COLORS[set % SET_COLORS.len()]
}

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;
type DrawResult = std::result::Result<(), DrawingAreaErrorKind<std::io::Error>>;

struct Frame {
    cx: f64,
    cy: f64,
    radius: f64,
}

impl Frame {
    fn new(size: f64) -> Self {
        Self {
            cx: size / 2.0,
            cy: size * 0.48,
            radius: size * 0.38,
        }
    }

    fn map(&self, p: NetPoint) -> (i32, i32) {
        (
            (self.cx + p.x * self.radius).round() as i32,
            (self.cy - p.y * self.radius).round() as i32,
        )
    }

    fn at(&self, dx: f64, dy: f64) -> (i32, i32) {
        ((self.cx + dx).round() as i32, (self.cy + dy).round() as i32)
    }
}

/// Render every measurement coloured by its set, with a legend
pub fn render_svg(
    measurements: &[Measurement],
    labels: &[usize],
    summaries: &[JointSetSummary],
    config: &PlotConfig,
) -> Result<String> {
    let mut buf = String::new();
    {
        let root =
            SVGBackend::with_string(&mut buf, (config.size_px, config.size_px)).into_drawing_area();
        draw_stereonet(&root, measurements, labels, summaries, config)
            .and_then(|_| root.present())
            .map_err(|e| Error::plot(e.to_string()))?;
    }
    Ok(buf)
}

fn draw_stereonet(
    root: &Area<'_>,
    measurements: &[Measurement],
    labels: &[usize],
    summaries: &[JointSetSummary],
    config: &PlotConfig,
) -> DrawResult {
    let size = config.size_px as f64;
    let frame = Frame::new(size);

    root.fill(&WHITE)?;
    root.draw(&Text::new(
        format!("K={} ({} Plot)", summaries.len(), config.style),
        (frame.cx.round() as i32, (size * 0.05).round() as i32),
        ("sans-serif", size * 0.03)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center)),
    ))?;

    draw_net(root, &frame)?;

    let marker = (size * 0.007).round().max(2.0) as i32;
    for (m, &label) in measurements.iter().zip(labels) {
        let color = set_color(label);
        match config.style {
            PlotStyle::Pole => {
                root.draw(&Circle::new(
                    frame.map(pole_point(m)),
                    marker,
                    color.mix(0.7).filled(),
                ))?;
            }
            PlotStyle::Plane => {
                let points: Vec<(i32, i32)> = great_circle(m, config.great_circle_samples)
                    .into_iter()
                    .map(|p| frame.map(p))
                    .collect();
                root.draw(&PathElement::new(points, color.mix(0.5).stroke_width(1)))?;
            }
        }
    }

    draw_legend(root, &frame, size, summaries)
}

/// Primitive circle, 10° ticks, centre cross and north label
fn draw_net(root: &Area<'_>, frame: &Frame) -> DrawResult {
    root.draw(&Circle::new(
        frame.at(0.0, 0.0),
        frame.radius.round() as i32,
        BLACK.stroke_width(1),
    ))?;

    for deg in (0..360).step_by(10) {
        let (s, c) = (deg as f64).to_radians().sin_cos();
        let inner = if deg % 90 == 0 { 0.94 } else { 0.97 };
        root.draw(&PathElement::new(
            vec![
                frame.at(s * frame.radius * inner, -c * frame.radius * inner),
                frame.at(s * frame.radius, -c * frame.radius),
            ],
            BLACK.stroke_width(1),
        ))?;
    }

    let arm = frame.radius * 0.03;
    root.draw(&PathElement::new(
        vec![frame.at(-arm, 0.0), frame.at(arm, 0.0)],
        BLACK.stroke_width(1),
    ))?;
    root.draw(&PathElement::new(
        vec![frame.at(0.0, -arm), frame.at(0.0, arm)],
        BLACK.stroke_width(1),
    ))?;

    root.draw(&Text::new(
        "N",
        frame.at(0.0, -frame.radius - 8.0),
        ("sans-serif", 14.0)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Bottom)),
    ))
}

fn draw_legend(
    root: &Area<'_>,
    frame: &Frame,
    size: f64,
    summaries: &[JointSetSummary],
) -> DrawResult {
    let x = size * 0.03;
    let top = frame.cy + frame.radius + size * 0.04;
    let line = size * 0.025;

    root.draw(&Text::new(
        "Joint Sets",
        (x.round() as i32, top.round() as i32),
        ("sans-serif", 14.0, FontStyle::Bold)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Bottom)),
    ))?;

    // wraps into another column at the bottom edge
    let column_width = size * 0.2;
    let mut column = 0.0;
    let mut y = top;
    for summary in summaries {
        y += line;
        if y > size - line * 0.5 {
            column += column_width;
            y = top + line;
        }
        root.draw(&Circle::new(
            ((x + column + 5.0).round() as i32, (y - 4.0).round() as i32),
            4,
            set_color(summary.set).filled(),
        ))?;
        root.draw(&Text::new(
            summary.legend_label(),
            ((x + column + 14.0).round() as i32, y.round() as i32),
            ("sans-serif", 13.0)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Left, VPos::Bottom)),
        ))?;
    }

    Ok(())
}

/// Render and write an SVG file
pub fn save_svg(
    path: impl AsRef<Path>,
    measurements: &[Measurement],
    labels: &[usize],
    summaries: &[JointSetSummary],
    config: &PlotConfig,
) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, render_svg(measurements, labels, summaries, config)?)?;
    tracing::info!("Wrote {} stereonet to {}", config.style, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jointset_core::{encode, summarize};
    use std::collections::HashSet;

    fn fixture() -> (Vec<Measurement>, Vec<usize>, Vec<JointSetSummary>) {
        let ms = vec![
            Measurement::new(90.0, 45.0),
            Measurement::new(92.0, 44.0),
            Measurement::new(270.0, 46.0),
        ];
        let labels = vec![0, 0, 1];
        let summaries = summarize(&labels, &[encode(91.0, 44.5), encode(270.0, 46.0)]);
        (ms, labels, summaries)
    }

    fn hex(color: RGBColor) -> String {
        let (r, g, b) = color.rgb();
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }

    #[test]
    fn test_pole_plot_has_one_marker_per_row_and_legend() {
        let (ms, labels, summaries) = fixture();
        let svg = render_svg(&ms, &labels, &summaries, &PlotConfig::default()).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("opacity=\"0.7\"").count(), 3);
        assert!(svg.contains("Set 0 (n=2)"));
        assert!(svg.contains("Set 1 (n=1)"));
        assert!(svg.contains("Joint Sets"));
        assert!(svg.contains("K=2 (Pole Plot)"));
    }

    #[test]
    fn test_plane_plot_draws_great_circles() {
        let (ms, labels, summaries) = fixture();
        let config = PlotConfig {
            style: PlotStyle::Plane,
            ..PlotConfig::default()
        };
        let svg = render_svg(&ms, &labels, &summaries, &config).unwrap();

        assert_eq!(svg.matches("opacity=\"0.5\"").count(), 3);
        assert!(svg.contains(&hex(SET_COLORS[1])));
        assert!(svg.contains("K=2 (Plane Plot)"));
    }

    #[test]
    fn test_palette_is_distinct_up_to_max_sets() {
        let distinct: HashSet<(u8, u8, u8)> = SET_COLORS.iter().map(|c| c.rgb()).collect();
        assert_eq!(distinct.len(), MAX_SETS);
    }

    #[test]
    fn test_first_and_last_of_ten_sets_differ() {
        let ms: Vec<Measurement> = (0..10)
            .map(|i| Measurement::new(i as f64 * 36.0, 20.0 + i as f64 * 7.0))
            .collect();
        let labels: Vec<usize> = (0..10).collect();
        let centroids: Vec<[f64; 3]> = ms
            .iter()
            .map(|m| encode(m.dip_direction, m.dip_angle))
            .collect();
        let summaries = summarize(&labels, &centroids);
        let svg = render_svg(&ms, &labels, &summaries, &PlotConfig::default()).unwrap();

        assert_ne!(set_color(0), set_color(9));
        assert!(svg.contains(&hex(set_color(0))));
        assert!(svg.contains(&hex(set_color(9))));
        assert!(svg.contains("Set 9 (n=1)"));
    }
}
