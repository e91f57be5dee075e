//! Equal-area (Schmidt) lower-hemisphere projection
//!
//! Coordinates are on the unit primitive circle: `x` east, `y` north.

use jointset_core::Measurement;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, SQRT_2};

/// A projected point on the net
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetPoint {
    pub x: f64,
    pub y: f64,
}

impl NetPoint {
    /// Distance from the net centre
    pub fn radius(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Project a line given by trend and plunge (degrees).
///
/// Upward-plunging lines are flipped to their lower-hemisphere opposite.
pub fn project_line(trend: f64, plunge: f64) -> NetPoint {
    let (trend, plunge) = if plunge < 0.0 {
        (trend + 180.0, -plunge)
    } else {
        (trend, plunge)
    };

    let r = SQRT_2 * ((90.0 - plunge) / 2.0).to_radians().sin();
    let (sin_t, cos_t) = trend.to_radians().sin_cos();
    NetPoint {
        x: r * sin_t,
        y: r * cos_t,
    }
}

/// Pole of a plane: trend `dd + 180`, plunge `90 - dip`
pub fn pole_point(m: &Measurement) -> NetPoint {
    project_line(
        (m.dip_direction + 180.0).rem_euclid(360.0),
        90.0 - m.dip_angle,
    )
}

/// Great-circle trace of a plane, strike to strike, `samples` points
pub fn great_circle(m: &Measurement, samples: usize) -> Vec<NetPoint> {
    let samples = samples.max(2);
    let (sin_s, cos_s) = m.strike().to_radians().sin_cos();
    let (sin_dd, cos_dd) = m.dip_direction.to_radians().sin_cos();
    let (sin_dip, cos_dip) = m.dip_angle.to_radians().sin_cos();

    // (east, north, down) unit vectors spanning the plane
    let strike_vec = [sin_s, cos_s, 0.0];
    let dip_vec = [cos_dip * sin_dd, cos_dip * cos_dd, sin_dip];

    (0..samples)
        .map(|i| {
            let a = PI * i as f64 / (samples - 1) as f64;
            let (sin_a, cos_a) = a.sin_cos();
            let e = cos_a * strike_vec[0] + sin_a * dip_vec[0];
            let n = cos_a * strike_vec[1] + sin_a * dip_vec[1];
            let d = cos_a * strike_vec[2] + sin_a * dip_vec[2];

            let trend = e.atan2(n).to_degrees();
            let plunge = d.clamp(-1.0, 1.0).asin().to_degrees();
            project_line(trend, plunge)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: NetPoint, x: f64, y: f64) -> bool {
        (a.x - x).abs() < 1e-9 && (a.y - y).abs() < 1e-9
    }

    #[test]
    fn test_vertical_line_projects_to_centre() {
        assert!(close(project_line(123.0, 90.0), 0.0, 0.0));
    }

    #[test]
    fn test_horizontal_line_on_primitive() {
        assert!(close(project_line(90.0, 0.0), 1.0, 0.0));
        assert!(close(project_line(0.0, 0.0), 0.0, 1.0));
    }

    #[test]
    fn test_upward_line_flips() {
        let down = project_line(200.0, 30.0);
        let up = project_line(20.0, -30.0);
        assert!(close(up, down.x, down.y));
    }

    #[test]
    fn test_pole_of_horizontal_plane_is_centre() {
        assert!(pole_point(&Measurement::new(250.0, 0.0)).radius() < 1e-12);
    }

    #[test]
    fn test_pole_of_vertical_plane_opposite_dip_direction() {
        // Dips east, pole plots on the west edge
        let p = pole_point(&Measurement::new(90.0, 90.0));
        assert!(close(p, -1.0, 0.0));
    }

    #[test]
    fn test_great_circle_ends_on_primitive() {
        let trace = great_circle(&Measurement::new(135.0, 40.0), 91);
        assert_eq!(trace.len(), 91);
        assert!((trace[0].radius() - 1.0).abs() < 1e-9);
        assert!((trace[90].radius() - 1.0).abs() < 1e-9);

        // Midpoint is the dip line itself
        let mid = project_line(135.0, 40.0);
        assert!(close(trace[45], mid.x, mid.y));
    }
}
