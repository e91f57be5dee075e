//! Orientation encoding
//!
//! Maps a plane given as (dip direction, dip angle) onto its pole: a unit
//! vector normal to the plane, treated as a point on the unit sphere so that
//! ordinary Euclidean clustering groups planes of similar attitude.
//!
//! Strike follows the right-hand rule (`strike = dip direction - 90`).
//! No validation happens here; callers drop non-finite rows beforehand.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// A single structural discontinuity measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Azimuth of the dip vector, degrees clockwise from north
    pub dip_direction: f64,
    /// Angle of the plane from horizontal, degrees (0-90)
    pub dip_angle: f64,
}

impl Measurement {
    pub fn new(dip_direction: f64, dip_angle: f64) -> Self {
        Self {
            dip_direction,
            dip_angle,
        }
    }

    /// Right-hand-rule strike in [0, 360)
    pub fn strike(&self) -> f64 {
        (self.dip_direction - 90.0).rem_euclid(360.0)
    }

    /// Pole vector of this plane
    #[inline]
    pub fn pole(&self) -> [f64; 3] {
        encode(self.dip_direction, self.dip_angle)
    }

    /// Both values are finite numbers
    pub fn is_finite(&self) -> bool {
        self.dip_direction.is_finite() && self.dip_angle.is_finite()
    }
}

impl From<(f64, f64)> for Measurement {
    fn from((dip_direction, dip_angle): (f64, f64)) -> Self {
        Self::new(dip_direction, dip_angle)
    }
}

/// Encode (dip direction, dip angle) in degrees as a pole vector `[nx, ny, nz]`.
///
/// A horizontal plane (`dip = 0`) maps to `(0, 0, 1)` whatever its dip
/// direction.
#[inline]
pub fn encode(dip_direction: f64, dip_angle: f64) -> [f64; 3] {
    let dip_rad = dip_angle.to_radians();
    let strike_rad = (dip_direction - 90.0).rem_euclid(360.0).to_radians();

    let (sin_dip, cos_dip) = dip_rad.sin_cos();
    let (sin_strike, cos_strike) = strike_rad.sin_cos();

    [sin_dip * sin_strike, sin_dip * cos_strike, cos_dip]
}

/// Encode every measurement into an `(n, 3)` pole matrix, row order preserved
pub fn encode_all(measurements: &[Measurement]) -> Array2<f64> {
    let mut poles = Array2::zeros((measurements.len(), 3));
    for (mut row, m) in poles.rows_mut().into_iter().zip(measurements) {
        let [nx, ny, nz] = m.pole();
        row[0] = nx;
        row[1] = ny;
        row[2] = nz;
    }
    poles
}

/// Recover (dip direction, dip angle) from a pole-like vector.
///
/// The vector is normalised first, so cluster centroids (which sit inside
/// the sphere) decode to their mean orientation. A zero vector decodes to
/// `(0, 0)`, as does any vertical pole.
pub fn decode(vector: [f64; 3]) -> (f64, f64) {
    let [x, y, z] = vector;
    let norm = (x * x + y * y + z * z).sqrt();
    if norm == 0.0 || !norm.is_finite() {
        return (0.0, 0.0);
    }

    let (x, y, z) = (x / norm, y / norm, z / norm);
    let dip_angle = z.clamp(-1.0, 1.0).acos().to_degrees();

    if x.hypot(y) < 1e-12 {
        return (0.0, dip_angle);
    }

    let strike = x.atan2(y).to_degrees();
    let dip_direction = (strike + 90.0).rem_euclid(360.0);
    (dip_direction, dip_angle)
}
