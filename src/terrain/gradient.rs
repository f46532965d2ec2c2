//! Finite-difference slope estimate on the sphere grid.

use std::f32::consts::PI;

use rayon::prelude::*;

use crate::geometry::{longitude_chord, SphereMap};

use super::heightmap::{GradientField, Heightmap};

/// How the two directional differences are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientMode {
    /// `(|d_lon| + |d_lat|) / 2`.
    #[default]
    Magnitude,
    /// `(d_lon + d_lat) / 2`, keeping the sign.
    Signed,
}

/// Estimates the local slope of `heightmap`.
///
/// The longitudinal term is the difference to the next column (wrapping at
/// the seam) scaled by the chord length of one longitude step at that
/// latitude. The latitudinal term is the difference to the previous row
/// scaled by the row step `pi / phi_width`. Row 0 has no predecessor and
/// reuses row 1's difference.
pub fn get_gradient(heightmap: &Heightmap, mode: GradientMode) -> GradientField {
    let shape = heightmap.shape();
    let w = shape.theta_width;
    let lat_step = PI / shape.phi_width as f32;
    let theta_step = shape.theta_step();
    let h = heightmap.as_slice();

    let mut out = SphereMap::filled(shape, 0.0f32);
    out.as_mut_slice()
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(row, line)| {
            let chord = longitude_chord(shape.phi(row), theta_step);
            let (upper, lower) = if row == 0 { (0, 1) } else { (row - 1, row) };
            for (col, g) in line.iter_mut().enumerate() {
                let here = h[row * w + col];
                let next = h[row * w + (col + 1) % w];
                let d_lon = (next - here) * chord;
                let d_lat = (h[lower * w + col] - h[upper * w + col]) * lat_step;
                *g = match mode {
                    GradientMode::Magnitude => (d_lon.abs() + d_lat.abs()) / 2.0,
                    GradientMode::Signed => (d_lon + d_lat) / 2.0,
                };
            }
        });
    out
}
