//! Longitude/latitude sampling grid over the unit sphere.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TextureError};

/// Converts spherical angles to a point on the unit sphere.
///
/// `theta` is the longitude (azimuth around +Z) and `phi` the polar angle
/// measured from +Z, so `phi = 0` is the north pole.
///
/// # Example
/// ```
/// use planet_texture::geometry::spherical_to_cartesian;
///
/// let p = spherical_to_cartesian(0.0, std::f32::consts::FRAC_PI_2);
/// assert!((p.x - 1.0).abs() < 1e-6);
/// assert!((p.length() - 1.0).abs() < 1e-6);
/// ```
pub fn spherical_to_cartesian(theta: f32, phi: f32) -> Vec3 {
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    Vec3::new(sin_phi * cos_theta, sin_phi * sin_theta, cos_phi)
}

/// Straight-line distance between two neighbouring cells of the same latitude
/// row, one longitude step `theta_step` apart, at polar angle `phi`.
///
/// Shrinks to zero at the poles.
pub fn longitude_chord(phi: f32, theta_step: f32) -> f32 {
    let s = phi.sin();
    let a = s * (theta_step.cos() - 1.0);
    let b = s * theta_step.sin();
    (a * a + b * b).sqrt()
}

/// Grid dimensions, kept separate from the precomputed points so maps can
/// carry their shape cheaply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    /// Number of longitude columns.
    pub theta_width: usize,
    /// Number of latitude rows.
    pub phi_width: usize,
}

impl GridShape {
    pub fn new(theta_width: usize, phi_width: usize) -> Result<Self> {
        if theta_width < 2 || phi_width < 2 {
            return Err(TextureError::config(format!(
                "sphere grid must be at least 2x2, got {}x{}",
                theta_width, phi_width
            )));
        }
        Ok(Self { theta_width, phi_width })
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.theta_width * self.phi_width
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major index of `(row, col)`; rows are latitudes.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.phi_width && col < self.theta_width);
        row * self.theta_width + col
    }

    /// Angular step between longitude columns.
    pub fn theta_step(&self) -> f32 {
        TAU / self.theta_width as f32
    }

    /// Longitude of column `col`, in `[0, 2*pi)`.
    pub fn theta(&self, col: usize) -> f32 {
        col as f32 * self.theta_step()
    }

    /// Polar angle of row `row`, in `[0, pi]` with both poles included.
    pub fn phi(&self, row: usize) -> f32 {
        PI * row as f32 / (self.phi_width - 1) as f32
    }
}

/// The shared sampling domain: one unit vector per longitude/latitude cell.
///
/// Built once per generator and read by every field evaluation, so noise
/// octaves, craters and color noise all land on the same sphere.
#[derive(Debug, Clone)]
pub struct SphereGrid {
    shape: GridShape,
    points: Vec<Vec3>,
}

impl SphereGrid {
    /// Builds a `theta_width` x `phi_width` grid.
    pub fn new(theta_width: usize, phi_width: usize) -> Result<Self> {
        let shape = GridShape::new(theta_width, phi_width)?;
        let mut points = Vec::with_capacity(shape.len());
        for row in 0..shape.phi_width {
            let phi = shape.phi(row);
            for col in 0..shape.theta_width {
                points.push(spherical_to_cartesian(shape.theta(col), phi));
            }
        }
        Ok(Self { shape, points })
    }

    /// Builds a grid with the conventional 2:1 longitude/latitude ratio.
    pub fn with_theta_width(theta_width: usize) -> Result<Self> {
        Self::new(theta_width, theta_width / 2)
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn theta_width(&self) -> usize {
        self.shape.theta_width
    }

    pub fn phi_width(&self) -> usize {
        self.shape.phi_width
    }

    /// Unit vectors in row-major (latitude-row) order.
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn point(&self, row: usize, col: usize) -> Vec3 {
        self.points[self.shape.index(row, col)]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_are_unit_vectors() {
        let grid = SphereGrid::new(16, 9).unwrap();
        assert_eq!(grid.len(), 16 * 9);
        for p in grid.points() {
            assert!((p.length() - 1.0).abs() < 1e-5, "{:?} not on unit sphere", p);
        }
    }

    #[test]
    fn test_poles_and_seam() {
        let grid = SphereGrid::new(8, 5).unwrap();

        // First and last rows collapse onto the poles.
        for col in 0..8 {
            assert!((grid.point(0, col).z - 1.0).abs() < 1e-6);
            assert!((grid.point(4, col).z + 1.0).abs() < 1e-6);
        }

        // Longitude covers a full turn without repeating the seam column.
        let shape = grid.shape();
        assert_eq!(shape.theta(0), 0.0);
        assert!(shape.theta(7) < TAU);
        assert!((shape.theta(7) + shape.theta_step() - TAU).abs() < 1e-5);
    }

    #[test]
    fn test_default_ratio() {
        let grid = SphereGrid::with_theta_width(200).unwrap();
        assert_eq!(grid.theta_width(), 200);
        assert_eq!(grid.phi_width(), 100);
    }

    #[test]
    fn test_rejects_tiny_grid() {
        assert!(matches!(
            SphereGrid::new(1, 4),
            Err(TextureError::Configuration(_))
        ));
        assert!(SphereGrid::with_theta_width(3).is_err());
    }

    #[test]
    fn test_longitude_chord_vanishes_at_poles() {
        let step = TAU / 64.0;
        assert!(longitude_chord(0.0, step).abs() < 1e-6);
        assert!(longitude_chord(PI, step).abs() < 1e-5);

        let equator = longitude_chord(PI / 2.0, step);
        let expected = 2.0 * (step / 2.0).sin();
        assert!((equator - expected).abs() < 1e-6);
        assert!(longitude_chord(PI / 4.0, step) < equator);
    }
}
