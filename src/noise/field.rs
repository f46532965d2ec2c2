//! Continuous sampling of a regular 3D grid of random values.

use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::Grid3;
use crate::error::{Result, TextureError};
use crate::geometry::{SphereGrid, SphereMap};

/// Lower bound of every field axis.
pub const DOMAIN_MIN: f32 = -1.0;
/// Upper bound of every field axis.
pub const DOMAIN_MAX: f32 = 1.0;

/// How values between grid nodes are reconstructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Value of the closest grid node.
    Nearest,
    /// Trilinear blend of the eight surrounding nodes.
    #[default]
    Linear,
    /// Trilinear blend with quintic `6t^5 - 15t^4 + 10t^3` weights.
    Quintic,
}

#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

/// Position of a coordinate along one axis: the lower node and the fraction
/// towards the next one.
#[inline]
fn locate(coord: f32, nodes: usize) -> (usize, f32) {
    let t = (coord - DOMAIN_MIN) / (DOMAIN_MAX - DOMAIN_MIN) * (nodes - 1) as f32;
    let i = (t.floor().max(0.0) as usize).min(nodes - 2);
    (i, (t - i as f32).clamp(0.0, 1.0))
}

/// A 3D grid of values over `[-1, 1]^3` that can be evaluated anywhere inside
/// that cube.
///
/// Immutable after construction.
#[derive(Debug, Clone)]
pub struct NoiseField {
    grid: Grid3,
    interpolation: Interpolation,
}

impl NoiseField {
    /// Builds a field of standard-normal samples, scaled down by the largest
    /// resolution so finer octaves carry proportionally less energy.
    pub fn random(resolution: [usize; 3], interpolation: Interpolation, rng: &mut ChaCha8Rng) -> Result<Self> {
        validate_resolution(resolution)?;
        let scale = 1.0 / *resolution.iter().max().unwrap_or(&1) as f32;
        let grid = Grid3::random_normal(resolution, scale, rng);
        Ok(Self { grid, interpolation })
    }

    /// Same as [`NoiseField::random`] with one resolution on all three axes.
    pub fn cube(resolution: usize, interpolation: Interpolation, rng: &mut ChaCha8Rng) -> Result<Self> {
        Self::random([resolution; 3], interpolation, rng)
    }

    /// Cubic field with its own generator seeded from `seed`.
    pub fn seeded(resolution: usize, interpolation: Interpolation, seed: u64) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::cube(resolution, interpolation, &mut rng)
    }

    /// Wraps precomputed values (e.g. a crater volume) as a sampler.
    pub fn from_grid(grid: Grid3, interpolation: Interpolation) -> Result<Self> {
        validate_resolution(grid.shape())?;
        Ok(Self { grid, interpolation })
    }

    pub fn grid(&self) -> &Grid3 {
        &self.grid
    }

    pub fn resolution(&self) -> [usize; 3] {
        self.grid.shape()
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Coordinate of node `i` along an axis with `nodes` nodes.
    pub fn axis_coord(i: usize, nodes: usize) -> f32 {
        DOMAIN_MIN + (DOMAIN_MAX - DOMAIN_MIN) * i as f32 / (nodes - 1) as f32
    }

    /// Evaluates the field at one point.
    pub fn sample(&self, p: Vec3) -> Result<f32> {
        let coords = p.to_array();
        if coords.iter().any(|c| !(DOMAIN_MIN..=DOMAIN_MAX).contains(c)) {
            return Err(TextureError::Domain {
                point: coords,
                lo: DOMAIN_MIN,
                hi: DOMAIN_MAX,
            });
        }

        let [nx, ny, nz] = self.grid.shape();
        let (i, tx) = locate(p.x, nx);
        let (j, ty) = locate(p.y, ny);
        let (k, tz) = locate(p.z, nz);

        let (tx, ty, tz) = match self.interpolation {
            Interpolation::Nearest => {
                let pick = |t: f32| if t >= 0.5 { 1.0 } else { 0.0 };
                (pick(tx), pick(ty), pick(tz))
            }
            Interpolation::Linear => (tx, ty, tz),
            Interpolation::Quintic => (fade(tx), fade(ty), fade(tz)),
        };

        let g = &self.grid;
        let c00 = lerp(g.get(i, j, k), g.get(i + 1, j, k), tx);
        let c10 = lerp(g.get(i, j + 1, k), g.get(i + 1, j + 1, k), tx);
        let c01 = lerp(g.get(i, j, k + 1), g.get(i + 1, j, k + 1), tx);
        let c11 = lerp(g.get(i, j + 1, k + 1), g.get(i + 1, j + 1, k + 1), tx);
        Ok(lerp(lerp(c00, c10, ty), lerp(c01, c11, ty), tz))
    }

    /// Evaluates the field at many points in parallel.
    ///
    /// Fails on the first point outside the domain.
    pub fn sample_points(&self, points: &[Vec3]) -> Result<Vec<f32>> {
        points.par_iter().map(|&p| self.sample(p)).collect()
    }

    /// Evaluates the field at every cell of a sphere grid.
    pub fn sample_sphere(&self, grid: &SphereGrid) -> Result<SphereMap<f32>> {
        SphereMap::from_vec(grid.shape(), self.sample_points(grid.points())?)
    }
}

fn validate_resolution(resolution: [usize; 3]) -> Result<()> {
    if resolution.iter().any(|&n| n < 2) {
        return Err(TextureError::config(format!(
            "noise resolution must be at least 2 on every axis, got {:?}",
            resolution
        )));
    }
    Ok(())
}
