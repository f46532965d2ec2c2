//! Low-frequency chromatic noise.
//!
//! Each RGB channel owns its own pair of coarse noise fields, so hue drifts
//! slowly and independently across the sphere.

use rayon::prelude::*;

use crate::error::{Result, TextureError};
use crate::geometry::{SphereGrid, SphereMap};
use crate::noise::{Interpolation, NoiseField};

use super::config::OCTAVE_SEED_STRIDE;

/// Number of (coarsest) octave resolutions reused for color noise.
pub const COLOR_OCTAVES: usize = 2;

/// Three independent channel field sets.
#[derive(Debug, Clone)]
pub struct ColorNoise {
    channels: [Vec<NoiseField>; 3],
}

impl ColorNoise {
    /// Builds the channel fields from the first [`COLOR_OCTAVES`] resolutions.
    pub fn new(resolutions: &[usize], interpolation: Interpolation, seed: u64) -> Result<Self> {
        let used = &resolutions[..resolutions.len().min(COLOR_OCTAVES)];
        if used.is_empty() {
            return Err(TextureError::config("color noise needs at least one resolution"));
        }

        let build = |channel: usize| -> Result<Vec<NoiseField>> {
            used.iter()
                .enumerate()
                .map(|(i, &res)| {
                    let stream = (channel * COLOR_OCTAVES + i) as u64;
                    let field_seed = seed.wrapping_add(stream.wrapping_mul(OCTAVE_SEED_STRIDE));
                    NoiseField::seeded(res, interpolation, field_seed)
                })
                .collect()
        };

        Ok(Self {
            channels: [build(0)?, build(1)?, build(2)?],
        })
    }

    /// Fields per channel.
    pub fn octaves(&self) -> usize {
        self.channels[0].len()
    }

    /// Samples one channel: octave mean scaled by `amp`, shifted so its
    /// minimum is zero.
    fn sample_channel(fields: &[NoiseField], grid: &SphereGrid, amp: f32) -> Result<Vec<f32>> {
        let mut acc = vec![0.0f32; grid.len()];
        for field in fields {
            let values = field.sample_points(grid.points())?;
            acc.par_iter_mut().zip(values.par_iter()).for_each(|(a, v)| *a += v);
        }

        let scale = amp / fields.len() as f32;
        acc.par_iter_mut().for_each(|v| *v *= scale);
        let min = acc.iter().copied().fold(f32::MAX, f32::min);
        acc.par_iter_mut().for_each(|v| *v -= min);
        Ok(acc)
    }

    /// Non-negative per-channel noise on `grid`, amplitude `amp`.
    pub fn sample(&self, grid: &SphereGrid, amp: f32) -> Result<SphereMap<[f32; 3]>> {
        let r = Self::sample_channel(&self.channels[0], grid, amp)?;
        let g = Self::sample_channel(&self.channels[1], grid, amp)?;
        let b = Self::sample_channel(&self.channels[2], grid, amp)?;

        let data = r
            .into_par_iter()
            .zip(g.into_par_iter())
            .zip(b.into_par_iter())
            .map(|((r, g), b)| [r, g, b])
            .collect();
        SphereMap::from_vec(grid.shape(), data)
    }
}
