//! Crater-like terrain from discrete wave diffusion.
//!
//! The simulated volume is rescaled into `[0, amplitude]` and wrapped as a
//! [`NoiseField`], so the texture generator samples it exactly like any other
//! octave.

mod config;
mod waves;

pub use config::CraterConfig;
pub use waves::{propagate, seed_impulses, simulate_waves};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::error::{Result, TextureError};
use crate::noise::{Grid3, Interpolation, NoiseField};

/// Rescales a simulated volume into `[0, amplitude]` at single precision.
fn rescale_volume(volume: &Grid3<f64>, amplitude: f32) -> Result<Grid3> {
    let (min, max) = volume
        .as_slice()
        .par_iter()
        .fold(
            || (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), &v| (lo.min(v), hi.max(v)),
        )
        .reduce(
            || (f64::INFINITY, f64::NEG_INFINITY),
            |a, b| (a.0.min(b.0), a.1.max(b.1)),
        );
    let span = max - min;
    if !(span > 0.0) {
        return Err(TextureError::DegenerateRange {
            context: "crater volume",
            value: min as f32,
        });
    }

    let scale = f64::from(amplitude) / span;
    let data: Vec<f32> = volume
        .as_slice()
        .par_iter()
        .map(|&v| ((v - min) * scale) as f32)
        .collect();
    Grid3::from_vec(volume.shape(), data)
}

/// Simulates a crater volume and wraps it as a linearly interpolated field.
pub fn generate_cratermap(config: &CraterConfig, seed: u64) -> Result<NoiseField> {
    config.validate()?;
    if !config.enabled() {
        return Err(TextureError::config("crater density is zero; nothing to generate"));
    }

    let n = config.simulated_resolution();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let volume = simulate_waves([n; 3], config.density, config.iterations, config.border, &mut rng)?;

    let grid = rescale_volume(&volume, config.amplitude)?;

    log::debug!(
        "crater volume {}^3 rescaled into [0, {}]",
        config.resolution,
        config.amplitude
    );
    NoiseField::from_grid(grid, Interpolation::Linear)
}
