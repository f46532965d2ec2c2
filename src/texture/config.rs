//! Texture generator configuration.

use serde::{Deserialize, Serialize};

use crate::craters::CraterConfig;
use crate::error::{Result, TextureError};
use crate::noise::Interpolation;

/// Seed stride between consecutive octaves.
pub const OCTAVE_SEED_STRIDE: u64 = 31337;
/// Seed offset for the crater volume.
pub const CRATER_SEED_OFFSET: u64 = 999;
/// Seed offset for the chromatic noise fields.
pub const COLOR_SEED_OFFSET: u64 = 7_000_003;

/// Configuration for a [`TextureGenerator`](super::TextureGenerator).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    /// Grid resolution of each noise octave. Low values give broad structure,
    /// high values fine detail; all octaves are weighted equally.
    pub resolutions: Vec<usize>,
    /// Number of longitude columns in the sphere grid.
    pub theta_width: usize,
    /// Number of latitude rows. Defaults to `theta_width / 2`.
    pub phi_width: Option<usize>,
    /// Interpolation used by every noise octave.
    pub interpolation: Interpolation,
    /// Master random seed.
    pub seed: u64,
    /// Optional crater layer.
    pub craters: CraterConfig,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            resolutions: vec![5, 10, 15, 20],
            theta_width: 2000,
            phi_width: None,
            interpolation: Interpolation::Linear,
            seed: 42,
            craters: CraterConfig::default(),
        }
    }
}

impl TextureConfig {
    /// Creates a configuration with the given octave resolutions.
    pub fn with_resolutions(resolutions: &[usize]) -> Self {
        Self {
            resolutions: resolutions.to_vec(),
            ..Default::default()
        }
    }

    /// Returns a copy using a different seed.
    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Effective latitude row count.
    pub fn phi_width(&self) -> usize {
        self.phi_width.unwrap_or(self.theta_width / 2)
    }

    /// Seed for octave `index`.
    pub fn octave_seed(&self, index: usize) -> u64 {
        self.seed.wrapping_add((index as u64).wrapping_mul(OCTAVE_SEED_STRIDE))
    }

    pub fn crater_seed(&self) -> u64 {
        self.seed.wrapping_add(CRATER_SEED_OFFSET)
    }

    pub fn color_seed(&self) -> u64 {
        self.seed.wrapping_add(COLOR_SEED_OFFSET)
    }

    pub fn validate(&self) -> Result<()> {
        if self.resolutions.is_empty() {
            return Err(TextureError::config("at least one noise resolution is required"));
        }
        if let Some(&bad) = self.resolutions.iter().find(|&&r| r < 2) {
            return Err(TextureError::config(format!(
                "noise resolutions must be at least 2, got {}",
                bad
            )));
        }
        if self.theta_width < 2 || self.phi_width() < 2 {
            return Err(TextureError::config(format!(
                "sphere grid must be at least 2x2, got {}x{}",
                self.theta_width,
                self.phi_width()
            )));
        }
        self.craters.validate()
    }
}
