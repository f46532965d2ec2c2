//! Crater layer configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TextureError};

/// Parameters for the wave-diffusion crater volume.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CraterConfig {
    /// Probability that a lattice cell starts as an impulse. 0 disables craters.
    pub density: f32,
    /// Edge length of the final (cropped) volume.
    pub resolution: usize,
    /// Cells discarded on each side of every axis after simulation.
    pub border: usize,
    /// Number of diffusion steps.
    pub iterations: u32,
    /// Values are rescaled into `[0, amplitude]`.
    pub amplitude: f32,
}

impl Default for CraterConfig {
    fn default() -> Self {
        Self {
            density: 0.0,
            resolution: 100,
            border: 5,
            iterations: 20,
            amplitude: 100.0,
        }
    }
}

impl CraterConfig {
    /// Default crater volume at the given impulse density.
    pub fn with_density(density: f32) -> Self {
        Self {
            density,
            ..Default::default()
        }
    }

    /// Whether a crater layer should be generated at all.
    pub fn enabled(&self) -> bool {
        self.density > 0.0
    }

    /// Edge length of the simulated lattice before cropping.
    pub fn simulated_resolution(&self) -> usize {
        self.resolution + 2 * self.border
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.density) {
            return Err(TextureError::config(format!(
                "crater density must lie in [0, 1), got {}",
                self.density
            )));
        }
        if self.enabled() {
            if self.resolution < 2 {
                return Err(TextureError::config(format!(
                    "crater resolution must be at least 2, got {}",
                    self.resolution
                )));
            }
            if !(self.amplitude.is_finite() && self.amplitude > 0.0) {
                return Err(TextureError::config(format!(
                    "crater amplitude must be positive, got {}",
                    self.amplitude
                )));
            }
        }
        Ok(())
    }
}
