//! Palette, colormap and whole-planet configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::craters::CraterConfig;
use crate::error::{Result, TextureError};
use crate::texture::TextureConfig;

/// Errors that can occur while loading or saving a planet configuration file.
#[derive(Error, Debug)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid planet configuration: {0}")]
    Invalid(#[from] TextureError),
}

/// Terrain colors, one RGB byte triple per surface class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Low, gently sloped land.
    pub flat: [u8; 3],
    /// Steep slopes.
    pub steep: [u8; 3],
    /// Peaks; blended in proportionally to elevation.
    pub high: [u8; 3],
    /// Everything below the waterline.
    pub water: [u8; 3],
}

impl Default for Palette {
    fn default() -> Self {
        Self::green()
    }
}

impl Palette {
    pub const DEFAULT_WATER: [u8; 3] = [23, 52, 120];

    pub fn green() -> Self {
        Self {
            flat: [3, 26, 8],
            steep: [42, 46, 18],
            high: [139, 140, 130],
            water: Self::DEFAULT_WATER,
        }
    }

    pub fn rocky() -> Self {
        Self {
            flat: [77, 23, 15],
            steep: [102, 61, 44],
            high: [56, 29, 25],
            water: Self::DEFAULT_WATER,
        }
    }

    pub fn gas_giant() -> Self {
        Self {
            flat: [35, 69, 79],
            steep: [56, 52, 99],
            high: [135, 67, 30],
            water: Self::DEFAULT_WATER,
        }
    }

    pub fn gas_moon() -> Self {
        Self {
            flat: [54, 42, 35],
            steep: [77, 69, 64],
            high: [64, 30, 8],
            water: Self::DEFAULT_WATER,
        }
    }

    pub fn ice_moon() -> Self {
        Self {
            flat: [22, 31, 9],
            steep: [63, 71, 57],
            high: [213, 214, 210],
            water: [51, 86, 166],
        }
    }

    /// Grey rock of the green planet's moon.
    pub fn green_moon() -> Self {
        Self {
            flat: [148, 145, 143],
            steep: [84, 81, 79],
            high: [117, 111, 107],
            water: Self::DEFAULT_WATER,
        }
    }
}

/// Parameters for turning a heightmap into color, specular and height maps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColormapConfig {
    pub palette: Palette,
    /// Normalized elevation below which cells become water, in [0, 1].
    pub waterline: f32,
    /// Color noise amplitude as a fraction of full byte range. 0 disables it.
    pub noise_amp: f32,
    /// Gaussian sigma (cells) applied when the heightmap is first generated.
    pub blur: f32,
}

impl Default for ColormapConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            waterline: 0.5,
            noise_amp: 0.2,
            blur: 0.0,
        }
    }
}

impl ColormapConfig {
    pub fn new(palette: Palette, waterline: f32, noise_amp: f32) -> Self {
        Self {
            palette,
            waterline,
            noise_amp,
            blur: 0.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.waterline) {
            return Err(TextureError::config(format!(
                "waterline must lie in [0, 1], got {}",
                self.waterline
            )));
        }
        if !(self.noise_amp >= 0.0 && self.noise_amp.is_finite()) {
            return Err(TextureError::config(format!(
                "noise amplitude must be non-negative, got {}",
                self.noise_amp
            )));
        }
        if !(self.blur >= 0.0 && self.blur.is_finite()) {
            return Err(TextureError::config(format!(
                "blur must be non-negative, got {}",
                self.blur
            )));
        }
        Ok(())
    }
}

/// Everything needed to generate one planet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetConfig {
    pub texture: TextureConfig,
    pub colormap: ColormapConfig,
}

impl PlanetConfig {
    fn preset(resolutions: &[usize], palette: Palette, waterline: f32, noise_amp: f32) -> Self {
        Self {
            texture: TextureConfig::with_resolutions(resolutions),
            colormap: ColormapConfig::new(palette, waterline, noise_amp),
        }
    }

    /// Oceans, green lowlands and pale peaks.
    pub fn green() -> Self {
        Self::preset(&[5, 10, 15, 20, 25, 30, 40, 60, 75], Palette::green(), 0.5, 0.2)
    }

    /// Dry red world without water.
    pub fn rocky() -> Self {
        Self::preset(&[5, 10, 15, 20, 25, 30, 40], Palette::rocky(), 0.0, 0.1)
    }

    /// Broad, strongly tinted cloud bands.
    pub fn gas_giant() -> Self {
        Self::preset(&[5, 10, 20, 30], Palette::gas_giant(), 0.0, 0.4)
    }

    pub fn gas_moon() -> Self {
        Self::preset(&[5, 10, 15, 20, 25, 30], Palette::gas_moon(), 0.0, 0.1)
    }

    /// Icy highlands over a high, pale sea.
    pub fn ice_moon() -> Self {
        Self::preset(&[5, 10, 15, 20, 25, 30, 40], Palette::ice_moon(), 0.6, 0.1)
    }

    /// Grey moon of the green planet.
    pub fn green_moon() -> Self {
        Self::preset(&[5, 10, 15], Palette::green_moon(), 0.0, 0.05)
    }

    /// Grey airless moon with a crater layer.
    pub fn cratered_moon() -> Self {
        let mut config = Self::preset(&[5, 10, 15, 20], Palette::green_moon(), 0.0, 0.05);
        config.texture.craters = CraterConfig::with_density(0.001);
        config
    }

    /// Looks up a preset by name (`-` and `_` are interchangeable).
    pub fn from_preset(name: &str) -> Option<Self> {
        match name.replace('-', "_").as_str() {
            "green" => Some(Self::green()),
            "rocky" => Some(Self::rocky()),
            "gas_giant" => Some(Self::gas_giant()),
            "gas_moon" => Some(Self::gas_moon()),
            "ice_moon" => Some(Self::ice_moon()),
            "green_moon" => Some(Self::green_moon()),
            "cratered_moon" => Some(Self::cratered_moon()),
            _ => None,
        }
    }

    pub fn preset_names() -> &'static [&'static str] {
        &[
            "green",
            "rocky",
            "gas-giant",
            "gas-moon",
            "ice-moon",
            "green-moon",
            "cratered-moon",
        ]
    }

    pub fn validate(&self) -> Result<()> {
        self.texture.validate()?;
        self.colormap.validate()
    }

    /// Reads and validates a JSON configuration. Missing fields take defaults.
    pub fn load_json(path: &Path) -> std::result::Result<Self, ConfigFileError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_json(&self, path: &Path) -> std::result::Result<(), ConfigFileError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }
}
