//! Multi-octave texture synthesis on a sphere grid.

use rayon::prelude::*;

use crate::craters::generate_cratermap;
use crate::error::{Result, TextureError};
use crate::geometry::{SphereGrid, SphereMap};
use crate::noise::NoiseField;

use super::blur::gaussian_blur_wrap;
use super::color_noise::ColorNoise;
use super::config::TextureConfig;

/// Owns the sample grid, the octave fields and the optional crater layer.
///
/// Color noise fields are created on first use and kept for the lifetime of
/// the generator, so repeated colorizations share the same chromatic pattern.
#[derive(Debug, Clone)]
pub struct TextureGenerator {
    config: TextureConfig,
    grid: SphereGrid,
    octaves: Vec<NoiseField>,
    craters: Option<NoiseField>,
    color_noise: Option<ColorNoise>,
}

impl TextureGenerator {
    pub fn new(config: TextureConfig) -> Result<Self> {
        config.validate()?;

        let grid = SphereGrid::new(config.theta_width, config.phi_width())?;

        let octaves = config
            .resolutions
            .par_iter()
            .enumerate()
            .map(|(i, &res)| NoiseField::seeded(res, config.interpolation, config.octave_seed(i)))
            .collect::<Result<Vec<_>>>()?;

        let craters = if config.craters.enabled() {
            Some(generate_cratermap(&config.craters, config.crater_seed())?)
        } else {
            None
        };

        log::debug!(
            "texture generator: {}x{} grid, {} octaves {:?}, craters {}",
            grid.theta_width(),
            grid.phi_width(),
            octaves.len(),
            config.resolutions,
            craters.is_some()
        );

        Ok(Self {
            config,
            grid,
            octaves,
            craters,
            color_noise: None,
        })
    }

    pub fn config(&self) -> &TextureConfig {
        &self.config
    }

    pub fn grid(&self) -> &SphereGrid {
        &self.grid
    }

    pub fn octaves(&self) -> &[NoiseField] {
        &self.octaves
    }

    pub fn has_craters(&self) -> bool {
        self.craters.is_some()
    }

    /// Whether the color noise fields have been built yet.
    pub fn has_color_noise(&self) -> bool {
        self.color_noise.is_some()
    }

    /// Averages every octave over the grid, adds craters, optionally blurs,
    /// and shifts the result so its minimum is exactly zero.
    pub fn get_texture(&self, blur: f32) -> Result<SphereMap<f32>> {
        if !(blur >= 0.0 && blur.is_finite()) {
            return Err(TextureError::config(format!(
                "blur must be finite and non-negative, got {}",
                blur
            )));
        }

        let mut acc = vec![0.0f32; self.grid.len()];
        for field in &self.octaves {
            let values = field.sample_points(self.grid.points())?;
            acc.par_iter_mut().zip(values.par_iter()).for_each(|(a, v)| *a += v);
        }
        let inv = 1.0 / self.octaves.len() as f32;
        acc.par_iter_mut().for_each(|v| *v *= inv);

        if let Some(craters) = &self.craters {
            let values = craters.sample_points(self.grid.points())?;
            acc.par_iter_mut().zip(values.par_iter()).for_each(|(a, v)| *a += v);
        }

        let mut texture = SphereMap::from_vec(self.grid.shape(), acc)?;
        if blur > 0.0 {
            texture = gaussian_blur_wrap(&texture, blur)?;
        }
        texture.shift_to_zero();
        Ok(texture)
    }

    /// Samples the memoized color noise, building its fields on first use.
    fn sample_color_noise(&mut self, noise_amp: f32) -> Result<SphereMap<[f32; 3]>> {
        let noise = match self.color_noise.take() {
            Some(noise) => noise,
            None => {
                log::debug!("building color noise fields");
                ColorNoise::new(
                    &self.config.resolutions,
                    self.config.interpolation,
                    self.config.color_seed(),
                )?
            }
        };
        let sampled = noise.sample(&self.grid, noise_amp);
        self.color_noise = Some(noise);
        sampled
    }

    /// Weights `texture` by `base_color` per channel and adds chromatic noise
    /// of amplitude `noise_amp`. The result is unclamped.
    pub fn colorize(
        &mut self,
        texture: &SphereMap<f32>,
        base_color: [f32; 3],
        noise_amp: f32,
    ) -> Result<SphereMap<[f32; 3]>> {
        check_noise_amp(noise_amp)?;
        if texture.shape() != self.grid.shape() {
            return Err(TextureError::ShapeMismatch {
                expected: self.grid.len(),
                actual: texture.len(),
            });
        }

        let [r, g, b] = base_color;
        let mut out = texture.map(|&t| [r * t, g * t, b * t]);
        if noise_amp == 0.0 {
            return Ok(out);
        }

        let noise = self.sample_color_noise(noise_amp)?;
        out.as_mut_slice()
            .par_iter_mut()
            .zip(noise.as_slice().par_iter())
            .for_each(|(px, n)| {
                for c in 0..3 {
                    px[c] += n[c];
                }
            });
        Ok(out)
    }

    /// Chromatic noise rescaled so its largest channel value is `255 * noise_amp`.
    pub fn gen_color_noise(&mut self, noise_amp: f32) -> Result<SphereMap<[f32; 3]>> {
        check_noise_amp(noise_amp)?;
        if noise_amp == 0.0 {
            return Ok(SphereMap::filled(self.grid.shape(), [0.0; 3]));
        }

        let mut noise = self.sample_color_noise(noise_amp)?;
        let peak = noise
            .as_slice()
            .iter()
            .flat_map(|p| p.iter().copied())
            .fold(0.0f32, f32::max);
        if !(peak > 0.0) {
            return Err(TextureError::DegenerateRange {
                context: "color noise",
                value: peak,
            });
        }

        let scale = 255.0 * noise_amp / peak;
        noise
            .as_mut_slice()
            .par_iter_mut()
            .for_each(|p| p.iter_mut().for_each(|v| *v *= scale));
        Ok(noise)
    }
}

fn check_noise_amp(noise_amp: f32) -> Result<()> {
    if !(noise_amp >= 0.0 && noise_amp.is_finite()) {
        return Err(TextureError::config(format!(
            "noise amplitude must be finite and non-negative, got {}",
            noise_amp
        )));
    }
    Ok(())
}
