//! Planet map assembly: heightmap, color, specular and height outputs.

use std::time::Instant;

use rayon::prelude::*;

use crate::error::{Result, TextureError};
use crate::geometry::GridShape;
use crate::quantize::{to_uint16, to_uint8};
use crate::texture::{TextureConfig, TextureGenerator};

use super::colormap::{fill_colormap, smart_cull};
use super::config::{ColormapConfig, PlanetConfig};
use super::gradient::{get_gradient, GradientMode};
use super::heightmap::{flatten_below, water_cutoff, ColorImage, GradientField, Heightmap, SpecularMask};

/// The finished maps for one planet.
#[derive(Debug, Clone)]
pub struct PlanetMaps {
    /// Elevation with everything below the waterline raised to the cutoff.
    pub elevation: Heightmap,
    /// Slope magnitude of the unflattened heightmap.
    pub gradient: GradientField,
    /// Culled surface color.
    pub color: ColorImage,
    /// 255 over water, 0 over land.
    pub specular: SpecularMask,
    /// Absolute elevation of the water surface.
    pub cutoff: f32,
}

impl PlanetMaps {
    pub fn shape(&self) -> GridShape {
        self.elevation.shape()
    }

    /// Elevation quantized to bytes over its full range.
    ///
    /// A planet flooded up to its highest peak has a constant elevation and
    /// reports [`TextureError::DegenerateRange`].
    pub fn height_image(&self) -> Result<Vec<u8>> {
        to_uint8(self.elevation.as_slice(), 0.0, 1.0)
    }

    /// Elevation quantized to 16-bit samples.
    pub fn height_image_u16(&self) -> Result<Vec<u16>> {
        to_uint16(self.elevation.as_slice())
    }

    /// Interleaved RGB bytes, row by row.
    pub fn color_bytes(&self) -> Vec<u8> {
        self.color.as_slice().iter().flatten().copied().collect()
    }

    /// Fraction of cells flagged as water.
    pub fn water_fraction(&self) -> f32 {
        let wet = self.specular.as_slice().par_iter().filter(|&&s| s > 0).count();
        wet as f32 / self.specular.len() as f32
    }
}

#[derive(Debug, Clone)]
struct CachedHeightmap {
    /// `None` when the heightmap was supplied by the caller.
    blur: Option<f32>,
    map: Heightmap,
}

/// Builds planet maps on top of a [`TextureGenerator`].
///
/// The heightmap is generated once and reused by later colormap requests with
/// the same blur.
#[derive(Debug, Clone)]
pub struct PlanetGenerator {
    texture: TextureGenerator,
    heightmap: Option<CachedHeightmap>,
}

impl PlanetGenerator {
    pub fn new(config: TextureConfig) -> Result<Self> {
        Ok(Self::from_texture_generator(TextureGenerator::new(config)?))
    }

    pub fn from_texture_generator(texture: TextureGenerator) -> Self {
        Self {
            texture,
            heightmap: None,
        }
    }

    pub fn texture_generator(&self) -> &TextureGenerator {
        &self.texture
    }

    /// Uses `heightmap` for every later colormap instead of generating one.
    pub fn with_heightmap(mut self, heightmap: Heightmap) -> Result<Self> {
        let expected = self.texture.grid().shape();
        if heightmap.shape() != expected {
            return Err(TextureError::ShapeMismatch {
                expected: expected.len(),
                actual: heightmap.len(),
            });
        }
        self.heightmap = Some(CachedHeightmap {
            blur: None,
            map: heightmap,
        });
        Ok(self)
    }

    /// Returns the heightmap for `blur`, generating it if none is cached.
    pub fn heightmap(&mut self, blur: f32) -> Result<&Heightmap> {
        let cached = match self.heightmap.take() {
            Some(cached) if cached.blur.map_or(true, |b| b == blur) => cached,
            _ => CachedHeightmap {
                blur: Some(blur),
                map: self.texture.get_texture(blur)?,
            },
        };
        Ok(&self.heightmap.insert(cached).map)
    }

    /// Produces elevation, color and specular maps for one palette setup.
    ///
    /// # Arguments
    /// * `config` - Palette, waterline, color noise amplitude and heightmap blur
    pub fn get_colormap(&mut self, config: &ColormapConfig) -> Result<PlanetMaps> {
        config.validate()?;
        let start = Instant::now();

        let mut elevation = self.heightmap(config.blur)?.clone();
        let gradient = get_gradient(&elevation, GradientMode::Magnitude);
        let (mut color, specular) =
            fill_colormap(&elevation, &gradient, &config.palette, config.waterline)?;

        if config.noise_amp > 0.0 {
            let noise = self.texture.gen_color_noise(config.noise_amp)?;
            color
                .as_mut_slice()
                .par_iter_mut()
                .zip(noise.as_slice().par_iter())
                .for_each(|(px, n)| {
                    for c in 0..3 {
                        px[c] += n[c];
                    }
                });
        }
        let color = smart_cull(&color);

        let cutoff = water_cutoff(&elevation, config.waterline);
        let flooded = flatten_below(&mut elevation, cutoff);

        log::info!(
            "colormap {}x{}: cutoff {:.4}, {} cells raised to sea level, {:.2?}",
            elevation.theta_width(),
            elevation.phi_width(),
            cutoff,
            flooded,
            start.elapsed()
        );

        Ok(PlanetMaps {
            elevation,
            gradient,
            color,
            specular,
            cutoff,
        })
    }
}

/// Builds the generator for `config` and produces its maps.
pub fn generate_planet(config: &PlanetConfig) -> Result<PlanetMaps> {
    config.validate()?;
    let mut generator = PlanetGenerator::new(config.texture.clone())?;
    generator.get_colormap(&config.colormap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::Palette;

    fn small_texture(seed: u64) -> TextureConfig {
        TextureConfig {
            resolutions: vec![4, 6, 8],
            theta_width: 32,
            phi_width: Some(16),
            seed,
            ..Default::default()
        }
    }

    fn colormap(waterline: f32, noise_amp: f32) -> ColormapConfig {
        ColormapConfig::new(Palette::green(), waterline, noise_amp)
    }

    #[test]
    fn test_heightmap_is_cached() {
        let mut generator = PlanetGenerator::new(small_texture(1)).unwrap();
        let first = generator.heightmap(0.0).unwrap().clone();
        assert_eq!(first.min(), 0.0);
        let second = generator.heightmap(0.0).unwrap().clone();
        assert_eq!(first, second);

        let blurred = generator.heightmap(1.0).unwrap().clone();
        assert_ne!(first, blurred);
    }

    #[test]
    fn test_dry_planet_keeps_elevation() {
        let mut generator = PlanetGenerator::new(small_texture(2)).unwrap();
        let before = generator.heightmap(0.0).unwrap().clone();
        let maps = generator.get_colormap(&colormap(0.0, 0.1)).unwrap();

        assert_eq!(maps.elevation, before);
        assert_eq!(maps.cutoff, 0.0);
        assert!(maps.specular.as_slice().iter().all(|&s| s == 0));
        assert_eq!(maps.water_fraction(), 0.0);
        assert_eq!(maps.height_image().unwrap().len(), 32 * 16);
    }

    #[test]
    fn test_flooded_planet() {
        let mut generator = PlanetGenerator::new(small_texture(3)).unwrap();
        let peak = generator.heightmap(0.0).unwrap().max();
        let maps = generator.get_colormap(&colormap(1.0, 0.0)).unwrap();

        let water = Palette::green().water;
        assert!(maps.color.as_slice().iter().all(|&px| px == water));
        assert!(maps.specular.as_slice().iter().all(|&s| s == 255));
        assert!(maps.elevation.as_slice().iter().all(|&h| h == peak));
        assert!(matches!(
            maps.height_image(),
            Err(TextureError::DegenerateRange { .. })
        ));
    }

    #[test]
    fn test_partial_water() {
        let mut generator = PlanetGenerator::new(small_texture(4)).unwrap();
        let maps = generator.get_colormap(&colormap(0.5, 0.2)).unwrap();

        let fraction = maps.water_fraction();
        assert!(fraction > 0.0 && fraction < 1.0);
        assert!(maps.elevation.min() >= maps.cutoff);
        for (&h, &s) in maps.elevation.as_slice().iter().zip(maps.specular.as_slice()) {
            if s == 255 {
                assert_eq!(h, maps.cutoff);
            }
        }
        assert_eq!(maps.color_bytes().len(), 32 * 16 * 3);

        assert_eq!(maps.gradient.shape(), maps.shape());
        let (slope_min, slope_max) = maps.gradient.range();
        assert!(slope_min >= 0.0 && slope_max > 0.0);
    }

    #[test]
    fn test_supplied_heightmap_is_used() {
        let base = PlanetGenerator::new(small_texture(5)).unwrap();
        let shape = base.texture_generator().grid().shape();
        let ramp = Heightmap::from_vec(shape, (0..shape.len()).map(|i| i as f32).collect()).unwrap();

        let mut generator = base.with_heightmap(ramp.clone()).unwrap();
        assert_eq!(generator.heightmap(3.0).unwrap(), &ramp);

        let maps = generator.get_colormap(&colormap(0.25, 0.0)).unwrap();
        assert_eq!(maps.cutoff, 0.25 * (shape.len() - 1) as f32);
    }

    #[test]
    fn test_supplied_heightmap_shape_checked() {
        let base = PlanetGenerator::new(small_texture(5)).unwrap();
        let wrong = Heightmap::filled(GridShape::new(4, 2).unwrap(), 0.0);
        assert!(base.with_heightmap(wrong).is_err());
    }

    #[test]
    fn test_generate_planet_from_preset() {
        let mut config = PlanetConfig::rocky();
        config.texture.theta_width = 24;
        config.texture.resolutions.truncate(3);
        let maps = generate_planet(&config).unwrap();
        assert_eq!(maps.shape(), GridShape::new(24, 12).unwrap());
        assert_eq!(maps.elevation.min(), 0.0);
    }
}
