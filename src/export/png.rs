//! PNG export for height, surface and specular maps.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

use crate::error::TextureError;
use crate::geometry::GridShape;
use crate::terrain::{ColorImage, PlanetMaps, SpecularMask};

/// Errors that can occur during PNG export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),
}

/// Options for PNG export.
#[derive(Debug, Clone)]
pub struct PngExportOptions {
    /// Write the height map as 16-bit grayscale instead of 8-bit.
    pub height_16bit: bool,
    /// PNG compression type.
    pub compression: CompressionType,
    /// PNG filter type.
    pub filter: FilterType,
}

impl Default for PngExportOptions {
    fn default() -> Self {
        Self {
            height_16bit: false,
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

impl PngExportOptions {
    /// Fast, larger files; handy for previews.
    pub fn fast() -> Self {
        Self {
            compression: CompressionType::Fast,
            filter: FilterType::NoFilter,
            ..Default::default()
        }
    }
}

/// Image dimensions of a grid: longitude across, latitude down.
fn dimensions(shape: GridShape) -> Result<(u32, u32), ExportError> {
    let w = u32::try_from(shape.theta_width)
        .map_err(|_| TextureError::config("image width exceeds u32"))?;
    let h = u32::try_from(shape.phi_width)
        .map_err(|_| TextureError::config("image height exceeds u32"))?;
    Ok((w, h))
}

fn write_png(
    path: &Path,
    bytes: &[u8],
    shape: GridShape,
    color_type: ExtendedColorType,
    options: &PngExportOptions,
) -> Result<(), ExportError> {
    let (width, height) = dimensions(shape)?;
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    encoder.write_image(bytes, width, height, color_type)?;
    Ok(())
}

fn check_len(shape: GridShape, actual: usize) -> Result<(), ExportError> {
    if actual != shape.len() {
        return Err(TextureError::ShapeMismatch {
            expected: shape.len(),
            actual,
        }
        .into());
    }
    Ok(())
}

/// Exports row-major bytes as an 8-bit grayscale PNG.
pub fn export_gray_png(
    data: &[u8],
    shape: GridShape,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), ExportError> {
    check_len(shape, data.len())?;
    write_png(path, data, shape, ExtendedColorType::L8, options)
}

/// Exports row-major 16-bit samples as a 16-bit grayscale PNG.
pub fn export_gray16_png(
    data: &[u16],
    shape: GridShape,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), ExportError> {
    check_len(shape, data.len())?;
    // Native-endian samples; the encoder reorders them for PNG.
    let bytes: &[u8] = bytemuck::cast_slice(data);
    write_png(path, bytes, shape, ExtendedColorType::L16, options)
}

/// Exports row-major RGB pixels as an 8-bit RGB PNG.
pub fn export_rgb_png(
    pixels: &[[u8; 3]],
    shape: GridShape,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), ExportError> {
    check_len(shape, pixels.len())?;
    let bytes: &[u8] = bytemuck::cast_slice(pixels);
    write_png(path, bytes, shape, ExtendedColorType::Rgb8, options)
}

/// Writes the elevation map, 8- or 16-bit per `options.height_16bit`.
pub fn export_height_png(
    maps: &PlanetMaps,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), ExportError> {
    if options.height_16bit {
        export_gray16_png(&maps.height_image_u16()?, maps.shape(), path, options)
    } else {
        export_gray_png(&maps.height_image()?, maps.shape(), path, options)
    }
}

pub fn export_surface_png(
    color: &ColorImage,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), ExportError> {
    export_rgb_png(color.as_slice(), color.shape(), path, options)
}

pub fn export_specular_png(
    specular: &SpecularMask,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), ExportError> {
    export_gray_png(specular.as_slice(), specular.shape(), path, options)
}

/// Exports all three planet maps.
///
/// Files are named `{base_name}_height.png`, `{base_name}_surface.png` and
/// `{base_name}_specular.png`.
///
/// # Arguments
/// * `maps` - The generated planet maps
/// * `output_dir` - Directory to save files to (created if missing)
/// * `base_name` - Base name for output files
/// * `options` - Export options
///
/// # Returns
/// The written paths in the order above, or the first error encountered
pub fn export_planet_maps(
    maps: &PlanetMaps,
    output_dir: &Path,
    base_name: &str,
    options: &PngExportOptions,
) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(output_dir)?;

    let height = output_dir.join(format!("{}_height.png", base_name));
    let surface = output_dir.join(format!("{}_surface.png", base_name));
    let specular = output_dir.join(format!("{}_specular.png", base_name));

    export_height_png(maps, &height, options)?;
    export_surface_png(&maps.color, &surface, options)?;
    export_specular_png(&maps.specular, &specular, options)?;

    Ok(vec![height, surface, specular])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{ColormapConfig, Palette, PlanetGenerator};
    use crate::texture::TextureConfig;
    use tempfile::tempdir;

    fn small_maps(waterline: f32) -> PlanetMaps {
        let config = TextureConfig {
            resolutions: vec![4, 6],
            theta_width: 32,
            phi_width: Some(16),
            seed: 21,
            ..Default::default()
        };
        PlanetGenerator::new(config)
            .unwrap()
            .get_colormap(&ColormapConfig::new(Palette::green(), waterline, 0.1))
            .unwrap()
    }

    #[test]
    fn test_export_planet_maps() {
        let maps = small_maps(0.5);
        let dir = tempdir().unwrap();

        let paths = export_planet_maps(&maps, dir.path(), "planet", &PngExportOptions::default()).unwrap();
        assert_eq!(paths.len(), 3);
        for suffix in ["height", "surface", "specular"] {
            let path = dir.path().join(format!("planet_{}.png", suffix));
            assert!(path.exists(), "Missing {}", suffix);
            assert!(std::fs::metadata(&path).unwrap().len() > 0);
        }
    }

    #[test]
    fn test_height_bit_depth() {
        let maps = small_maps(0.3);
        let dir = tempdir().unwrap();

        let path8 = dir.path().join("h8.png");
        export_height_png(&maps, &path8, &PngExportOptions::default()).unwrap();
        let img8 = image::open(&path8).unwrap();
        assert_eq!(img8.color(), image::ColorType::L8);
        assert_eq!((img8.width(), img8.height()), (32, 16));

        let path16 = dir.path().join("h16.png");
        let options = PngExportOptions {
            height_16bit: true,
            ..Default::default()
        };
        export_height_png(&maps, &path16, &options).unwrap();
        let img16 = image::open(&path16).unwrap();
        assert_eq!(img16.color(), image::ColorType::L16);
        let luma = img16.to_luma16();
        let max = luma.pixels().map(|p| p.0[0]).max().unwrap();
        assert_eq!(max, 65535);
        let words = maps.height_image_u16().unwrap();
        assert_eq!(luma.get_pixel(5, 3).0[0], words[3 * 32 + 5]);
    }

    #[test]
    fn test_surface_pixels_survive() {
        let maps = small_maps(0.5);
        let dir = tempdir().unwrap();
        let path = dir.path().join("surface.png");
        export_surface_png(&maps.color, &path, &PngExportOptions::fast()).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        let first = maps.color.get(0, 0);
        assert_eq!(img.get_pixel(0, 0).0, first);
        let last = maps.color.get(15, 31);
        assert_eq!(img.get_pixel(31, 15).0, last);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.png");
        let shape = GridShape::new(4, 2).unwrap();
        let result = export_gray_png(&[0u8; 5], shape, &path, &PngExportOptions::default());
        assert!(matches!(
            result,
            Err(ExportError::Texture(TextureError::ShapeMismatch { expected: 8, actual: 5 }))
        ));
    }

    #[test]
    fn test_flooded_planet_height_is_degenerate() {
        let maps = small_maps(1.0);
        let dir = tempdir().unwrap();
        let result = export_planet_maps(&maps, dir.path(), "flooded", &PngExportOptions::default());
        assert!(matches!(
            result,
            Err(ExportError::Texture(TextureError::DegenerateRange { .. }))
        ));
    }
}
