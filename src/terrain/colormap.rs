//! Elevation/slope color classification and hue-preserving culling.

use rayon::prelude::*;

use crate::error::Result;
use crate::geometry::SphereMap;
use crate::quantize::normalize_unit;

use super::config::Palette;
use super::heightmap::{ColorImage, Colormap, GradientField, Heightmap, SpecularMask};

#[inline]
fn rgb(c: [u8; 3]) -> [f32; 3] {
    c.map(f32::from)
}

/// Colors every cell of `heightmap` and marks water in a specular mask.
///
/// Height and gradient are normalized independently into `[0, 1]`. Cells
/// whose normalized height is below `waterline` (every cell once
/// `waterline >= 1`) take the water color and a specular value of 255. Land
/// blends `flat` toward `steep` by gradient, then toward `high` by height.
///
/// A constant heightmap or gradient has no usable scale and fails with
/// [`TextureError::DegenerateRange`](crate::TextureError::DegenerateRange).
pub fn fill_colormap(
    heightmap: &Heightmap,
    gradient: &GradientField,
    palette: &Palette,
    waterline: f32,
) -> Result<(Colormap, SpecularMask)> {
    heightmap.check_same_shape(gradient)?;
    let heights = normalize_unit(heightmap.as_slice(), "heightmap")?;
    let slopes = normalize_unit(gradient.as_slice(), "gradient")?;

    let flat = rgb(palette.flat);
    let steep = rgb(palette.steep);
    let high = rgb(palette.high);
    let water = rgb(palette.water);
    let flooded = waterline >= 1.0;

    let cells: Vec<([f32; 3], u8)> = heights
        .par_iter()
        .zip(slopes.par_iter())
        .map(|(&h, &g)| {
            if flooded || h < waterline {
                return (water, 255);
            }
            let mut px = [0.0f32; 3];
            for c in 0..3 {
                let ground = flat[c] * (1.0 - g) + steep[c] * g;
                px[c] = ground * (1.0 - h) + high[c] * h;
            }
            (px, 0)
        })
        .collect();

    let (color, specular): (Vec<_>, Vec<_>) = cells.into_iter().unzip();
    Ok((
        SphereMap::from_vec(heightmap.shape(), color)?,
        SphereMap::from_vec(heightmap.shape(), specular)?,
    ))
}

/// Brings one pixel into byte range by shifting all channels together.
///
/// Overflow above 255 is subtracted from every channel; otherwise a negative
/// minimum is lifted to zero. The channel spread is unchanged unless it
/// exceeds 255 itself, in which case the remainder is clamped.
pub fn cull_pixel(px: [f32; 3]) -> [u8; 3] {
    let max = px[0].max(px[1]).max(px[2]);
    let min = px[0].min(px[1]).min(px[2]);
    let shift = if max > 255.0 {
        max - 255.0
    } else if min < 0.0 {
        min
    } else {
        0.0
    };
    px.map(|c| (c - shift).clamp(0.0, 255.0) as u8)
}

/// Applies [`cull_pixel`] to every cell.
pub fn smart_cull(colormap: &Colormap) -> ColorImage {
    colormap.map(|&px| cull_pixel(px))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GridShape;
    use crate::TextureError;

    fn ramp_maps() -> (Heightmap, GradientField) {
        let shape = GridShape::new(4, 2).unwrap();
        let h = SphereMap::from_vec(shape, (0..8).map(|v| v as f32).collect()).unwrap();
        let g = SphereMap::from_vec(shape, (0..8).map(|v| (v % 2) as f32).collect()).unwrap();
        (h, g)
    }

    #[test]
    fn test_waterline_splits_cells() {
        let (h, g) = ramp_maps();
        let palette = Palette::green();
        let (color, specular) = fill_colormap(&h, &g, &palette, 0.5).unwrap();

        // Normalized heights are i/7; the first four fall below 0.5.
        for i in 0..4 {
            assert_eq!(specular.as_slice()[i], 255);
            assert_eq!(color.as_slice()[i], rgb(palette.water));
        }
        for i in 4..8 {
            assert_eq!(specular.as_slice()[i], 0);
        }
        // Highest cell is pure `high`.
        assert_eq!(color.as_slice()[7], rgb(palette.high));
    }

    #[test]
    fn test_land_blend() {
        let (h, g) = ramp_maps();
        let palette = Palette::rocky();
        let (color, specular) = fill_colormap(&h, &g, &palette, 0.0).unwrap();
        assert!(specular.as_slice().iter().all(|&s| s == 0));

        // Lowest cell: height 0, gradient 0 -> flat.
        assert_eq!(color.as_slice()[0], rgb(palette.flat));
        // Cell 1: gradient 1, height 1/7.
        let h1 = 1.0 / 7.0;
        let expected = palette.steep[1] as f32 * (1.0 - h1) + palette.high[1] as f32 * h1;
        assert!((color.as_slice()[1][1] - expected).abs() < 1e-4);
    }

    #[test]
    fn test_full_flood() {
        let (h, g) = ramp_maps();
        let (_, specular) = fill_colormap(&h, &g, &Palette::default(), 1.0).unwrap();
        assert!(specular.as_slice().iter().all(|&s| s == 255));
    }

    #[test]
    fn test_constant_heightmap_is_degenerate() {
        let shape = GridShape::new(4, 2).unwrap();
        let h = SphereMap::filled(shape, 1.0f32);
        let g = SphereMap::from_vec(shape, (0..8).map(|v| v as f32).collect()).unwrap();
        assert!(matches!(
            fill_colormap(&h, &g, &Palette::default(), 0.5),
            Err(TextureError::DegenerateRange { context: "heightmap", .. })
        ));
    }

    #[test]
    fn test_cull_preserves_spread() {
        let cases = [
            [300.0, 200.0, 100.0],
            [-40.0, 10.0, 60.0],
            [12.0, 34.0, 56.0],
            [255.0, 0.0, 128.0],
        ];
        for px in cases {
            let out = cull_pixel(px);
            let spread_in = px.iter().cloned().fold(f32::MIN, f32::max)
                - px.iter().cloned().fold(f32::MAX, f32::min);
            let spread_out = *out.iter().max().unwrap() as f32 - *out.iter().min().unwrap() as f32;
            assert_eq!(spread_in, spread_out, "{:?} -> {:?}", px, out);
        }
        assert_eq!(cull_pixel([300.0, 200.0, 100.0]), [255, 155, 55]);
        assert_eq!(cull_pixel([-40.0, 10.0, 60.0]), [0, 50, 100]);
    }

    #[test]
    fn test_cull_wide_spread_is_clamped() {
        assert_eq!(cull_pixel([400.0, 0.0, -100.0]), [255, 0, 0]);
    }

    #[test]
    fn test_smart_cull_map() {
        let shape = GridShape::new(2, 2).unwrap();
        let colors = SphereMap::from_vec(
            shape,
            vec![[260.0, 5.0, 5.0], [1.0, 2.0, 3.0], [-1.0, 0.0, 1.0], [255.0, 255.0, 255.0]],
        )
        .unwrap();
        let out = smart_cull(&colors);
        assert_eq!(out.as_slice(), &[[255, 0, 0], [1, 2, 3], [0, 1, 2], [255, 255, 255]]);
    }
}
