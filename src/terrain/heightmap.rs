//! Heightmap aliases and water-level helpers.

use rayon::prelude::*;

use crate::geometry::SphereMap;

/// Scalar elevation per sphere cell. Minimum is zero after generation.
pub type Heightmap = SphereMap<f32>;
/// Slope estimate per sphere cell.
pub type GradientField = SphereMap<f32>;
/// Unclamped floating-point RGB per cell.
pub type Colormap = SphereMap<[f32; 3]>;
/// Per-cell surface color after culling.
pub type ColorImage = SphereMap<[u8; 3]>;
/// 255 for reflective (water) cells, 0 for land.
pub type SpecularMask = SphereMap<u8>;

/// Absolute elevation corresponding to the normalized `waterline`.
pub fn water_cutoff(heightmap: &Heightmap, waterline: f32) -> f32 {
    let (min, max) = heightmap.range();
    waterline * max + (1.0 - waterline) * min
}

/// Raises every cell below `cutoff` to `cutoff`, so submerged terrain reads
/// as a flat sea surface.
pub fn flatten_below(heightmap: &mut Heightmap, cutoff: f32) -> usize {
    heightmap
        .as_mut_slice()
        .par_iter_mut()
        .map(|h| {
            if *h < cutoff {
                *h = cutoff;
                1
            } else {
                0
            }
        })
        .sum()
}
