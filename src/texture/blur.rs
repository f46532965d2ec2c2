//! Gaussian smoothing with wrap-around edges.

use rayon::prelude::*;

use crate::error::{Result, TextureError};
use crate::geometry::SphereMap;

/// Normalised 1D Gaussian kernel truncated at `round(4 * sigma)` taps per side.
pub fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (4.0 * sigma + 0.5) as usize;
    let denom = 2.0 * sigma * sigma;
    let mut weights: Vec<f32> = (0..=2 * radius)
        .map(|i| {
            let x = i as f32 - radius as f32;
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

#[inline]
fn wrap(i: isize, n: usize) -> usize {
    i.rem_euclid(n as isize) as usize
}

/// Blurs a map with a separable Gaussian of standard deviation `sigma` cells.
///
/// Both axes wrap around, so the first and last latitude rows blend into
/// each other. `sigma <= 0` returns an unchanged copy; a non-finite sigma or
/// one whose kernel is wider than the whole map is a configuration error.
pub fn gaussian_blur_wrap(map: &SphereMap<f32>, sigma: f32) -> Result<SphereMap<f32>> {
    let w = map.theta_width();
    let h = map.phi_width();
    if !sigma.is_finite() || 4.0 * sigma > map.len() as f32 {
        return Err(TextureError::config(format!(
            "blur sigma {} does not fit a {}x{} map",
            sigma, w, h
        )));
    }
    if sigma <= 0.0 {
        return Ok(map.clone());
    }

    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as isize;
    let src = map.as_slice();

    // Along longitude.
    let mut horizontal = vec![0.0f32; src.len()];
    horizontal
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(row, out)| {
            let line = map.row(row);
            for (col, o) in out.iter_mut().enumerate() {
                *o = kernel
                    .iter()
                    .enumerate()
                    .map(|(t, &k)| k * line[wrap(col as isize + t as isize - radius, w)])
                    .sum();
            }
        });

    // Along latitude.
    let mut vertical = vec![0.0f32; src.len()];
    vertical
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(row, out)| {
            for (t, &k) in kernel.iter().enumerate() {
                let r = wrap(row as isize + t as isize - radius, h);
                let line = &horizontal[r * w..(r + 1) * w];
                for (o, &v) in out.iter_mut().zip(line) {
                    *o += k * v;
                }
            }
        });

    SphereMap::from_vec(map.shape(), vertical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GridShape;

    #[test]
    fn test_kernel_is_normalised_and_symmetric() {
        let k = gaussian_kernel(2.0);
        assert_eq!(k.len(), 17);
        assert!((k.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        for i in 0..k.len() / 2 {
            assert!((k[i] - k[k.len() - 1 - i]).abs() < 1e-7);
        }
        assert!(k[8] > k[7]);
    }

    #[test]
    fn test_constant_map_unchanged() {
        let shape = GridShape::new(16, 8).unwrap();
        let map = SphereMap::filled(shape, 3.0f32);
        let out = gaussian_blur_wrap(&map, 1.5).unwrap();
        assert!(out.as_slice().iter().all(|&v| (v - 3.0).abs() < 1e-5));
    }

    #[test]
    fn test_mass_is_preserved_and_wraps() {
        let shape = GridShape::new(10, 6).unwrap();
        let mut map = SphereMap::filled(shape, 0.0f32);
        map.set(0, 0, 1.0);
        let out = gaussian_blur_wrap(&map, 1.0).unwrap();

        let total: f32 = out.as_slice().iter().sum();
        assert!((total - 1.0).abs() < 1e-5);
        // Energy leaks across both seams.
        assert!(out.get(0, 9) > 0.0);
        assert!(out.get(5, 0) > 0.0);
        assert!((out.get(0, 9) - out.get(0, 1)).abs() < 1e-7);
    }

    #[test]
    fn test_zero_sigma_is_identity() {
        let shape = GridShape::new(4, 2).unwrap();
        let map = SphereMap::from_vec(shape, (0..8).map(|v| v as f32).collect()).unwrap();
        assert_eq!(gaussian_blur_wrap(&map, 0.0).unwrap(), map);
    }

    #[test]
    fn test_unbounded_sigma_rejected() {
        let shape = GridShape::new(4, 2).unwrap();
        let map = SphereMap::filled(shape, 1.0f32);
        for sigma in [f32::INFINITY, f32::NAN, 1e30] {
            assert!(matches!(
                gaussian_blur_wrap(&map, sigma),
                Err(TextureError::Configuration(_))
            ));
        }
    }
}
