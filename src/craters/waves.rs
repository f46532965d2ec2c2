//! Discrete wave propagation on a 3D lattice.
//!
//! Sparse unit impulses are released into a still lattice and left to ring for
//! a fixed number of steps. Each impulse spreads into a spherical shell, which
//! on the sphere reads as a circular rim around a depression.
//!
//! The explicit update amplifies the highest lattice frequencies by roughly
//! ten per step, so the lattice is kept in `f64` and checked for overflow.

use rand::Rng;
use rayon::prelude::*;

use crate::error::{Result, TextureError};
use crate::noise::Grid3;

/// Seeds a lattice with Bernoulli(`density`) unit impulses.
pub fn seed_impulses<R: Rng>(shape: [usize; 3], density: f32, rng: &mut R) -> Grid3<f64> {
    let mut grid = Grid3::zeros(shape);
    for v in grid.as_mut_slice() {
        if rng.random::<f32>() < density {
            *v = 1.0;
        }
    }
    grid
}

/// Advances `u` by `iterations` steps of the discrete wave equation.
///
/// Each step accumulates the 7-point Laplacian of `u` into a velocity field
/// and then adds the velocity back into `u`. Boundary cells never move: their
/// velocity stays zero, so they act as fixed walls.
///
/// Fails with [`TextureError::Configuration`] once any cell stops being finite.
pub fn propagate(u: &mut Grid3<f64>, iterations: u32) -> Result<()> {
    let [nx, ny, nz] = u.shape();
    if nx < 3 || ny < 3 || nz < 3 {
        return Err(TextureError::config(format!(
            "wave lattice needs an interior, got {}x{}x{}",
            nx, ny, nz
        )));
    }

    let sx = ny * nz;
    let sy = nz;
    let mut velocity = vec![0.0f64; u.len()];

    for step in 1..=iterations {
        // Laplacian reads the whole of `u` from the previous step.
        {
            let lattice = &*u;
            let pos = lattice.as_slice();
            velocity.par_iter_mut().enumerate().for_each(|(idx, v)| {
                let (i, j, k) = lattice.coords(idx);
                if i == 0 || j == 0 || k == 0 || i == nx - 1 || j == ny - 1 || k == nz - 1 {
                    return;
                }
                let c = 2.0 * pos[idx];
                let d2x = pos[idx - sx] - c + pos[idx + sx];
                let d2y = pos[idx - sy] - c + pos[idx + sy];
                let d2z = pos[idx - 1] - c + pos[idx + 1];
                *v += d2x + d2y + d2z;
            });
        }

        u.as_mut_slice()
            .par_iter_mut()
            .zip(velocity.par_iter())
            .for_each(|(p, v)| *p += v);

        if u.as_slice().par_iter().any(|p| !p.is_finite()) {
            return Err(TextureError::config(format!(
                "wave lattice overflowed at step {} of {}; lower the crater iterations",
                step, iterations
            )));
        }
    }

    Ok(())
}

/// Runs the full simulation: impulses, propagation, then a `border` crop on
/// every side. The result is `shape - 2 * border` on each axis.
pub fn simulate_waves<R: Rng>(
    shape: [usize; 3],
    density: f32,
    iterations: u32,
    border: usize,
    rng: &mut R,
) -> Result<Grid3<f64>> {
    let mut u = seed_impulses(shape, density, rng);
    let hits = u.as_slice().iter().filter(|&&v| v > 0.0).count();
    log::debug!(
        "wave lattice {}x{}x{}: {} impulses, {} iterations",
        shape[0],
        shape[1],
        shape[2],
        hits,
        iterations
    );
    propagate(&mut u, iterations)?;
    u.crop(border)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_output_is_cropped_by_ten() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let out = simulate_waves([24, 20, 16], 0.01, 5, 5, &mut rng).unwrap();
        assert_eq!(out.shape(), [14, 10, 6]);
    }

    #[test]
    fn test_deterministic_given_seed() {
        let run = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            simulate_waves([16, 16, 16], 0.02, 10, 5, &mut rng).unwrap()
        };
        assert_eq!(run(11), run(11));
        assert_ne!(run(11), run(12));
    }

    #[test]
    fn test_single_impulse_first_step() {
        let mut u = Grid3::<f64>::zeros([5, 5, 5]);
        u.set(2, 2, 2, 1.0);
        propagate(&mut u, 1).unwrap();

        // Center loses 6, each face neighbour gains 1.
        assert_eq!(u.get(2, 2, 2), -5.0);
        for (i, j, k) in [(1, 2, 2), (3, 2, 2), (2, 1, 2), (2, 3, 2), (2, 2, 1), (2, 2, 3)] {
            assert_eq!(u.get(i, j, k), 1.0);
        }
        assert_eq!(u.get(1, 1, 2), 0.0);
    }

    #[test]
    fn test_boundary_is_fixed() {
        let mut u = Grid3::<f64>::zeros([6, 6, 6]);
        u.set(1, 1, 1, 1.0);
        u.set(0, 3, 3, 2.0);
        propagate(&mut u, 8).unwrap();

        assert_eq!(u.get(0, 3, 3), 2.0);
        assert_eq!(u.get(0, 1, 1), 0.0);
        assert_eq!(u.get(5, 5, 5), 0.0);
    }

    #[test]
    fn test_zero_density_stays_flat() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let out = simulate_waves([14, 14, 14], 0.0, 20, 5, &mut rng).unwrap();
        assert!(out.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_long_runs_stay_finite() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let out = simulate_waves([22, 22, 22], 0.01, 50, 5, &mut rng).unwrap();
        assert!(out.as_slice().iter().all(|v| v.is_finite()));
        assert!(out.as_slice().iter().any(|v| v.abs() > 1e38));
    }

    #[test]
    fn test_overflow_is_reported() {
        let mut u = Grid3::<f64>::zeros([8, 8, 8]);
        u.set(3, 4, 3, 1.0);
        let err = propagate(&mut u, 1000).unwrap_err();
        match err {
            TextureError::Configuration(msg) => assert!(msg.contains("of 1000")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_lattice_too_small() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(simulate_waves([2, 8, 8], 0.1, 1, 0, &mut rng).is_err());
        assert!(simulate_waves([10, 10, 10], 0.1, 1, 5, &mut rng).is_err());
    }
}
