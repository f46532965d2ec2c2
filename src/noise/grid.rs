//! Dense 3D scalar arrays.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::{Result, TextureError};
use crate::geometry::value_range;

/// A dense `(nx, ny, nz)` array, stored with the last axis fastest.
///
/// Noise fields use `f32`; the wave lattice runs in `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid3<T = f32> {
    shape: [usize; 3],
    data: Vec<T>,
}

impl<T: Copy + Default> Grid3<T> {
    /// A grid with every cell set to zero.
    pub fn zeros(shape: [usize; 3]) -> Self {
        Self {
            shape,
            data: vec![T::default(); shape[0] * shape[1] * shape[2]],
        }
    }

    /// Wraps existing values; `data.len()` must equal the product of `shape`.
    pub fn from_vec(shape: [usize; 3], data: Vec<T>) -> Result<Self> {
        let expected = shape[0] * shape[1] * shape[2];
        if data.len() != expected {
            return Err(TextureError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Linear index of `(i, j, k)`.
    #[inline]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.shape[1] + j) * self.shape[2] + k
    }

    /// Inverse of [`Grid3::index`].
    #[inline]
    pub fn coords(&self, idx: usize) -> (usize, usize, usize) {
        let k = idx % self.shape[2];
        let ij = idx / self.shape[2];
        (ij / self.shape[1], ij % self.shape[1], k)
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> T {
        self.data[self.index(i, j, k)]
    }

    pub fn set(&mut self, i: usize, j: usize, k: usize, value: T) {
        let idx = self.index(i, j, k);
        self.data[idx] = value;
    }

    /// Drops `border` cells from both ends of every axis.
    pub fn crop(&self, border: usize) -> Result<Self> {
        let [nx, ny, nz] = self.shape;
        if nx <= 2 * border || ny <= 2 * border || nz <= 2 * border {
            return Err(TextureError::config(format!(
                "cannot crop {} cells per side from a {}x{}x{} grid",
                border, nx, ny, nz
            )));
        }
        let shape = [nx - 2 * border, ny - 2 * border, nz - 2 * border];
        let mut data = Vec::with_capacity(shape[0] * shape[1] * shape[2]);
        for i in border..nx - border {
            for j in border..ny - border {
                let start = self.index(i, j, border);
                data.extend_from_slice(&self.data[start..start + shape[2]]);
            }
        }
        Ok(Self { shape, data })
    }
}

impl Grid3<f32> {
    /// Fills a grid with independent standard-normal samples scaled by `scale`.
    pub fn random_normal<R: Rng>(shape: [usize; 3], scale: f32, rng: &mut R) -> Self {
        let len = shape[0] * shape[1] * shape[2];
        let data = (0..len)
            .map(|_| rng.sample::<f32, _>(StandardNormal) * scale)
            .collect();
        Self { shape, data }
    }

    /// (min, max) over all cells.
    pub fn range(&self) -> (f32, f32) {
        value_range(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_index_roundtrip() {
        let grid = Grid3::<f32>::zeros([3, 4, 5]);
        for idx in 0..grid.len() {
            let (i, j, k) = grid.coords(idx);
            assert_eq!(grid.index(i, j, k), idx);
        }
    }

    #[test]
    fn test_crop_keeps_interior() {
        let mut grid = Grid3::<f32>::zeros([6, 6, 6]);
        grid.set(2, 3, 2, 7.0);
        let cropped = grid.crop(2).unwrap();
        assert_eq!(cropped.shape(), [2, 2, 2]);
        assert_eq!(cropped.get(0, 1, 0), 7.0);
        assert!(grid.crop(3).is_err());
    }

    #[test]
    fn test_random_normal_is_reproducible() {
        let a = Grid3::random_normal([4, 4, 4], 1.0, &mut ChaCha8Rng::seed_from_u64(7));
        let b = Grid3::random_normal([4, 4, 4], 1.0, &mut ChaCha8Rng::seed_from_u64(7));
        let c = Grid3::random_normal([4, 4, 4], 1.0, &mut ChaCha8Rng::seed_from_u64(8));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_from_vec_checks_length() {
        assert!(Grid3::from_vec([2, 2, 2], vec![0.0f32; 8]).is_ok());
        assert!(Grid3::from_vec([2, 2, 2], vec![0.0f64; 9]).is_err());
    }
}
