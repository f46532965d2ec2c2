//! Per-cell data laid out on a [`GridShape`].

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::GridShape;
use crate::error::{Result, TextureError};

/// A 2D array with one value per sphere-grid cell, stored in row-major
/// (latitude-row) order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereMap<T> {
    shape: GridShape,
    data: Vec<T>,
}

impl<T> SphereMap<T> {
    /// Wraps `data`, which must hold exactly one value per cell.
    pub fn from_vec(shape: GridShape, data: Vec<T>) -> Result<Self> {
        if data.len() != shape.len() {
            return Err(TextureError::ShapeMismatch {
                expected: shape.len(),
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn theta_width(&self) -> usize {
        self.shape.theta_width
    }

    pub fn phi_width(&self) -> usize {
        self.shape.phi_width
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns one latitude row.
    pub fn row(&self, row: usize) -> &[T] {
        let w = self.shape.theta_width;
        &self.data[row * w..(row + 1) * w]
    }

    /// Fails unless `other` covers the same grid.
    pub fn check_same_shape<U>(&self, other: &SphereMap<U>) -> Result<()> {
        if self.shape != other.shape {
            return Err(TextureError::ShapeMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }
        Ok(())
    }
}

impl<T: Copy> SphereMap<T> {
    /// A map with every cell set to `value`.
    pub fn filled(shape: GridShape, value: T) -> Self {
        Self {
            shape,
            data: vec![value; shape.len()],
        }
    }

    /// Returns the value at `(row, col)`.
    ///
    /// # Panics
    /// Panics if the coordinate is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[self.shape.index(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) {
        let i = self.shape.index(row, col);
        self.data[i] = value;
    }
}

impl<T: Send + Sync> SphereMap<T> {
    /// Applies `f` to every cell in parallel, producing a map of the same shape.
    pub fn map<U, F>(&self, f: F) -> SphereMap<U>
    where
        U: Send,
        F: Fn(&T) -> U + Send + Sync,
    {
        SphereMap {
            shape: self.shape,
            data: self.data.par_iter().map(f).collect(),
        }
    }
}

impl SphereMap<f32> {
    /// Returns (min, max) over all cells.
    pub fn range(&self) -> (f32, f32) {
        value_range(&self.data)
    }

    pub fn min(&self) -> f32 {
        self.range().0
    }

    pub fn max(&self) -> f32 {
        self.range().1
    }

    /// Shifts every value so the minimum becomes exactly zero.
    pub fn shift_to_zero(&mut self) {
        let min = self.min();
        self.data.par_iter_mut().for_each(|v| *v -= min);
    }
}

/// Computes (min, max) of a slice; returns `(f32::MAX, f32::MIN)` when empty.
pub fn value_range(values: &[f32]) -> (f32, f32) {
    values
        .iter()
        .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}
