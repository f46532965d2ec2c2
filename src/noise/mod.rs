//! Random 3D scalar fields and their continuous samplers.

mod field;
mod grid;

pub use field::{DOMAIN_MAX, DOMAIN_MIN, Interpolation, NoiseField};
pub use grid::Grid3;
