//! Spherical sampling geometry.
//!
//! Provides the longitude/latitude grid every field is evaluated on, and the
//! per-cell map type used for heightmaps, gradients and color maps.

mod map;
mod sphere_grid;

pub use map::{SphereMap, value_range};
pub use sphere_grid::{GridShape, SphereGrid, longitude_chord, spherical_to_cartesian};
