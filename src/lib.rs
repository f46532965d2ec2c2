//! Procedural planet surface textures.
//!
//! This crate samples multi-octave 3D noise (and optionally a simulated crater
//! volume) on a longitude/latitude sphere grid to build heightmaps, then turns
//! them into surface color, water specular masks and water-flattened height
//! images ready for export.

pub mod craters;
pub mod error;
pub mod export;
pub mod geometry;
pub mod noise;
pub mod quantize;
pub mod terrain;
pub mod texture;

pub use craters::{generate_cratermap, CraterConfig};
pub use error::{Result, TextureError};
pub use geometry::{GridShape, SphereGrid, SphereMap};
pub use noise::{Interpolation, NoiseField};
pub use terrain::{
    ColormapConfig, Palette, PlanetConfig, PlanetGenerator, PlanetMaps,
};
pub use texture::{TextureConfig, TextureGenerator};
