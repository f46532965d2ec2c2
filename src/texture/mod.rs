//! Scalar and colorized texture synthesis.
//!
//! Octave noise fields (plus an optional crater volume) are sampled on a
//! [`SphereGrid`](crate::geometry::SphereGrid), averaged, smoothed and shifted
//! to a zero floor.

mod blur;
mod color_noise;
mod config;
mod generator;

pub use blur::{gaussian_blur_wrap, gaussian_kernel};
pub use color_noise::{ColorNoise, COLOR_OCTAVES};
pub use config::{TextureConfig, COLOR_SEED_OFFSET, CRATER_SEED_OFFSET, OCTAVE_SEED_STRIDE};
pub use generator::TextureGenerator;
