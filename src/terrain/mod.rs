//! Terrain coloring.
//!
//! Turns a heightmap into surface color, a water specular mask and a
//! water-flattened elevation map, using an elevation/slope classification.

mod colormap;
mod config;
mod gradient;
mod heightmap;
mod planet;

pub use colormap::{cull_pixel, fill_colormap, smart_cull};
pub use config::{ColormapConfig, ConfigFileError, Palette, PlanetConfig};
pub use gradient::{get_gradient, GradientMode};
pub use heightmap::{
    flatten_below, water_cutoff, ColorImage, Colormap, GradientField, Heightmap, SpecularMask,
};
pub use planet::{generate_planet, PlanetGenerator, PlanetMaps};
