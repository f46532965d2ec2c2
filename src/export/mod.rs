//! Export module for saving planet maps as image files.
//!
//! Height maps are written as 8-bit (or 16-bit) grayscale PNG, surface color
//! as RGB PNG and the water specular mask as 8-bit grayscale PNG.

mod png;

pub use png::{
    export_gray16_png,
    export_gray_png,
    export_height_png,
    export_planet_maps,
    export_rgb_png,
    export_specular_png,
    export_surface_png,
    ExportError,
    PngExportOptions,
};
