//! planet-texture CLI - Procedural planet surface textures.
//!
//! Generate height, surface color and specular maps for whole planets from
//! multi-octave spherical noise, optionally with a crater layer.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use planet_texture::export::{export_gray_png, export_planet_maps, export_rgb_png, PngExportOptions};
use planet_texture::quantize::{to_uint8, to_uint8_rgb};
use planet_texture::terrain::{PlanetConfig, PlanetGenerator};
use planet_texture::texture::{TextureConfig, TextureGenerator};
use planet_texture::CraterConfig;

/// Procedural planet texture generator.
#[derive(Parser)]
#[command(name = "planet-texture")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate height, surface and specular maps for a planet.
    Generate {
        /// Planet preset to start from.
        #[arg(short, long, default_value = "green")]
        preset: Preset,

        /// JSON planet configuration (replaces the preset).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Random seed for reproducible generation.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Longitude columns; latitude rows are half of this.
        #[arg(long)]
        theta_width: Option<usize>,

        /// Normalized waterline (0 disables water, 1 floods everything).
        #[arg(long)]
        waterline: Option<f32>,

        /// Color noise amplitude (0 disables color noise).
        #[arg(long)]
        noise_amp: Option<f32>,

        /// Gaussian blur sigma applied to the heightmap, in cells.
        #[arg(long)]
        blur: Option<f32>,

        /// Crater impulse density in [0, 1); 0 disables craters.
        #[arg(long)]
        crater_density: Option<f32>,

        /// Write the height map as 16-bit PNG.
        #[arg(long)]
        height_16bit: bool,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "planet")]
        name: String,
    },

    /// Generate a single colorized surface texture without terrain classes.
    Surface {
        /// Noise octave resolutions, comma separated.
        #[arg(long, value_delimiter = ',', default_value = "5,10,20,100,200")]
        resolutions: Vec<usize>,

        /// Gaussian blur sigma, in cells.
        #[arg(long, default_value = "5.0")]
        blur: f32,

        /// Per-channel weight applied to the texture, comma separated.
        #[arg(long, value_delimiter = ',', default_value = "0.5,0.5,0.7")]
        base_color: Vec<f32>,

        /// Color noise amplitude.
        #[arg(long, default_value = "0.05")]
        noise_amp: f32,

        /// Longitude columns; latitude rows are half of this.
        #[arg(long, default_value = "2000")]
        theta_width: usize,

        /// Random seed for reproducible generation.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Also write the scalar texture as a grayscale height map.
        #[arg(long)]
        with_height: bool,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "texture")]
        name: String,
    },

    /// Display grid size and memory estimates.
    Info {
        /// Longitude columns; latitude rows are half of this.
        #[arg(short, long, default_value = "2000")]
        theta_width: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    /// Oceans, green lowlands and pale peaks.
    Green,
    /// Dry red world.
    Rocky,
    /// Banded gas giant.
    GasGiant,
    /// Brown moon of a gas giant.
    GasMoon,
    /// Icy moon with a high sea.
    IceMoon,
    /// Grey moon of the green planet.
    GreenMoon,
    /// Grey moon with craters.
    CrateredMoon,
}

impl Preset {
    fn config(self) -> PlanetConfig {
        match self {
            Preset::Green => PlanetConfig::green(),
            Preset::Rocky => PlanetConfig::rocky(),
            Preset::GasGiant => PlanetConfig::gas_giant(),
            Preset::GasMoon => PlanetConfig::gas_moon(),
            Preset::IceMoon => PlanetConfig::ice_moon(),
            Preset::GreenMoon => PlanetConfig::green_moon(),
            Preset::CrateredMoon => PlanetConfig::cratered_moon(),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            preset,
            config,
            seed,
            theta_width,
            waterline,
            noise_amp,
            blur,
            crater_density,
            height_16bit,
            output,
            name,
        } => {
            let mut planet = match &config {
                Some(path) => PlanetConfig::load_json(path).unwrap_or_else(|e| {
                    eprintln!("Error loading {}: {}", path.display(), e);
                    std::process::exit(1);
                }),
                None => preset.config(),
            };

            // A config file keeps its own seed unless one is given explicitly.
            if let Some(seed) = seed {
                planet.texture.seed = seed;
            } else if config.is_none() {
                planet.texture.seed = random_seed();
            }
            if let Some(tw) = theta_width {
                planet.texture.theta_width = tw;
                planet.texture.phi_width = None;
            }
            if let Some(wl) = waterline {
                planet.colormap.waterline = wl;
            }
            if let Some(amp) = noise_amp {
                planet.colormap.noise_amp = amp;
            }
            if let Some(b) = blur {
                planet.colormap.blur = b;
            }
            if let Some(density) = crater_density {
                planet.texture.craters = CraterConfig {
                    density,
                    ..planet.texture.craters.clone()
                };
            }

            run_generate(planet, height_16bit, output, name);
        }
        Commands::Surface {
            resolutions,
            blur,
            base_color,
            noise_amp,
            theta_width,
            seed,
            with_height,
            output,
            name,
        } => {
            let base_color: [f32; 3] = base_color.try_into().unwrap_or_else(|v: Vec<f32>| {
                eprintln!("Error: Base color needs exactly 3 components, got {}", v.len());
                std::process::exit(1);
            });
            let config = TextureConfig {
                resolutions,
                theta_width,
                phi_width: None,
                seed: seed.unwrap_or_else(random_seed),
                ..Default::default()
            };
            run_surface(config, blur, base_color, noise_amp, with_height, output, name);
        }
        Commands::Info { theta_width } => {
            run_info(theta_width);
        }
    }
}

fn random_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn run_generate(planet: PlanetConfig, height_16bit: bool, output: PathBuf, name: String) {
    if let Err(e) = planet.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let texture = &planet.texture;
    println!("planet-texture - Procedural Planet Generator");
    println!("============================================");
    println!("Grid: {}x{}", texture.theta_width, texture.phi_width());
    println!("Octaves: {:?}", texture.resolutions);
    println!("Seed: {}", texture.seed);
    println!(
        "Waterline: {}, color noise: {}, blur: {}",
        planet.colormap.waterline, planet.colormap.noise_amp, planet.colormap.blur
    );
    if texture.craters.enabled() {
        println!(
            "Craters: density {}, {}^3 volume",
            texture.craters.density, texture.craters.resolution
        );
    }
    println!("Output: {}", output.display());

    let start = Instant::now();
    let total = 3;

    println!("\n  [1/{}] Starting: noise fields", total);
    let mut generator = PlanetGenerator::new(planet.texture.clone()).unwrap_or_else(|e| {
        eprintln!("Error building noise fields: {}", e);
        std::process::exit(1);
    });
    println!("  [1/{}] Completed: noise fields", total);

    println!("  [2/{}] Starting: heightmap", total);
    generator.heightmap(planet.colormap.blur).unwrap_or_else(|e| {
        eprintln!("Error generating heightmap: {}", e);
        std::process::exit(1);
    });
    println!("  [2/{}] Completed: heightmap", total);

    println!("  [3/{}] Starting: colormap", total);
    let maps = generator.get_colormap(&planet.colormap).unwrap_or_else(|e| {
        eprintln!("Error generating colormap: {}", e);
        std::process::exit(1);
    });
    println!("  [3/{}] Completed: colormap", total);

    let gen_time = start.elapsed();
    println!("Generation completed in {:.2?}", gen_time);
    println!("Water coverage: {:.1}%", maps.water_fraction() * 100.0);
    let (slope_min, slope_max) = maps.gradient.range();
    println!("Slope range: {:.4} .. {:.4}", slope_min, slope_max);

    println!("\nExporting maps...");
    let export_start = Instant::now();
    let options = PngExportOptions {
        height_16bit,
        ..Default::default()
    };
    let paths = export_planet_maps(&maps, &output, &name, &options).unwrap_or_else(|e| {
        eprintln!("Error exporting PNG: {}", e);
        std::process::exit(1);
    });
    for path in &paths {
        println!("  Exported {}", path.display());
    }

    println!("Export completed in {:.2?}", export_start.elapsed());
    println!("\nTotal time: {:.2?}", start.elapsed());
    println!("Done!");
}

fn run_surface(
    config: TextureConfig,
    blur: f32,
    base_color: [f32; 3],
    noise_amp: f32,
    with_height: bool,
    output: PathBuf,
    name: String,
) {
    println!("planet-texture - Surface Texture");
    println!("================================");
    println!("Grid: {}x{}", config.theta_width, config.phi_width());
    println!("Octaves: {:?}", config.resolutions);
    println!("Seed: {}", config.seed);

    let start = Instant::now();
    let mut generator = TextureGenerator::new(config).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let texture = generator.get_texture(blur).unwrap_or_else(|e| {
        eprintln!("Error generating texture: {}", e);
        std::process::exit(1);
    });
    let colorized = generator
        .colorize(&texture, base_color, noise_amp)
        .unwrap_or_else(|e| {
            eprintln!("Error colorizing texture: {}", e);
            std::process::exit(1);
        });
    println!("Generation completed in {:.2?}", start.elapsed());

    std::fs::create_dir_all(&output).unwrap_or_else(|e| {
        eprintln!("Error creating output directory: {}", e);
        std::process::exit(1);
    });
    let options = PngExportOptions::default();

    let pixels = to_uint8_rgb(colorized.as_slice(), 0.2, 0.6).unwrap_or_else(|e| {
        eprintln!("Error quantizing surface: {}", e);
        std::process::exit(1);
    });
    let surface_path = output.join(format!("{}_surface.png", name));
    export_rgb_png(&pixels, colorized.shape(), &surface_path, &options).unwrap_or_else(|e| {
        eprintln!("Error exporting PNG: {}", e);
        std::process::exit(1);
    });
    println!("  Exported {}", surface_path.display());

    if with_height {
        let bytes = to_uint8(texture.as_slice(), 0.0, 1.0).unwrap_or_else(|e| {
            eprintln!("Error quantizing height: {}", e);
            std::process::exit(1);
        });
        let height_path = output.join(format!("{}_height.png", name));
        export_gray_png(&bytes, texture.shape(), &height_path, &options).unwrap_or_else(|e| {
            eprintln!("Error exporting PNG: {}", e);
            std::process::exit(1);
        });
        println!("  Exported {}", height_path.display());
    }

    println!("\nTotal time: {:.2?}", start.elapsed());
    println!("Done!");
}

fn run_info(theta_width: usize) {
    let phi_width = theta_width / 2;
    let cells = (theta_width as u64) * (phi_width as u64);

    let mb = |bytes: u64| bytes as f64 / 1024.0 / 1024.0;
    let bytes_points = cells * 12; // Vec3
    let bytes_height = cells * 4; // f32
    let bytes_gradient = cells * 4; // f32
    let bytes_colormap = cells * 12; // [f32; 3] before culling
    let bytes_color = cells * 3;
    let bytes_specular = cells;

    let crater = CraterConfig::default();
    let crater_cells = (crater.simulated_resolution() as u64).pow(3);
    let bytes_crater = crater_cells * 4 * 2; // displacement + velocity

    println!("planet-texture - Grid Info");
    println!("==========================");
    println!();
    println!("Grid: {}x{} (longitude x latitude)", theta_width, phi_width);
    println!("Cells: {:>12}", cells);
    println!();
    println!("Memory usage (in-memory):");
    println!("  Sphere points: {:>12} bytes ({:.2} MB)", bytes_points, mb(bytes_points));
    println!("  Heightmap:     {:>12} bytes ({:.2} MB)", bytes_height, mb(bytes_height));
    println!("  Gradient:      {:>12} bytes ({:.2} MB)", bytes_gradient, mb(bytes_gradient));
    println!("  Colormap:      {:>12} bytes ({:.2} MB)", bytes_colormap, mb(bytes_colormap));
    println!("  Surface:       {:>12} bytes ({:.2} MB)", bytes_color, mb(bytes_color));
    println!("  Specular:      {:>12} bytes ({:.2} MB)", bytes_specular, mb(bytes_specular));
    let total = bytes_points + bytes_height + bytes_gradient + bytes_colormap + bytes_color + bytes_specular;
    println!("  Total:         {:>12} bytes ({:.2} MB)", total, mb(total));
    println!();
    println!(
        "Crater simulation ({}^3 lattice): {} bytes ({:.2} MB)",
        crater.simulated_resolution(),
        bytes_crater,
        mb(bytes_crater)
    );
    println!();
    println!("Uncompressed image sizes:");
    println!("  Height (8-bit):  {:>10} bytes", cells);
    println!("  Height (16-bit): {:>10} bytes", cells * 2);
    println!("  Surface (RGB):   {:>10} bytes", cells * 3);
    println!("  Specular:        {:>10} bytes", cells);

    if theta_width % 2 != 0 {
        println!();
        println!("Note: odd width; latitude rows round down to {}", phi_width);
    }
}
