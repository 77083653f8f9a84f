//! Reliefgen CLI - procedural terrain generator.
//!
//! Generate a fractal-noise heightmap, sculpt it with particle-based
//! hydraulic erosion, and export the result as PNG, RAW or OBJ.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use reliefgen::erosion::ErosionConfig;
use reliefgen::export::{
    export_heightmap_png, export_heightmap_raw, export_mesh_obj, expected_file_size,
    PngExportOptions, RawFormat,
};
use reliefgen::mesh::build_mesh;
use reliefgen::noise::FractalNoiseConfig;
use reliefgen::pipeline::{ErosionStage, HeightmapStage, Pipeline, StageConfig};
use reliefgen::terrain::HeightGrid;

/// Procedural terrain generator with hydraulic erosion.
#[derive(Parser)]
#[command(name = "reliefgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an eroded terrain heightmap.
    Generate {
        /// Grid width in cells.
        #[arg(long, default_value = "200")]
        width: u32,

        /// Grid depth in cells.
        #[arg(long, default_value = "200")]
        depth: u32,

        /// Random seed for reproducible generation.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "terrain")]
        name: String,

        /// Export format.
        #[arg(short, long, default_value = "png")]
        format: ExportFormat,

        /// Number of noise octaves (1-16).
        #[arg(long, default_value = "4")]
        octaves: u8,

        /// Base noise frequency in cycles per grid unit.
        #[arg(long, default_value = "0.015")]
        frequency: f32,

        /// Frequency multiplier per octave (lacunarity).
        #[arg(long, default_value = "2.0")]
        lacunarity: f32,

        /// Amplitude decay per octave (persistence).
        #[arg(long, default_value = "0.5")]
        persistence: f32,

        /// Peak elevation of the base terrain.
        #[arg(long, default_value = "40.0")]
        amplitude: f32,

        /// Terrain preset overriding the individual noise flags.
        #[arg(long)]
        preset: Option<TerrainPreset>,

        // Erosion options
        /// Skip the erosion pass (raw noise terrain).
        #[arg(long)]
        skip_erosion: bool,

        /// Number of droplets to simulate.
        #[arg(long, default_value = "100000")]
        droplets: u32,

        /// Step budget per droplet.
        #[arg(long, default_value = "100")]
        max_steps: u32,

        /// Droplet direction inertia (0-1).
        #[arg(long, default_value = "0.1")]
        inertia: f32,

        /// Minimum slope for the capacity formula.
        #[arg(long, default_value = "0.05")]
        min_slope: f32,

        /// Sediment capacity factor.
        #[arg(long, default_value = "8.0")]
        capacity: f32,

        /// Deposition rate (0-1).
        #[arg(long, default_value = "0.02")]
        deposition: f32,

        /// Erosion rate (0-1).
        #[arg(long, default_value = "0.9")]
        erosion: f32,

        /// Evaporation rate per step (0-1).
        #[arg(long, default_value = "0.0125")]
        evaporation: f32,

        /// Gravity constant for the droplet speed update.
        #[arg(long, default_value = "10.0")]
        gravity: f32,

        /// Erosion brush radius in cells.
        #[arg(long, default_value = "4.0")]
        radius: f32,

        /// Also export the triangulated surface as OBJ.
        #[arg(long)]
        export_mesh: bool,
    },

    /// Display information about a terrain configuration.
    Info {
        /// Grid width in cells.
        #[arg(long, default_value = "200")]
        width: u32,

        /// Grid depth in cells.
        #[arg(long, default_value = "200")]
        depth: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TerrainPreset {
    /// Low-relief, gently undulating terrain.
    RollingHills,
    /// High-relief terrain with pronounced ridges.
    Mountainous,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    /// 16-bit PNG (universal compatibility).
    Png,
    /// 16-bit RAW little-endian (Unity).
    Raw,
    /// 32-bit float RAW (high precision).
    RawFloat,
    /// Wavefront OBJ mesh.
    Obj,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            width,
            depth,
            seed,
            output,
            name,
            format,
            octaves,
            frequency,
            lacunarity,
            persistence,
            amplitude,
            preset,
            skip_erosion,
            droplets,
            max_steps,
            inertia,
            min_slope,
            capacity,
            deposition,
            erosion,
            evaporation,
            gravity,
            radius,
            export_mesh,
        } => {
            run_generate(GenerateArgs {
                width,
                depth,
                seed,
                output,
                name,
                format,
                octaves,
                frequency,
                lacunarity,
                persistence,
                amplitude,
                preset,
                skip_erosion,
                droplets,
                max_steps,
                inertia,
                min_slope,
                capacity,
                deposition,
                erosion,
                evaporation,
                gravity,
                radius,
                export_mesh,
            });
        }
        Commands::Info { width, depth } => {
            run_info(width, depth);
        }
    }
}

struct GenerateArgs {
    width: u32,
    depth: u32,
    seed: Option<u64>,
    output: PathBuf,
    name: String,
    format: ExportFormat,
    octaves: u8,
    frequency: f32,
    lacunarity: f32,
    persistence: f32,
    amplitude: f32,
    preset: Option<TerrainPreset>,
    skip_erosion: bool,
    droplets: u32,
    max_steps: u32,
    inertia: f32,
    min_slope: f32,
    capacity: f32,
    deposition: f32,
    erosion: f32,
    evaporation: f32,
    gravity: f32,
    radius: f32,
    export_mesh: bool,
}

fn run_generate(args: GenerateArgs) {
    // Validate parameters
    if args.width == 0 || args.depth == 0 {
        eprintln!("Error: Grid dimensions must be non-zero");
        std::process::exit(1);
    }

    if args.width > 8192 || args.depth > 8192 {
        eprintln!("Error: Grid dimensions must be at most 8192");
        std::process::exit(1);
    }

    if args.octaves < 1 || args.octaves > 16 {
        eprintln!("Error: Octaves must be between 1 and 16");
        std::process::exit(1);
    }

    // Generate seed if not provided
    let seed = args.seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos() as u64
    });

    println!("Reliefgen - Procedural Terrain Generator");
    println!("========================================");
    println!("Grid: {}x{} cells", args.width, args.depth);
    println!("Seed: {}", seed);
    println!("Output: {}", args.output.display());

    let start = Instant::now();

    let noise_config = match args.preset {
        Some(TerrainPreset::RollingHills) => {
            println!("Preset: rolling hills");
            FractalNoiseConfig::rolling_hills(seed as i32)
        }
        Some(TerrainPreset::Mountainous) => {
            println!("Preset: mountainous");
            FractalNoiseConfig::mountainous(seed as i32)
        }
        None => FractalNoiseConfig {
            octaves: args.octaves,
            frequency: args.frequency,
            lacunarity: args.lacunarity,
            persistence: args.persistence,
            amplitude: args.amplitude,
            seed: seed as i32,
        },
    };

    let erosion_config = ErosionConfig {
        droplet_count: args.droplets,
        max_steps: args.max_steps,
        inertia: args.inertia,
        min_slope: args.min_slope,
        capacity_factor: args.capacity,
        deposition_rate: args.deposition,
        erosion_rate: args.erosion,
        evaporation_rate: args.evaporation,
        gravity: args.gravity,
        radius: args.radius,
        seed,
        ..Default::default()
    };

    if let Err(e) = erosion_config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    println!("\nRunning generation pipeline...");
    let mut grid = HeightGrid::new(args.width, args.depth);
    let stage_config = StageConfig::with_noise(noise_config);
    let mut pipeline = Pipeline::new(stage_config);
    pipeline.add_stage(HeightmapStage);

    if !args.skip_erosion {
        pipeline.add_stage(ErosionStage::new(erosion_config));
        println!("Erosion enabled: {} droplets", args.droplets);
    } else {
        println!("Erosion: SKIPPED");
    }

    pipeline
        .run_with_callbacks(
            &mut grid,
            |name, i, total| {
                println!("  [{}/{}] Starting: {}", i + 1, total, name);
            },
            |name, i, total| {
                println!("  [{}/{}] Completed: {}", i + 1, total, name);
            },
        )
        .unwrap_or_else(|e| {
            eprintln!("Error during generation: {}", e);
            std::process::exit(1);
        });

    let gen_time = start.elapsed();
    println!("Generation completed in {:.2?}", gen_time);

    let (min_h, max_h) = grid.height_range();
    println!("Height range: [{:.4}, {:.4}]", min_h, max_h);

    // Export
    println!("\nExporting...");
    let export_start = Instant::now();

    std::fs::create_dir_all(&args.output).unwrap_or_else(|e| {
        eprintln!("Error creating output directory: {}", e);
        std::process::exit(1);
    });

    match args.format {
        ExportFormat::Png => {
            let path = args.output.join(format!("{}.png", args.name));
            let options = PngExportOptions::auto_range(&grid);
            export_heightmap_png(&grid, &path, &options).unwrap_or_else(|e| {
                eprintln!("Error exporting PNG: {}", e);
                std::process::exit(1);
            });
            println!("  Exported {}", path.display());
        }
        ExportFormat::Raw => {
            let path = args.output.join(format!("{}.raw", args.name));
            export_heightmap_raw(&grid, &path, RawFormat::R16LittleEndian, min_h, max_h)
                .unwrap_or_else(|e| {
                    eprintln!("Error exporting RAW: {}", e);
                    std::process::exit(1);
                });
            println!("  Exported {} (R16)", path.display());
        }
        ExportFormat::RawFloat => {
            let path = args.output.join(format!("{}.raw", args.name));
            export_heightmap_raw(&grid, &path, RawFormat::R32Float, min_h, max_h)
                .unwrap_or_else(|e| {
                    eprintln!("Error exporting RAW: {}", e);
                    std::process::exit(1);
                });
            println!("  Exported {} (R32 float)", path.display());
        }
        ExportFormat::Obj => {
            let mesh = build_mesh(&grid);
            let path = args.output.join(format!("{}.obj", args.name));
            export_mesh_obj(&mesh, &path).unwrap_or_else(|e| {
                eprintln!("Error exporting OBJ: {}", e);
                std::process::exit(1);
            });
            println!("  Exported {}", path.display());
        }
    }

    // Export the mesh alongside the heightmap if requested.
    if args.export_mesh && !matches!(args.format, ExportFormat::Obj) {
        let mesh = build_mesh(&grid);
        let path = args.output.join(format!("{}.obj", args.name));
        export_mesh_obj(&mesh, &path).unwrap_or_else(|e| {
            eprintln!("Error exporting OBJ: {}", e);
            std::process::exit(1);
        });
        println!(
            "  Exported {} ({} vertices, {} triangles)",
            path.display(),
            mesh.vertex_count(),
            mesh.triangle_count()
        );
    }

    let export_time = export_start.elapsed();
    let total_time = start.elapsed();

    println!("Export completed in {:.2?}", export_time);
    println!("\nTotal time: {:.2?}", total_time);
    println!("Done!");
}

fn run_info(width: u32, depth: u32) {
    let nodes = ((width as u64) + 1) * ((depth as u64) + 1);
    let cells = (width as u64) * (depth as u64);

    let bytes_heights = nodes * 4; // f32
    let bytes_vertices = nodes * 12; // Vec3
    let bytes_indices = cells * 6 * 4; // two triangles per cell, u32

    println!("Reliefgen - Terrain Configuration Info");
    println!("=======================================");
    println!();
    println!("Grid: {}x{} cells", width, depth);
    println!("Node samples: {}", nodes);
    println!();
    println!("Memory usage (in-memory):");
    println!(
        "  Heights:  {:>12} bytes ({:.2} MB)",
        bytes_heights,
        bytes_heights as f64 / 1024.0 / 1024.0
    );
    println!(
        "  Vertices: {:>12} bytes ({:.2} MB)",
        bytes_vertices,
        bytes_vertices as f64 / 1024.0 / 1024.0
    );
    println!(
        "  Indices:  {:>12} bytes ({:.2} MB)",
        bytes_indices,
        bytes_indices as f64 / 1024.0 / 1024.0
    );
    println!();
    println!("Export file sizes:");
    println!(
        "  PNG (16-bit, upper bound): {:>12} bytes",
        nodes * 2
    );
    println!(
        "  RAW (R16):                 {:>12} bytes",
        expected_file_size(width, depth, RawFormat::R16LittleEndian)
    );
    println!(
        "  RAW (R32):                 {:>12} bytes",
        expected_file_size(width, depth, RawFormat::R32Float)
    );
}
