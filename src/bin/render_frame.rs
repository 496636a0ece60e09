use clap::Parser;
use shoreline::config::load_settings;
use shoreline::config::range_types::TileSize;
use shoreline::render::{FrameStats, PixelCanvas, RegionRenderer};
use shoreline::{CellSource, NoiseWorld, ShorelineError, ShorelineResult, TileWorld, WorldPreset};
use std::path::Path;

mod render_frame {
    pub mod cli_utils;
}

use render_frame::cli_utils::*;

#[derive(Parser, Clone)]
#[command(name = "render_frame")]
#[command(about = "Render frames of a tile world to PNG files")]
struct Args {
    /// World file: an ASCII map, or a binary world ending in .bin
    #[arg(long)]
    world: Option<String>,

    /// Procedural world preset used when no --world is given (lake, archipelago, grove, sanctuary)
    #[arg(long)]
    preset: Option<String>,

    /// Seed for the procedural world
    #[arg(long)]
    seed: Option<u32>,

    /// Top-left corner of the view in tiles (format: X,Y)
    #[arg(long, default_value = "0,0")]
    origin: String,

    /// Frame size in pixels (format: WIDTHxHEIGHT)
    #[arg(long, default_value = "640x480")]
    size: String,

    /// Render clock of the first frame in milliseconds
    #[arg(long, default_value = "0.0")]
    time: f64,

    /// Number of frames to write
    #[arg(long, default_value = "1")]
    frames: u32,

    /// Milliseconds between consecutive frames
    #[arg(long, default_value = "100.0")]
    frame_step: f64,

    /// Tile edge length in pixels, overriding the config file
    #[arg(long)]
    tile_size: Option<f32>,

    /// Comma-separated layers to draw (background, world, sanctuary, sanctuary_dust)
    #[arg(long)]
    layers: Option<String>,

    /// Output PNG path; frames are numbered when more than one is written
    #[arg(long, default_value = "frame.png")]
    output: String,

    /// Also write the loaded ASCII world as a binary world file
    #[arg(long)]
    save_world: Option<String>,
}

fn load_ascii_world(path: &Path) -> ShorelineResult<TileWorld> {
    if !path.exists() {
        return Err(ShorelineError::WorldFileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|e| ShorelineError::InvalidWorldData {
        reason: format!("Cannot read {}: {e}", path.display()),
    })?;
    let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("world");
    TileWorld::from_ascii(name, &text)
}

fn load_source(args: &Args, preset_name: &str, default_seed: u32) -> ShorelineResult<Box<dyn CellSource>> {
    if let Some(world_path) = &args.world {
        let path = Path::new(world_path);
        let world = if path.extension().is_some_and(|ext| ext == "bin") {
            TileWorld::load_from_path(path)?
        } else {
            load_ascii_world(path)?
        };

        if let Some(save_path) = &args.save_world {
            world.save_to_path(save_path)?;
            println!("World saved to: {save_path}");
        }
        return Ok(Box::new(world));
    }

    if args.save_world.is_some() {
        println!("Warning: --save-world needs --world; procedural worlds are unbounded");
    }
    let preset: WorldPreset = args.preset.as_deref().unwrap_or(preset_name).parse()?;
    Ok(Box::new(NoiseWorld::new(preset, args.seed.unwrap_or(default_seed))))
}

fn main() -> ShorelineResult<()> {
    let args = Args::parse();

    // Parse and validate all CLI arguments
    let (width, height) = parse_size(&args.size)?;
    let origin = parse_origin(&args.origin)?;
    let mut settings = load_settings();
    if let Some(tile_size) = args.tile_size {
        settings.tile_size = TileSize::new(tile_size);
    }
    if let Some(layers) = &args.layers {
        settings.layers = parse_layers(layers)?;
    }

    let source = load_source(&args, &settings.world_preset, settings.world_seed)?;
    let mut renderer = RegionRenderer::new(settings);
    let frames = args.frames.max(1);

    let mut totals = FrameStats::default();
    for index in 0..frames {
        let clock_ms = args.time + index as f64 * args.frame_step;
        let mut canvas = PixelCanvas::new(width, height);
        let viewport = renderer.viewport_for(&canvas, origin);
        let stats = renderer.render_regions(&mut canvas, &*source, &viewport, clock_ms);

        let path = frame_path(&args.output, index, frames);
        canvas.into_image().save(&path)?;
        println!(
            "Frame {index} at {clock_ms} ms: {} regions, {} skipped, {} tiles -> {}",
            stats.regions,
            stats.skipped,
            stats.tiles,
            path.display()
        );
        totals.regions += stats.regions;
        totals.skipped += stats.skipped;
        totals.tiles += stats.tiles;
    }

    println!("\nRender summary:");
    println!("  Frames: {frames} at {width}x{height}");
    println!("  Origin: ({}, {}) tiles", origin.x, origin.y);
    println!(
        "  Regions drawn: {} ({} skipped), tiles drawn: {}",
        totals.regions, totals.skipped, totals.tiles
    );
    Ok(())
}
