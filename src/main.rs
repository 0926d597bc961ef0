use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use glam::IVec2;
use sandfall::config::SimConfig;
use sandfall::levels::{DemoScene, FLOOR_Y};
use sandfall::render::PixelRenderer;
use sandfall::simulation::FallingSandSim;
use sandfall::world::TickStats;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Level file to load before simulating
    #[arg(long)]
    level: Option<PathBuf>,

    /// Build a demo scene: playground, inferno, lava-water, demolition
    #[arg(long)]
    demo: Option<String>,

    /// List available demo scenes
    #[arg(long)]
    list_demos: bool,

    /// Number of ticks to simulate
    #[arg(long, default_value = "120")]
    ticks: u32,

    /// RNG seed (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Config file stem (looks for <stem>.ron)
    #[arg(long, default_value = "sandfall")]
    config: String,

    /// Write a PNG of the final state
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Snapshot width in cells
    #[arg(long, default_value = "160")]
    snapshot_width: usize,

    /// Snapshot height in cells
    #[arg(long, default_value = "100")]
    snapshot_height: usize,

    /// Save the final state as a level file
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command-line arguments
    let args = Args::parse();

    // Handle --list-demos flag
    if args.list_demos {
        println!("Available demo scenes:");
        for scene in DemoScene::ALL {
            println!("  {}", scene.name());
        }
        return Ok(());
    }

    let mut config = SimConfig::load_from(&args.config)?;
    if args.seed.is_some() {
        config.simulation.seed = args.seed;
    }
    let mut sim = FallingSandSim::new(&config);

    if let Some(name) = &args.demo {
        let scene = DemoScene::from_str(name)
            .with_context(|| format!("Unknown demo scene '{}' (see --list-demos)", name))?;
        scene.build(&mut sim);
    }

    if let Some(path) = &args.level {
        anyhow::ensure!(path.exists(), "Level file {:?} not found", path);
        sim.load_level(path)?;
    }

    log::info!("Simulating {} ticks...", args.ticks);
    let mut totals = TickStats::default();
    for _ in 0..args.ticks {
        let stats = sim.tick();
        totals.materials_stepped += stats.materials_stepped;
        totals.chunks_pruned += stats.chunks_pruned;
        totals.explosions += stats.explosions;
    }

    println!("frames:            {}", sim.frame());
    println!("materials:         {}", sim.count_materials());
    println!("chunks:            {}", sim.world().chunk_count());
    println!("steps:             {}", totals.materials_stepped);
    println!("chunks pruned:     {}", totals.chunks_pruned);
    println!("explosions:        {}", totals.explosions);

    if let Some(path) = &args.snapshot {
        let mut renderer = PixelRenderer::new(args.snapshot_width, args.snapshot_height);
        renderer.render_centered(sim.world(), IVec2::new(0, FLOOR_Y / 2));
        renderer.save_png(path)?;
    }

    if let Some(path) = &args.save {
        sim.save_level(path)?;
    }

    Ok(())
}
