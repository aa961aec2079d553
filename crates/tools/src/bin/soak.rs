use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use dungeon::mapgen::validate_floor;
use dungeon::{Dungeon, DungeonConfig, GenerationMode, StairPlan, TileKind};
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Generate many dungeons and check every floor", long_about = None)]
struct Args {
    /// Seed for the stream that picks dungeon seeds
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    runs: u32,
    #[arg(short, long, default_value_t = 5)]
    floors: u32,
    /// Optional TOML or JSON config to soak instead of the defaults
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn check_dungeon(config: &DungeonConfig) -> Result<()> {
    let dungeon = Dungeon::generate(config.clone())?;
    for depth in 1..=config.floor_count {
        let Some(floor) = dungeon.generated_floor(depth) else {
            bail!("seed {} depth {depth}: floor missing after eager generation", config.seed);
        };
        let floor = floor.read();

        if let Err(failure) = validate_floor(&floor, &config.generator) {
            bail!("seed {} depth {depth}: {failure}", config.seed);
        }
        let plan = StairPlan::for_depth(depth, config.floor_count);
        let up = floor.count_tiles(TileKind::UpStairs);
        let down = floor.count_tiles(TileKind::DownStairs);
        if up != usize::from(plan.up) || down != usize::from(plan.down) {
            bail!(
                "seed {} depth {depth}: {up} up / {down} down stairs, expected {plan:?}",
                config.seed
            );
        }
        let (max_width, max_height) = (config.generator.max_width, config.generator.max_height);
        if floor.width() > max_width || floor.height() > max_height {
            bail!("seed {} depth {depth}: floor exceeds the size cap", config.seed);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dungeon=warn,soak=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(io::stderr).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DungeonConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => DungeonConfig::default(),
    };
    config.floor_count = args.floors;
    config.mode = GenerationMode::Eager;

    println!("Soaking {} dungeons of {} floors from seed {}...", args.runs, args.floors, args.seed);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    for run in 0..args.runs {
        config.seed = rng.next_u64();
        check_dungeon(&config).with_context(|| format!("run {run} failed"))?;
        if (run + 1) % 50 == 0 {
            info!(completed = run + 1, "soak progress");
        }
    }

    println!("Soak completed: {} dungeons, {} floors checked.", args.runs, args.runs * args.floors);
    Ok(())
}
