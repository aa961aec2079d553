use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dungeon::{Dungeon, DungeonConfig, GenerationMode, RoomTag};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Generate a dungeon and summarize its floors", long_about = None)]
struct Args {
    /// TOML or JSON dungeon config; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Overrides the config seed
    #[arg(short, long)]
    seed: Option<u64>,
    /// Overrides the config floor count
    #[arg(short, long)]
    floors: Option<u32>,
    /// Write the generated dungeon record as JSON
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dungeon=info,warn"));
    tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(io::stderr).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DungeonConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => DungeonConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(floors) = args.floors {
        config.floor_count = floors;
    }
    // Every floor is summarized, so lazy mode would only defer the same work.
    config.mode = GenerationMode::Eager;

    let dungeon = Dungeon::generate(config).context("Dungeon generation was rejected")?;

    println!("Seed: {}  Floors: {}", dungeon.seed(), dungeon.floor_count());
    for depth in dungeon.generated_depths() {
        let Some(floor) = dungeon.generated_floor(depth) else {
            continue;
        };
        let floor = floor.read();
        let special = floor.rooms.iter().filter(|room| room.tag != RoomTag::Standard).count();
        println!(
            "Floor {:>2}: {}x{}  rooms {:>2} ({} tagged)  entrance ({}, {})  exit ({}, {})  stairs {}{}  fingerprint {:016x}",
            floor.depth,
            floor.width(),
            floor.height(),
            floor.rooms.len(),
            special,
            floor.entrance.x,
            floor.entrance.y,
            floor.exit.x,
            floor.exit.y,
            if floor.up_stairs.is_some() { "up" } else { "--" },
            if floor.down_stairs.is_some() { "/down" } else { "/--" },
            floor.fingerprint(),
        );
    }

    if let Some(out) = &args.out {
        let json = serde_json::to_string_pretty(&dungeon.to_record())
            .context("Failed to serialize dungeon record")?;
        fs::write(out, json).with_context(|| format!("Failed to write {}", out.display()))?;
        println!("Wrote {}", out.display());
    }

    Ok(())
}
