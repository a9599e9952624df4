use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dungeon_core::mapgen::MapGenerator;
use dungeon_core::{FloorPlan, GeneratorConfig, PrefabSet, Team, Tile};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Ascii,
    Json,
}

#[derive(Parser)]
#[command(author, version, about = "Generate a dungeon floor plan", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Optional TOML generator configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = Format::Ascii)]
    format: Format,
    /// Log placement decisions
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct Export<'a> {
    seed: u64,
    fingerprint: u64,
    prefabs: &'a PrefabSet,
    plan: FloorPlan,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    let mut generator = MapGenerator::new(config).context("Invalid generator config")?;
    let report = generator.regenerate_seeded(args.seed);
    let plan = generator.floor_plan();
    let fingerprint = plan.fingerprint();

    match args.format {
        Format::Ascii => {
            print!("{}", render_ascii(&generator));
            println!();
            println!("Seed: {}", args.seed);
            println!("Rooms: {} / {}", report.rooms_placed, report.target_rooms);
            println!("Merges: {}", report.merges);
            println!("Fallback retries: {}", report.fallback_retries);
            println!("Exhausted: {}", report.exhausted);
            let graph = generator.graph();
            println!("Nodes: {} ({} edges)", graph.len(), graph.edge_count());
            for team in [Team::Blue, Team::Red] {
                if let Some(spawn) = plan.spawn(team) {
                    println!("{team:?} spawn: room {} node {}", spawn.room, spawn.primary);
                }
            }
            println!("Fingerprint: {fingerprint:016x}");
        }
        Format::Json => {
            let export =
                Export { seed: args.seed, fingerprint, prefabs: &generator.config().prefabs, plan };
            let json =
                serde_json::to_string_pretty(&export).context("Failed to serialize floor plan")?;
            println!("{json}");
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

/// One character per tile, north at the top.
fn render_ascii(generator: &MapGenerator) -> String {
    let mut glyphs: BTreeMap<Tile, char> = BTreeMap::new();
    for room in generator.rooms() {
        for tile in room.tiles() {
            glyphs.insert(tile, '#');
        }
        for &tile in room.floor_tiles() {
            glyphs.insert(tile, '.');
        }
        for tile in room.doorway_tiles() {
            glyphs.insert(tile, '+');
        }
    }
    if let Some(regions) = generator.spawns() {
        for (team, glyph) in [(Team::Blue, 'A'), (Team::Red, 'B')] {
            if let Some(node) = generator.graph().get(regions.team(team).primary) {
                glyphs.insert(node.tile, glyph);
            }
        }
    }

    let Some(bounds) = generator.index().bounds() else {
        return String::new();
    };
    let mut out = String::new();
    for y in (bounds.min.y..=bounds.max.y).rev() {
        for x in bounds.min.x..=bounds.max.x {
            out.push(glyphs.get(&Tile::new(x, y)).copied().unwrap_or(' '));
        }
        out.push('\n');
    }
    out
}
