use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use dungeon_core::mapgen::{Axis, MapGenerator};
use dungeon_core::{ConstructionType, GeneratorConfig};
use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short = 'n', long, default_value_t = 1000)]
    seeds: u64,
    #[arg(short, long, default_value_t = 0)]
    start: u64,
    /// Optional TOML generator configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    let mut generator = MapGenerator::new(config).context("Invalid generator config")?;

    println!("Starting fuzz harness over {} seeds from {}...", args.seeds, args.start);
    let mut exhausted = 0;
    let mut merges = 0;
    for seed in args.start..args.start.saturating_add(args.seeds) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let report = generator.regenerate(&mut rng);
        check_invariants(&generator).with_context(|| format!("Invariant failed for seed {seed}"))?;
        debug!(seed, rooms = report.rooms_placed, "seed passed");
        exhausted += usize::from(report.exhausted);
        merges += report.merges;
    }

    info!(exhausted, merges, "fuzz sweep finished");
    println!("Fuzzing completed successfully ({exhausted} exhausted, {merges} merge carves).");
    Ok(())
}

fn check_invariants(generator: &MapGenerator) -> Result<()> {
    let rooms = generator.rooms();
    let index = generator.index();
    let spacing = generator.config().door_spacing;

    let mut seen = BTreeSet::new();
    for tile in rooms.iter().flat_map(|room| room.tiles()) {
        if !seen.insert(tile) {
            bail!("tile {tile:?} belongs to two rooms");
        }
        if !index.is_claimed(tile) {
            bail!("tile {tile:?} is missing from the connectivity index");
        }
    }

    for (room_index, room) in rooms.iter().enumerate() {
        for (tile, facing) in room.doorways() {
            let across = tile.step(facing);
            let Some(owner) = index.owner(across) else {
                bail!("room {room_index} doorway at {tile:?} opens onto nothing");
            };
            if rooms[owner].boundary_kind(across, facing.opposite())
                != Some(ConstructionType::Doorway)
            {
                bail!("room {room_index} doorway at {tile:?} has no mirror in room {owner}");
            }
        }

        let len = room.perimeter().len();
        let slots: Vec<usize> = room
            .doorways()
            .into_iter()
            .filter_map(|(tile, facing)| room.slot_index(tile, facing))
            .collect();
        for (position, &first) in slots.iter().enumerate() {
            for &second in &slots[position + 1..] {
                let gap = first.abs_diff(second);
                if gap.min(len - gap) < spacing {
                    bail!("room {room_index} has doors {gap} perimeter slots apart");
                }
            }
        }
    }

    let graph = generator.graph();
    if graph.component_count() != 1 {
        bail!("navigation graph has {} components", graph.component_count());
    }
    for (id, node) in graph.iter() {
        if node.neighbors().iter().any(|&next| !graph.are_connected(next, id)) {
            bail!("node at {:?} has a one-way edge", node.tile);
        }
    }

    let Some(regions) = generator.spawns() else {
        bail!("no spawn regions selected");
    };
    if rooms.len() > 1 {
        if regions.blue.room == regions.red.room {
            bail!("both teams spawn in room {}", regions.blue.room);
        }
        let Some(bounds) = index.bounds() else {
            bail!("connectivity index is empty");
        };
        let span = |room: usize| {
            let (origin, far) = (rooms[room].origin(), rooms[room].far_corner());
            match regions.axis {
                Axis::X => (origin.x, far.x),
                Axis::Y => (origin.y, far.y),
            }
        };
        let (axis_min, axis_max) = match regions.axis {
            Axis::X => (bounds.min.x, bounds.max.x),
            Axis::Y => (bounds.min.y, bounds.max.y),
        };
        let (blue_low, blue_high) = span(regions.blue.room);
        let (_, red_high) = span(regions.red.room);
        if blue_low != axis_min {
            bail!("blue spawn room does not touch the minimum {:?} edge", regions.axis);
        }
        if red_high != axis_max && blue_high != axis_max {
            bail!("red spawn room does not touch the maximum {:?} edge", regions.axis);
        }
    }

    Ok(())
}
