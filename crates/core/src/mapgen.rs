//! Procedural floor-plan generation split into coherent submodules.
//!
//! A pass grows rectangular rooms from a seed room by backtracking placement, carves matching
//! doorways between neighbours, builds an 8-way navigation graph over every room tile and picks
//! team spawn rooms at opposite ends of the map.

pub mod connectivity;
pub mod construction;
pub mod model;
pub mod navigation;
pub mod room;
pub mod spawns;

mod doors;
mod generator;
mod placement;
mod rng;

pub use connectivity::{ConnectivityIndex, MapBounds};
pub use construction::Construction;
pub use generator::MapGenerator;
pub use model::{DoorPlan, FloorPlan, NodePlan, RoomPlan, SpawnPlan};
pub use navigation::{NavGraph, NavNode};
pub use placement::GenerationReport;
pub use room::{Room, RoomSize};
pub use spawns::{Axis, SpawnMarker, SpawnRegions, TeamSpawn};

use crate::config::GeneratorConfig;
use crate::error::ConfigError;

pub fn generate_floor_plan(config: GeneratorConfig, seed: u64) -> Result<FloorPlan, ConfigError> {
    let mut generator = MapGenerator::new(config)?;
    generator.regenerate_seeded(seed);
    Ok(generator.floor_plan())
}
