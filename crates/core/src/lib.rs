pub mod config;
pub mod error;
pub mod mapgen;
pub mod types;

pub use config::{GeneratorConfig, PrefabSet};
pub use error::ConfigError;
pub use mapgen::{FloorPlan, GenerationReport, MapGenerator, generate_floor_plan};
pub use types::*;
