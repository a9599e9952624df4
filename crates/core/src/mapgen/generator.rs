//! Regeneration pass that owns every room, node, construction and spawn it creates.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};
use tracing::info;

use crate::config::GeneratorConfig;
use crate::error::ConfigError;

use super::connectivity::ConnectivityIndex;
use super::construction::{Construction, build_constructions};
use super::model::FloorPlan;
use super::navigation::{NavGraph, build_navigation};
use super::placement::{GenerationReport, grow_layout};
use super::room::Room;
use super::spawns::{SpawnRegions, select_spawn_regions};

#[derive(Debug)]
pub struct MapGenerator {
    config: GeneratorConfig,
    rooms: Vec<Room>,
    index: ConnectivityIndex,
    graph: NavGraph,
    constructions: Vec<Construction>,
    spawns: Option<SpawnRegions>,
    report: GenerationReport,
}

impl MapGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rooms: Vec::new(),
            index: ConnectivityIndex::new(),
            graph: NavGraph::new(),
            constructions: Vec::new(),
            spawns: None,
            report: GenerationReport::default(),
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Drops everything the previous pass produced.
    pub fn teardown(&mut self) {
        self.rooms.clear();
        self.index.clear();
        self.graph.clear();
        self.constructions.clear();
        self.spawns = None;
        self.report = GenerationReport::default();
    }

    /// Tears down and rebuilds the whole floor from `rng`. Runs to completion; a shorter map than
    /// requested is reported through [`GenerationReport::exhausted`] rather than an error.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> GenerationReport {
        self.teardown();

        let report = grow_layout(&self.config, &mut self.rooms, &mut self.index, rng);
        let tile_scale = self.config.tile_scale;
        build_navigation(&mut self.rooms, &self.index, tile_scale, &mut self.graph);
        self.constructions = build_constructions(&self.rooms, tile_scale);
        self.spawns = select_spawn_regions(&self.rooms, &self.index, &self.graph, tile_scale, rng);
        self.report = report;

        info!(
            rooms = report.rooms_placed,
            target = report.target_rooms,
            nodes = self.graph.len(),
            edges = self.graph.edge_count(),
            merges = report.merges,
            fallbacks = report.fallback_retries,
            "generated floor plan"
        );
        report
    }

    pub fn regenerate_seeded(&mut self, seed: u64) -> GenerationReport {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.regenerate(&mut rng)
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn index(&self) -> &ConnectivityIndex {
        &self.index
    }

    pub fn graph(&self) -> &NavGraph {
        &self.graph
    }

    pub fn constructions(&self) -> &[Construction] {
        &self.constructions
    }

    pub fn spawns(&self) -> Option<&SpawnRegions> {
        self.spawns.as_ref()
    }

    pub fn report(&self) -> GenerationReport {
        self.report
    }

    pub fn floor_plan(&self) -> FloorPlan {
        FloorPlan::capture(
            &self.rooms,
            &self.graph,
            self.spawns.as_ref(),
            self.report,
            self.config.tile_scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;
    use crate::types::{ConstructionType, Tile};

    fn generator(config: GeneratorConfig) -> MapGenerator {
        MapGenerator::new(config).expect("config should be valid")
    }

    #[test]
    fn rejects_invalid_config_up_front() {
        let config = GeneratorConfig { room_count_min: 0, ..GeneratorConfig::default() };
        assert!(MapGenerator::new(config).is_err());
    }

    #[test]
    fn same_seed_reproduces_the_same_floor() {
        let mut first = generator(GeneratorConfig::default());
        let mut second = generator(GeneratorConfig::default());
        first.regenerate_seeded(2024);
        second.regenerate_seeded(2024);
        assert_eq!(first.floor_plan(), second.floor_plan());
        assert_eq!(first.floor_plan().fingerprint(), second.floor_plan().fingerprint());
    }

    #[test]
    fn regeneration_replaces_previous_pass() {
        let mut generator = generator(GeneratorConfig::default());
        generator.regenerate_seeded(7);
        let fingerprint = generator.floor_plan().fingerprint();
        let nodes = generator.graph().len();

        generator.regenerate_seeded(7);
        assert_eq!(generator.floor_plan().fingerprint(), fingerprint);
        assert_eq!(generator.graph().len(), nodes);
        let tiles: usize = generator.rooms().iter().map(|room| room.size().tile_count()).sum();
        assert_eq!(generator.index().len(), tiles);
        assert_eq!(generator.graph().len(), tiles);
    }

    #[test]
    fn teardown_clears_every_registry() {
        let mut generator = generator(GeneratorConfig::default());
        generator.regenerate_seeded(3);
        assert!(!generator.rooms().is_empty());

        generator.teardown();
        assert!(generator.rooms().is_empty());
        assert!(generator.index().is_empty());
        assert!(generator.graph().is_empty());
        assert!(generator.constructions().is_empty());
        assert!(generator.spawns().is_none());
        assert_eq!(generator.report(), GenerationReport::default());
    }

    #[test]
    fn constructions_cover_every_tile_and_edge() {
        let mut generator = generator(GeneratorConfig::default());
        generator.regenerate_seeded(11);

        let floors = generator
            .constructions()
            .iter()
            .filter(|piece| piece.kind == ConstructionType::Floor)
            .count();
        let edges = generator.constructions().len() - floors;
        let tiles: usize = generator.rooms().iter().map(|room| room.size().tile_count()).sum();
        let perimeter: usize = generator.rooms().iter().map(|room| room.perimeter().len()).sum();
        assert_eq!(floors, tiles);
        assert_eq!(edges, perimeter);

        let doorway_pieces = generator
            .constructions()
            .iter()
            .filter(|piece| piece.kind == ConstructionType::Doorway)
            .count();
        let doorways: usize = generator.rooms().iter().map(|room| room.doorways().len()).sum();
        assert_eq!(doorway_pieces, doorways);
    }

    #[test]
    fn rooms_are_disjoint_and_graph_is_connected() {
        let mut generator = generator(GeneratorConfig::default());
        let report = generator.regenerate_seeded(99);

        let mut seen = BTreeSet::new();
        for room in generator.rooms() {
            for tile in room.tiles() {
                assert!(seen.insert(tile), "tile {tile:?} claimed twice");
            }
        }
        assert_eq!(generator.rooms().len(), report.rooms_placed);
        assert_eq!(generator.graph().component_count(), 1);
        assert_eq!(generator.rooms()[0].origin(), Tile::new(0, 0));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]
        #[test]
        fn every_seed_yields_a_connected_symmetric_floor(seed in any::<u64>()) {
            let mut generator = generator(GeneratorConfig::default());
            let report = generator.regenerate_seeded(seed);

            prop_assert!(report.rooms_placed >= 1);
            prop_assert!(report.rooms_placed <= report.target_rooms);
            prop_assert_eq!(report.exhausted, report.rooms_placed < report.target_rooms);
            prop_assert_eq!(generator.graph().component_count(), 1, "seed={}", seed);
            for (id, node) in generator.graph().iter() {
                for &neighbor in node.neighbors() {
                    prop_assert!(generator.graph().are_connected(neighbor, id));
                }
            }
        }
    }
}
