//! Serializable snapshot of a finished generation pass.

use serde::Serialize;
use slotmap::SecondaryMap;
use xxhash_rust::xxh3::xxh3_64;

use crate::types::{Direction, NodeId, Team, Tile, WorldPos};

use super::navigation::NavGraph;
use super::placement::GenerationReport;
use super::room::{Room, RoomSize};
use super::spawns::{SpawnMarker, SpawnRegions, TeamSpawn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DoorPlan {
    pub tile: Tile,
    pub facing: Direction,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RoomPlan {
    pub origin: Tile,
    pub size: RoomSize,
    pub doors: Vec<DoorPlan>,
}

/// Navigation node with neighbours expressed as indices into [`FloorPlan::nodes`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodePlan {
    pub tile: Tile,
    pub room: usize,
    pub position: WorldPos,
    pub neighbors: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SpawnPlan {
    pub team: Team,
    pub room: usize,
    pub primary: usize,
    pub ai_candidates: Vec<usize>,
    pub marker: SpawnMarker,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FloorPlan {
    pub tile_scale: f32,
    pub report: GenerationReport,
    pub rooms: Vec<RoomPlan>,
    pub nodes: Vec<NodePlan>,
    pub spawns: Vec<SpawnPlan>,
    pub shared_spawn_room: bool,
}

impl FloorPlan {
    pub(super) fn capture(
        rooms: &[Room],
        graph: &NavGraph,
        spawns: Option<&SpawnRegions>,
        report: GenerationReport,
        tile_scale: f32,
    ) -> Self {
        let mut dense: SecondaryMap<NodeId, usize> = SecondaryMap::new();
        for &id in rooms.iter().flat_map(|room| room.nodes()) {
            let next = dense.len();
            dense.insert(id, next);
        }

        let mut nodes = Vec::with_capacity(dense.len());
        for &id in rooms.iter().flat_map(|room| room.nodes()) {
            let Some(node) = graph.get(id) else {
                continue;
            };
            let mut neighbors: Vec<usize> =
                node.neighbors().iter().filter_map(|next| dense.get(*next).copied()).collect();
            neighbors.sort_unstable();
            nodes.push(NodePlan {
                tile: node.tile,
                room: node.room,
                position: node.position,
                neighbors,
            });
        }

        let rooms = rooms
            .iter()
            .map(|room| RoomPlan {
                origin: room.origin(),
                size: room.size(),
                doors: room
                    .doorways()
                    .into_iter()
                    .map(|(tile, facing)| DoorPlan { tile, facing })
                    .collect(),
            })
            .collect();

        let spawn_plan = |spawn: &TeamSpawn| -> Option<SpawnPlan> {
            Some(SpawnPlan {
                team: spawn.team,
                room: spawn.room,
                primary: *dense.get(spawn.primary)?,
                ai_candidates: spawn
                    .ai_candidates
                    .iter()
                    .filter_map(|id| dense.get(*id).copied())
                    .collect(),
                marker: spawn.marker,
            })
        };
        let team_spawns: Vec<SpawnPlan> = spawns
            .map(|regions| [&regions.blue, &regions.red])
            .into_iter()
            .flatten()
            .filter_map(spawn_plan)
            .collect();

        Self {
            tile_scale,
            report,
            rooms,
            nodes,
            spawns: team_spawns,
            shared_spawn_room: spawns.is_some_and(|regions| regions.shared_room),
        }
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|node| node.neighbors.len()).sum::<usize>() / 2
    }

    pub fn spawn(&self, team: Team) -> Option<&SpawnPlan> {
        self.spawns.iter().find(|spawn| spawn.team == team)
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(self.tile_scale.to_bits().to_le_bytes());
        bytes.extend((self.report.target_rooms as u32).to_le_bytes());
        bytes.extend((self.report.rooms_placed as u32).to_le_bytes());
        bytes.extend((self.report.merges as u32).to_le_bytes());
        bytes.extend((self.report.fallback_retries as u32).to_le_bytes());
        bytes.push(u8::from(self.report.exhausted));

        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in &self.rooms {
            push_tile(&mut bytes, room.origin);
            bytes.extend((room.size.width as u32).to_le_bytes());
            bytes.extend((room.size.height as u32).to_le_bytes());
            bytes.extend((room.doors.len() as u32).to_le_bytes());
            for door in &room.doors {
                push_tile(&mut bytes, door.tile);
                bytes.push(direction_byte(door.facing));
            }
        }

        bytes.extend((self.nodes.len() as u32).to_le_bytes());
        for node in &self.nodes {
            push_tile(&mut bytes, node.tile);
            bytes.extend((node.room as u32).to_le_bytes());
            bytes.extend((node.neighbors.len() as u32).to_le_bytes());
            for &neighbor in &node.neighbors {
                bytes.extend((neighbor as u32).to_le_bytes());
            }
        }

        bytes.push(u8::from(self.shared_spawn_room));
        bytes.extend((self.spawns.len() as u32).to_le_bytes());
        for spawn in &self.spawns {
            bytes.push(match spawn.team {
                Team::Blue => 0,
                Team::Red => 1,
            });
            bytes.extend((spawn.room as u32).to_le_bytes());
            bytes.extend((spawn.primary as u32).to_le_bytes());
            bytes.extend((spawn.ai_candidates.len() as u32).to_le_bytes());
            for &candidate in &spawn.ai_candidates {
                bytes.extend((candidate as u32).to_le_bytes());
            }
            bytes.extend(spawn.marker.position.x.to_bits().to_le_bytes());
            bytes.extend(spawn.marker.position.y.to_bits().to_le_bytes());
            bytes.extend(spawn.marker.yaw_degrees.to_bits().to_le_bytes());
        }

        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

fn push_tile(bytes: &mut Vec<u8>, tile: Tile) {
    bytes.extend(tile.x.to_le_bytes());
    bytes.extend(tile.y.to_le_bytes());
}

fn direction_byte(direction: Direction) -> u8 {
    match direction {
        Direction::North => 0,
        Direction::East => 1,
        Direction::South => 2,
        Direction::West => 3,
    }
}
