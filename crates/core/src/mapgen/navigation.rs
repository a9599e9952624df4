//! Per-tile navigation nodes with undirected 8-way adjacency, including across doorways.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};
use tracing::warn;

use crate::types::{ConstructionType, Direction, NodeId, Tile, WorldPos};

use super::connectivity::ConnectivityIndex;
use super::room::Room;

/// West, north-west, north and north-east. Sweeping every tile with these four offsets covers
/// all eight neighbours, the other four being the mirror of an already-visited tile.
const SWEEP_OFFSETS: [(i32, i32); 4] = [(-1, 0), (-1, 1), (0, 1), (1, 1)];

#[derive(Clone, Debug, PartialEq)]
pub struct NavNode {
    pub tile: Tile,
    pub room: usize,
    pub position: WorldPos,
    neighbors: Vec<NodeId>,
}

impl NavNode {
    pub fn neighbors(&self) -> &[NodeId] {
        &self.neighbors
    }
}

#[derive(Clone, Debug, Default)]
pub struct NavGraph {
    nodes: SlotMap<NodeId, NavNode>,
    edge_count: usize,
}

impl NavGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn get(&self, id: NodeId) -> Option<&NavNode> {
        self.nodes.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NavNode)> {
        self.nodes.iter()
    }

    pub fn are_connected(&self, from: NodeId, to: NodeId) -> bool {
        self.nodes.get(from).is_some_and(|node| node.neighbors.contains(&to))
    }

    fn insert(&mut self, tile: Tile, room: usize, position: WorldPos) -> NodeId {
        self.nodes.insert(NavNode { tile, room, position, neighbors: Vec::new() })
    }

    /// Adds an undirected edge. Returns false when the edge already existed or an id is stale.
    pub(crate) fn connect(&mut self, from: NodeId, to: NodeId) -> bool {
        if from == to || !self.nodes.contains_key(from) || !self.nodes.contains_key(to) {
            return false;
        }
        if self.are_connected(from, to) || self.are_connected(to, from) {
            return false;
        }
        self.nodes[from].neighbors.push(to);
        self.nodes[to].neighbors.push(from);
        self.edge_count += 1;
        true
    }

    /// Number of connected components, counting isolated nodes.
    pub fn component_count(&self) -> usize {
        let mut seen: SecondaryMap<NodeId, ()> = SecondaryMap::new();
        let mut components = 0;
        for start in self.nodes.keys() {
            if seen.contains_key(start) {
                continue;
            }
            components += 1;
            seen.insert(start, ());
            let mut open = VecDeque::from([start]);
            while let Some(current) = open.pop_front() {
                for &next in &self.nodes[current].neighbors {
                    if seen.insert(next, ()).is_none() {
                        open.push_back(next);
                    }
                }
            }
        }
        components
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edge_count = 0;
    }
}

/// Creates one node per room tile and wires intra-room and cross-door edges.
pub(super) fn build_navigation(
    rooms: &mut [Room],
    index: &ConnectivityIndex,
    tile_scale: f32,
    graph: &mut NavGraph,
) {
    for (room_index, room) in rooms.iter_mut().enumerate() {
        let nodes: Vec<NodeId> = room
            .local_tiles()
            .map(|tile| graph.insert(tile, room_index, tile.to_world(tile_scale)))
            .collect();
        room.set_nodes(nodes);
    }

    for room in rooms.iter() {
        for (local_index, tile) in room.local_tiles().enumerate() {
            let node = room.nodes()[local_index];
            for offset in SWEEP_OFFSETS {
                let neighbor = tile + offset;
                if let Some(neighbor_local) = room.local_index(neighbor) {
                    graph.connect(node, room.nodes()[neighbor_local]);
                    continue;
                }
                let facing = match offset {
                    (-1, 0) => Direction::West,
                    (0, 1) => Direction::North,
                    _ => continue,
                };
                if let Some(across) = node_across_doorway(rooms, index, room, tile, facing) {
                    graph.connect(node, across);
                }
            }
        }
    }
}

fn node_across_doorway(
    rooms: &[Room],
    index: &ConnectivityIndex,
    room: &Room,
    tile: Tile,
    facing: Direction,
) -> Option<NodeId> {
    if room.boundary_kind(tile, facing) != Some(ConstructionType::Doorway) {
        return None;
    }
    let across = tile.step(facing);
    let Some(neighbor_index) = index.owner(across) else {
        warn!(?tile, ?facing, "doorway opens onto an unclaimed tile");
        return None;
    };
    let neighbor = rooms.get(neighbor_index)?;
    let local = neighbor.local_index(across)?;
    neighbor.nodes().get(local).copied()
}
