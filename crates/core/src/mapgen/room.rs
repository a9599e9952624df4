//! Rectangular room bookkeeping: corners, walls, floor and the clockwise door-candidate perimeter.
//!
//! Every room tile is walkable. Walls and doorways live on the outer edges of perimeter tiles, so
//! a corner tile carries two independently classified sides while a plain wall tile carries one.

use std::array;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::types::{ConstructionType, Direction, NodeId, Tile};

/// Corner order, clockwise from the placement origin.
pub const SOUTH_WEST: usize = 0;
pub const NORTH_WEST: usize = 1;
pub const NORTH_EAST: usize = 2;
pub const SOUTH_EAST: usize = 3;

const CORNER_FACINGS: [[Direction; 2]; 4] = [
    [Direction::South, Direction::West],
    [Direction::West, Direction::North],
    [Direction::North, Direction::East],
    [Direction::East, Direction::South],
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct RoomSize {
    pub width: usize,
    pub height: usize,
}

impl RoomSize {
    pub const fn square(edge: usize) -> Self {
        Self { width: edge, height: edge }
    }

    pub fn tile_count(self) -> usize {
        self.width * self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CornerSide {
    pub facing: Direction,
    pub kind: ConstructionType,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Corner {
    pub tile: Tile,
    pub sides: [CornerSide; 2],
}

impl Corner {
    fn new(tile: Tile, facings: [Direction; 2]) -> Self {
        Self {
            tile,
            sides: facings.map(|facing| CornerSide { facing, kind: ConstructionType::Wall }),
        }
    }

    pub fn side(&self, facing: Direction) -> Option<ConstructionType> {
        self.sides.iter().find(|side| side.facing == facing).map(|side| side.kind)
    }
}

/// One entry of the clockwise perimeter walk. Corners contribute one slot per side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PerimeterSlot {
    pub tile: Tile,
    pub facing: Direction,
    /// Cleared once a nearby door makes this position unusable.
    pub available: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Room {
    size: RoomSize,
    corners: [Corner; 4],
    walls: BTreeMap<Tile, ConstructionType>,
    floor_tiles: BTreeSet<Tile>,
    perimeter: Vec<PerimeterSlot>,
    nodes: Vec<NodeId>,
}

impl Room {
    /// Builds a fully walled room whose south-west corner sits on `origin`.
    /// Both edges of `size` must be at least two tiles.
    pub fn new(origin: Tile, size: RoomSize) -> Self {
        debug_assert!(size.width >= 2 && size.height >= 2);
        let right = (size.width - 1) as i32;
        let top = (size.height - 1) as i32;
        let corner_tiles = [origin, origin + (0, top), origin + (right, top), origin + (right, 0)];
        let corners: [Corner; 4] =
            array::from_fn(|index| Corner::new(corner_tiles[index], CORNER_FACINGS[index]));

        let mut room = Self {
            size,
            corners,
            walls: BTreeMap::new(),
            floor_tiles: BTreeSet::new(),
            perimeter: Vec::with_capacity(2 * (size.width + size.height)),
            nodes: Vec::new(),
        };
        room.populate_walls();
        room.populate_perimeter();
        room.populate_floor();
        room
    }

    fn populate_walls(&mut self) {
        let origin = self.origin();
        let right = (self.size.width - 1) as i32;
        let top = (self.size.height - 1) as i32;
        for dx in 1..right {
            self.walls.insert(origin + (dx, 0), ConstructionType::Wall);
            self.walls.insert(origin + (dx, top), ConstructionType::Wall);
        }
        for dy in 1..top {
            self.walls.insert(origin + (0, dy), ConstructionType::Wall);
            self.walls.insert(origin + (right, dy), ConstructionType::Wall);
        }
    }

    fn populate_perimeter(&mut self) {
        let inner_width = self.size.width as i32 - 2;
        let inner_height = self.size.height as i32 - 2;
        let [south_west, north_west, north_east, south_east] = self.corners.map(|c| c.tile);

        self.push_corner_slots(SOUTH_WEST);
        for step in 1..=inner_height {
            self.push_slot(south_west + (0, step), Direction::West);
        }
        self.push_corner_slots(NORTH_WEST);
        for step in 1..=inner_width {
            self.push_slot(north_west + (step, 0), Direction::North);
        }
        self.push_corner_slots(NORTH_EAST);
        for step in 1..=inner_height {
            self.push_slot(north_east + (0, -step), Direction::East);
        }
        self.push_corner_slots(SOUTH_EAST);
        for step in 1..=inner_width {
            self.push_slot(south_east + (-step, 0), Direction::South);
        }
    }

    fn push_corner_slots(&mut self, corner_index: usize) {
        let corner = self.corners[corner_index];
        for side in corner.sides {
            self.push_slot(corner.tile, side.facing);
        }
    }

    fn push_slot(&mut self, tile: Tile, facing: Direction) {
        self.perimeter.push(PerimeterSlot { tile, facing, available: true });
    }

    fn populate_floor(&mut self) {
        let origin = self.origin();
        for dx in 1..(self.size.width as i32 - 1) {
            for dy in 1..(self.size.height as i32 - 1) {
                self.floor_tiles.insert(origin + (dx, dy));
            }
        }
    }

    pub fn origin(&self) -> Tile {
        self.corners[SOUTH_WEST].tile
    }

    pub fn size(&self) -> RoomSize {
        self.size
    }

    pub fn corners(&self) -> &[Corner; 4] {
        &self.corners
    }

    pub fn walls(&self) -> &BTreeMap<Tile, ConstructionType> {
        &self.walls
    }

    pub fn floor_tiles(&self) -> &BTreeSet<Tile> {
        &self.floor_tiles
    }

    pub fn perimeter(&self) -> &[PerimeterSlot] {
        &self.perimeter
    }

    /// Node ids in local tile-major order (x outer, y inner).
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub(crate) fn set_nodes(&mut self, nodes: Vec<NodeId>) {
        self.nodes = nodes;
    }

    /// Inclusive north-east bound.
    pub fn far_corner(&self) -> Tile {
        self.corners[NORTH_EAST].tile
    }

    pub fn contains(&self, tile: Tile) -> bool {
        let origin = self.origin();
        let far = self.far_corner();
        (origin.x..=far.x).contains(&tile.x) && (origin.y..=far.y).contains(&tile.y)
    }

    /// Every claimed tile: corners, then walls, then floor.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.corners
            .iter()
            .map(|corner| corner.tile)
            .chain(self.walls.keys().copied())
            .chain(self.floor_tiles.iter().copied())
    }

    /// Room tiles in local tile-major order, matching `nodes`.
    pub fn local_tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        let origin = self.origin();
        let height = self.size.height as i32;
        (0..self.size.width as i32)
            .flat_map(move |dx| (0..height).map(move |dy| origin + (dx, dy)))
    }

    pub fn local_index(&self, tile: Tile) -> Option<usize> {
        if !self.contains(tile) {
            return None;
        }
        let origin = self.origin();
        let dx = (tile.x - origin.x) as usize;
        let dy = (tile.y - origin.y) as usize;
        Some(dx * self.size.height + dy)
    }

    pub fn corner_index(&self, tile: Tile) -> Option<usize> {
        self.corners.iter().position(|corner| corner.tile == tile)
    }

    /// Side a non-corner wall tile lies on.
    pub fn wall_side(&self, tile: Tile) -> Option<Direction> {
        if !self.walls.contains_key(&tile) {
            return None;
        }
        let origin = self.origin();
        let far = self.far_corner();
        if tile.x == origin.x {
            Some(Direction::West)
        } else if tile.y == far.y {
            Some(Direction::North)
        } else if tile.x == far.x {
            Some(Direction::East)
        } else {
            Some(Direction::South)
        }
    }

    /// Classification of the `facing` edge of a perimeter tile, if that tile has such an edge.
    pub fn boundary_kind(&self, tile: Tile, facing: Direction) -> Option<ConstructionType> {
        if let Some(corner_index) = self.corner_index(tile) {
            return self.corners[corner_index].side(facing);
        }
        if self.wall_side(tile) == Some(facing) {
            return self.walls.get(&tile).copied();
        }
        None
    }

    pub fn slot_index(&self, tile: Tile, facing: Direction) -> Option<usize> {
        self.perimeter.iter().position(|slot| slot.tile == tile && slot.facing == facing)
    }

    /// True when a door may still be carved on the `facing` edge of `tile`.
    pub fn is_side_open(&self, tile: Tile, facing: Direction) -> bool {
        let Some(index) = self.slot_index(tile, facing) else {
            return false;
        };
        self.perimeter[index].available
            && self.boundary_kind(tile, facing) != Some(ConstructionType::Doorway)
    }

    /// Tiles of still-available perimeter slots, in perimeter order. Corners may repeat.
    pub fn available_door_tiles(&self) -> Vec<Tile> {
        self.perimeter.iter().filter(|slot| slot.available).map(|slot| slot.tile).collect()
    }

    /// Flips the `facing` edge of `tile` to a doorway. Returns false if the tile has no such edge.
    pub(crate) fn set_doorway(&mut self, tile: Tile, facing: Direction) -> bool {
        if let Some(corner_index) = self.corner_index(tile) {
            let corner = &mut self.corners[corner_index];
            return match corner.sides.iter_mut().find(|side| side.facing == facing) {
                Some(side) => {
                    side.kind = ConstructionType::Doorway;
                    true
                }
                None => false,
            };
        }
        if self.wall_side(tile) != Some(facing) {
            return false;
        }
        match self.walls.get_mut(&tile) {
            Some(kind) => {
                *kind = ConstructionType::Doorway;
                true
            }
            None => false,
        }
    }

    /// Marks the `spacing` slots on either side of `index` (and `index` itself) unavailable,
    /// wrapping around the perimeter. Any spacing of half the perimeter or more closes every slot.
    pub(crate) fn close_slots_around(&mut self, index: usize, spacing: usize) {
        let len = self.perimeter.len();
        if index >= len {
            return;
        }
        let reach = spacing.min(len / 2);
        self.perimeter[index].available = false;
        for step in 1..=reach {
            self.perimeter[(index + step) % len].available = false;
            self.perimeter[(index + len - step) % len].available = false;
        }
    }

    /// Every doorway edge on this room as `(tile, facing)`.
    pub fn doorways(&self) -> Vec<(Tile, Direction)> {
        let corner_doors = self.corners.iter().flat_map(|corner| {
            corner
                .sides
                .iter()
                .filter(|side| side.kind == ConstructionType::Doorway)
                .map(move |side| (corner.tile, side.facing))
        });
        let wall_doors = self
            .walls
            .iter()
            .filter(|(_, kind)| **kind == ConstructionType::Doorway)
            .filter_map(|(tile, _)| self.wall_side(*tile).map(|facing| (*tile, facing)));
        corner_doors.chain(wall_doors).collect()
    }

    /// Tiles carrying at least one doorway edge.
    pub fn doorway_tiles(&self) -> Vec<Tile> {
        let mut tiles: Vec<Tile> = self.doorways().into_iter().map(|(tile, _)| tile).collect();
        tiles.dedup();
        tiles
    }
}
