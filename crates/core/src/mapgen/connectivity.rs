//! Global tile-to-room ownership used for collision rejection and cross-door lookups.

use std::collections::{BTreeSet, HashMap};

use crate::types::Tile;

use super::room::Room;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectivityIndex {
    owners: HashMap<Tile, usize>,
}

/// Inclusive extent of every claimed tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapBounds {
    pub min: Tile,
    pub max: Tile,
}

impl MapBounds {
    pub fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> i32 {
        self.max.y - self.min.y
    }
}

impl ConnectivityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn owner(&self, tile: Tile) -> Option<usize> {
        self.owners.get(&tile).copied()
    }

    pub fn is_claimed(&self, tile: Tile) -> bool {
        self.owners.contains_key(&tile)
    }

    /// Records every corner, wall and floor tile of `room` as owned by `room_index`.
    pub(crate) fn claim(&mut self, room_index: usize, room: &Room) {
        for tile in room.tiles() {
            self.owners.insert(tile, room_index);
        }
    }

    /// Rooms owning any tile of `candidate`. Corners, walls and floor are all checked.
    pub fn colliding_rooms(&self, candidate: &Room) -> BTreeSet<usize> {
        candidate.tiles().filter_map(|tile| self.owner(tile)).collect()
    }

    pub fn bounds(&self) -> Option<MapBounds> {
        let mut tiles = self.owners.keys();
        let first = *tiles.next()?;
        let mut bounds = MapBounds { min: first, max: first };
        for tile in tiles {
            bounds.min.x = bounds.min.x.min(tile.x);
            bounds.min.y = bounds.min.y.min(tile.y);
            bounds.max.x = bounds.max.x.max(tile.x);
            bounds.max.y = bounds.max.y.max(tile.y);
        }
        Some(bounds)
    }

    pub fn clear(&mut self) {
        self.owners.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::room::RoomSize;

    #[test]
    fn claimed_room_reports_ownership_for_every_tile() {
        let room = Room::new(Tile::new(0, 0), RoomSize { width: 3, height: 4 });
        let mut index = ConnectivityIndex::new();
        index.claim(7, &room);

        assert_eq!(index.len(), 12);
        assert_eq!(index.owner(Tile::new(1, 1)), Some(7));
        assert_eq!(index.owner(Tile::new(2, 3)), Some(7));
        assert_eq!(index.owner(Tile::new(3, 0)), None);
        assert!(room.tiles().all(|tile| index.is_claimed(tile)));
        assert!(!index.is_claimed(Tile::new(-1, 0)));
    }

    #[test]
    fn collision_check_sees_corner_only_overlap() {
        let placed = Room::new(Tile::new(0, 0), RoomSize::square(3));
        let mut index = ConnectivityIndex::new();
        index.claim(0, &placed);

        let touching_corner = Room::new(Tile::new(2, 2), RoomSize::square(3));
        assert_eq!(index.colliding_rooms(&touching_corner), BTreeSet::from([0]));

        let adjacent = Room::new(Tile::new(3, 0), RoomSize::square(3));
        assert!(index.colliding_rooms(&adjacent).is_empty());
    }

    #[test]
    fn bounds_cover_all_claimed_tiles() {
        let mut index = ConnectivityIndex::new();
        assert_eq!(index.bounds(), None);

        index.claim(0, &Room::new(Tile::new(0, 0), RoomSize::square(2)));
        index.claim(1, &Room::new(Tile::new(2, -3), RoomSize { width: 4, height: 2 }));
        let bounds = index.bounds().expect("index is populated");
        assert_eq!(bounds.min, Tile::new(0, -3));
        assert_eq!(bounds.max, Tile::new(5, 1));
        assert_eq!(bounds.width(), 5);
        assert_eq!(bounds.height(), 4);
    }
}
