use std::ops::Add;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct NodeId;
}

/// Integer grid position. `x` grows toward the east, `y` toward the north.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
}

impl Tile {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, direction: Direction) -> Self {
        self + direction.offset()
    }

    pub fn to_world(self, scale: f32) -> WorldPos {
        WorldPos { x: self.x as f32 * scale, y: self.y as f32 * scale }
    }
}

impl Add<(i32, i32)> for Tile {
    type Output = Tile;

    fn add(self, (dx, dy): (i32, i32)) -> Tile {
        Tile { x: self.x + dx, y: self.y + dy }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::North, Direction::East, Direction::South, Direction::West];

    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Yaw in degrees, counter-clockwise from +x.
    pub fn yaw_degrees(self) -> f32 {
        match self {
            Direction::East => 0.0,
            Direction::North => 90.0,
            Direction::West => 180.0,
            Direction::South => 270.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConstructionType {
    Wall,
    Doorway,
    Floor,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
}

impl WorldPos {
    /// Yaw in degrees of the vector pointing from `self` to `target`.
    pub fn look_at_yaw(self, target: WorldPos) -> f32 {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        if dx == 0.0 && dy == 0.0 {
            return 0.0;
        }
        dy.atan2(dx).to_degrees()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Team {
    Blue,
    Red,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_directions_cancel_offsets() {
        let origin = Tile::new(3, -2);
        for direction in Direction::ALL {
            assert_eq!(origin.step(direction).step(direction.opposite()), origin);
        }
    }

    #[test]
    fn look_at_yaw_matches_facing_yaw() {
        let from = WorldPos { x: 0.0, y: 0.0 };
        assert_eq!(from.look_at_yaw(WorldPos { x: 10.0, y: 0.0 }), 0.0);
        assert_eq!(from.look_at_yaw(WorldPos { x: 0.0, y: 5.0 }), Direction::North.yaw_degrees());
        assert_eq!(from.look_at_yaw(from), 0.0);
    }
}
