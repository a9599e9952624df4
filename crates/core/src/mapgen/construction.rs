//! World-space placements for the floor, wall and doorway pieces of every room.

use serde::Serialize;

use crate::types::{ConstructionType, Direction, Tile, WorldPos};

use super::room::Room;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Construction {
    pub kind: ConstructionType,
    pub room: usize,
    pub tile: Tile,
    /// Edge the piece stands on. `None` for floor pieces.
    pub facing: Option<Direction>,
    pub position: WorldPos,
    pub yaw_degrees: f32,
}

pub(super) fn build_constructions(rooms: &[Room], tile_scale: f32) -> Vec<Construction> {
    let mut placed = Vec::new();
    for (room_index, room) in rooms.iter().enumerate() {
        place_room(&mut placed, room_index, room, tile_scale);
    }
    placed
}

fn place_room(placed: &mut Vec<Construction>, room_index: usize, room: &Room, tile_scale: f32) {
    for tile in room.local_tiles() {
        placed.push(Construction {
            kind: ConstructionType::Floor,
            room: room_index,
            tile,
            facing: None,
            position: tile.to_world(tile_scale),
            yaw_degrees: 0.0,
        });
    }

    let corner_edges = room.corners().iter().flat_map(|corner| {
        corner.sides.iter().map(move |side| (corner.tile, side.facing, side.kind))
    });
    let wall_edges = room
        .walls()
        .iter()
        .filter_map(|(&tile, &kind)| room.wall_side(tile).map(|facing| (tile, facing, kind)));

    for (tile, facing, kind) in corner_edges.chain(wall_edges) {
        placed.push(Construction {
            kind,
            room: room_index,
            tile,
            facing: Some(facing),
            position: tile.to_world(tile_scale),
            yaw_degrees: facing.yaw_degrees(),
        });
    }
}
