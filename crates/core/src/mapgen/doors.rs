//! Matched doorway carving between two rooms plus perimeter spacing enforcement.

use tracing::warn;

use crate::types::{Direction, Tile};

use super::room::Room;

/// Tile across the boundary from `door` when stepping out of its room toward `direction`.
pub(super) fn opposing_tile(door: Tile, direction: Direction) -> Tile {
    door.step(direction)
}

/// Cuts a doorway on the `direction` edge of `door` in `source` and on the mirrored edge of the
/// opposing tile in `other`, closing `door_spacing` perimeter slots around each side.
pub(super) fn carve_door_pair(
    source: &mut Room,
    other: &mut Room,
    door: Tile,
    direction: Direction,
    door_spacing: usize,
) {
    carve_door(source, door, direction, door_spacing);
    carve_door(other, opposing_tile(door, direction), direction.opposite(), door_spacing);
}

fn carve_door(room: &mut Room, tile: Tile, facing: Direction, door_spacing: usize) {
    if !room.set_doorway(tile, facing) {
        warn!(?tile, ?facing, "door carve target has no matching edge");
    }
    if let Some(slot_index) = room.slot_index(tile, facing) {
        room.close_slots_around(slot_index, door_spacing);
    }
}

/// Two distinct rooms borrowed mutably at once.
pub(super) fn room_pair_mut(
    rooms: &mut [Room],
    first: usize,
    second: usize,
) -> Option<(&mut Room, &mut Room)> {
    if first == second || first >= rooms.len() || second >= rooms.len() {
        return None;
    }
    if first < second {
        let (low, high) = rooms.split_at_mut(second);
        Some((&mut low[first], &mut high[0]))
    } else {
        let (low, high) = rooms.split_at_mut(first);
        Some((&mut high[0], &mut low[second]))
    }
}
