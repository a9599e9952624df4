//! Randomized backtracking room placement.
//!
//! The layout grows from a seed room. Each step picks a room size, walks the placed rooms and
//! their open perimeter slots in shuffled order and anchors a candidate room against the first
//! slot whose candidate fits. A candidate that collides with an existing room may still produce a
//! door straight into that room (a merge), which connects the two without adding a room.

use rand_chacha::rand_core::Rng;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::GeneratorConfig;
use crate::types::{Direction, Tile};

use super::connectivity::ConnectivityIndex;
use super::doors::{carve_door_pair, opposing_tile, room_pair_mut};
use super::rng::{choose, random_between, shuffle};
use super::room::{Room, RoomSize};

/// Summary of one layout pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub target_rooms: usize,
    pub rooms_placed: usize,
    /// Doors carved between two already-placed rooms.
    pub merges: usize,
    /// Searches retried at the minimum room size.
    pub fallback_retries: usize,
    /// True when the layout stopped short of `target_rooms`.
    pub exhausted: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum PlacementOutcome {
    Placed { room: Room, source: usize },
    Merged { source: usize, target: usize },
    Exhausted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum CandidateOutcome {
    Accepted(Room),
    Merged(usize),
    Rejected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SearchPhase {
    SampledSize,
    MinimumSize,
}

/// Grows `rooms` from a seed room at `config.seed_origin` toward a randomly drawn room count.
/// `rooms` and `index` are expected to be empty.
pub(super) fn grow_layout<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    rooms: &mut Vec<Room>,
    index: &mut ConnectivityIndex,
    rng: &mut R,
) -> GenerationReport {
    let target_rooms = random_between(rng, config.room_count_min, config.room_count_max);

    let seed_room = Room::new(config.seed_origin, sample_room_size(config, rng));
    index.claim(0, &seed_room);
    rooms.push(seed_room);

    extend_layout(config, rooms, index, target_rooms, rng)
}

/// Places rooms next to the already claimed `rooms` until `target_rooms` is reached or even a
/// minimum-size room no longer fits anywhere.
fn extend_layout<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    rooms: &mut Vec<Room>,
    index: &mut ConnectivityIndex,
    target_rooms: usize,
    rng: &mut R,
) -> GenerationReport {
    let mut report = GenerationReport { target_rooms, ..GenerationReport::default() };
    let mut phase = SearchPhase::SampledSize;
    while rooms.len() < report.target_rooms {
        let size = match phase {
            SearchPhase::SampledSize => sample_room_size(config, rng),
            SearchPhase::MinimumSize => RoomSize::square(config.room_size_min),
        };

        match search_placement(rooms, index, size, config.door_spacing, rng) {
            PlacementOutcome::Placed { room, source } => {
                let room_index = rooms.len();
                debug!(room_index, source, origin = ?room.origin(), ?size, "placed room");
                index.claim(room_index, &room);
                rooms.push(room);
                phase = SearchPhase::SampledSize;
            }
            PlacementOutcome::Merged { source, target } => {
                debug!(source, target, "carved door between existing rooms");
                report.merges += 1;
            }
            PlacementOutcome::Exhausted => match phase {
                SearchPhase::SampledSize => {
                    debug!(?size, "no placement at sampled size; retrying at minimum size");
                    report.fallback_retries += 1;
                    phase = SearchPhase::MinimumSize;
                }
                SearchPhase::MinimumSize => {
                    warn!(
                        placed = rooms.len(),
                        target = report.target_rooms,
                        "room placement exhausted before reaching target"
                    );
                    report.exhausted = true;
                    break;
                }
            },
        }
    }

    report.rooms_placed = rooms.len();
    report
}

fn sample_room_size<R: Rng + ?Sized>(config: &GeneratorConfig, rng: &mut R) -> RoomSize {
    RoomSize {
        width: random_between(rng, config.room_size_min, config.room_size_max),
        height: random_between(rng, config.room_size_min, config.room_size_max),
    }
}

/// One full sweep over every placed room and every open slot for a room of `size`.
pub(super) fn search_placement<R: Rng + ?Sized>(
    rooms: &mut [Room],
    index: &ConnectivityIndex,
    size: RoomSize,
    door_spacing: usize,
    rng: &mut R,
) -> PlacementOutcome {
    let mut source_order: Vec<usize> = (0..rooms.len()).collect();
    shuffle(rng, &mut source_order);

    for source in source_order {
        let mut door_tiles = rooms[source].available_door_tiles();
        shuffle(rng, &mut door_tiles);

        for door in door_tiles {
            match try_door_candidate(rooms, index, source, door, size, door_spacing, rng) {
                CandidateOutcome::Accepted(room) => {
                    return PlacementOutcome::Placed { room, source };
                }
                CandidateOutcome::Merged(target) => {
                    return PlacementOutcome::Merged { source, target };
                }
                CandidateOutcome::Rejected => {}
            }
        }
    }

    PlacementOutcome::Exhausted
}

fn try_door_candidate<R: Rng + ?Sized>(
    rooms: &mut [Room],
    index: &ConnectivityIndex,
    source: usize,
    door: Tile,
    size: RoomSize,
    door_spacing: usize,
    rng: &mut R,
) -> CandidateOutcome {
    let Some(direction) = door_direction(&rooms[source], door, rng) else {
        return CandidateOutcome::Rejected;
    };

    let mut candidate = Room::new(anchor_origin(door, direction, size, rng), size);
    let colliding = index.colliding_rooms(&candidate);
    if colliding.is_empty() {
        carve_door_pair(&mut rooms[source], &mut candidate, door, direction, door_spacing);
        return CandidateOutcome::Accepted(candidate);
    }

    let opposite = opposing_tile(door, direction);
    let Some(target) = index.owner(opposite) else {
        return CandidateOutcome::Rejected;
    };
    if !colliding.contains(&target) || !rooms[target].is_side_open(opposite, direction.opposite())
    {
        return CandidateOutcome::Rejected;
    }
    let Some((source_room, target_room)) = room_pair_mut(rooms, source, target) else {
        return CandidateOutcome::Rejected;
    };
    carve_door_pair(source_room, target_room, door, direction, door_spacing);
    CandidateOutcome::Merged(target)
}

/// Outward direction for a door on `tile`. Corner tiles pick uniformly among their sides that are
/// neither doorways already nor closed by spacing.
fn door_direction<R: Rng + ?Sized>(room: &Room, tile: Tile, rng: &mut R) -> Option<Direction> {
    let Some(corner_index) = room.corner_index(tile) else {
        return room.wall_side(tile);
    };
    let open_sides: Vec<Direction> = room.corners()[corner_index]
        .sides
        .iter()
        .map(|side| side.facing)
        .filter(|facing| room.is_side_open(tile, *facing))
        .collect();
    choose(rng, &open_sides).copied()
}

/// South-west corner for a room of `size` that sits across the `direction` edge of `door`, slid
/// at random along that edge while still covering the opposing tile.
fn anchor_origin<R: Rng + ?Sized>(
    door: Tile,
    direction: Direction,
    size: RoomSize,
    rng: &mut R,
) -> Tile {
    let width = size.width as i32;
    let height = size.height as i32;
    match direction {
        Direction::West | Direction::East => {
            let x = if direction == Direction::West { door.x - width } else { door.x + 1 };
            let slide = random_between(rng, 0, size.height - 1) as i32;
            Tile::new(x, door.y - slide)
        }
        Direction::North | Direction::South => {
            let y = if direction == Direction::South { door.y - height } else { door.y + 1 };
            let slide = random_between(rng, 0, size.width - 1) as i32;
            Tile::new(door.x - slide, y)
        }
    }
}
