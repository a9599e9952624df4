//! Team spawn rooms at opposite extremes of the map's dominant axis.

use rand_chacha::rand_core::Rng;
use serde::Serialize;
use tracing::{debug, warn};

use crate::types::{NodeId, Team, WorldPos};

use super::connectivity::{ConnectivityIndex, MapBounds};
use super::navigation::NavGraph;
use super::rng::{choose, shuffle};
use super::room::Room;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// The longer side of `bounds`; ties go to `X`.
    pub fn dominant(bounds: &MapBounds) -> Self {
        if bounds.width() >= bounds.height() { Axis::X } else { Axis::Y }
    }

    fn span(self, room: &Room) -> (i32, i32) {
        let origin = room.origin();
        let far = room.far_corner();
        match self {
            Axis::X => (origin.x, far.x),
            Axis::Y => (origin.y, far.y),
        }
    }

    fn limits(self, bounds: &MapBounds) -> (i32, i32) {
        match self {
            Axis::X => (bounds.min.x, bounds.max.x),
            Axis::Y => (bounds.min.y, bounds.max.y),
        }
    }
}

/// Player-start placement for one team.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SpawnMarker {
    pub team: Team,
    pub position: WorldPos,
    pub yaw_degrees: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TeamSpawn {
    pub team: Team,
    pub room: usize,
    pub primary: NodeId,
    /// Remaining nodes of the spawn room in randomized order.
    pub ai_candidates: Vec<NodeId>,
    pub marker: SpawnMarker,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpawnRegions {
    pub axis: Axis,
    /// Both teams were placed in the only room of the map.
    pub shared_room: bool,
    pub blue: TeamSpawn,
    pub red: TeamSpawn,
}

impl SpawnRegions {
    pub fn team(&self, team: Team) -> &TeamSpawn {
        match team {
            Team::Blue => &self.blue,
            Team::Red => &self.red,
        }
    }
}

pub(super) fn select_spawn_regions<R: Rng + ?Sized>(
    rooms: &[Room],
    index: &ConnectivityIndex,
    graph: &NavGraph,
    tile_scale: f32,
    rng: &mut R,
) -> Option<SpawnRegions> {
    let Some(bounds) = index.bounds() else {
        warn!("no claimed tiles; skipping spawn selection");
        return None;
    };
    let axis = Axis::dominant(&bounds);
    let (axis_min, axis_max) = axis.limits(&bounds);

    if rooms.len() == 1 {
        return shared_spawn(rooms, axis, graph, tile_scale, rng);
    }

    let blue_candidates: Vec<usize> =
        (0..rooms.len()).filter(|&room| axis.span(&rooms[room]).0 == axis_min).collect();
    let Some(&blue_room) = choose(rng, &blue_candidates) else {
        warn!(?axis, "no room touches the minimum edge; skipping spawn selection");
        return None;
    };

    let red_candidates: Vec<usize> = (0..rooms.len())
        .filter(|&room| room != blue_room && axis.span(&rooms[room]).1 == axis_max)
        .collect();
    let red_room = match choose(rng, &red_candidates) {
        Some(&room) => room,
        None => {
            warn!(?axis, blue_room, "blue room spans the map; falling back to furthest room");
            furthest_other_room(rooms, axis, blue_room, rng)?
        }
    };
    debug!(?axis, blue_room, red_room, "selected spawn rooms");

    let mut blue_order = rooms[blue_room].nodes().to_vec();
    shuffle(rng, &mut blue_order);
    let mut red_order = rooms[red_room].nodes().to_vec();
    shuffle(rng, &mut red_order);

    let blue = team_spawn(Team::Blue, blue_room, rooms, blue_order, graph, tile_scale, rng)?;
    let red = team_spawn(Team::Red, red_room, rooms, red_order, graph, tile_scale, rng)?;
    Some(SpawnRegions { axis, shared_room: false, blue, red })
}

/// Room other than `excluded` whose far edge along `axis` is greatest; ties are broken at random.
fn furthest_other_room<R: Rng + ?Sized>(
    rooms: &[Room],
    axis: Axis,
    excluded: usize,
    rng: &mut R,
) -> Option<usize> {
    let best = (0..rooms.len())
        .filter(|&room| room != excluded)
        .map(|room| axis.span(&rooms[room]).1)
        .max()?;
    let tied: Vec<usize> = (0..rooms.len())
        .filter(|&room| room != excluded && axis.span(&rooms[room]).1 == best)
        .collect();
    choose(rng, &tied).copied()
}

/// Both teams in the single room, its shuffled nodes dealt alternately so no node is shared.
fn shared_spawn<R: Rng + ?Sized>(
    rooms: &[Room],
    axis: Axis,
    graph: &NavGraph,
    tile_scale: f32,
    rng: &mut R,
) -> Option<SpawnRegions> {
    warn!("single-room map; both teams share the only room");
    let mut order = rooms[0].nodes().to_vec();
    shuffle(rng, &mut order);
    let blue_order: Vec<NodeId> = order.iter().copied().step_by(2).collect();
    let red_order: Vec<NodeId> = order.iter().copied().skip(1).step_by(2).collect();

    let blue = team_spawn(Team::Blue, 0, rooms, blue_order, graph, tile_scale, rng)?;
    let red = team_spawn(Team::Red, 0, rooms, red_order, graph, tile_scale, rng)?;
    Some(SpawnRegions { axis, shared_room: true, blue, red })
}

fn team_spawn<R: Rng + ?Sized>(
    team: Team,
    room_index: usize,
    rooms: &[Room],
    order: Vec<NodeId>,
    graph: &NavGraph,
    tile_scale: f32,
    rng: &mut R,
) -> Option<TeamSpawn> {
    let Some((&primary, rest)) = order.split_first() else {
        warn!(?team, room_index, "spawn room has no navigation nodes");
        return None;
    };
    let position = graph.get(primary)?.position;
    let doorways = rooms[room_index].doorway_tiles();
    let yaw_degrees = choose(rng, &doorways)
        .map(|door| position.look_at_yaw(door.to_world(tile_scale)))
        .unwrap_or(0.0);

    Some(TeamSpawn {
        team,
        room: room_index,
        primary,
        ai_candidates: rest.to_vec(),
        marker: SpawnMarker { team, position, yaw_degrees },
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    use super::*;
    use crate::mapgen::doors::carve_door_pair;
    use crate::mapgen::navigation::build_navigation;
    use crate::mapgen::room::RoomSize;
    use crate::types::{Direction, Tile};

    fn prepared(mut rooms: Vec<Room>) -> (Vec<Room>, ConnectivityIndex, NavGraph) {
        let mut index = ConnectivityIndex::new();
        for (room_index, room) in rooms.iter().enumerate() {
            index.claim(room_index, room);
        }
        let mut graph = NavGraph::new();
        build_navigation(&mut rooms, &index, 1.0, &mut graph);
        (rooms, index, graph)
    }

    fn corridor() -> Vec<Room> {
        let mut rooms = vec![
            Room::new(Tile::new(0, 0), RoomSize::square(3)),
            Room::new(Tile::new(3, 0), RoomSize::square(3)),
            Room::new(Tile::new(6, 0), RoomSize::square(3)),
        ];
        let (left, rest) = rooms.split_at_mut(1);
        carve_door_pair(&mut left[0], &mut rest[0], Tile::new(2, 1), Direction::East, 0);
        let (middle, right) = rest.split_at_mut(1);
        carve_door_pair(&mut middle[0], &mut right[0], Tile::new(5, 1), Direction::East, 0);
        rooms
    }

    #[test]
    fn corridor_spawns_at_both_ends_of_x_axis() {
        let (rooms, index, graph) = prepared(corridor());
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let regions =
            select_spawn_regions(&rooms, &index, &graph, 1.0, &mut rng).expect("spawns selected");

        assert_eq!(regions.axis, Axis::X);
        assert!(!regions.shared_room);
        assert_eq!(regions.blue.room, 0);
        assert_eq!(regions.red.room, 2);

        for spawn in [&regions.blue, &regions.red] {
            let room = &rooms[spawn.room];
            assert_eq!(spawn.ai_candidates.len(), room.nodes().len() - 1);
            let mut all: Vec<NodeId> = spawn.ai_candidates.clone();
            all.push(spawn.primary);
            let all: BTreeSet<NodeId> = all.into_iter().collect();
            assert_eq!(all, room.nodes().iter().copied().collect::<BTreeSet<_>>());
            assert_eq!(
                graph.get(spawn.primary).map(|node| node.position),
                Some(spawn.marker.position)
            );
        }
    }

    #[test]
    fn marker_faces_the_only_doorway() {
        let (rooms, index, graph) = prepared(corridor());
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let regions =
            select_spawn_regions(&rooms, &index, &graph, 1.0, &mut rng).expect("spawns selected");

        let door = Tile::new(2, 1).to_world(1.0);
        let expected = regions.blue.marker.position.look_at_yaw(door);
        assert_eq!(regions.blue.marker.yaw_degrees, expected);
        assert_eq!(regions.blue.marker.team, Team::Blue);
        assert_eq!(regions.red.marker.team, Team::Red);
    }

    #[test]
    fn vertical_layout_uses_y_axis() {
        let mut rooms = vec![
            Room::new(Tile::new(0, 0), RoomSize::square(2)),
            Room::new(Tile::new(0, 2), RoomSize::square(2)),
            Room::new(Tile::new(0, 4), RoomSize::square(2)),
        ];
        let (a, rest) = rooms.split_at_mut(1);
        carve_door_pair(&mut a[0], &mut rest[0], Tile::new(0, 1), Direction::North, 0);
        let (b, c) = rest.split_at_mut(1);
        carve_door_pair(&mut b[0], &mut c[0], Tile::new(1, 3), Direction::North, 0);
        let (rooms, index, graph) = prepared(rooms);

        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let regions =
            select_spawn_regions(&rooms, &index, &graph, 1.0, &mut rng).expect("spawns selected");
        assert_eq!(regions.axis, Axis::Y);
        assert_eq!(regions.blue.room, 0);
        assert_eq!(regions.red.room, 2);
    }

    #[test]
    fn single_room_is_shared_without_sharing_nodes() {
        let (rooms, index, graph) = prepared(vec![Room::new(Tile::new(0, 0), RoomSize::square(3))]);
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let regions =
            select_spawn_regions(&rooms, &index, &graph, 1.0, &mut rng).expect("spawns selected");

        assert!(regions.shared_room);
        assert_eq!(regions.blue.room, regions.red.room);
        assert_eq!(regions.blue.marker.yaw_degrees, 0.0);

        let blue: BTreeSet<NodeId> =
            regions.blue.ai_candidates.iter().copied().chain([regions.blue.primary]).collect();
        let red: BTreeSet<NodeId> =
            regions.red.ai_candidates.iter().copied().chain([regions.red.primary]).collect();
        assert!(blue.is_disjoint(&red));
        assert_eq!(blue.len() + red.len(), 9);
        assert_eq!(blue.len(), 5);
    }

    #[test]
    fn room_spanning_the_axis_forces_distinct_fallback() {
        let mut rooms = vec![
            Room::new(Tile::new(0, 0), RoomSize { width: 6, height: 2 }),
            Room::new(Tile::new(2, 2), RoomSize::square(2)),
        ];
        let (wide, small) = rooms.split_at_mut(1);
        carve_door_pair(&mut wide[0], &mut small[0], Tile::new(2, 1), Direction::North, 0);
        let (rooms, index, graph) = prepared(rooms);

        for seed in 0..8 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let regions = select_spawn_regions(&rooms, &index, &graph, 1.0, &mut rng)
                .expect("spawns selected");
            assert_eq!(regions.axis, Axis::X);
            assert_eq!(regions.blue.room, 0);
            assert_eq!(regions.red.room, 1);
            assert!(!regions.shared_room);
        }
    }
}
