//! Floor-construction pipeline that composes mapgen subsystems.

use thiserror::Error;
use tracing::trace;

use crate::config::{ConnectionStrategy, GeneratorConfig};
use crate::types::{Pos, Tile, TileKind};

use super::super::corridors::{CorridorPlan, connect_rooms};
use super::super::fallback::chain_layout;
use super::super::features::decorate_rooms;
use super::super::grid::Grid;
use super::super::layout::{PlacementShortfall, carve_room, place_rooms};
use super::super::model::{Floor, Room, RoomRect};
use super::super::seed::FloorRng;
use super::super::stairs::{StairPlan, farthest_room_pair, place_stair};
use super::super::validate::{ValidationFailure, validate_floor};
use super::tags::assign_room_tags;

#[derive(Clone, Copy, Debug)]
pub(super) struct FloorRequest {
    pub(super) depth: u32,
    pub(super) width: usize,
    pub(super) height: usize,
    pub(super) stairs: StairPlan,
}

#[derive(Debug, Error)]
pub(super) enum AttemptFailure {
    #[error(transparent)]
    Placement(#[from] PlacementShortfall),
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
}

/// One full generation attempt: place, carve, connect, pick stair sites,
/// decorate, stair, tag, then validate. Nothing from a rejected attempt survives.
pub(super) fn build_floor(
    config: &GeneratorConfig,
    request: &FloorRequest,
    rng: &mut FloorRng,
) -> Result<Floor, AttemptFailure> {
    let rects = place_rooms(config, request.width, request.height, rng)?;
    let (mut canvas, mut rooms) = carve_rooms(request, &rects);

    let plan = CorridorPlan {
        strategy: config.connection,
        l_corridor_percent: config.l_corridor_percent,
        extra_edge_divisor: Some(config.extra_edge_divisor),
    };
    let corridors = connect_rooms(&mut canvas, &rooms, &plan, rng);
    let sites = StairSites::choose(&canvas, &rooms);
    decorate_rooms(&mut canvas, &mut rooms, request.depth, &[sites.entrance, sites.exit], rng);
    trace!(
        depth = request.depth,
        rooms = rooms.len(),
        corridors = corridors.len(),
        "floor attempt carved"
    );

    let floor = finish_floor(canvas, rooms, sites, request, rng);
    validate_floor(&floor, config)?;
    Ok(floor)
}

/// The guaranteed-connected chain: minimum-size lattice rooms joined in order
/// by straight corridors, with no loops and no decoration.
pub(super) fn build_chain_floor(
    config: &GeneratorConfig,
    request: &FloorRequest,
    rng: &mut FloorRng,
) -> Floor {
    let rects = chain_layout(config, request.width, request.height);
    let (mut canvas, rooms) = carve_rooms(request, &rects);

    let plan = CorridorPlan {
        strategy: ConnectionStrategy::Sequential,
        l_corridor_percent: 100,
        extra_edge_divisor: None,
    };
    let corridors = connect_rooms(&mut canvas, &rooms, &plan, rng);
    trace!(depth = request.depth, corridors = corridors.len(), "chain floor carved");
    let sites = StairSites::choose(&canvas, &rooms);
    finish_floor(canvas, rooms, sites, request, rng)
}

fn carve_rooms(request: &FloorRequest, rects: &[RoomRect]) -> (Grid<TileKind>, Vec<Room>) {
    let mut canvas = Grid::filled(request.width, request.height, TileKind::Wall);
    for rect in rects {
        carve_room(&mut canvas, rect);
    }
    let rooms = rects.iter().enumerate().map(|(id, rect)| Room::new(id as u32, *rect)).collect();
    (canvas, rooms)
}

/// Entrance and exit rooms, fixed before decoration so their aprons stay clear.
#[derive(Clone, Copy, Debug)]
struct StairSites {
    entrance_room: usize,
    exit_room: usize,
    entrance: Pos,
    exit: Pos,
}

impl StairSites {
    fn choose(canvas: &Grid<TileKind>, rooms: &[Room]) -> Self {
        let (entrance_room, exit_room) = farthest_room_pair(rooms);
        Self {
            entrance_room,
            exit_room,
            entrance: canvas.clamp_interior(rooms[entrance_room].center()),
            exit: canvas.clamp_interior(rooms[exit_room].center()),
        }
    }
}

fn finish_floor(
    mut canvas: Grid<TileKind>,
    mut rooms: Vec<Room>,
    sites: StairSites,
    request: &FloorRequest,
    rng: &mut FloorRng,
) -> Floor {
    let StairSites { entrance_room, exit_room, entrance, exit } = sites;

    let up_tile = if request.stairs.up { TileKind::UpStairs } else { TileKind::Floor };
    let down_tile = if request.stairs.down { TileKind::DownStairs } else { TileKind::Floor };
    place_stair(&mut canvas, entrance, up_tile);
    place_stair(&mut canvas, exit, down_tile);

    assign_room_tags(&mut rooms, entrance_room, exit_room, !request.stairs.down, rng);

    Floor {
        depth: request.depth,
        tiles: canvas.map(|kind| Tile::new(*kind)),
        rooms,
        entrance,
        exit,
        up_stairs: request.stairs.up.then_some(entrance),
        down_stairs: request.stairs.down.then_some(exit),
    }
}
