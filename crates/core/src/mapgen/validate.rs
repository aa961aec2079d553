//! Iterative flood fill and the structural checks every accepted floor passes.

use std::collections::VecDeque;

use thiserror::Error;

use crate::config::GeneratorConfig;
use crate::types::{Pos, StairKind, TileKind};

use super::grid::Grid;
use super::model::{Floor, RoomFeature};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("border tile {0:?} is not wall")]
    BorderBreached(Pos),
    #[error("{count} rooms is outside [{min}, {max}]")]
    RoomCount { count: usize, min: usize, max: usize },
    #[error("rooms {a} and {b} overlap once padded")]
    RoomsOverlap { a: u32, b: u32 },
    #[error("room tile {0:?} is not walkable")]
    RoomTileBlocked(Pos),
    #[error("room {room} records {feature:?} but holds too few of its tiles")]
    FeatureMissing { room: u32, feature: RoomFeature },
    #[error("entrance and exit share tile {0:?}")]
    StairsCoincide(Pos),
    #[error("entrance {0:?} is not walkable")]
    EntranceBlocked(Pos),
    #[error("exit {0:?} is not walkable")]
    ExitBlocked(Pos),
    #[error("{0:?} stairs do not match the recorded stair position")]
    StairMismatch(StairKind),
    #[error("exit {exit:?} is unreachable from entrance {entrance:?}")]
    ExitUnreachable { entrance: Pos, exit: Pos },
}

/// Breadth-first fill over walkable tiles with 4-way movement. The result marks
/// every tile reachable from `start`; a non-walkable start reaches nothing.
pub fn flood_fill(canvas: &Grid<TileKind>, start: Pos) -> Grid<bool> {
    let mut reached = Grid::filled(canvas.width(), canvas.height(), false);
    if !canvas.get(start).is_some_and(|tile| tile.is_walkable()) {
        return reached;
    }

    let mut open = VecDeque::from([start]);
    reached.set(start, true);
    while let Some(pos) = open.pop_front() {
        for next in pos.cardinal_neighbors() {
            if reached.get(next) != Some(&false) {
                continue;
            }
            if canvas.get(next).is_some_and(|tile| tile.is_walkable()) {
                reached.set(next, true);
                open.push_back(next);
            }
        }
    }
    reached
}

pub fn is_reachable(canvas: &Grid<TileKind>, from: Pos, to: Pos) -> bool {
    flood_fill(canvas, from).get(to) == Some(&true)
}

/// Checks a finished floor against the configured bounds and the structural
/// rules: solid border, padded rooms, walkable rooms whose recorded feature is
/// present, consistent stairs, and an exit reachable from the entrance.
pub fn validate_floor(floor: &Floor, config: &GeneratorConfig) -> Result<(), ValidationFailure> {
    let terrain = floor.terrain();

    if let Some(pos) = terrain
        .positions()
        .find(|pos| terrain.is_border(*pos) && terrain.get(*pos) != Some(&TileKind::Wall))
    {
        return Err(ValidationFailure::BorderBreached(pos));
    }

    let min = config.effective_min_rooms();
    let max = config.max_rooms;
    if !(min..=max).contains(&floor.rooms.len()) {
        return Err(ValidationFailure::RoomCount { count: floor.rooms.len(), min, max });
    }

    let padding = config.room_padding;
    for (index, left) in floor.rooms.iter().enumerate() {
        for right in &floor.rooms[index + 1..] {
            if left.rect.expanded(padding).intersects(&right.rect.expanded(padding)) {
                return Err(ValidationFailure::RoomsOverlap { a: left.id, b: right.id });
            }
        }
    }

    for room in &floor.rooms {
        for pos in room.rect.positions() {
            let tile = floor.tile_at(pos);
            let decorated = matches!(
                (room.feature, tile),
                (Some(RoomFeature::Pillars), TileKind::Pillar)
                    | (Some(RoomFeature::Water), TileKind::Water)
            );
            if !tile.is_walkable() && !decorated {
                return Err(ValidationFailure::RoomTileBlocked(pos));
            }
        }
        if let Some(feature) = room.feature {
            let tiles =
                room.rect.positions().filter(|pos| floor.tile_at(*pos) == feature.tile()).count();
            if tiles < feature.min_tiles() {
                return Err(ValidationFailure::FeatureMissing { room: room.id, feature });
            }
        }
    }

    if floor.entrance == floor.exit {
        return Err(ValidationFailure::StairsCoincide(floor.entrance));
    }
    if !floor.is_walkable(floor.entrance) {
        return Err(ValidationFailure::EntranceBlocked(floor.entrance));
    }
    if !floor.is_walkable(floor.exit) {
        return Err(ValidationFailure::ExitBlocked(floor.exit));
    }

    for (kind, recorded, anchor) in [
        (StairKind::Up, floor.up_stairs, floor.entrance),
        (StairKind::Down, floor.down_stairs, floor.exit),
    ] {
        let expected_count = usize::from(recorded.is_some());
        let consistent = floor.count_tiles(kind.tile()) == expected_count
            && recorded.is_none_or(|pos| pos == anchor && floor.tile_at(pos) == kind.tile());
        if !consistent {
            return Err(ValidationFailure::StairMismatch(kind));
        }
    }

    if !is_reachable(&terrain, floor.entrance, floor.exit) {
        return Err(ValidationFailure::ExitUnreachable {
            entrance: floor.entrance,
            exit: floor.exit,
        });
    }
    Ok(())
}
