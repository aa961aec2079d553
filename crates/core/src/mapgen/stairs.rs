//! Entrance/exit selection and stair carving.

use serde::{Deserialize, Serialize};

use crate::types::{Pos, TileKind};

use super::grid::Grid;
use super::model::Room;

/// Which stair tiles a floor should carry; decided by its place in the dungeon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StairPlan {
    pub up: bool,
    pub down: bool,
}

impl StairPlan {
    pub const BOTH: Self = Self { up: true, down: true };

    /// First floor: down only. Last floor: up only. A single-floor dungeon has neither.
    pub fn for_depth(depth: u32, floor_count: u32) -> Self {
        Self { up: depth > 1, down: depth < floor_count }
    }
}

/// Index pair of the two rooms whose centers are farthest apart (Manhattan).
/// Ties keep the first pair found in scan order.
pub(super) fn farthest_room_pair(rooms: &[Room]) -> (usize, usize) {
    let mut best = (0, rooms.len().saturating_sub(1));
    let mut best_distance = 0_u32;
    for a in 0..rooms.len() {
        for b in (a + 1)..rooms.len() {
            let distance = rooms[a].center().manhattan(rooms[b].center());
            if distance > best_distance {
                best = (a, b);
                best_distance = distance;
            }
        }
    }
    best
}

/// Writes `kind` at `pos` and opens the 3x3 apron around it. Apron cells are
/// clamped to the interior so the outer wall is never touched.
pub(super) fn place_stair(canvas: &mut Grid<TileKind>, pos: Pos, kind: TileKind) {
    let pos = canvas.clamp_interior(pos);
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let apron = pos.offset(dx, dy);
            if canvas.is_border(apron) {
                continue;
            }
            if let Some(tile) = canvas.get_mut(apron)
                && !tile.is_walkable()
            {
                *tile = TileKind::Floor;
            }
        }
    }
    canvas.set(pos, kind);
}
