//! Room placement by rejection sampling, with cluster bias and a relaxed second pass.

use thiserror::Error;

use crate::config::{GeneratorConfig, MIN_ROOM_SIDE};
use crate::types::TileKind;

use super::grid::Grid;
use super::model::RoomRect;
use super::seed::FloorRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("placed {placed} rooms, need at least {required}")]
pub(super) struct PlacementShortfall {
    pub(super) placed: usize,
    pub(super) required: usize,
}

#[derive(Clone, Copy, Debug)]
enum Side {
    North,
    East,
    South,
    West,
}

const SIDES: [Side; 4] = [Side::North, Side::East, Side::South, Side::West];

struct RoomPlacer<'a> {
    config: &'a GeneratorConfig,
    width: usize,
    height: usize,
    target: usize,
    rooms: Vec<RoomRect>,
}

impl RoomPlacer<'_> {
    fn is_full(&self) -> bool {
        self.rooms.len() >= self.target
    }

    fn fits(&self, candidate: RoomRect) -> bool {
        if candidate.x == 0
            || candidate.y == 0
            || candidate.right() + 1 >= self.width
            || candidate.bottom() + 1 >= self.height
        {
            return false;
        }
        let padding = self.config.room_padding;
        let candidate_with_margin = candidate.expanded(padding);
        !self
            .rooms
            .iter()
            .any(|existing_room| existing_room.expanded(padding).intersects(&candidate_with_margin))
    }

    fn run_pass(&mut self, min_side: usize, max_side: usize, rng: &mut FloorRng) {
        for _ in 0..self.config.placement_attempts {
            if self.is_full() {
                return;
            }
            let Some(room) = self.try_random_room(min_side, max_side, rng) else {
                continue;
            };
            if !self.is_full() && rng.percent(self.config.cluster_percent) {
                self.try_adjacent_room(room, min_side, max_side, rng);
            }
        }
    }

    fn try_random_room(
        &mut self,
        min_side: usize,
        max_side: usize,
        rng: &mut FloorRng,
    ) -> Option<RoomRect> {
        let room_width = rng.range_inclusive(min_side, max_side);
        let room_height = rng.range_inclusive(min_side, max_side);
        if room_width + 2 > self.width || room_height + 2 > self.height {
            return None;
        }

        let x = rng.range_inclusive(1, self.width - room_width - 1);
        let y = rng.range_inclusive(1, self.height - room_height - 1);
        let candidate = RoomRect { x, y, width: room_width, height: room_height };
        if !self.fits(candidate) {
            return None;
        }
        self.rooms.push(candidate);
        Some(candidate)
    }

    /// Places a neighbor flush against `anchor`'s padding margin on a random side,
    /// with overlapping spans so the two rooms face each other.
    fn try_adjacent_room(
        &mut self,
        anchor: RoomRect,
        min_side: usize,
        max_side: usize,
        rng: &mut FloorRng,
    ) {
        let gap = 2 * self.config.room_padding;
        for _ in 0..self.config.cluster_tries {
            if self.is_full() {
                return;
            }
            let room_width = rng.range_inclusive(min_side, max_side);
            let room_height = rng.range_inclusive(min_side, max_side);
            let side = SIDES[rng.index(SIDES.len())];

            let candidate = match side {
                Side::East | Side::West => {
                    let x = match side {
                        Side::East => Some(anchor.right() + gap + 1),
                        _ => anchor.x.checked_sub(gap + room_width),
                    };
                    let lowest_y = (anchor.y + 1).saturating_sub(room_height).max(1);
                    let y = rng.range_inclusive(lowest_y, anchor.bottom().max(lowest_y));
                    x.map(|x| RoomRect { x, y, width: room_width, height: room_height })
                }
                Side::North | Side::South => {
                    let y = match side {
                        Side::South => Some(anchor.bottom() + gap + 1),
                        _ => anchor.y.checked_sub(gap + room_height),
                    };
                    let lowest_x = (anchor.x + 1).saturating_sub(room_width).max(1);
                    let x = rng.range_inclusive(lowest_x, anchor.right().max(lowest_x));
                    y.map(|y| RoomRect { x, y, width: room_width, height: room_height })
                }
            };

            if let Some(candidate) = candidate.filter(|candidate| self.fits(*candidate)) {
                self.rooms.push(candidate);
                return;
            }
        }
    }
}

/// Places between the effective minimum and the target number of rooms.
///
/// The first pass samples sizes from the configured bounds. While the floor is
/// still short of the minimum, the layout is cleared and resampled with size
/// bounds shrunk one step at a time (max first, then min) down to the smallest
/// legal room.
pub(super) fn place_rooms(
    config: &GeneratorConfig,
    width: usize,
    height: usize,
    rng: &mut FloorRng,
) -> Result<Vec<RoomRect>, PlacementShortfall> {
    let required = config.effective_min_rooms();
    let mut placer = RoomPlacer {
        config,
        width,
        height,
        target: config.target_room_count(width, height),
        rooms: Vec::new(),
    };

    let mut min_side = config.min_room_size;
    let mut max_side = config.max_room_size;
    placer.run_pass(min_side, max_side, rng);

    while placer.rooms.len() < required {
        if max_side > min_side {
            max_side -= 1;
        } else if min_side > MIN_ROOM_SIDE {
            min_side -= 1;
            max_side = min_side;
        } else {
            break;
        }
        placer.rooms.clear();
        placer.run_pass(min_side, max_side, rng);
    }

    if placer.rooms.len() < required {
        return Err(PlacementShortfall { placed: placer.rooms.len(), required });
    }

    let mut rooms = placer.rooms;
    rooms.sort_by_key(|room| {
        let center = room.center();
        (center.y, center.x, room.height, room.width)
    });
    Ok(rooms)
}

pub(super) fn carve_room(canvas: &mut Grid<TileKind>, room: &RoomRect) {
    for pos in room.positions() {
        if !canvas.is_border(pos) {
            canvas.set(pos, TileKind::Floor);
        }
    }
}
