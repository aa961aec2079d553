//! Depth-driven room decoration: pillars, water patches and rubble.
//!
//! Obstacles are confined to the room interior with at least one free tile
//! between them and the room edge, so the room's walkable area stays one
//! connected ring around them and every corridor entering the room still
//! reaches every other. The 3x3 apron around each stair site is never
//! decorated, so a stair room keeps its whole feature.

use crate::types::{Pos, TileKind};

use super::grid::Grid;
use super::model::{Room, RoomFeature, RoomRect};
use super::seed::FloorRng;

pub(super) const FEATURE_MIN_SIDE: usize = 8;
const PILLAR_INSET: usize = 2;
const WATER_MAX_SIDE: usize = 3;
const RUBBLE_MIN: usize = 2;
const RUBBLE_MAX: usize = 5;

pub(super) fn feature_for_depth(depth: u32) -> Option<RoomFeature> {
    match depth % 4 {
        1 => Some(RoomFeature::Pillars),
        2 => Some(RoomFeature::Water),
        3 => Some(RoomFeature::Rubble),
        _ => None,
    }
}

/// Decorates every large room. `stair_sites` are the tiles that will receive
/// stairs; their aprons stay plain floor.
pub(super) fn decorate_rooms(
    canvas: &mut Grid<TileKind>,
    rooms: &mut [Room],
    depth: u32,
    stair_sites: &[Pos],
    rng: &mut FloorRng,
) {
    let Some(feature) = feature_for_depth(depth) else {
        return;
    };
    for room in rooms.iter_mut() {
        if room.rect.width < FEATURE_MIN_SIDE || room.rect.height < FEATURE_MIN_SIDE {
            continue;
        }
        match feature {
            RoomFeature::Pillars => place_pillars(canvas, room.rect, stair_sites),
            RoomFeature::Water => place_water(canvas, room.rect, stair_sites),
            RoomFeature::Rubble => place_rubble(canvas, room.rect, stair_sites, rng),
        }
        room.feature = Some(feature);
    }
}

fn in_stair_apron(pos: Pos, stair_sites: &[Pos]) -> bool {
    stair_sites.iter().any(|site| site.x.abs_diff(pos.x) <= 1 && site.y.abs_diff(pos.y) <= 1)
}

/// A pillar that would land in a stair apron steps one tile further into its corner.
fn place_pillars(canvas: &mut Grid<TileKind>, rect: RoomRect, stair_sites: &[Pos]) {
    let left = (rect.x + PILLAR_INSET) as i32;
    let right = (rect.right() - PILLAR_INSET) as i32;
    let top = (rect.y + PILLAR_INSET) as i32;
    let bottom = (rect.bottom() - PILLAR_INSET) as i32;
    for (x, y, dx, dy) in
        [(left, top, -1, -1), (right, top, 1, -1), (left, bottom, -1, 1), (right, bottom, 1, 1)]
    {
        let pos = Pos { y, x };
        let pos = if in_stair_apron(pos, stair_sites) { pos.offset(dx, dy) } else { pos };
        place_obstacle(canvas, pos, TileKind::Pillar);
    }
}

/// Centered patch; in a stair room the patch sits directly above the apron.
fn place_water(canvas: &mut Grid<TileKind>, rect: RoomRect, stair_sites: &[Pos]) {
    let patch_width = (rect.width / 4).clamp(1, WATER_MAX_SIDE);
    let patch_height = (rect.height / 4).clamp(1, WATER_MAX_SIDE);
    let center = rect.center();
    let left = center.x - (patch_width / 2) as i32;
    let top = if in_stair_apron(center, stair_sites) {
        center.y - 1 - patch_height as i32
    } else {
        center.y - (patch_height / 2) as i32
    };
    for y in top..top + patch_height as i32 {
        for x in left..left + patch_width as i32 {
            place_obstacle(canvas, Pos { y, x }, TileKind::Water);
        }
    }
}

/// Distinct interior tiles outside any stair apron, picked by partial shuffle.
fn place_rubble(
    canvas: &mut Grid<TileKind>,
    rect: RoomRect,
    stair_sites: &[Pos],
    rng: &mut FloorRng,
) {
    let mut candidates: Vec<Pos> = rect
        .positions()
        .filter(|pos| {
            pos.x > rect.x as i32
                && pos.x < rect.right() as i32
                && pos.y > rect.y as i32
                && pos.y < rect.bottom() as i32
                && !in_stair_apron(*pos, stair_sites)
        })
        .collect();
    let count = rng.range_inclusive(RUBBLE_MIN, RUBBLE_MAX).min(candidates.len());
    for index in 0..count {
        let pick = index + rng.index(candidates.len() - index);
        candidates.swap(index, pick);
        place_obstacle(canvas, candidates[index], TileKind::Rubble);
    }
}

/// Only plain room floor is decorated; hallways, doors and the border are left alone.
fn place_obstacle(canvas: &mut Grid<TileKind>, pos: Pos, kind: TileKind) {
    if canvas.is_border(pos) {
        return;
    }
    if let Some(tile) = canvas.get_mut(pos)
        && *tile == TileKind::Floor
    {
        *tile = kind;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::stairs::place_stair;
    use crate::mapgen::validate::flood_fill;

    fn carved_room(rect: RoomRect) -> Grid<TileKind> {
        let mut canvas = Grid::filled(rect.right() + 3, rect.bottom() + 3, TileKind::Wall);
        for pos in rect.positions() {
            canvas.set(pos, TileKind::Floor);
        }
        canvas
    }

    fn walkable_tiles_stay_connected(canvas: &Grid<TileKind>, rect: RoomRect) -> bool {
        let start = Pos::new(rect.x as i32, rect.y as i32);
        let reached = flood_fill(canvas, start);
        rect.positions().all(|pos| {
            !canvas.get(pos).is_some_and(|tile| tile.is_walkable())
                || reached.get(pos) == Some(&true)
        })
    }

    #[test]
    fn feature_cycles_with_depth() {
        assert_eq!(feature_for_depth(1), Some(RoomFeature::Pillars));
        assert_eq!(feature_for_depth(2), Some(RoomFeature::Water));
        assert_eq!(feature_for_depth(3), Some(RoomFeature::Rubble));
        assert_eq!(feature_for_depth(4), None);
        assert_eq!(feature_for_depth(5), Some(RoomFeature::Pillars));
    }

    #[test]
    fn small_rooms_are_left_plain() {
        let rect = RoomRect { x: 1, y: 1, width: 7, height: 9 };
        let mut canvas = carved_room(rect);
        let mut rooms = [Room::new(0, rect)];
        decorate_rooms(&mut canvas, &mut rooms, 1, &[], &mut FloorRng::seed_from_u64(1));

        assert_eq!(rooms[0].feature, None);
        assert!(rect.positions().all(|pos| canvas.get(pos) == Some(&TileKind::Floor)));
    }

    #[test]
    fn pillars_sit_inside_corners_without_splitting_the_room() {
        let rect = RoomRect { x: 1, y: 1, width: 8, height: 8 };
        let mut canvas = carved_room(rect);
        let mut rooms = [Room::new(0, rect)];
        decorate_rooms(&mut canvas, &mut rooms, 1, &[], &mut FloorRng::seed_from_u64(1));

        assert_eq!(rooms[0].feature, Some(RoomFeature::Pillars));
        let pillars: Vec<Pos> = canvas
            .positions()
            .filter(|pos| canvas.get(*pos) == Some(&TileKind::Pillar))
            .collect();
        assert_eq!(pillars, vec![Pos::new(3, 3), Pos::new(6, 3), Pos::new(3, 6), Pos::new(6, 6)]);
        assert!(walkable_tiles_stay_connected(&canvas, rect));
    }

    #[test]
    fn water_patch_is_small_and_central() {
        for side in [8, 12, 20] {
            let rect = RoomRect { x: 1, y: 1, width: side, height: side };
            let mut canvas = carved_room(rect);
            let mut rooms = [Room::new(0, rect)];
            decorate_rooms(&mut canvas, &mut rooms, 2, &[], &mut FloorRng::seed_from_u64(1));

            let water: Vec<Pos> = canvas
                .positions()
                .filter(|pos| canvas.get(*pos) == Some(&TileKind::Water))
                .collect();
            assert!(!water.is_empty());
            assert!(water.len() <= WATER_MAX_SIDE * WATER_MAX_SIDE);
            assert!(water.iter().all(|pos| pos.manhattan(rect.center()) <= 2));
            assert!(walkable_tiles_stay_connected(&canvas, rect));
        }
    }

    #[test]
    fn rubble_stays_walkable() {
        let rect = RoomRect { x: 1, y: 1, width: 10, height: 9 };
        let mut canvas = carved_room(rect);
        let mut rooms = [Room::new(0, rect)];
        decorate_rooms(&mut canvas, &mut rooms, 3, &[], &mut FloorRng::seed_from_u64(9));

        let rubble = canvas
            .positions()
            .filter(|pos| canvas.get(*pos) == Some(&TileKind::Rubble))
            .count();
        assert!((RUBBLE_MIN..=RUBBLE_MAX).contains(&rubble));
        assert!(rect.positions().all(|pos| canvas.get(pos).is_some_and(|tile| tile.is_walkable())));
    }

    #[test]
    fn stair_rooms_keep_their_whole_feature() {
        for side in [8, 9, 12] {
            for depth in 1..=3 {
                let rect = RoomRect { x: 1, y: 1, width: side, height: side };
                let mut canvas = carved_room(rect);
                let mut rooms = [Room::new(0, rect)];
                let site = rect.center();
                let mut rng = FloorRng::seed_from_u64(5);
                decorate_rooms(&mut canvas, &mut rooms, depth, &[site], &mut rng);
                place_stair(&mut canvas, site, TileKind::DownStairs);

                let feature = rooms[0].feature.expect("large rooms are decorated");
                let tiles =
                    rect.positions().filter(|pos| canvas.get(*pos) == Some(&feature.tile())).count();
                assert!(tiles >= feature.min_tiles(), "side {side} depth {depth}: {feature:?}");
                if feature == RoomFeature::Pillars {
                    assert_eq!(tiles, 4);
                }
                assert_eq!(canvas.get(site), Some(&TileKind::DownStairs));
                assert!(walkable_tiles_stay_connected(&canvas, rect));
            }
        }
    }
}
