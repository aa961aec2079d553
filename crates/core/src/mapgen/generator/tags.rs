use super::super::model::{Room, RoomTag};
use super::super::seed::FloorRng;

const TREASURE_PERCENT: usize = 10;
const SHOP_PERCENT: usize = 5;
const SAFE_PERCENT: usize = 5;

/// Tags the entrance room, the boss room on a floor without a way down, and
/// rolls the rest. Every non-entrance room draws exactly one roll so tagging
/// consumes the stream identically whichever room hosts the boss.
pub(super) fn assign_room_tags(
    rooms: &mut [Room],
    entrance_room: usize,
    exit_room: usize,
    final_floor: bool,
    rng: &mut FloorRng,
) {
    for (index, room) in rooms.iter_mut().enumerate() {
        if index == entrance_room {
            room.tag = RoomTag::Entrance;
            continue;
        }
        let roll = rng.range_inclusive(0, 99);
        room.tag = if final_floor && index == exit_room {
            RoomTag::Boss
        } else if roll < TREASURE_PERCENT {
            RoomTag::Treasure
        } else if roll < TREASURE_PERCENT + SHOP_PERCENT {
            RoomTag::Shop
        } else if roll < TREASURE_PERCENT + SHOP_PERCENT + SAFE_PERCENT {
            RoomTag::Safe
        } else {
            RoomTag::Standard
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::model::RoomRect;

    fn rooms(count: u32) -> Vec<Room> {
        (0..count)
            .map(|id| {
                Room::new(id, RoomRect { x: 1 + id as usize * 6, y: 1, width: 4, height: 4 })
            })
            .collect()
    }

    #[test]
    fn entrance_and_boss_rooms_are_fixed() {
        let mut rooms = rooms(6);
        assign_room_tags(&mut rooms, 4, 1, true, &mut FloorRng::seed_from_u64(3));
        assert_eq!(rooms[4].tag, RoomTag::Entrance);
        assert_eq!(rooms[1].tag, RoomTag::Boss);
        assert_eq!(rooms.iter().filter(|room| room.tag == RoomTag::Boss).count(), 1);
    }

    #[test]
    fn only_the_final_floor_has_a_boss() {
        let mut rooms = rooms(40);
        assign_room_tags(&mut rooms, 0, 39, false, &mut FloorRng::seed_from_u64(8));
        assert!(rooms.iter().all(|room| room.tag != RoomTag::Boss));
        assert_eq!(rooms.iter().filter(|room| room.tag == RoomTag::Entrance).count(), 1);
    }

    #[test]
    fn rolled_tags_appear_at_roughly_their_rates() {
        let mut rooms = rooms(2_000);
        assign_room_tags(&mut rooms, 0, 1, false, &mut FloorRng::seed_from_u64(21));
        let treasure = rooms.iter().filter(|room| room.tag == RoomTag::Treasure).count();
        let standard = rooms.iter().filter(|room| room.tag == RoomTag::Standard).count();
        assert!((100..=300).contains(&treasure), "treasure rooms: {treasure}");
        assert!(standard > 1_400, "standard rooms: {standard}");
    }
}
