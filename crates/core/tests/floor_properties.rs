use std::collections::{BTreeSet, VecDeque};

use dungeon::mapgen::flood_fill;
use dungeon::{
    ConnectionStrategy, Dungeon, DungeonConfig, Floor, GenerationMode, GeneratorConfig,
    MapGenerator, Pos, RoomFeature, StairPlan, TileKind,
};
use proptest::prelude::*;

fn assert_floor_invariants(floor: &Floor, config: &GeneratorConfig) {
    let depth = floor.depth;
    assert!(floor.width() <= config.max_width && floor.height() <= config.max_height);

    for y in 0..floor.height() as i32 {
        for x in 0..floor.width() as i32 {
            let on_border = x == 0
                || y == 0
                || x == floor.width() as i32 - 1
                || y == floor.height() as i32 - 1;
            if on_border {
                assert_eq!(floor.tile_at(Pos::new(x, y)), TileKind::Wall, "depth {depth} border");
            }
        }
    }

    let rooms = floor.rooms.len();
    assert!(
        (config.effective_min_rooms()..=config.max_rooms).contains(&rooms),
        "depth {depth}: {rooms} rooms"
    );

    for (index, left) in floor.rooms.iter().enumerate() {
        for right in &floor.rooms[index + 1..] {
            let padding = config.room_padding;
            assert!(
                !left.rect.expanded(padding).intersects(&right.rect.expanded(padding)),
                "depth {depth}: rooms {} and {} overlap",
                left.id,
                right.id
            );
        }
        for pos in left.rect.positions() {
            let tile = floor.tile_at(pos);
            let obstacle = matches!(
                (left.feature, tile),
                (Some(RoomFeature::Pillars), TileKind::Pillar)
                    | (Some(RoomFeature::Water), TileKind::Water)
            );
            assert!(tile.is_walkable() || obstacle, "depth {depth}: room tile {pos:?} is {tile:?}");
        }
        if let Some(feature) = left.feature {
            let tiles =
                left.rect.positions().filter(|pos| floor.tile_at(*pos) == feature.tile()).count();
            assert!(
                tiles >= feature.min_tiles(),
                "depth {depth}: room {} lost its {feature:?}",
                left.id
            );
        }
    }

    assert_ne!(floor.entrance, floor.exit);
    let reached = flood_fill(&floor.terrain(), floor.entrance);
    assert_eq!(reached.get(floor.exit), Some(&true), "depth {depth}: exit unreachable");
}

/// Independent BFS over the whole floor: every walkable tile lies in one region.
fn all_walkable_tiles_connected(floor: &Floor) -> bool {
    let walkable: Vec<Pos> = floor.tiles.positions().filter(|pos| floor.is_walkable(*pos)).collect();
    let Some(start) = walkable.first().copied() else {
        return true;
    };

    let mut open = VecDeque::from([start]);
    let mut seen = BTreeSet::from([start]);
    while let Some(pos) = open.pop_front() {
        for next in pos.cardinal_neighbors() {
            if floor.is_walkable(next) && seen.insert(next) {
                open.push_back(next);
            }
        }
    }
    seen.len() == walkable.len()
}

#[test]
fn every_floor_of_a_long_dungeon_holds_the_invariants() {
    let config = DungeonConfig { seed: 5_150, floor_count: 12, ..DungeonConfig::default() };
    let mut dungeon = Dungeon::generate(config.clone()).expect("valid config");
    for depth in 1..=12 {
        let floor = dungeon.floor(depth).expect("in range").snapshot();
        assert_floor_invariants(&floor, &config.generator);
        assert!(all_walkable_tiles_connected(&floor), "depth {depth} has a stranded region");
    }
}

#[test]
fn smallest_legal_floor_still_places_three_rooms() {
    let config = GeneratorConfig {
        width: 15,
        height: 5,
        width_growth_per_depth: 0,
        height_growth_per_depth: 0,
        max_width: 15,
        max_height: 5,
        min_rooms: 0,
        max_rooms: 3,
        min_room_size: 3,
        max_room_size: 3,
        ..GeneratorConfig::default()
    };
    for seed in 0..16 {
        let floor =
            MapGenerator::new(config.clone(), seed).expect("valid").generate(1, StairPlan::BOTH);
        assert_eq!(floor.rooms.len(), 3);
        assert_floor_invariants(&floor, &config);
    }
}

#[test]
fn deepest_floor_stays_within_the_size_cap() {
    let config = DungeonConfig {
        seed: 8,
        floor_count: 60,
        mode: GenerationMode::Lazy,
        ..DungeonConfig::default()
    };
    let mut dungeon = Dungeon::generate(config.clone()).expect("valid config");
    let floor = dungeon.floor(60).expect("last floor").snapshot();

    let caps = (config.generator.max_width, config.generator.max_height);
    assert_eq!((floor.width(), floor.height()), caps);
    assert_floor_invariants(&floor, &config.generator);
}

#[test]
fn sequential_strategy_floors_hold_the_invariants() {
    let config = GeneratorConfig {
        connection: ConnectionStrategy::Sequential,
        ..GeneratorConfig::default()
    };
    let generator = MapGenerator::new(config.clone(), 404).expect("valid");
    for depth in 1..=4 {
        let floor = generator.generate(depth, StairPlan::BOTH);
        assert_floor_invariants(&floor, &config);
        assert!(all_walkable_tiles_connected(&floor));
    }
}

#[test]
fn json_round_trip_preserves_the_exact_grid() {
    let generator = MapGenerator::new(GeneratorConfig::default(), 77).expect("valid");
    let floor = generator.generate(3, StairPlan::BOTH);

    let json = serde_json::to_string(&floor).expect("serialize");
    let decoded: Floor = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(decoded.tiles, floor.tiles);
    assert_eq!(decoded.fingerprint(), floor.fingerprint());
    assert_eq!(decoded, floor);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]
    #[test]
    fn random_seeds_and_depths_yield_playable_floors(
        seed in any::<u64>(),
        depth in 1_u32..=20,
        sequential in any::<bool>(),
    ) {
        let config = GeneratorConfig {
            connection: if sequential {
                ConnectionStrategy::Sequential
            } else {
                ConnectionStrategy::Kruskal
            },
            ..GeneratorConfig::default()
        };
        let generator = MapGenerator::new(config.clone(), seed).expect("valid");
        let floor = generator.generate(depth, StairPlan::BOTH);

        assert_floor_invariants(&floor, &config);
        prop_assert!(all_walkable_tiles_connected(&floor), "seed={seed} depth={depth}");
    }

    #[test]
    fn regenerating_a_floor_is_deterministic(seed in any::<u64>(), depth in 1_u32..=8) {
        let config = GeneratorConfig::default();
        let first = MapGenerator::new(config.clone(), seed).expect("valid");
        let second = MapGenerator::new(config, seed).expect("valid");
        prop_assert_eq!(
            first.generate(depth, StairPlan::BOTH).fingerprint(),
            second.generate(depth, StairPlan::BOTH).fingerprint()
        );
    }
}
