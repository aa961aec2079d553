//! Multi-floor assembly, lazy floor generation and stair travel.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{DungeonConfig, GenerationMode};
use crate::error::DungeonError;
use crate::mapgen::{Floor, MapGenerator, StairPlan, derive_spawn_seed};
use crate::session::SharedFloor;
use crate::spawn::{EntitySpawner, SpawnContext};
use crate::types::{CharacterId, Pos, StairKind};

/// Where a character ends up after crossing floors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arrival {
    pub depth: u32,
    pub pos: Pos,
}

/// Serializable form of a dungeon, used by stores.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonRecord {
    pub config: DungeonConfig,
    pub floors: Vec<Floor>,
    pub assignments: Vec<(CharacterId, u32)>,
}

#[derive(Debug)]
pub struct Dungeon {
    config: DungeonConfig,
    generator: MapGenerator,
    floors: BTreeMap<u32, SharedFloor>,
    assignments: BTreeMap<CharacterId, u32>,
}

impl Dungeon {
    /// Validates `config` and, in eager mode, generates every floor up front.
    pub fn generate(config: DungeonConfig) -> Result<Self, DungeonError> {
        config.validate()?;
        let generator = MapGenerator::new(config.generator.clone(), config.seed)?;
        let mut dungeon =
            Self { config, generator, floors: BTreeMap::new(), assignments: BTreeMap::new() };

        if dungeon.config.mode == GenerationMode::Eager {
            for depth in 1..=dungeon.config.floor_count {
                dungeon.floor(depth)?;
            }
        }
        info!(
            seed = dungeon.config.seed,
            floor_count = dungeon.config.floor_count,
            mode = ?dungeon.config.mode,
            generated = dungeon.floors.len(),
            "dungeon assembled"
        );
        Ok(dungeon)
    }

    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    pub fn floor_count(&self) -> u32 {
        self.config.floor_count
    }

    pub fn stair_plan(&self, depth: u32) -> StairPlan {
        StairPlan::for_depth(depth, self.config.floor_count)
    }

    fn check_depth(&self, depth: u32) -> Result<(), DungeonError> {
        if (1..=self.config.floor_count).contains(&depth) {
            Ok(())
        } else {
            Err(DungeonError::DepthOutOfRange { depth, floor_count: self.config.floor_count })
        }
    }

    /// The floor at `depth`, generating it on first visit.
    pub fn floor(&mut self, depth: u32) -> Result<SharedFloor, DungeonError> {
        self.check_depth(depth)?;
        if let Some(floor) = self.floors.get(&depth) {
            return Ok(floor.clone());
        }
        let floor = SharedFloor::new(self.generator.generate(depth, self.stair_plan(depth)));
        debug!(depth, "floor generated");
        self.floors.insert(depth, floor.clone());
        Ok(floor)
    }

    /// The floor at `depth` only if it already exists.
    pub fn generated_floor(&self, depth: u32) -> Option<SharedFloor> {
        self.floors.get(&depth).cloned()
    }

    pub fn generated_depths(&self) -> impl Iterator<Item = u32> + '_ {
        self.floors.keys().copied()
    }

    pub fn assign(&mut self, character: CharacterId, depth: u32) -> Result<(), DungeonError> {
        self.check_depth(depth)?;
        self.assignments.insert(character, depth);
        Ok(())
    }

    pub fn character_floor(&self, character: CharacterId) -> Option<u32> {
        self.assignments.get(&character).copied()
    }

    pub fn remove_character(&mut self, character: CharacterId) -> Option<u32> {
        self.assignments.remove(&character)
    }

    /// Puts a new character on floor 1 next to its entrance.
    pub fn enter(&mut self, character: CharacterId) -> Result<Arrival, DungeonError> {
        let floor = self.floor(1)?;
        let pos = {
            let floor = floor.read();
            floor.arrival_near(floor.entrance)
        };
        self.assignments.insert(character, 1);
        Ok(Arrival { depth: 1, pos })
    }

    pub fn descend(&mut self, character: CharacterId) -> Result<Arrival, DungeonError> {
        self.travel(character, StairKind::Down)
    }

    pub fn ascend(&mut self, character: CharacterId) -> Result<Arrival, DungeonError> {
        self.travel(character, StairKind::Up)
    }

    /// Takes `stair` from the character's current floor. The arrival is the
    /// nearest free tile around the matching stair on the destination floor.
    pub fn travel(
        &mut self,
        character: CharacterId,
        stair: StairKind,
    ) -> Result<Arrival, DungeonError> {
        let depth = self
            .character_floor(character)
            .ok_or(DungeonError::UnknownCharacter(character))?;
        if self.floor(depth)?.read().stairs(stair).is_none() {
            return Err(DungeonError::NoStairs { depth, stair });
        }

        let (destination, matching) = match stair {
            StairKind::Down => (depth + 1, StairKind::Up),
            StairKind::Up => (depth - 1, StairKind::Down),
        };
        let floor = self.floor(destination)?;
        let pos = {
            let floor = floor.read();
            let landing = floor
                .stairs(matching)
                .ok_or(DungeonError::NoStairs { depth: destination, stair: matching })?;
            floor.arrival_near(landing)
        };

        self.assignments.insert(character, destination);
        debug!(?character, from = depth, to = destination, "character changed floors");
        Ok(Arrival { depth: destination, pos })
    }

    /// Runs `spawner` against the floor at `depth` and installs its placements.
    /// Returns how many occupants were placed.
    pub fn populate(
        &mut self,
        depth: u32,
        spawner: &mut impl EntitySpawner,
    ) -> Result<usize, DungeonError> {
        let floor = self.floor(depth)?;
        let seed = derive_spawn_seed(self.config.seed, depth);
        let mut floor = floor.write();
        let placements = spawner.spawn(&SpawnContext::for_floor(&floor, seed));
        floor.install_spawns(&placements)?;
        Ok(placements.len())
    }

    pub fn to_record(&self) -> DungeonRecord {
        DungeonRecord {
            config: self.config.clone(),
            floors: self.floors.values().map(SharedFloor::snapshot).collect(),
            assignments: self.assignments.iter().map(|(id, depth)| (*id, *depth)).collect(),
        }
    }

    /// Rebuilds a dungeon from a stored record. Missing floors are generated
    /// lazily, and regenerate identically from the stored seed.
    pub fn from_record(record: DungeonRecord) -> Result<Self, DungeonError> {
        record.config.validate()?;
        let generator = MapGenerator::new(record.config.generator.clone(), record.config.seed)?;
        let mut dungeon = Self {
            config: record.config,
            generator,
            floors: BTreeMap::new(),
            assignments: BTreeMap::new(),
        };
        for floor in record.floors {
            dungeon.check_depth(floor.depth)?;
            let expected = dungeon.stair_plan(floor.depth);
            let found =
                StairPlan { up: floor.up_stairs.is_some(), down: floor.down_stairs.is_some() };
            if found != expected {
                let depth = floor.depth;
                return Err(DungeonError::StairPlanMismatch { depth, expected, found });
            }
            dungeon.floors.insert(floor.depth, SharedFloor::new(floor));
        }
        for (character, depth) in record.assignments {
            dungeon.assign(character, depth)?;
        }
        Ok(dungeon)
    }
}
