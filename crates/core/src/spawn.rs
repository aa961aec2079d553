//! Seam for the external entity/item spawner.
//!
//! The engine knows nothing about monsters or loot. A spawner receives the
//! floor layout, keeps whatever state it needs keyed by its own ids, and hands
//! back where each id should stand.

use serde::{Deserialize, Serialize};

use crate::mapgen::{Floor, FloorRng, Room};
use crate::types::{Occupant, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub pos: Pos,
    pub occupant: Occupant,
}

/// Read-only view of a floor handed to a spawner.
#[derive(Clone, Copy, Debug)]
pub struct SpawnContext<'a> {
    pub depth: u32,
    pub width: usize,
    pub height: usize,
    pub rooms: &'a [Room],
    pub entrance: Pos,
    pub exit: Pos,
    /// Stream seed independent of terrain generation.
    pub seed: u64,
}

impl<'a> SpawnContext<'a> {
    pub fn for_floor(floor: &'a Floor, seed: u64) -> Self {
        Self {
            depth: floor.depth,
            width: floor.width(),
            height: floor.height(),
            rooms: &floor.rooms,
            entrance: floor.entrance,
            exit: floor.exit,
            seed,
        }
    }

    pub fn rng(&self) -> FloorRng {
        FloorRng::seed_from_u64(self.seed)
    }
}

pub trait EntitySpawner {
    fn spawn(&mut self, context: &SpawnContext<'_>) -> Vec<Placement>;
}
