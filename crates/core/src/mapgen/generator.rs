//! Generate-validate-retry orchestration with a bounded attempt ceiling.

mod pipeline;
mod tags;

use tracing::{debug, warn};

use crate::config::GeneratorConfig;
use crate::error::ConfigError;

use super::model::Floor;
use super::seed::{FloorRng, derive_floor_seed};
use super::stairs::StairPlan;
use pipeline::{FloorRequest, build_chain_floor, build_floor};

/// Produces floors as a pure function of (config, seed, depth, stair plan).
#[derive(Clone, Debug)]
pub struct MapGenerator {
    config: GeneratorConfig,
    seed: u64,
}

impl MapGenerator {
    pub fn new(config: GeneratorConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, seed })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Runs up to `max_generation_attempts` independent attempts, each with its
    /// own derived stream, and returns the first that validates. When every
    /// attempt is rejected the chain layout is returned instead.
    pub fn generate(&self, depth: u32, stairs: StairPlan) -> Floor {
        let (width, height) = self.config.dimensions_for_depth(depth);
        let request = FloorRequest { depth, width, height, stairs };

        for attempt in 0..self.config.max_generation_attempts {
            let mut rng = FloorRng::seed_from_u64(derive_floor_seed(self.seed, depth, attempt));
            match build_floor(&self.config, &request, &mut rng) {
                Ok(floor) => {
                    debug!(depth, attempt, rooms = floor.rooms.len(), "floor accepted");
                    return floor;
                }
                Err(reason) => debug!(depth, attempt, %reason, "floor attempt rejected"),
            }
        }

        warn!(
            depth,
            attempts = self.config.max_generation_attempts,
            "attempt ceiling reached; using chain layout"
        );
        let fallback_seed =
            derive_floor_seed(self.seed, depth, self.config.max_generation_attempts);
        build_chain_floor(&self.config, &request, &mut FloorRng::seed_from_u64(fallback_seed))
    }
}
