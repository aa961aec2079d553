//! Procedural floor generation split into coherent submodules.

pub mod grid;
pub mod model;
pub mod validate;

mod corridors;
mod fallback;
mod features;
mod generator;
mod layout;
mod seed;
mod stairs;

pub(crate) use fallback::fallback_capacity;
pub use generator::MapGenerator;
pub use grid::Grid;
pub use model::{Floor, Room, RoomFeature, RoomRect, RoomTag};
pub(crate) use seed::derive_spawn_seed;
pub use seed::FloorRng;
pub use stairs::StairPlan;
pub use validate::{ValidationFailure, flood_fill, is_reachable, validate_floor};

use crate::config::GeneratorConfig;
use crate::error::ConfigError;

/// One-shot helper: validates `config` and generates the floor at `depth`.
pub fn generate_floor(
    config: &GeneratorConfig,
    seed: u64,
    depth: u32,
    stairs: StairPlan,
) -> Result<Floor, ConfigError> {
    Ok(MapGenerator::new(config.clone(), seed)?.generate(depth, stairs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_floor_matches_map_generator_output() {
        let config = GeneratorConfig::default();
        let from_helper =
            generate_floor(&config, 123, 2, StairPlan::BOTH).expect("default config is valid");
        let from_generator =
            MapGenerator::new(config, 123).expect("default config").generate(2, StairPlan::BOTH);

        assert_eq!(from_helper, from_generator);
    }

    #[test]
    fn generate_floor_surfaces_config_errors() {
        let config = GeneratorConfig { height: 0, ..GeneratorConfig::default() };
        assert!(matches!(
            generate_floor(&config, 1, 1, StairPlan::BOTH),
            Err(ConfigError::FloorTooSmall { .. })
        ));
    }
}
