//! Generator and dungeon configuration, with up-front validation.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::mapgen::fallback_capacity;

pub const MIN_ACCEPTED_ROOMS: usize = 3;
pub const MIN_ROOM_SIDE: usize = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStrategy {
    /// Minimum spanning tree over room centers plus a few loop edges.
    #[default]
    Kruskal,
    /// Each room joined to the next one in placement order.
    Sequential,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    #[default]
    Eager,
    Lazy,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Floor width at depth 1.
    pub width: usize,
    /// Floor height at depth 1.
    pub height: usize,
    pub width_growth_per_depth: usize,
    pub height_growth_per_depth: usize,
    pub max_width: usize,
    pub max_height: usize,
    pub min_rooms: usize,
    pub max_rooms: usize,
    pub min_room_size: usize,
    pub max_room_size: usize,
    pub room_padding: usize,
    pub placement_attempts: u32,
    pub max_generation_attempts: u32,
    pub connection: ConnectionStrategy,
    pub l_corridor_percent: u32,
    pub cluster_percent: u32,
    pub cluster_tries: u32,
    pub extra_edge_divisor: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 40,
            width_growth_per_depth: 4,
            height_growth_per_depth: 2,
            max_width: 120,
            max_height: 60,
            min_rooms: 5,
            max_rooms: 15,
            min_room_size: 5,
            max_room_size: 10,
            room_padding: 1,
            placement_attempts: 200,
            max_generation_attempts: 50,
            connection: ConnectionStrategy::Kruskal,
            l_corridor_percent: 70,
            cluster_percent: 50,
            cluster_tries: 10,
            extra_edge_divisor: 7,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_room_size < MIN_ROOM_SIDE || self.min_room_size > self.max_room_size {
            return Err(ConfigError::RoomSizeBounds {
                min: self.min_room_size,
                max: self.max_room_size,
            });
        }
        let minimum = self.min_room_size + 2;
        if self.width < minimum || self.height < minimum {
            return Err(ConfigError::FloorTooSmall {
                width: self.width,
                height: self.height,
                minimum,
            });
        }
        if self.max_width < self.width || self.max_height < self.height {
            return Err(ConfigError::CapBelowBase {
                width: self.width,
                height: self.height,
                max_width: self.max_width,
                max_height: self.max_height,
            });
        }
        if self.max_rooms < MIN_ACCEPTED_ROOMS || self.min_rooms > self.max_rooms {
            return Err(ConfigError::RoomCountBounds { min: self.min_rooms, max: self.max_rooms });
        }
        if self.room_padding == 0 {
            return Err(ConfigError::ZeroPadding);
        }
        for (name, value) in [
            ("placement_attempts", self.placement_attempts),
            ("max_generation_attempts", self.max_generation_attempts),
            ("extra_edge_divisor", self.extra_edge_divisor as u32),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroBudget { name });
            }
        }
        for (name, value) in [
            ("l_corridor_percent", self.l_corridor_percent),
            ("cluster_percent", self.cluster_percent),
        ] {
            if value > 100 {
                return Err(ConfigError::Percentage { name, value });
            }
        }

        // Dimensions only grow with depth, so fitting at depth 1 is enough.
        let rooms = self.effective_min_rooms();
        if fallback_capacity(self, self.width, self.height) < rooms {
            return Err(ConfigError::FallbackDoesNotFit {
                width: self.width,
                height: self.height,
                rooms,
                room_side: self.min_room_size,
            });
        }
        Ok(())
    }

    /// Lower room-count bound actually enforced; never below three.
    pub fn effective_min_rooms(&self) -> usize {
        self.min_rooms.max(MIN_ACCEPTED_ROOMS)
    }

    /// Floor dimensions for a 1-based depth, growing linearly up to the caps.
    pub fn dimensions_for_depth(&self, depth: u32) -> (usize, usize) {
        let steps = depth.saturating_sub(1) as usize;
        let width = self
            .width
            .saturating_add(steps.saturating_mul(self.width_growth_per_depth))
            .min(self.max_width);
        let height = self
            .height
            .saturating_add(steps.saturating_mul(self.height_growth_per_depth))
            .min(self.max_height);
        (width, height)
    }

    /// How many rooms the placer aims for on a floor of the given size.
    pub fn target_room_count(&self, width: usize, height: usize) -> usize {
        let side = self.min_room_size + self.room_padding;
        let by_area = ((width * height) / (side * side)).clamp(5, 20);
        by_area.clamp(self.effective_min_rooms(), self.max_rooms)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    pub seed: u64,
    pub floor_count: u32,
    pub mode: GenerationMode,
    pub generator: GeneratorConfig,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            floor_count: 5,
            mode: GenerationMode::Eager,
            generator: GeneratorConfig::default(),
        }
    }
}

impl DungeonConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.floor_count == 0 {
            return Err(ConfigError::ZeroFloors);
        }
        self.generator.validate()
    }

    /// Reads a config file: `.toml` files are parsed as TOML, anything else as JSON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = match path.extension().and_then(|extension| extension.to_str()) {
            Some("toml") => toml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        DungeonConfig::default().validate().expect("defaults must validate");
    }

    #[test]
    fn zero_floors_is_a_config_error() {
        let config = DungeonConfig { floor_count: 0, ..DungeonConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroFloors)));
    }

    #[test]
    fn zero_width_is_rejected_before_generation() {
        let generator = GeneratorConfig { width: 0, ..GeneratorConfig::default() };
        assert!(matches!(generator.validate(), Err(ConfigError::FloorTooSmall { .. })));
    }

    #[test]
    fn inverted_room_bounds_are_rejected() {
        let counts = GeneratorConfig { min_rooms: 9, max_rooms: 4, ..GeneratorConfig::default() };
        assert!(matches!(counts.validate(), Err(ConfigError::RoomCountBounds { .. })));

        let sizes =
            GeneratorConfig { min_room_size: 8, max_room_size: 6, ..GeneratorConfig::default() };
        assert!(matches!(sizes.validate(), Err(ConfigError::RoomSizeBounds { .. })));
    }

    #[test]
    fn floors_that_cannot_hold_the_fallback_chain_are_rejected() {
        let generator = GeneratorConfig {
            width: 12,
            height: 9,
            max_width: 12,
            max_height: 9,
            min_rooms: 6,
            min_room_size: 5,
            ..GeneratorConfig::default()
        };
        assert!(matches!(generator.validate(), Err(ConfigError::FallbackDoesNotFit { .. })));
    }

    #[test]
    fn dimensions_grow_with_depth_until_capped() {
        let generator = GeneratorConfig::default();
        assert_eq!(generator.dimensions_for_depth(1), (80, 40));
        assert_eq!(generator.dimensions_for_depth(3), (88, 44));
        assert_eq!(generator.dimensions_for_depth(200), (120, 60));
    }

    #[test]
    fn target_room_count_respects_configured_bounds() {
        let generator = GeneratorConfig { min_rooms: 5, max_rooms: 10, ..GeneratorConfig::default() };
        assert_eq!(generator.target_room_count(80, 40), 10);

        let tiny = GeneratorConfig {
            width: 20,
            height: 15,
            min_rooms: 3,
            max_rooms: 8,
            min_room_size: 3,
            max_room_size: 5,
            ..GeneratorConfig::default()
        };
        assert_eq!(tiny.target_room_count(20, 15), 8);
    }

    #[test]
    fn partial_toml_fills_remaining_fields_with_defaults() {
        let config: DungeonConfig = toml::from_str(
            "seed = 7\nfloor_count = 3\n\n[generator]\nwidth = 60\nconnection = \"sequential\"\n",
        )
        .expect("parse toml");
        assert_eq!(config.seed, 7);
        assert_eq!(config.floor_count, 3);
        assert_eq!(config.generator.width, 60);
        assert_eq!(config.generator.height, 40);
        assert_eq!(config.generator.connection, ConnectionStrategy::Sequential);
    }

    #[test]
    fn load_reads_json_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dungeon.json");
        let config = DungeonConfig { seed: 99, ..DungeonConfig::default() };
        fs::write(&path, serde_json::to_string(&config).expect("serialize")).expect("write");

        assert_eq!(DungeonConfig::load(&path).expect("load"), config);
    }
}
