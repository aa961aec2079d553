pub mod config;
pub mod dungeon;
pub mod error;
pub mod mapgen;
pub mod occupancy;
pub mod session;
pub mod spawn;
pub mod store;
pub mod types;

pub use config::{ConnectionStrategy, DungeonConfig, GenerationMode, GeneratorConfig};
pub use dungeon::{Arrival, Dungeon, DungeonRecord};
pub use error::{ConfigError, DungeonError, OccupantError, StoreError};
pub use mapgen::{Floor, MapGenerator, Room, RoomFeature, RoomRect, RoomTag, StairPlan, generate_floor};
pub use session::{DungeonRegistry, SharedDungeon, SharedFloor};
pub use spawn::{EntitySpawner, Placement, SpawnContext};
pub use store::{DungeonStore, JsonDirStore};
pub use types::*;
