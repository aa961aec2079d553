//! Error types surfaced to callers of the dungeon engine.
//!
//! Generation itself never fails once a configuration has been accepted; the
//! retry and fallback policy lives inside the generator. Everything here is
//! either a configuration problem caught up front or a misuse of a finished
//! floor/dungeon.

use std::io;

use thiserror::Error;

use crate::mapgen::StairPlan;
use crate::types::{CharacterId, Pos, StairKind};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("a dungeon needs at least one floor")]
    ZeroFloors,
    #[error("floor dimensions {width}x{height} are too small (minimum {minimum}x{minimum})")]
    FloorTooSmall { width: usize, height: usize, minimum: usize },
    #[error("floor cap {max_width}x{max_height} is smaller than the base size {width}x{height}")]
    CapBelowBase { width: usize, height: usize, max_width: usize, max_height: usize },
    #[error("room count bounds [{min}, {max}] are invalid")]
    RoomCountBounds { min: usize, max: usize },
    #[error("room size bounds [{min}, {max}] are invalid")]
    RoomSizeBounds { min: usize, max: usize },
    #[error("room padding must be at least one tile")]
    ZeroPadding,
    #[error("{name} must be greater than zero")]
    ZeroBudget { name: &'static str },
    #[error("{name} must be a percentage, got {value}")]
    Percentage { name: &'static str, value: u32 },
    #[error(
        "a {width}x{height} floor cannot hold {rooms} rooms of side {room_side}; fallback layout would not fit"
    )]
    FallbackDoesNotFit { width: usize, height: usize, rooms: usize, room_side: usize },
    #[error("config I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum DungeonError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("depth {depth} is outside the dungeon (1..={floor_count})")]
    DepthOutOfRange { depth: u32, floor_count: u32 },
    #[error("floor {depth} has no {stair:?} stairs")]
    NoStairs { depth: u32, stair: StairKind },
    #[error("stored floor {depth} carries {found:?} stairs, its position needs {expected:?}")]
    StairPlanMismatch { depth: u32, expected: StairPlan, found: StairPlan },
    #[error("character {0:?} is not assigned to any floor")]
    UnknownCharacter(CharacterId),
    #[error(transparent)]
    Occupant(#[from] OccupantError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OccupantError {
    #[error("{0:?} is outside the floor")]
    OutOfBounds(Pos),
    #[error("{0:?} is not walkable")]
    NotWalkable(Pos),
    #[error("{0:?} is already occupied")]
    Occupied(Pos),
    #[error("{0:?} has no occupant")]
    Vacant(Pos),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("dungeon store I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("dungeon record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
