//! Public data models for generated floors and their rooms.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::types::{Pos, StairKind, Tile, TileKind};

use super::grid::Grid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl RoomRect {
    pub fn right(self) -> usize {
        self.x + self.width - 1
    }

    pub fn bottom(self) -> usize {
        self.y + self.height - 1
    }

    pub fn center(self) -> Pos {
        Pos { y: (self.y + (self.height / 2)) as i32, x: (self.x + (self.width / 2)) as i32 }
    }

    pub fn expanded(self, margin: usize) -> Self {
        let expanded_x = self.x.saturating_sub(margin);
        let expanded_y = self.y.saturating_sub(margin);
        let expanded_right = self.right().saturating_add(margin);
        let expanded_bottom = self.bottom().saturating_add(margin);
        Self {
            x: expanded_x,
            y: expanded_y,
            width: expanded_right - expanded_x + 1,
            height: expanded_bottom - expanded_y + 1,
        }
    }

    pub fn intersects(self, other: &Self) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }

    pub fn contains(self, pos: Pos) -> bool {
        if pos.x < 0 || pos.y < 0 {
            return false;
        }
        let px = pos.x as usize;
        let py = pos.y as usize;
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    pub fn positions(self) -> impl Iterator<Item = Pos> {
        (self.y..=self.bottom()).flat_map(move |y| {
            (self.x..=self.right()).map(move |x| Pos { y: y as i32, x: x as i32 })
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomTag {
    #[default]
    Standard,
    Treasure,
    Boss,
    Shop,
    Safe,
    Entrance,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomFeature {
    Pillars,
    Water,
    Rubble,
}

impl RoomFeature {
    pub fn tile(self) -> TileKind {
        match self {
            Self::Pillars => TileKind::Pillar,
            Self::Water => TileKind::Water,
            Self::Rubble => TileKind::Rubble,
        }
    }

    /// Fewest tiles of [`Self::tile`] a decorated room carries.
    pub fn min_tiles(self) -> usize {
        match self {
            Self::Pillars => 4,
            Self::Water => 1,
            Self::Rubble => 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: u32,
    pub rect: RoomRect,
    pub tag: RoomTag,
    pub feature: Option<RoomFeature>,
}

impl Room {
    pub fn new(id: u32, rect: RoomRect) -> Self {
        Self { id, rect, tag: RoomTag::Standard, feature: None }
    }

    pub fn center(&self) -> Pos {
        self.rect.center()
    }
}

/// One validated dungeon level. Terrain is fixed once this value exists; only
/// tile occupants change afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Floor {
    pub depth: u32,
    pub tiles: Grid<Tile>,
    pub rooms: Vec<Room>,
    pub entrance: Pos,
    pub exit: Pos,
    pub up_stairs: Option<Pos>,
    pub down_stairs: Option<Pos>,
}

impl Floor {
    pub fn width(&self) -> usize {
        self.tiles.width()
    }

    pub fn height(&self) -> usize {
        self.tiles.height()
    }

    /// Terrain at `pos`; everything outside the floor reads as wall.
    pub fn tile_at(&self, pos: Pos) -> TileKind {
        self.tiles.get(pos).map_or(TileKind::Wall, |tile| tile.kind)
    }

    pub fn is_walkable(&self, pos: Pos) -> bool {
        self.tile_at(pos).is_walkable()
    }

    pub fn stairs(&self, kind: StairKind) -> Option<Pos> {
        match kind {
            StairKind::Up => self.up_stairs,
            StairKind::Down => self.down_stairs,
        }
    }

    pub fn count_tiles(&self, kind: TileKind) -> usize {
        self.tiles.cells().iter().filter(|tile| tile.kind == kind).count()
    }

    pub fn terrain(&self) -> Grid<TileKind> {
        self.tiles.map(|tile| tile.kind)
    }

    /// Stable byte encoding of terrain, rooms and stairs. Occupants are excluded
    /// so the encoding only changes when generation output changes.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.width() * self.height() + 64);
        bytes.extend(self.depth.to_le_bytes());
        bytes.extend((self.width() as u32).to_le_bytes());
        bytes.extend((self.height() as u32).to_le_bytes());
        bytes.extend(self.tiles.cells().iter().map(|tile| tile.kind.code()));

        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in &self.rooms {
            for value in [room.rect.x, room.rect.y, room.rect.width, room.rect.height] {
                bytes.extend((value as u32).to_le_bytes());
            }
        }

        for pos in [Some(self.entrance), Some(self.exit), self.up_stairs, self.down_stairs] {
            match pos {
                Some(pos) => {
                    bytes.push(1);
                    bytes.extend(pos.y.to_le_bytes());
                    bytes.extend(pos.x.to_le_bytes());
                }
                None => bytes.push(0),
            }
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}
