use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct EntityId;
    pub struct ItemId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self { y: self.y + dy, x: self.x + dx }
    }

    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn cardinal_neighbors(self) -> [Self; 4] {
        [self.offset(0, -1), self.offset(1, 0), self.offset(0, 1), self.offset(-1, 0)]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Wall,
    Floor,
    Door,
    Hallway,
    Pillar,
    Water,
    Rubble,
    UpStairs,
    DownStairs,
}

impl TileKind {
    pub const fn is_walkable(self) -> bool {
        !matches!(self, Self::Wall | Self::Pillar | Self::Water)
    }

    pub const fn is_stairs(self) -> bool {
        matches!(self, Self::UpStairs | Self::DownStairs)
    }

    /// Stable one-byte code used by canonical floor encodings.
    pub const fn code(self) -> u8 {
        match self {
            Self::Wall => 0,
            Self::Floor => 1,
            Self::Door => 2,
            Self::Hallway => 3,
            Self::Pillar => 4,
            Self::Water => 5,
            Self::Rubble => 6,
            Self::UpStairs => 7,
            Self::DownStairs => 8,
        }
    }
}

/// Something standing on a tile. The generator never creates these; spawners and
/// gameplay systems do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupant {
    Entity(EntityId),
    Item(ItemId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupant: Option<Occupant>,
}

impl Tile {
    pub const fn new(kind: TileKind) -> Self {
        Self { kind, occupant: None }
    }

    pub const fn is_walkable(&self) -> bool {
        self.kind.is_walkable()
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::new(TileKind::Wall)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DungeonId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StairKind {
    Up,
    Down,
}

impl StairKind {
    pub const fn tile(self) -> TileKind {
        match self {
            Self::Up => TileKind::UpStairs,
            Self::Down => TileKind::DownStairs,
        }
    }
}
