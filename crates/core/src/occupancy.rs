//! Occupant mutation on finished floors. Terrain is never touched here.

use crate::error::OccupantError;
use crate::mapgen::Floor;
use crate::spawn::Placement;
use crate::types::{Occupant, Pos};

/// How far the arrival search looks around a stair before giving up.
pub const ARRIVAL_RADIUS: i32 = 3;

impl Floor {
    pub fn occupant(&self, pos: Pos) -> Option<Occupant> {
        self.tiles.get(pos).and_then(|tile| tile.occupant)
    }

    pub fn occupants(&self) -> impl Iterator<Item = (Pos, Occupant)> + '_ {
        self.tiles
            .positions()
            .filter_map(|pos| self.occupant(pos).map(|occupant| (pos, occupant)))
    }

    /// Puts `occupant` on an empty walkable tile.
    pub fn set_occupant(&mut self, pos: Pos, occupant: Occupant) -> Result<(), OccupantError> {
        self.check_vacant_walkable(pos)?;
        if let Some(tile) = self.tiles.get_mut(pos) {
            tile.occupant = Some(occupant);
        }
        Ok(())
    }

    pub fn take_occupant(&mut self, pos: Pos) -> Result<Occupant, OccupantError> {
        let tile = self.tiles.get_mut(pos).ok_or(OccupantError::OutOfBounds(pos))?;
        tile.occupant.take().ok_or(OccupantError::Vacant(pos))
    }

    /// Moves whatever stands on `from` to `to`. Nothing changes on error.
    pub fn move_occupant(&mut self, from: Pos, to: Pos) -> Result<Occupant, OccupantError> {
        let occupant = self.occupant(from).ok_or_else(|| {
            if self.tiles.in_bounds(from) {
                OccupantError::Vacant(from)
            } else {
                OccupantError::OutOfBounds(from)
            }
        })?;
        if from == to {
            return Ok(occupant);
        }
        self.check_vacant_walkable(to)?;
        self.take_occupant(from)?;
        self.set_occupant(to, occupant)?;
        Ok(occupant)
    }

    /// Applies every placement or none of them.
    pub fn install_spawns(&mut self, placements: &[Placement]) -> Result<(), OccupantError> {
        for (index, placement) in placements.iter().enumerate() {
            self.check_vacant_walkable(placement.pos)?;
            if placements[..index].iter().any(|earlier| earlier.pos == placement.pos) {
                return Err(OccupantError::Occupied(placement.pos));
            }
        }
        for placement in placements {
            if let Some(tile) = self.tiles.get_mut(placement.pos) {
                tile.occupant = Some(placement.occupant);
            }
        }
        Ok(())
    }

    /// Where a character crossing onto this floor at `stair` should stand.
    ///
    /// Rings of growing radius are searched around the stair; within a ring the
    /// four cardinal offsets come before every other offset, then nearer
    /// offsets before farther ones. The first walkable, unoccupied tile wins.
    /// With none inside `ARRIVAL_RADIUS` the stair tile itself is returned.
    pub fn arrival_near(&self, stair: Pos) -> Pos {
        for radius in 1..=ARRIVAL_RADIUS {
            let mut ring: Vec<(i32, i32)> = (-radius..=radius)
                .flat_map(|dy| (-radius..=radius).map(move |dx| (dx, dy)))
                .filter(|(dx, dy)| dx.abs().max(dy.abs()) == radius)
                .collect();
            ring.sort_by_key(|&(dx, dy)| (dx != 0 && dy != 0, dx.abs() + dy.abs(), dy, dx));

            let found = ring
                .into_iter()
                .map(|(dx, dy)| stair.offset(dx, dy))
                .find(|pos| self.is_walkable(*pos) && self.occupant(*pos).is_none());
            if let Some(pos) = found {
                return pos;
            }
        }
        stair
    }

    fn check_vacant_walkable(&self, pos: Pos) -> Result<(), OccupantError> {
        let tile = self.tiles.get(pos).ok_or(OccupantError::OutOfBounds(pos))?;
        if !tile.is_walkable() {
            return Err(OccupantError::NotWalkable(pos));
        }
        if tile.occupant.is_some() {
            return Err(OccupantError::Occupied(pos));
        }
        Ok(())
    }
}
