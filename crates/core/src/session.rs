//! Live-session plumbing: per-floor locking and idle dungeon eviction.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

use crate::dungeon::Dungeon;
use crate::error::{OccupantError, StoreError};
use crate::mapgen::Floor;
use crate::store::DungeonStore;
use crate::types::{DungeonId, Occupant, Pos};

/// A floor shared between connections. Reads run in parallel; occupant writes
/// on one floor are serialized and never block other floors.
#[derive(Clone, Debug)]
pub struct SharedFloor {
    inner: Arc<RwLock<Floor>>,
}

impl SharedFloor {
    pub fn new(floor: Floor) -> Self {
        Self { inner: Arc::new(RwLock::new(floor)) }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Floor> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Floor> {
        self.inner.write()
    }

    pub fn snapshot(&self) -> Floor {
        self.inner.read().clone()
    }

    pub fn set_occupant(&self, pos: Pos, occupant: Occupant) -> Result<(), OccupantError> {
        self.inner.write().set_occupant(pos, occupant)
    }

    pub fn take_occupant(&self, pos: Pos) -> Result<Occupant, OccupantError> {
        self.inner.write().take_occupant(pos)
    }

    pub fn move_occupant(&self, from: Pos, to: Pos) -> Result<Occupant, OccupantError> {
        self.inner.write().move_occupant(from, to)
    }
}

pub type SharedDungeon = Arc<Mutex<Dungeon>>;

struct SessionEntry {
    dungeon: SharedDungeon,
    last_access: Instant,
}

/// Open dungeons by id, each stamped with its last access.
pub struct DungeonRegistry {
    idle_timeout: Duration,
    sessions: Mutex<HashMap<DungeonId, SessionEntry>>,
}

impl DungeonRegistry {
    pub fn new(idle_timeout: Duration) -> Self {
        Self { idle_timeout, sessions: Mutex::new(HashMap::new()) }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    pub fn insert(&self, id: DungeonId, dungeon: Dungeon) -> SharedDungeon {
        self.insert_at(id, dungeon, Instant::now())
    }

    pub fn insert_at(&self, id: DungeonId, dungeon: Dungeon, now: Instant) -> SharedDungeon {
        let dungeon = Arc::new(Mutex::new(dungeon));
        self.sessions
            .lock()
            .insert(id, SessionEntry { dungeon: Arc::clone(&dungeon), last_access: now });
        dungeon
    }

    /// Looks a dungeon up and refreshes its idle clock.
    pub fn get(&self, id: DungeonId) -> Option<SharedDungeon> {
        self.get_at(id, Instant::now())
    }

    pub fn get_at(&self, id: DungeonId, now: Instant) -> Option<SharedDungeon> {
        let mut sessions = self.sessions.lock();
        let entry = sessions.get_mut(&id)?;
        entry.last_access = now;
        Some(Arc::clone(&entry.dungeon))
    }

    pub fn remove(&self, id: DungeonId) -> Option<SharedDungeon> {
        self.sessions.lock().remove(&id).map(|entry| entry.dungeon)
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }

    /// Drops every dungeon idle for longer than the timeout and returns them,
    /// sorted by id, so the caller can archive them.
    pub fn evict_idle_at(&self, now: Instant) -> Vec<(DungeonId, SharedDungeon)> {
        let mut sessions = self.sessions.lock();
        let mut idle: Vec<DungeonId> = sessions
            .iter()
            .filter(|(_, entry)| now.saturating_duration_since(entry.last_access) > self.idle_timeout)
            .map(|(id, _)| *id)
            .collect();
        idle.sort_unstable();

        let evicted: Vec<(DungeonId, SharedDungeon)> = idle
            .into_iter()
            .filter_map(|id| sessions.remove(&id).map(|entry| (id, entry.dungeon)))
            .collect();
        if !evicted.is_empty() {
            info!(evicted = evicted.len(), remaining = sessions.len(), "evicted idle dungeons");
        }
        evicted
    }

    /// Evicts idle dungeons and writes each one to `store`.
    pub fn archive_idle_at(
        &self,
        now: Instant,
        store: &impl DungeonStore,
    ) -> Result<Vec<DungeonId>, StoreError> {
        let mut archived = Vec::new();
        for (id, dungeon) in self.evict_idle_at(now) {
            let record = dungeon.lock().to_record();
            store.save(id, &record)?;
            archived.push(id);
        }
        Ok(archived)
    }
}
