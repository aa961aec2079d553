//! Persistence seam for dungeon records.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::dungeon::DungeonRecord;
use crate::error::StoreError;
use crate::types::DungeonId;

pub trait DungeonStore {
    fn save(&self, id: DungeonId, record: &DungeonRecord) -> Result<(), StoreError>;
    fn load(&self, id: DungeonId) -> Result<Option<DungeonRecord>, StoreError>;
    /// Returns whether a record existed.
    fn delete(&self, id: DungeonId) -> Result<bool, StoreError>;
    fn ids(&self) -> Result<Vec<DungeonId>, StoreError>;
}

/// One `dungeon-<id>.json` file per dungeon under a root directory. Writes go
/// to a sibling temp file first and are renamed into place.
#[derive(Clone, Debug)]
pub struct JsonDirStore {
    root: PathBuf,
}

const FILE_PREFIX: &str = "dungeon-";

impl JsonDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, id: DungeonId) -> PathBuf {
        self.root.join(format!("{FILE_PREFIX}{}.json", id.0))
    }
}

impl DungeonStore for JsonDirStore {
    fn save(&self, id: DungeonId, record: &DungeonRecord) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(id);
        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string(record)?;

        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &path)?;
        debug!(id = id.0, path = %path.display(), "dungeon saved");
        Ok(())
    }

    fn load(&self, id: DungeonId) -> Result<Option<DungeonRecord>, StoreError> {
        let content = match fs::read_to_string(self.path_for(id)) {
            Ok(content) => content,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn delete(&self, id: DungeonId) -> Result<bool, StoreError> {
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(true),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(error) => Err(error.into()),
        }
    }

    fn ids(&self) -> Result<Vec<DungeonId>, StoreError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };
        let mut ids = Vec::new();
        for entry in entries {
            let name = entry?.file_name();
            let id = name
                .to_str()
                .and_then(|name| name.strip_prefix(FILE_PREFIX))
                .and_then(|rest| rest.strip_suffix(".json"))
                .and_then(|digits| digits.parse().ok());
            if let Some(id) = id {
                ids.push(DungeonId(id));
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::config::{DungeonConfig, GenerationMode};
    use crate::dungeon::Dungeon;

    fn record(seed: u64) -> DungeonRecord {
        let config = DungeonConfig {
            seed,
            floor_count: 2,
            mode: GenerationMode::Eager,
            ..DungeonConfig::default()
        };
        Dungeon::generate(config).expect("dungeon").to_record()
    }

    #[test]
    fn save_then_load_round_trips_and_leaves_no_temp_file() {
        let dir = tempdir().expect("tempdir");
        let store = JsonDirStore::new(dir.path().join("dungeons"));
        let saved = record(11);

        store.save(DungeonId(3), &saved).expect("save");
        assert_eq!(store.load(DungeonId(3)).expect("load"), Some(saved));
        assert!(!store.path_for(DungeonId(3)).with_extension("json.tmp").exists());
    }

    #[test]
    fn missing_records_are_none_not_errors() {
        let dir = tempdir().expect("tempdir");
        let store = JsonDirStore::new(dir.path());
        assert_eq!(store.load(DungeonId(1)).expect("load"), None);
        assert!(!store.delete(DungeonId(1)).expect("delete"));
    }

    #[test]
    fn ids_lists_saved_dungeons_in_order() {
        let dir = tempdir().expect("tempdir");
        let store = JsonDirStore::new(dir.path());
        for id in [9, 2, 5] {
            store.save(DungeonId(id), &record(id)).expect("save");
        }
        fs::write(dir.path().join("notes.txt"), "ignored").expect("write");

        assert_eq!(store.ids().expect("ids"), vec![DungeonId(2), DungeonId(5), DungeonId(9)]);
        assert!(store.delete(DungeonId(5)).expect("delete"));
        assert_eq!(store.ids().expect("ids"), vec![DungeonId(2), DungeonId(9)]);
    }

    #[test]
    fn corrupt_records_surface_as_json_errors() {
        let dir = tempdir().expect("tempdir");
        let store = JsonDirStore::new(dir.path());
        fs::write(store.path_for(DungeonId(4)), "{ not json").expect("write");
        assert!(matches!(store.load(DungeonId(4)), Err(StoreError::Json(_))));
    }
}
