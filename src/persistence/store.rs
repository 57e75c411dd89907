//! Record store backends

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::{ProfileRecord, RecordStore, profile_key};
use crate::error::PersistenceError;

/// One pretty-printed JSON file per profile under a data directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing a profile, e.g. `player_1.json`
    pub fn path_for(&self, profile: &str) -> PathBuf {
        self.dir.join(format!("{}.json", profile_key(profile)))
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self, profile: &str) -> Option<ProfileRecord> {
        let path = self.path_for(profile);
        let json = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&json) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Ignoring unreadable record {}: {}", path.display(), e);
                None
            }
        }
    }

    fn save(&mut self, profile: &str, record: &ProfileRecord) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(profile);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(record)?;
        // Readers never observe a partially written record
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        log::debug!("Saved record {}", path.display());
        Ok(())
    }
}

/// In-memory store (tests, headless runs without a data dir)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<String, ProfileRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn load(&self, profile: &str) -> Option<ProfileRecord> {
        self.records.get(&profile_key(profile)).copied()
    }

    fn save(&mut self, profile: &str, record: &ProfileRecord) -> Result<(), PersistenceError> {
        self.records.insert(profile_key(profile), *record);
        Ok(())
    }
}
