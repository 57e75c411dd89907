//! Per-profile records
//!
//! Each player profile keeps three scalars: best (lowest) time to win, total
//! wins, and the Dodge high score. A missing or unreadable record reads as
//! "no record"; only writes can fail.

pub mod store;

pub use store::{JsonFileStore, MemoryStore};

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;

/// Everything stored for one profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Fastest win in seconds (Balance-Hold or Coin-Collector)
    #[serde(default)]
    pub best_time: Option<f32>,
    #[serde(default)]
    pub wins: u32,
    /// Most blocks dodged in one Dodge run
    #[serde(default)]
    pub high_score: u32,
}

/// Storage key for a profile name: lowercase, spaces to underscores
pub fn profile_key(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c.to_ascii_lowercase() })
        .collect()
}

/// Read/write access to profile records
pub trait RecordStore {
    /// Whole record, `None` when nothing (readable) is stored
    fn load(&self, profile: &str) -> Option<ProfileRecord>;

    /// Replace the whole record
    fn save(&mut self, profile: &str, record: &ProfileRecord) -> Result<(), PersistenceError>;

    fn read_best_time(&self, profile: &str) -> Option<f32> {
        self.load(profile).and_then(|r| r.best_time)
    }

    fn write_best_time(&mut self, profile: &str, secs: f32) -> Result<(), PersistenceError> {
        let mut record = self.load(profile).unwrap_or_default();
        record.best_time = Some(secs);
        self.save(profile, &record)
    }

    fn read_win_count(&self, profile: &str) -> u32 {
        self.load(profile).map(|r| r.wins).unwrap_or(0)
    }

    fn write_win_count(&mut self, profile: &str, wins: u32) -> Result<(), PersistenceError> {
        let mut record = self.load(profile).unwrap_or_default();
        record.wins = wins;
        self.save(profile, &record)
    }

    fn read_high_score(&self, profile: &str) -> u32 {
        self.load(profile).map(|r| r.high_score).unwrap_or(0)
    }

    fn write_high_score(&mut self, profile: &str, score: u32) -> Result<(), PersistenceError> {
        let mut record = self.load(profile).unwrap_or_default();
        record.high_score = score;
        self.save(profile, &record)
    }
}
