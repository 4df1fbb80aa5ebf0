// Cache store for reading and writing cached entries.
// Handles JSON serialization, TTL checking, corruption recovery, and atomic writes.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::Result;

use super::paths::CacheKey;

/// TTL for course, assignment, recording, and grade data: every entry is stale.
pub const DEFAULT_TTL: Duration = Duration::ZERO;

/// TTL for cached login details: re-prompt once a year.
pub const LOGIN_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// On-disk record wrapping the cached data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// The cached data.
    pub data: T,
    /// When the data was written.
    pub last_updated: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// Create a new entry stamped with the current time.
    pub fn new(data: T) -> Self {
        Self {
            data,
            last_updated: Utc::now(),
        }
    }

    /// An entry is valid while its age is strictly below the TTL.
    /// Entries stamped in the future are treated as expired.
    pub fn is_valid(&self, ttl: Duration) -> bool {
        let age = Utc::now()
            .signed_duration_since(self.last_updated)
            .to_std()
            .unwrap_or(Duration::MAX);

        age < ttl
    }
}

/// Outcome of a cache lookup. Never an error: every failure mode is a miss.
#[derive(Debug)]
pub enum CacheLookup<T> {
    /// Entry exists and is within its TTL.
    Fresh(T),
    /// Entry exists but is older than the TTL.
    Expired,
    /// No entry on disk.
    Missing,
    /// Entry exists but could not be read or deserialized.
    Corrupted { path: PathBuf, reason: String },
}

impl<T> CacheLookup<T> {
    /// The cached data, if the lookup was a hit.
    pub fn into_data(self) -> Option<T> {
        match self {
            CacheLookup::Fresh(data) => Some(data),
            _ => None,
        }
    }

    /// Human-readable warning for corrupted entries.
    pub fn warning(&self) -> Option<String> {
        match self {
            CacheLookup::Corrupted { path, .. } => Some(format!(
                "Cache file {} is corrupted. Reinitializing.",
                path.display()
            )),
            _ => None,
        }
    }
}

/// Key-value store of timestamped JSON entries, one file per key.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    /// Create a store rooted at `dir`. Nothing is created until the first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the store writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path(&self, key: &CacheKey) -> PathBuf {
        key.path_in(&self.dir)
    }

    /// Look up `key`, honouring `ttl`. Unreadable files are reported, not raised.
    pub fn load<T: DeserializeOwned>(&self, key: &CacheKey, ttl: Duration) -> CacheLookup<T> {
        let path = self.path(key);

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return CacheLookup::Missing,
            Err(e) => {
                tracing::warn!(key = %key, path = %path.display(), error = %e, "cache file unreadable");
                return CacheLookup::Corrupted {
                    path,
                    reason: e.to_string(),
                };
            }
        };

        match serde_json::from_str::<CacheEntry<T>>(&contents) {
            Ok(entry) if entry.is_valid(ttl) => {
                tracing::debug!(key = %key, "cache hit");
                CacheLookup::Fresh(entry.data)
            }
            Ok(_) => {
                tracing::debug!(key = %key, "cache entry expired");
                CacheLookup::Expired
            }
            Err(e) => {
                tracing::warn!(key = %key, path = %path.display(), error = %e, "cache file corrupted");
                CacheLookup::Corrupted {
                    path,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Persist `data` under `key`, stamped with the current time.
    pub fn save<T: Serialize>(&self, key: &CacheKey, data: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path(key);
        let entry = CacheEntry::new(data);
        let json = serde_json::to_string_pretty(&entry)?;

        // Write atomically via temp file
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(key = %key, path = %path.display(), "cache entry saved");
        Ok(())
    }
}
