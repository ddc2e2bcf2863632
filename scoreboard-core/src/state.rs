//! Session state that outlives the process
//!
//! Two entries are kept: the milestone snapshot and the last profile lookup
//! code. Both are last-write-wins string values with no versioning, so
//! readers must cope with missing or stale contents.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::warn;

use crate::error::StateError;

/// Key holding the last observed group totals
pub const MILESTONE_TOTALS_KEY: &str = "milestone_totals";

/// Key holding the last code used for a profile lookup
pub const PROFILE_CODE_KEY: &str = "profile_code";

/// State file name inside the data directory
const STATE_FILE: &str = "state.json";

/// String-keyed persistent storage
pub trait StateStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StateError>;
}

/// All keys in one JSON object on disk
pub struct FileStateStore {
    entries: Mutex<BTreeMap<String, String>>,
    file_path: PathBuf,
}

impl FileStateStore {
    /// Open the state file in `data_dir`.
    ///
    /// A missing or unreadable file starts as an empty store.
    pub fn open(data_dir: &Path) -> Self {
        let file_path = Self::file_in(data_dir);
        let entries = match std::fs::read_to_string(&file_path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %file_path.display(), error = %e, "Ignoring corrupt state file");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };

        Self {
            entries: Mutex::new(entries),
            file_path,
        }
    }

    /// Location of the state file inside `data_dir`.
    pub fn file_in(data_dir: &Path) -> PathBuf {
        data_dir.join(STATE_FILE)
    }

    /// Open the state file in the default data directory.
    pub fn open_default() -> Self {
        Self::open(&scoreboard_paths::data_dir())
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StateError> {
        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.file_path, content)?;
        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    /// The in-memory value changes only once the file write succeeded.
    fn set(&self, key: &str, value: &str) -> Result<(), StateError> {
        let mut entries = self.lock();
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value.to_string());
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }
}

/// In-memory store for tests and throwaway sessions
#[derive(Default)]
pub struct MemoryStateStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StateError> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_store() {
        let temp_dir = tempdir().unwrap();
        let store = FileStateStore::open(temp_dir.path());
        assert!(store.get(PROFILE_CODE_KEY).is_none());
    }

    #[test]
    fn test_persistence() {
        let temp_dir = tempdir().unwrap();

        {
            let store = FileStateStore::open(temp_dir.path());
            store.set(PROFILE_CODE_KEY, "ABC1").unwrap();
        }

        {
            let store = FileStateStore::open(temp_dir.path());
            assert_eq!(store.get(PROFILE_CODE_KEY), Some("ABC1".to_string()));
        }
    }

    #[test]
    fn test_last_write_wins() {
        let temp_dir = tempdir().unwrap();
        let store = FileStateStore::open(temp_dir.path());
        store.set(PROFILE_CODE_KEY, "first").unwrap();
        store.set(PROFILE_CODE_KEY, "second").unwrap();
        assert_eq!(store.get(PROFILE_CODE_KEY), Some("second".to_string()));
    }

    #[test]
    fn test_failed_write_keeps_previous_value() {
        let temp_dir = tempdir().unwrap();
        let store = FileStateStore::open(&temp_dir.path().join("state"));
        store.set(PROFILE_CODE_KEY, "first").unwrap();

        // A directory where the file should be makes the next write fail
        std::fs::remove_file(store.path()).unwrap();
        std::fs::create_dir(store.path()).unwrap();

        assert!(store.set(PROFILE_CODE_KEY, "second").is_err());
        assert_eq!(store.get(PROFILE_CODE_KEY), Some("first".to_string()));
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(temp_dir.path().join(STATE_FILE), "{ not json").unwrap();

        let store = FileStateStore::open(temp_dir.path());
        assert!(store.get(MILESTONE_TOTALS_KEY).is_none());

        // Writing replaces the corrupt file
        store.set(MILESTONE_TOTALS_KEY, "{}").unwrap();
        let reopened = FileStateStore::open(temp_dir.path());
        assert_eq!(reopened.get(MILESTONE_TOTALS_KEY), Some("{}".to_string()));
    }

    #[test]
    fn test_creates_missing_data_dir() {
        let temp_dir = tempdir().unwrap();
        let nested = temp_dir.path().join("nested").join("scoreboard");
        let store = FileStateStore::open(&nested);
        store.set(PROFILE_CODE_KEY, "x").unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStateStore::new();
        assert!(store.get("k").is_none());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k"), Some("v".to_string()));
    }
}
