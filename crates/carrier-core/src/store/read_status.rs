//! Persisted record of which message uids have been viewed.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("writing read-status map: {0}")]
    Io(#[from] std::io::Error),
    #[error("encoding read-status map: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Map from message uid to "has been viewed". Entries are added lazily;
/// absence means unread.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadStatusMap(HashMap<u64, bool>);

impl ReadStatusMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the map from `path`. A missing or unreadable file is a fresh
    /// start, not an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|err| {
                debug!(path = %path.display(), %err, "read-status file unparsable, starting empty");
                Self::default()
            }),
            Err(err) => {
                debug!(path = %path.display(), %err, "no read-status file, starting empty");
                Self::default()
            }
        }
    }

    /// Write the map to `path`. Failure here is fatal to shutdown.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PersistError> {
        let data = serde_json::to_string(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    pub fn mark_read(&mut self, uid: u64) {
        self.0.insert(uid, true);
    }

    pub fn was_read(&self, uid: u64) -> bool {
        self.0.get(&uid).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_uid_is_unread() {
        let map = ReadStatusMap::new();
        assert!(!map.was_read(42));
    }

    #[test]
    fn test_mark_read_is_idempotent() {
        let mut map = ReadStatusMap::new();
        map.mark_read(7);
        map.mark_read(7);
        assert!(map.was_read(7));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let map = ReadStatusMap::load(dir.path().join("messages.json"));
        assert!(map.is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages.json");
        fs::write(&path, "{{{").unwrap();
        assert!(ReadStatusMap::load(&path).is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages.json");

        let mut map = ReadStatusMap::new();
        map.mark_read(1);
        map.mark_read(99);
        map.save(&path).unwrap();

        let loaded = ReadStatusMap::load(&path);
        assert!(loaded.was_read(1));
        assert!(loaded.was_read(99));
        assert!(!loaded.was_read(2));
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let map = ReadStatusMap::new();
        let result = map.save(dir.path().join("no-such-dir").join("messages.json"));
        assert!(matches!(result, Err(PersistError::Io(_))));
    }
}
