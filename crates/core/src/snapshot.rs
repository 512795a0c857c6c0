//! Local disaster-recovery snapshots.
//!
//! Every cloud save attempt also writes the full case list to the snapshot directory as
//! `icu_backup_<TimestampId>.json`. Keys are strictly increasing and files are created with
//! `create_new`, so a snapshot never overwrites another.

use crate::components::case::Case;
use crate::error::{HandoverError, HandoverResult};
use handover_uuid::{TimestampId, TimestampIdGenerator};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const SNAPSHOT_PREFIX: &str = "icu_backup_";
const SNAPSHOT_SUFFIX: &str = ".json";

#[derive(Debug)]
pub struct SnapshotStore {
    dir: PathBuf,
    ids: TimestampIdGenerator,
}

impl SnapshotStore {
    /// Opens (creating if needed) the snapshot directory.
    ///
    /// Key generation continues after the newest snapshot already on disk, so keys stay
    /// ordered even if the clock has moved backwards since the last run.
    pub fn open(dir: impl Into<PathBuf>) -> HandoverResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(HandoverError::SnapshotDirCreation)?;
        let ids = match scan_keys(&dir)?.pop() {
            Some(newest) => TimestampIdGenerator::starting_after(newest),
            None => TimestampIdGenerator::new(),
        };
        Ok(Self { dir, ids })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `cases` under a fresh key and returns the key.
    pub fn write(&self, cases: &[Case]) -> HandoverResult<TimestampId> {
        let key = self.ids.next_id();
        let json = serde_json::to_vec_pretty(cases).map_err(HandoverError::Serialization)?;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.path_for(&key))
            .map_err(HandoverError::SnapshotWrite)?;
        file.write_all(&json).map_err(HandoverError::SnapshotWrite)?;

        tracing::info!("wrote local snapshot {}", key);
        Ok(key)
    }

    /// All snapshot keys, oldest first.
    pub fn list(&self) -> HandoverResult<Vec<TimestampId>> {
        scan_keys(&self.dir)
    }

    pub fn read(&self, key: &TimestampId) -> HandoverResult<Vec<Case>> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(HandoverError::SnapshotNotFound(key.to_string()))
            }
            Err(e) => return Err(HandoverError::SnapshotRead(e)),
        };
        serde_json::from_slice(&bytes).map_err(HandoverError::Deserialization)
    }

    fn path_for(&self, key: &TimestampId) -> PathBuf {
        self.dir
            .join(format!("{}{}{}", SNAPSHOT_PREFIX, key, SNAPSHOT_SUFFIX))
    }
}

/// Sorted keys of the snapshot files in `dir`. Unrelated files are skipped.
fn scan_keys(dir: &Path) -> HandoverResult<Vec<TimestampId>> {
    let mut keys = Vec::new();
    for entry in fs::read_dir(dir).map_err(HandoverError::SnapshotRead)? {
        let entry = entry.map_err(HandoverError::SnapshotRead)?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let key = name
            .strip_prefix(SNAPSHOT_PREFIX)
            .and_then(|rest| rest.strip_suffix(SNAPSHOT_SUFFIX))
            .and_then(|key| key.parse::<TimestampId>().ok());
        if let Some(key) = key {
            keys.push(key);
        }
    }
    keys.sort();
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read_returns_cases() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();
        let mut case = Case::new(1);
        case.mrn = "A1".into();

        let key = store.write(std::slice::from_ref(&case)).unwrap();

        assert_eq!(store.read(&key).unwrap(), vec![case]);
        let file = dir
            .path()
            .join(format!("icu_backup_{}.json", key));
        assert!(file.is_file());
    }

    #[test]
    fn test_snapshots_never_overwrite() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();

        let keys: Vec<_> = (0..5)
            .map(|_| store.write(&[Case::new(1)]).unwrap())
            .collect();

        let listed = store.list().unwrap();
        assert_eq!(listed, keys);
        assert!(listed.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_reopen_continues_after_newest_key() {
        let dir = TempDir::new().unwrap();
        let first = SnapshotStore::open(dir.path())
            .unwrap()
            .write(&[Case::new(1)])
            .unwrap();

        let reopened = SnapshotStore::open(dir.path()).unwrap();
        let second = reopened.write(&[Case::new(1)]).unwrap();

        assert!(second > first);
        assert_eq!(reopened.list().unwrap().len(), 2);
    }

    #[test]
    fn test_list_ignores_unrelated_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::write(dir.path().join("icu_backup_garbage.json"), "[]").unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();

        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_read_missing_key_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();
        let key = TimestampId::generate(None);

        assert!(matches!(
            store.read(&key),
            Err(HandoverError::SnapshotNotFound(_))
        ));
    }
}
