use crate::errors::{LoadError, PersistError};
use crate::record::ResultRecord;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum SortKey {
    #[default]
    Wpm,
    Accuracy,
    Name,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Backing resource for the leaderboard records
pub trait LeaderboardStorage: Send + Sync {
    /// Read every persisted record. A missing resource is an empty board.
    fn load(&self) -> Result<Vec<ResultRecord>, LoadError>;
    /// Replace the persisted records with `records`.
    fn save(&self, records: &[ResultRecord]) -> Result<(), PersistError>;
}

/// Stores the board as a single JSON array, rewritten on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LeaderboardStorage for JsonFileStorage {
    fn load(&self) -> Result<Vec<ResultRecord>, LoadError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(LoadError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| LoadError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, records: &[ResultRecord]) -> Result<(), PersistError> {
        let data = serde_json::to_vec(records)?;
        replace_file(&self.path, |file| file.write_all(&data)).map_err(|source| PersistError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Write a sibling temp file with `write` and rename it over `path`.
///
/// `path` keeps its previous contents unless the rename succeeds.
fn replace_file<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut fs::File) -> io::Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    write(tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Append-only leaderboard kept in memory and mirrored to storage.
///
/// One lock covers the whole append-then-save sequence, so concurrent
/// writers never lose each other's records.
#[derive(Debug)]
pub struct Leaderboard<S: LeaderboardStorage> {
    storage: S,
    records: Mutex<Vec<ResultRecord>>,
}

impl<S: LeaderboardStorage> Leaderboard<S> {
    pub fn open(storage: S) -> Result<Self, LoadError> {
        let records = storage.load()?;
        info!(records = records.len(), "leaderboard loaded");

        Ok(Self {
            storage,
            records: Mutex::new(records),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ResultRecord>> {
        // a panicking writer can at worst leave an appended but unsaved record
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `record` and rewrite storage.
    ///
    /// A failed save leaves the record in memory; the next successful
    /// `add` or `flush` writes it out.
    ///
    /// Records with an accuracy outside `0..=100` (NaN included) are
    /// rejected and never reach memory or storage.
    pub fn add(&self, record: ResultRecord) -> Result<(), PersistError> {
        if !(0.0..=100.0).contains(&record.accuracy) {
            return Err(PersistError::InvalidAccuracy {
                name: record.name,
                accuracy: record.accuracy,
            });
        }

        let mut records = self.lock();
        debug!(name = %record.name, wpm = record.words_per_minute, "adding record");
        records.push(record);

        self.storage.save(&records).inspect_err(|e| {
            warn!(error = %e, records = records.len(), "leaderboard save failed, memory is ahead of storage");
        })
    }

    pub fn sorted_view(&self, key: SortKey, order: SortOrder) -> Vec<ResultRecord> {
        let records = self.lock();

        records
            .iter()
            .cloned()
            .sorted_by(|a, b| {
                let ord = compare_by(key, a, b);
                match order {
                    SortOrder::Ascending => ord,
                    SortOrder::Descending => ord.reverse(),
                }
            })
            .collect()
    }

    /// Snapshot in submission order
    pub fn records(&self) -> Vec<ResultRecord> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Write the in-memory board to storage one final time.
    pub fn flush(&self) -> Result<(), PersistError> {
        let records = self.lock();
        self.storage.save(&records)?;
        info!(records = records.len(), "leaderboard flushed");
        Ok(())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

fn compare_by(key: SortKey, a: &ResultRecord, b: &ResultRecord) -> Ordering {
    match key {
        SortKey::Wpm => a.words_per_minute.cmp(&b.words_per_minute),
        SortKey::Accuracy => a.accuracy.total_cmp(&b.accuracy),
        SortKey::Name => a.name.cmp(&b.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
    use tempfile::tempdir;

    /// Storage that can be told to fail saves
    #[derive(Default)]
    struct FlakyStorage {
        fail: AtomicBool,
        saved: Mutex<Vec<ResultRecord>>,
    }

    impl LeaderboardStorage for FlakyStorage {
        fn load(&self) -> Result<Vec<ResultRecord>, LoadError> {
            Ok(self.saved.lock().unwrap().clone())
        }

        fn save(&self, records: &[ResultRecord]) -> Result<(), PersistError> {
            if self.fail.load(AtomicOrdering::SeqCst) {
                return Err(PersistError::Io {
                    path: PathBuf::from("flaky"),
                    source: std::io::Error::new(ErrorKind::Other, "disk full"),
                });
            }
            *self.saved.lock().unwrap() = records.to_vec();
            Ok(())
        }
    }

    fn sample() -> Vec<ResultRecord> {
        vec![
            ResultRecord::new("ann", 40, 90.0),
            ResultRecord::new("bob", 55, 80.0),
            ResultRecord::new("cid", 30, 99.5),
        ]
    }

    #[test]
    fn missing_file_is_empty_board() {
        let dir = tempdir().unwrap();
        let board = Leaderboard::open(JsonFileStorage::with_path(
            dir.path().join("leaderboard.json"),
        ))
        .unwrap();
        assert!(board.is_empty());
        assert!(board.sorted_view(SortKey::Wpm, SortOrder::Descending).is_empty());
    }

    #[test]
    fn corrupt_file_fails_to_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("leaderboard.json");
        fs::write(&path, "{not json").unwrap();

        let err = Leaderboard::open(JsonFileStorage::with_path(&path)).unwrap_err();
        assert_matches!(err, LoadError::Corrupt { path: p, .. } if p == path);
    }

    #[test]
    fn add_writes_whole_board() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("leaderboard.json");
        let board = Leaderboard::open(JsonFileStorage::with_path(&path)).unwrap();

        for record in sample() {
            board.add(record).unwrap();
        }

        let on_disk: Vec<ResultRecord> = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk, board.records());
        assert_eq!(on_disk, sample());
    }

    #[test]
    fn sorted_view_defaults_to_descending_wpm() {
        let storage = FlakyStorage::default();
        let board = Leaderboard::open(storage).unwrap();
        for record in sample() {
            board.add(record).unwrap();
        }

        let names: Vec<_> = board
            .sorted_view(SortKey::default(), SortOrder::default())
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, ["bob", "ann", "cid"]);
    }

    #[test]
    fn sorted_view_ascending_and_other_keys() {
        let board = Leaderboard::open(FlakyStorage::default()).unwrap();
        for record in sample() {
            board.add(record).unwrap();
        }

        let by = |key, order| -> Vec<String> {
            board
                .sorted_view(key, order)
                .into_iter()
                .map(|r| r.name)
                .collect()
        };
        assert_eq!(by(SortKey::Wpm, SortOrder::Ascending), ["cid", "ann", "bob"]);
        assert_eq!(by(SortKey::Accuracy, SortOrder::Descending), ["cid", "ann", "bob"]);
        assert_eq!(by(SortKey::Name, SortOrder::Ascending), ["ann", "bob", "cid"]);
    }

    #[test]
    fn ties_keep_submission_order() {
        let board = Leaderboard::open(FlakyStorage::default()).unwrap();
        board.add(ResultRecord::new("first", 50, 90.0)).unwrap();
        board.add(ResultRecord::new("second", 50, 95.0)).unwrap();
        board.add(ResultRecord::new("first", 50, 70.0)).unwrap();

        let view = board.sorted_view(SortKey::Wpm, SortOrder::Ascending);
        assert_eq!(view, board.records());
    }

    #[test]
    fn sorted_view_is_idempotent() {
        let board = Leaderboard::open(FlakyStorage::default()).unwrap();
        for record in sample() {
            board.add(record).unwrap();
        }
        let first = board.sorted_view(SortKey::Wpm, SortOrder::Descending);
        let second = board.sorted_view(SortKey::Wpm, SortOrder::Descending);
        assert_eq!(first, second);
    }

    #[test]
    fn out_of_range_accuracy_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("leaderboard.json");
        let board = Leaderboard::open(JsonFileStorage::with_path(&path)).unwrap();
        board.add(ResultRecord::new("ann", 40, 90.0)).unwrap();

        for accuracy in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -0.5, 100.5] {
            let err = board.add(ResultRecord::new("bad", 10, accuracy)).unwrap_err();
            assert_matches!(err, PersistError::InvalidAccuracy { .. });
        }
        board.add(ResultRecord::new("edge", 0, 0.0)).unwrap();
        board.add(ResultRecord::new("edge", 0, 100.0)).unwrap();

        assert_eq!(board.len(), 3);
        let reopened = Leaderboard::open(JsonFileStorage::with_path(&path)).unwrap();
        assert_eq!(reopened.records(), board.records());
    }

    #[test]
    fn failed_replace_keeps_previous_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("leaderboard.json");
        let storage = JsonFileStorage::with_path(&path);
        storage.save(&sample()).unwrap();

        let result = replace_file(&path, |file| {
            file.write_all(b"[{\"name\":\"half")?;
            Err(io::Error::new(ErrorKind::Other, "no space left on device"))
        });
        assert!(result.is_err());

        assert_eq!(storage.load().unwrap(), sample());
        // the temp file is cleaned up
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn replace_file_creates_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plain.json");
        replace_file(&path, |file| file.write_all(b"[]")).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"[]");
    }

    #[test]
    fn failed_save_keeps_record_in_memory() {
        let board = Leaderboard::open(FlakyStorage::default()).unwrap();
        board.add(ResultRecord::new("ann", 40, 90.0)).unwrap();

        board.storage().fail.store(true, AtomicOrdering::SeqCst);
        let err = board.add(ResultRecord::new("bob", 50, 80.0)).unwrap_err();
        assert_matches!(err, PersistError::Io { .. });

        assert_eq!(board.len(), 2);
        assert_eq!(board.storage().saved.lock().unwrap().len(), 1);

        board.storage().fail.store(false, AtomicOrdering::SeqCst);
        board.flush().unwrap();
        assert_eq!(*board.storage().saved.lock().unwrap(), board.records());
    }
}
