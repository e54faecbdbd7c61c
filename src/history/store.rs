//! Bounded, file-backed history of evaluations.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::entry::HistoryEntry;
use crate::error::{PersistenceError, RecallError};

/// Maximum number of entries kept.
pub const HISTORY_CAPACITY: usize = 100;

/// Default history file, relative to the working directory.
pub const DEFAULT_HISTORY_FILE: &str = ".ecalc_history.json";

/// Most-recent-first list of evaluations with a selection cursor.
///
/// Every mutation rewrites the backing file in full. The cursor is reset to
/// the newest entry whenever the list changes.
#[derive(Debug)]
pub struct HistoryStore {
    path: Option<PathBuf>,
    entries: Vec<HistoryEntry>,
    selected: usize,
}

impl HistoryStore {
    /// Load history from `path`.
    ///
    /// A missing, unreadable or malformed file yields an empty history.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let mut entries = match read_entries(&path) {
            Ok(Some(entries)) => entries,
            Ok(None) => {
                debug!(path = %path.display(), "no history file, starting empty");
                Vec::new()
            }
            Err(err) => {
                warn!(path = %path.display(), "ignoring unreadable history: {:#}", err);
                Vec::new()
            }
        };
        entries.truncate(HISTORY_CAPACITY);

        Self {
            path: Some(path),
            entries,
            selected: 0,
        }
    }

    /// A history that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Vec::new(),
            selected: 0,
        }
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Insert an entry at the front and persist.
    ///
    /// The in-memory list is updated even when writing fails.
    pub fn record(
        &mut self,
        expression: impl Into<String>,
        result: impl Into<String>,
    ) -> Result<(), PersistenceError> {
        self.entries
            .insert(0, HistoryEntry::new(expression, result));
        self.entries.truncate(HISTORY_CAPACITY);
        self.selected = 0;
        self.persist()
    }

    /// Remove every entry and persist the empty list.
    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.entries.clear();
        self.selected = 0;
        self.persist()
    }

    /// Move the cursor by `delta`, clamped to the list bounds.
    pub fn select(&mut self, delta: isize) {
        let Some(max) = self.entries.len().checked_sub(1) else {
            self.selected = 0;
            return;
        };
        let target = (self.selected as isize).saturating_add(delta);
        self.selected = target.clamp(0, max as isize) as usize;
    }

    /// Entry at `index`.
    pub fn recall(&self, index: usize) -> Result<&HistoryEntry, RecallError> {
        self.entries.get(index).ok_or(RecallError::OutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    /// Cursor position.
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.selected)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) -> Result<(), PersistenceError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = serde_json::to_string(&self.entries)?;
        let io_error = |source: io::Error| PersistenceError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(path, json).map_err(io_error)
    }
}

/// Read entries from disk. `Ok(None)` means the file does not exist.
fn read_entries(path: &Path) -> Result<Option<Vec<HistoryEntry>>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("Failed to read history from {}", path.display()));
        }
    };

    let entries = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse history from {}", path.display()))?;
    Ok(Some(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> HistoryStore {
        HistoryStore::load(dir.path().join("history.json"))
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.is_empty());
        assert_eq!(store.selected(), 0);
    }

    #[test]
    fn test_record_persists_most_recent_first() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.record("1+1", "2").unwrap();
        store.record("2+2", "4").unwrap();

        let reloaded = store_in(&dir);
        assert_eq!(
            reloaded.entries(),
            &[HistoryEntry::new("2+2", "4"), HistoryEntry::new("1+1", "2")]
        );

        let raw = fs::read_to_string(dir.path().join("history.json")).unwrap();
        assert_eq!(raw, r#"[["2+2","4"],["1+1","2"]]"#);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        for n in 0..=HISTORY_CAPACITY {
            store.record(format!("{}", n), format!("{}", n)).unwrap();
        }

        assert_eq!(store.len(), HISTORY_CAPACITY);
        assert_eq!(store.entries()[0].expression, "100");
        assert_eq!(store.entries()[HISTORY_CAPACITY - 1].expression, "1");
        assert!(store.entries().iter().all(|e| e.expression != "0"));

        assert_eq!(store_in(&dir).len(), HISTORY_CAPACITY);
    }

    #[test]
    fn test_clear_then_load_is_empty() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.record("1+1", "2").unwrap();
        store.clear().unwrap();
        assert!(store.is_empty());
        assert!(store_in(&dir).is_empty());
    }

    #[test]
    fn test_malformed_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");

        for contents in ["not json", r#"{"a": 1}"#, r#"[["only one"]]"#, r#"[[1, 2]]"#] {
            fs::write(&path, contents).unwrap();
            assert!(HistoryStore::load(&path).is_empty(), "{}", contents);
        }
    }

    #[test]
    fn test_oversized_file_is_truncated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        let entries: Vec<(String, String)> = (0..150)
            .map(|n| (n.to_string(), n.to_string()))
            .collect();
        fs::write(&path, serde_json::to_string(&entries).unwrap()).unwrap();

        let store = HistoryStore::load(&path);
        assert_eq!(store.len(), HISTORY_CAPACITY);
        assert_eq!(store.entries()[0].expression, "0");
    }

    #[test]
    fn test_select_stays_in_bounds() {
        let mut store = HistoryStore::in_memory();
        store.select(5);
        assert_eq!(store.selected(), 0);

        for n in 0..3 {
            store.record(n.to_string(), n.to_string()).unwrap();
        }
        for delta in [1, 1, 1, 7, -2, -9, isize::MAX, isize::MIN, 2, -1] {
            store.select(delta);
            assert!(store.selected() < store.len());
        }

        store.select(isize::MAX);
        assert_eq!(store.selected(), 2);
        store.select(-1);
        assert_eq!(store.selected(), 1);
    }

    #[test]
    fn test_mutation_resets_cursor() {
        let mut store = HistoryStore::in_memory();
        store.record("a", "1").unwrap();
        store.record("b", "2").unwrap();
        store.select(1);
        assert_eq!(store.selected(), 1);

        store.record("c", "3").unwrap();
        assert_eq!(store.selected(), 0);
        assert_eq!(store.selected_entry(), Some(&HistoryEntry::new("c", "3")));
    }

    #[test]
    fn test_recall_bounds() {
        let mut store = HistoryStore::in_memory();
        store.record("1+2", "3").unwrap();
        assert_eq!(store.recall(0), Ok(&HistoryEntry::new("1+2", "3")));
        assert_eq!(
            store.recall(1),
            Err(RecallError::OutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn test_unwritable_path_keeps_memory_state() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be overwritten as a file.
        let mut store = HistoryStore::load(dir.path());
        assert!(store.record("1+1", "2").is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("history.json");
        let mut store = HistoryStore::load(&path);
        store.record("1", "1").unwrap();
        assert!(path.exists());
    }
}
