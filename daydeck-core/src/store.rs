//! Durable local persistence for dashboard state.
//!
//! Tasks and layout live in independent JSON files under the data
//! directory, plus a marker file for the unlock flag. There is no schema
//! version and no migration: stored shapes are assumed forward-compatible,
//! and anything missing or unreadable falls back to the typed default so
//! a damaged file never takes the dashboard down.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{DeckError, DeckResult};
use crate::layout::Layout;
use crate::task::Task;

const TASKS_FILE: &str = "tasks.json";
const LAYOUT_FILE: &str = "layout.json";
const UNLOCK_MARKER: &str = "unlocked";

/// Everything the store holds for the dashboard proper.
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub layout: Layout,
}

pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn open(root: impl Into<PathBuf>) -> DeckResult<Self> {
        let root = root.into();

        std::fs::create_dir_all(&root).map_err(|e| {
            DeckError::Store(format!(
                "Could not create data directory {}: {e}",
                root.display()
            ))
        })?;

        Ok(LocalStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read both state files. Absent or malformed files yield defaults.
    pub fn load(&self) -> Snapshot {
        Snapshot {
            tasks: self.read_or_default(TASKS_FILE),
            layout: self.read_or_default(LAYOUT_FILE),
        }
    }

    fn read_or_default<T: DeserializeOwned + Default>(&self, file: &str) -> T {
        let path = self.root.join(file);

        if !path.exists() {
            return T::default();
        }

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!(path = %path.display(), %err, "could not read state file, using defaults");
                return T::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(value) => value,
            Err(err) => {
                warn!(path = %path.display(), %err, "malformed state file, using defaults");
                T::default()
            }
        }
    }

    /// Persist both values. Two independent writes; both are recomputed
    /// together on the next load, so no cross-file transaction is needed.
    pub fn save(&self, tasks: &[Task], layout: &Layout) -> DeckResult<()> {
        self.save_tasks(tasks)?;
        self.save_layout(layout)
    }

    pub fn save_tasks(&self, tasks: &[Task]) -> DeckResult<()> {
        self.write(TASKS_FILE, &tasks)
    }

    pub fn save_layout(&self, layout: &Layout) -> DeckResult<()> {
        self.write(LAYOUT_FILE, layout)
    }

    fn write<T: Serialize>(&self, file: &str, value: &T) -> DeckResult<()> {
        let contents = serde_json::to_string_pretty(value)
            .map_err(|e| DeckError::Serialization(e.to_string()))?;

        std::fs::write(self.root.join(file), contents)?;

        Ok(())
    }

    // --- unlock marker ---

    pub fn is_unlocked(&self) -> bool {
        self.root.join(UNLOCK_MARKER).exists()
    }

    pub fn set_unlocked(&self, unlocked: bool) -> DeckResult<()> {
        let path = self.root.join(UNLOCK_MARKER);

        if unlocked {
            std::fs::write(&path, b"")?;
        } else if let Err(err) = std::fs::remove_file(&path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                return Err(err.into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SectionId;
    use crate::task::TaskKind;

    fn temp_store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("daydeck")).unwrap();
        (dir, store)
    }

    // --- load / save ---

    #[test]
    fn fresh_store_yields_defaults() {
        let (_dir, store) = temp_store();
        let snapshot = store.load();
        assert!(snapshot.tasks.is_empty());
        assert_eq!(snapshot.layout, Layout::default());
    }

    #[test]
    fn saved_state_round_trips() {
        let (_dir, store) = temp_store();

        let tasks = vec![
            Task::new("Draft Q3 plan", TaskKind::Today),
            Task::new("Review board deck", TaskKind::Checklist),
        ];
        let mut layout = Layout::default();
        layout.reorder(crate::layout::Slot::Left, SectionId::News, SectionId::Tasks);

        store.save(&tasks, &layout).unwrap();

        let snapshot = store.load();
        assert_eq!(snapshot.tasks, tasks);
        assert_eq!(snapshot.layout, layout);
    }

    #[test]
    fn malformed_files_fall_back_to_defaults() {
        let (_dir, store) = temp_store();

        std::fs::write(store.root().join("tasks.json"), "{not json").unwrap();
        std::fs::write(store.root().join("layout.json"), "[1, 2, 3]").unwrap();

        let snapshot = store.load();
        assert!(snapshot.tasks.is_empty());
        assert_eq!(snapshot.layout, Layout::default());
    }

    #[test]
    fn tasks_and_layout_persist_independently() {
        let (_dir, store) = temp_store();

        let tasks = vec![Task::new("Call advisory panel", TaskKind::Today)];
        store.save_tasks(&tasks).unwrap();

        let snapshot = store.load();
        assert_eq!(snapshot.tasks, tasks);
        assert_eq!(snapshot.layout, Layout::default());
    }

    // --- unlock marker ---

    #[test]
    fn unlock_marker_round_trips() {
        let (_dir, store) = temp_store();
        assert!(!store.is_unlocked());

        store.set_unlocked(true).unwrap();
        assert!(store.is_unlocked());

        store.set_unlocked(false).unwrap();
        assert!(!store.is_unlocked());

        // Locking an already-locked store is fine.
        store.set_unlocked(false).unwrap();
    }
}
