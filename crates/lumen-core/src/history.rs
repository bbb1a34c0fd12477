//! Bounded, ordered, persisted generation history.
//!
//! Keeps the five most recent successful generations, newest first, in a
//! single JSON file. Recency matters more than completeness here, so
//! insertion of a sixth item evicts the oldest. Durability is best-effort:
//! a missing or corrupt file loads as empty history, and write failures are
//! logged rather than surfaced.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core_types::HistoryItem;

/// Fixed capacity of the history list.
pub const MAX_ITEMS: usize = 5;

pub struct HistoryStore {
    path: PathBuf,
    items: Vec<HistoryItem>,
}

impl HistoryStore {
    /// Opens the store at `path`, reading whatever is persisted there.
    /// Corruption is treated as "no history", never as an error.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let items = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Vec<HistoryItem>>(&raw) {
                Ok(items) => items,
                Err(e) => {
                    log::debug!("Ignoring malformed history at {}: {}", path.display(), e);
                    Vec::new()
                }
            },
            Err(e) => {
                log::debug!("No readable history at {}: {}", path.display(), e);
                Vec::new()
            }
        };
        Self { path, items }
    }

    /// Newest-first view of the stored items.
    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    /// Prepends `item`, evicting the oldest entry past capacity, and
    /// persists the full list.
    pub fn insert(&mut self, item: HistoryItem) {
        self.items.insert(0, item);
        self.items.truncate(MAX_ITEMS);
        self.persist();
    }

    /// Empties the list and persists the empty state.
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    fn persist(&self) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("Failed to create history directory: {}", e);
                return;
            }
        }
        match serde_json::to_string(&self.items) {
            Ok(raw) => {
                if let Err(e) = fs::write(&self.path, raw) {
                    log::warn!("Failed to save history to {}: {}", self.path.display(), e);
                }
            }
            Err(e) => log::warn!("Failed to serialize history: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn item(id: &str, prompt: &str) -> HistoryItem {
        HistoryItem {
            id: id.to_string(),
            prompt: prompt.to_string(),
            image_url: "data:image/jpeg;base64,xyz".to_string(),
            timestamp: 1_700_000_000_000,
        }
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::load(dir.path().join("history.json"));
        assert!(store.items().is_empty());
    }

    #[test]
    fn malformed_file_loads_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "{not json").unwrap();
        let store = HistoryStore::load(&path);
        assert!(store.items().is_empty());
    }

    #[test]
    fn insert_prepends_newest_first() {
        let dir = tempdir().unwrap();
        let mut store = HistoryStore::load(dir.path().join("history.json"));
        store.insert(item("1", "first"));
        store.insert(item("2", "second"));
        assert_eq!(store.items()[0].prompt, "second");
        assert_eq!(store.items()[1].prompt, "first");
    }

    #[test]
    fn insert_evicts_oldest_past_capacity() {
        let dir = tempdir().unwrap();
        let mut store = HistoryStore::load(dir.path().join("history.json"));
        for i in 0..6 {
            store.insert(item(&i.to_string(), &format!("prompt {}", i)));
        }
        assert_eq!(store.items().len(), MAX_ITEMS);
        assert_eq!(store.items()[0].prompt, "prompt 5");
        assert!(store.items().iter().all(|it| it.prompt != "prompt 0"));
    }

    #[test]
    fn mutations_persist_across_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        {
            let mut store = HistoryStore::load(&path);
            store.insert(item("1", "kept"));
        }
        let store = HistoryStore::load(&path);
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0].prompt, "kept");
    }

    #[test]
    fn clear_empties_and_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        let mut store = HistoryStore::load(&path);
        store.insert(item("1", "gone"));
        store.clear();
        assert!(store.items().is_empty());

        let reloaded = HistoryStore::load(&path);
        assert!(reloaded.items().is_empty());
    }

    #[test]
    fn persist_failure_is_swallowed() {
        // Point the store at a path whose parent is a file, so writes fail.
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let mut store = HistoryStore::load(blocker.join("history.json"));
        store.insert(item("1", "unsaved"));
        assert_eq!(store.items().len(), 1);
    }
}
