use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::catalog::MovieEntry;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to write {0}: {1}")]
    Io(String, std::io::Error),
    #[error("Failed to encode override list: {0}")]
    Json(#[from] serde_json::Error),
}

/// Admin-curated entries kept in a single JSON array file.
///
/// Reads never fail: a missing or unreadable file is an empty list. Writes
/// replace the whole file through a temporary sibling and a rename, and
/// `add` holds `write_lock` for its read-modify-write so concurrent adds
/// cannot drop each other's entries.
pub struct ManualStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ManualStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Vec<MovieEntry> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) => {
                debug!("No manual overrides at {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<MovieEntry>>(&content) {
            Ok(items) => items,
            Err(e) => {
                warn!("Ignoring malformed override file {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    pub async fn save(&self, items: &[MovieEntry]) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.write_file(items).await
    }

    /// Prepend `entry` and persist. Returns the new list length.
    pub async fn add(&self, entry: MovieEntry) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut items = self.load().await;
        items.insert(0, entry);
        self.write_file(&items).await?;

        info!("Added manual override, {} entries now", items.len());
        Ok(items.len())
    }

    async fn write_file(&self, items: &[MovieEntry]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(items)?;
        let tmp = self.tmp_path();
        let io_err = |e: std::io::Error| StoreError::Io(self.path.display().to_string(), e);

        tokio::fs::write(&tmp, json.as_bytes()).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Year;
    use std::sync::Arc;

    fn store_in(dir: &tempfile::TempDir) -> ManualStore {
        ManualStore::new(dir.path().join("manual_trending.json"))
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(&dir).load().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_files_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        for content in ["", "not json", "{\"title\": \"x\"}", "[1, 2]", "[{\"title\": ["] {
            std::fs::write(store.path(), content).unwrap();
            assert!(store.load().await.is_empty(), "content: {:?}", content);
        }
    }

    #[tokio::test]
    async fn test_add_prepends_and_counts() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.add(MovieEntry::new("First", "", "2020", "Bollywood")).await.unwrap(), 1);
        assert_eq!(store.add(MovieEntry::new("Second", "", 2021, "Tollywood")).await.unwrap(), 2);

        let items = store.load().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Second");
        assert_eq!(items[0].year, Year::Number(2021));
        assert_eq!(items[1].title, "First");
        assert!(!store.tmp_path().exists());
    }

    #[tokio::test]
    async fn test_add_over_corrupt_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{{{").unwrap();

        assert_eq!(store.add(MovieEntry::new("Only", "", "", "")).await.unwrap(), 1);
        assert_eq!(store.load().await[0].title, "Only");
    }

    #[tokio::test]
    async fn test_save_load_roundtrip_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(
            store.path(),
            r#"[{"title":"Pushpa","poster":"","year":"2021","category":"South Indian"},
                {"title":"RRR","poster":"http://x/rrr.jpg","year":2022,"category":"Tollywood"}]"#,
        )
        .unwrap();

        let first = store.load().await;
        store.save(&first).await.unwrap();
        let bytes_once = std::fs::read(store.path()).unwrap();

        let second = store.load().await;
        assert_eq!(first, second);
        store.save(&second).await.unwrap();
        assert_eq!(bytes_once, std::fs::read(store.path()).unwrap());
    }

    #[tokio::test]
    async fn test_add_keeps_loosely_typed_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(
            store.path(),
            r#"[{"title":"RRR","poster":"","year":"2022","category":"Tollywood"},
                {"title":"Sholay","poster":"","year":1975.0,"category":"Bollywood","note":"classic"}]"#,
        )
        .unwrap();

        assert_eq!(store.load().await.len(), 2);
        assert_eq!(store.add(MovieEntry::new("New", "", "2024", "")).await.unwrap(), 3);

        let written: serde_json::Value =
            serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
        let items = written.as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["title"], "New");
        assert_eq!(items[1]["year"], "2022");
        assert_eq!(items[2]["title"], "Sholay");
        assert_eq!(items[2]["year"], serde_json::json!(1975.0));
        assert_eq!(items[2]["note"], "classic");
    }

    #[tokio::test]
    async fn test_unicode_is_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.add(MovieEntry::new("दंगल", "", "2016", "Bollywood")).await.unwrap();
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("दंगल"));
    }

    #[tokio::test]
    async fn test_concurrent_adds_keep_every_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(store_in(&dir));

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .add(MovieEntry::new(format!("Movie {}", i), "", "", ""))
                        .await
                        .unwrap()
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(store.load().await.len(), 16);
    }
}
