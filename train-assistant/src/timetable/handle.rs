//! Shared, reloadable timetable.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info};

use super::error::LoadError;
use super::store::Store;

/// Thread-safe handle to the current timetable.
///
/// Requests take a snapshot (`Arc<Store>`) and work on it without holding
/// any lock. A reload builds a complete new store first and then swaps the
/// pointer, so readers see either the old store or the new one, never a mix.
#[derive(Clone)]
pub struct TimetableHandle {
    inner: Arc<RwLock<Arc<Store>>>,
    source: Option<PathBuf>,
}

impl TimetableHandle {
    /// Wrap an already-built store with no reload source.
    pub fn new(store: Store) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(store))),
            source: None,
        }
    }

    /// Load from a file, degrading to an empty store on failure.
    ///
    /// The path is remembered for later [`reload`](Self::reload) calls.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let store = Store::from_path(&path).unwrap_or_else(|e| {
            error!(error = %e, "failed to load timetable, serving empty store");
            Store::empty()
        });
        Self {
            inner: Arc::new(RwLock::new(Arc::new(store))),
            source: Some(path),
        }
    }

    /// The current store.
    pub async fn snapshot(&self) -> Arc<Store> {
        let guard = self.inner.read().await;
        Arc::clone(&*guard)
    }

    /// Replace the current store.
    pub async fn replace(&self, store: Store) {
        let store = Arc::new(store);
        let mut guard = self.inner.write().await;
        *guard = store;
    }

    /// Rebuild the store from its source file.
    ///
    /// On success, swaps in the new store and returns its train count. On
    /// failure the existing store is kept and the error is returned.
    pub async fn reload(&self) -> Result<usize, LoadError> {
        let Some(path) = self.source.clone() else {
            return Ok(self.snapshot().await.len());
        };

        let store = tokio::task::spawn_blocking(move || Store::from_path(path))
            .await
            .map_err(|e| LoadError::Io {
                path: self.source.clone().unwrap_or_default(),
                source: std::io::Error::other(e),
            })??;

        let count = store.len();
        self.replace(store).await;
        info!(trains = count, "timetable reloaded");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_timetable(path: &std::path::Path, trains: &[&str]) {
        let mut map = serde_json::Map::new();
        for train in trains {
            map.insert(
                (*train).to_string(),
                json!([{"Station_Code": "A", "Station_Name": "ALPHA"}]),
            );
        }
        std::fs::write(path, serde_json::Value::Object(map).to_string()).unwrap();
    }

    #[tokio::test]
    async fn snapshot_survives_replace() {
        let handle = TimetableHandle::new(Store::empty());
        let before = handle.snapshot().await;

        let store = Store::from_json_str(r#"{"1": [{"Station_Code": "A", "Station_Name": "ALPHA"}]}"#)
            .unwrap();
        handle.replace(store).await;

        assert!(before.is_empty());
        assert_eq!(handle.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn reload_picks_up_file_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trains.json");
        write_timetable(&path, &["101"]);

        let handle = TimetableHandle::open(&path);
        assert_eq!(handle.snapshot().await.len(), 1);

        write_timetable(&path, &["101", "202"]);
        assert_eq!(handle.reload().await.unwrap(), 2);
        assert_eq!(handle.snapshot().await.len(), 2);
    }

    #[tokio::test]
    async fn failed_reload_keeps_existing_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trains.json");
        write_timetable(&path, &["101"]);

        let handle = TimetableHandle::open(&path);
        std::fs::write(&path, "{ broken").unwrap();

        assert!(handle.reload().await.is_err());
        assert_eq!(handle.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let handle = TimetableHandle::open("/nonexistent/trains.json");
        assert!(handle.snapshot().await.is_empty());
    }
}
