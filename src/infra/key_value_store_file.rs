use crate::domain_port::{KeyValueStore, StoreError};
use crate::logger::*;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::ffi::OsString;
use std::path::PathBuf;
use tokio::sync::Mutex;

/// Keeps all entries as one JSON object in a single file.
///
/// Each mutation rewrites a sibling temp file and renames it over the
/// original, so a crash leaves either the old or the new contents.
pub struct FileKeyValueStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileKeyValueStore {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(OsString::from).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn read_map(&self) -> Result<Map<String, Value>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
            key: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// A corrupt file reads as empty here, so the next write replaces it.
    async fn read_map_for_write(&self) -> Result<(Map<String, Value>, bool), StoreError> {
        match self.read_map().await {
            Ok(map) => Ok((map, false)),
            Err(StoreError::Corrupt { reason, .. }) => {
                warn!(path = %self.path.display(), %reason, "replacing corrupt store file");
                Ok((Map::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    async fn write_map(&self, map: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Io(e.to_string()))?;
        }
        let bytes = serde_json::to_vec_pretty(map).map_err(|e| StoreError::Io(e.to_string()))?;
        let staging = self.staging_path();
        tokio::fs::write(&staging, bytes)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        trace!(path = %self.path.display(), entries = map.len(), "store flushed");
        Ok(())
    }
}

#[async_trait::async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map().await?;
        Ok(map.remove(key).filter(|value| !value.is_null()))
    }

    async fn set_many(&self, entries: Vec<(String, Value)>) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let (mut map, _) = self.read_map_for_write().await?;
        map.extend(entries);
        self.write_map(&map).await
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let (mut map, corrupt) = self.read_map_for_write().await?;
        let before = map.len();
        for key in keys {
            map.remove(*key);
        }
        if map.len() == before && !corrupt {
            return Ok(());
        }
        self.write_map(&map).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("absent.json"));
        assert_eq!(store.get("anything").await.unwrap(), None);
    }

    #[tokio::test]
    async fn entries_survive_a_new_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        let store = FileKeyValueStore::new(&path);
        store
            .set_many(vec![
                ("a".to_string(), json!("one")),
                ("b".to_string(), json!({"n": 2})),
            ])
            .await
            .unwrap();

        let reopened = FileKeyValueStore::new(&path);
        assert_eq!(reopened.get("a").await.unwrap(), Some(json!("one")));
        assert_eq!(reopened.get("b").await.unwrap(), Some(json!({"n": 2})));
        assert!(!dir.path().join("nested").join("store.json.tmp").exists());
    }

    #[tokio::test]
    async fn remove_many_drops_only_named_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("store.json"));
        store
            .set_many(vec![
                ("keep".to_string(), json!(true)),
                ("drop".to_string(), json!(1)),
            ])
            .await
            .unwrap();
        store.remove_many(&["drop", "never-set"]).await.unwrap();

        assert_eq!(store.get("drop").await.unwrap(), None);
        assert_eq!(store.get("keep").await.unwrap(), Some(json!(true)));
    }

    #[tokio::test]
    async fn garbage_file_is_reported_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, b"{not json").unwrap();
        let store = FileKeyValueStore::new(&path);
        assert!(matches!(
            store.get("a").await,
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[tokio::test]
    async fn remove_many_replaces_a_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, b"{truncated").unwrap();
        let store = FileKeyValueStore::new(&path);

        store.remove_many(&["a"]).await.unwrap();

        assert_eq!(store.get("a").await.unwrap(), None);
        let contents: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(contents, json!({}));
    }

    #[tokio::test]
    async fn set_many_starts_over_on_a_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, b"[1, 2").unwrap();
        let store = FileKeyValueStore::new(&path);

        store
            .set_many(vec![("a".to_string(), json!("one"))])
            .await
            .unwrap();

        assert_eq!(store.get("a").await.unwrap(), Some(json!("one")));
    }

    #[tokio::test]
    async fn staging_file_keeps_the_full_name() {
        let dir = tempfile::tempdir().unwrap();
        let json_store = FileKeyValueStore::new(dir.path().join("a.json"));
        let yaml_store = FileKeyValueStore::new(dir.path().join("a.yaml"));
        let tmp_store = FileKeyValueStore::new(dir.path().join("b.tmp"));

        assert_ne!(json_store.staging_path(), yaml_store.staging_path());
        assert_eq!(tmp_store.staging_path(), dir.path().join("b.tmp.tmp"));

        tmp_store
            .set_many(vec![("k".to_string(), json!(1))])
            .await
            .unwrap();
        assert_eq!(tmp_store.get("k").await.unwrap(), Some(json!(1)));
    }
}
